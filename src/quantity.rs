//! Quantity model
//!
//! A [`Quantity`] is a named dimension signature: a cancelled fraction of
//! [`BaseQuantity`] multisets. Two quantities are equivalent when their
//! signatures match, no matter the name or how they were constructed.

use std::{collections::HashMap, fmt::Display, sync::Arc};

use enum_map::EnumMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::IntoEnumIterator;

/// The orthogonal dimensions every quantity is built from
///
/// The declaration order is the sort order used for canonical keys.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    enum_map::Enum,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BaseQuantity {
    Time,
    Length,
    Mass,
    ElectricCurrent,
    Temperature,
    AmountOfSubstance,
    LuminousIntensity,
    // not SI base quantities, but angles convert better this way
    PlaneAngle,
    SolidAngle,
}

impl BaseQuantity {
    /// Single character used in [`Quantity::search_key`]
    pub fn symbol(self) -> char {
        match self {
            BaseQuantity::Time => 's',
            BaseQuantity::Length => 'm',
            BaseQuantity::Mass => 'g',
            BaseQuantity::ElectricCurrent => 'A',
            BaseQuantity::Temperature => 'K',
            BaseQuantity::AmountOfSubstance => 'M',
            BaseQuantity::LuminousIntensity => 'c',
            BaseQuantity::PlaneAngle => 'r',
            BaseQuantity::SolidAngle => 'S',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::iter().find(|base| base.symbol() == symbol)
    }

    /// Position in the canonical ordering, starting at 1
    pub fn sort_order(self) -> u8 {
        self as u8 + 1
    }
}

/// Sorted multiset of base quantities
pub type Dimensions = SmallVec<[BaseQuantity; 8]>;

/// A named factor in a [`QuantityConstruction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityLiteral {
    pub name: String,
    /// `None` means a power of 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i64>,
}

impl QuantityLiteral {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            power: None,
        }
    }

    fn power(&self) -> i64 {
        self.power.unwrap_or(1)
    }

    fn set_power(&mut self, power: i64) {
        self.power = (power != 1).then_some(power);
    }

    fn formula(&self) -> String {
        match self.power {
            Some(power) => format!("{}^{power}", maybe_parenthesize(&self.name)),
            None => self.name.clone(),
        }
    }
}

/// How a quantity was built, only used to display it as a formula
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityConstruction {
    pub numerators: Vec<QuantityLiteral>,
    pub denominators: Vec<QuantityLiteral>,
}

/// A named dimension signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quantity {
    name: String,
    numerator: Dimensions,
    denominator: Dimensions,
    construction: QuantityConstruction,
}

impl Quantity {
    /// Creates a quantity, sorting and cancelling the dimensions
    pub fn new(
        name: impl Into<String>,
        mut numerator: Dimensions,
        mut denominator: Dimensions,
        construction: QuantityConstruction,
    ) -> Self {
        cancel_dimensions(&mut numerator, &mut denominator);
        Self {
            name: name.into(),
            numerator,
            denominator,
            construction,
        }
    }

    /// Quantity that is a product of integer powers of base quantities
    ///
    /// ```
    /// # use unitcore::quantity::{BaseQuantity::*, Quantity};
    /// let speed = Quantity::product("speed", &[(Length, 1), (Time, -1)]);
    /// assert_eq!(speed.search_key(), "m/s");
    /// ```
    pub fn product(name: impl Into<String>, derivation: &[(BaseQuantity, i32)]) -> Self {
        let name = name.into();
        let mut numerator = Dimensions::new();
        let mut denominator = Dimensions::new();
        for &(base, power) in derivation {
            let target = if power < 0 {
                &mut denominator
            } else {
                &mut numerator
            };
            target.extend(std::iter::repeat(base).take(power.unsigned_abs() as usize));
        }
        let construction = QuantityConstruction {
            numerators: vec![QuantityLiteral::new(name.clone())],
            denominators: vec![],
        };
        Self::new(name, numerator, denominator, construction)
    }

    /// Quantity that is a "fraction" of other quantities
    pub fn derived(
        name: impl Into<String>,
        numerators: &[&Quantity],
        denominators: &[&Quantity],
    ) -> Self {
        let name = name.into();
        let (numerator, denominator) = concat_dimensions(&[], &[], numerators, denominators);
        let construction = QuantityConstruction {
            numerators: vec![QuantityLiteral::new(name.clone())],
            denominators: vec![],
        };
        Self::new(name, numerator, denominator, construction)
    }

    /// Multiplies and divides a quantity by others
    ///
    /// The construction keeps track of the factors (merging and cancelling
    /// them by name) so the result can be shown as a formula, while the
    /// dimensions are computed from scratch.
    pub fn extend(
        name: impl Into<String>,
        quantity: &Quantity,
        numerators: &[&Quantity],
        denominators: &[&Quantity],
    ) -> Self {
        let mut numerator_tokens = merge_powers(
            quantity
                .construction
                .numerators
                .iter()
                .cloned()
                .chain(numerators.iter().map(|q| QuantityLiteral::new(&q.name))),
        );
        let mut denominator_tokens = merge_powers(
            quantity
                .construction
                .denominators
                .iter()
                .cloned()
                .chain(denominators.iter().map(|q| QuantityLiteral::new(&q.name))),
        );
        cancel_powers(&mut numerator_tokens, &mut denominator_tokens);

        let (numerator, denominator) = concat_dimensions(
            &quantity.numerator,
            &quantity.denominator,
            numerators,
            denominators,
        );
        Self::new(
            name,
            numerator,
            denominator,
            QuantityConstruction {
                numerators: numerator_tokens,
                denominators: denominator_tokens,
            },
        )
    }

    /// Parses a [`Self::search_key`] back into a quantity
    ///
    /// Returns [`None`] if the key contains an unknown character.
    pub fn from_key(name: impl Into<String>, key: &str) -> Option<Self> {
        let name = name.into();
        let mut numerator = Dimensions::new();
        let mut denominator = Dimensions::new();
        let mut in_denominator = false;
        for c in key.chars() {
            if c == '/' && !in_denominator {
                in_denominator = true;
                continue;
            }
            let base = BaseQuantity::from_symbol(c)?;
            if in_denominator {
                denominator.push(base);
            } else {
                numerator.push(base);
            }
        }
        let construction = QuantityConstruction {
            numerators: vec![QuantityLiteral::new(name.clone())],
            denominators: vec![],
        };
        Some(Self::new(name, numerator, denominator, construction))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn numerator(&self) -> &[BaseQuantity] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[BaseQuantity] {
        &self.denominator
    }

    pub fn construction(&self) -> &QuantityConstruction {
        &self.construction
    }

    /// Same quantity with another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Canonical key. Numerator characters, `/`, denominator characters.
    pub fn search_key(&self) -> String {
        let mut key: String = self.numerator.iter().map(|b| b.symbol()).collect();
        key.push('/');
        key.extend(self.denominator.iter().map(|b| b.symbol()));
        key
    }

    /// Signed power of every base quantity
    pub fn exponents(&self) -> EnumMap<BaseQuantity, i32> {
        let mut exponents = EnumMap::default();
        for &base in &self.numerator {
            exponents[base] += 1;
        }
        for &base in &self.denominator {
            exponents[base] -= 1;
        }
        exponents
    }

    /// If both have the same dimensions, like "speed" and "length/time"
    pub fn is_equivalent(&self, other: &Quantity) -> bool {
        self.numerator == other.numerator && self.denominator == other.denominator
    }

    /// If both are the same quantity or `self` is a synthesized quantity
    /// equivalent to `other`
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.name == other.name || (is_synthesized_name(&self.name) && self.is_equivalent(other))
    }

    /// Human readable formula from the construction, like `force * length`
    pub fn formula(&self) -> String {
        let QuantityConstruction {
            numerators,
            denominators,
        } = &self.construction;
        let mut result = numerators
            .iter()
            .map(QuantityLiteral::formula)
            .collect::<Vec<_>>()
            .join(" * ");
        if !denominators.is_empty() {
            if result.is_empty() {
                result.push('1');
            }
            let denominator = denominators
                .iter()
                .map(QuantityLiteral::formula)
                .collect::<Vec<_>>()
                .join(" * ");
            result.push_str(" / ");
            result.push_str(&maybe_parenthesize(&denominator));
        }
        result
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

fn cancel_dimensions(numerator: &mut Dimensions, denominator: &mut Dimensions) {
    use std::cmp::Ordering;

    numerator.sort_unstable();
    denominator.sort_unstable();

    let mut kept_numerator = Dimensions::new();
    let mut kept_denominator = Dimensions::new();
    let (mut n, mut d) = (0, 0);
    while n < numerator.len() && d < denominator.len() {
        match numerator[n].cmp(&denominator[d]) {
            Ordering::Equal => {
                n += 1;
                d += 1;
            }
            Ordering::Less => {
                kept_numerator.push(numerator[n]);
                n += 1;
            }
            Ordering::Greater => {
                kept_denominator.push(denominator[d]);
                d += 1;
            }
        }
    }
    kept_numerator.extend_from_slice(&numerator[n..]);
    kept_denominator.extend_from_slice(&denominator[d..]);
    *numerator = kept_numerator;
    *denominator = kept_denominator;
}

fn concat_dimensions(
    numerator: &[BaseQuantity],
    denominator: &[BaseQuantity],
    numerators: &[&Quantity],
    denominators: &[&Quantity],
) -> (Dimensions, Dimensions) {
    let mut num = Dimensions::from_slice(numerator);
    let mut den = Dimensions::from_slice(denominator);
    for q in numerators {
        num.extend_from_slice(&q.numerator);
        den.extend_from_slice(&q.denominator);
    }
    // a / (b / c) = a * c / b
    for q in denominators {
        num.extend_from_slice(&q.denominator);
        den.extend_from_slice(&q.numerator);
    }
    (num, den)
}

fn merge_powers(tokens: impl IntoIterator<Item = QuantityLiteral>) -> Vec<QuantityLiteral> {
    let mut result: Vec<QuantityLiteral> = Vec::new();
    for token in tokens {
        match result.iter_mut().find(|t| t.name == token.name) {
            Some(existing) => existing.set_power(existing.power() + token.power()),
            None => result.push(token),
        }
    }
    result
}

fn cancel_powers(numerators: &mut Vec<QuantityLiteral>, denominators: &mut Vec<QuantityLiteral>) {
    use std::cmp::Ordering;

    denominators.retain_mut(|token| {
        let Some(index) = numerators.iter().position(|n| n.name == token.name) else {
            return true;
        };
        let (num_power, den_power) = (numerators[index].power(), token.power());
        match num_power.cmp(&den_power) {
            Ordering::Greater => {
                numerators[index].set_power(num_power - den_power);
                false
            }
            Ordering::Less => {
                numerators.remove(index);
                token.set_power(den_power - num_power);
                true
            }
            Ordering::Equal => {
                numerators.remove(index);
                false
            }
        }
    });
}

fn maybe_parenthesize(name: &str) -> String {
    if name.contains(char::is_whitespace) {
        format!("({name})")
    } else {
        name.to_string()
    }
}

const OPERATOR_CHARS: &[char] = &['*', '/', '(', ')', '^'];

fn is_synthesized_name(name: &str) -> bool {
    name.contains(OPERATOR_CHARS)
}

/// Wraps in parentheses a name with operators, if not already wrapped
pub(crate) fn parenthesize(text: &str) -> String {
    if text.contains(OPERATOR_CHARS) && !text.starts_with('(') {
        format!("({text})")
    } else {
        text.to_string()
    }
}

fn deparenthesize(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text)
}

/// Joins sorted terms with `*`, folding runs of equal terms into powers
///
/// `["a", "a", "b"]` is `a^2*b`.
fn neat_product(sorted_terms: &[&str]) -> String {
    let mut merged: Vec<(&str, u32)> = Vec::new();
    for &term in sorted_terms {
        match merged.last_mut() {
            Some((last, count)) if *last == term => *count += 1,
            _ => merged.push((term, 1)),
        }
    }
    merged
        .into_iter()
        .map(|(term, count)| {
            if count > 1 {
                format!("{term}^{count}")
            } else {
                term.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("*")
}

/// Name of the quantity registered for every dimensionless value
pub const SCALAR: &str = "scalar";

/// Registered quantities, indexed by name and by dimension signature
#[derive(Debug, Clone)]
pub struct QuantityTable {
    by_name: IndexMap<String, Arc<Quantity>>,
    by_key: HashMap<String, Arc<Quantity>>,
}

impl QuantityTable {
    /// Creates a table from a list of quantities
    ///
    /// When more than one quantity has the same dimensions, the first one
    /// is the one found by [`Self::make_quantity`].
    pub fn new(quantities: impl IntoIterator<Item = Quantity>) -> Self {
        let mut by_name = IndexMap::new();
        let mut by_key = HashMap::new();
        for quantity in quantities {
            let quantity = Arc::new(quantity);
            by_key
                .entry(quantity.search_key())
                .or_insert_with(|| Arc::clone(&quantity));
            by_name.insert(quantity.name.clone(), quantity);
        }
        Self { by_name, by_key }
    }

    /// Table with the [`standard_quantities`]
    pub fn standard() -> Self {
        Self::new(standard_quantities())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Quantity>> {
        self.by_name.get(name)
    }

    pub fn by_key(&self, key: &str) -> Option<&Arc<Quantity>> {
        self.by_key.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Quantity>> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The quantity of a base dimension, like `length` for
    /// [`BaseQuantity::Length`]
    ///
    /// Registered if present, created otherwise.
    pub fn base(&self, base: BaseQuantity) -> Arc<Quantity> {
        let name = base.to_string();
        self.by_name
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Arc::new(Quantity::product(name, &[(base, 1)])))
    }

    /// The scalar (dimensionless) quantity
    pub fn scalar(&self) -> Arc<Quantity> {
        self.by_name
            .get(SCALAR)
            .cloned()
            .unwrap_or_else(|| Arc::new(scalar_quantity()))
    }

    /// Quantity for a "fraction" of quantities
    ///
    /// If a registered quantity has the same dimensions it is returned, so
    /// `length / time` is `speed`. Otherwise a new quantity is created with
    /// a name synthesized from the operands, like `length^2/time`.
    ///
    /// When several registered quantities share the dimensions the first one
    /// wins, so `mass*length^2/time^2` is `energy` and never `torque`.
    pub fn make_quantity(&self, numerators: &[&Quantity], denominators: &[&Quantity]) -> Arc<Quantity> {
        fn sides(name: &str) -> (&str, &str) {
            let (num, den) = name.split_once('/').unwrap_or((name, ""));
            (deparenthesize(num), deparenthesize(den))
        }
        fn terms(side: &str) -> impl Iterator<Item = &str> {
            side.split('*').filter(|t| !t.is_empty() && *t != "1")
        }

        let mut numerator_names = Vec::new();
        let mut denominator_names = Vec::new();
        for q in numerators {
            let (num, den) = sides(&q.name);
            numerator_names.extend(terms(num));
            denominator_names.extend(terms(den));
        }
        for q in denominators {
            let (num, den) = sides(&q.name);
            numerator_names.extend(terms(den));
            denominator_names.extend(terms(num));
        }
        numerator_names.sort_unstable();
        denominator_names.sort_unstable();

        let mut name = neat_product(&numerator_names);
        if !denominator_names.is_empty() {
            if name.is_empty() {
                name.push('1');
            }
            name.push('/');
            name.push_str(&parenthesize(&neat_product(&denominator_names)));
        }

        let derived = Quantity::derived(name, numerators, denominators);
        match self.by_key.get(&derived.search_key()) {
            Some(registered) => Arc::clone(registered),
            None => Arc::new(derived),
        }
    }
}

impl Default for QuantityTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn scalar_quantity() -> Quantity {
    Quantity::new(
        SCALAR,
        Dimensions::new(),
        Dimensions::new(),
        QuantityConstruction::default(),
    )
}

/// All the registered quantities
pub fn standard_quantities() -> Vec<Quantity> {
    use BaseQuantity::{
        AmountOfSubstance as M, ElectricCurrent as A, Length as m, LuminousIntensity as c,
        Mass as g, PlaneAngle as r, SolidAngle as S, Temperature as K, Time as s,
    };
    let q = Quantity::product;

    #[rustfmt::skip]
    let quantities = vec![
        scalar_quantity(),

        q("time",                         &[(s, 1)]),
        q("length",                       &[(m, 1)]),
        q("mass",                         &[(g, 1)]),
        q("electricCurrent",              &[(A, 1)]),
        q("temperature",                  &[(K, 1)]),
        q("amountOfSubstance",            &[(M, 1)]),
        q("luminousIntensity",            &[(c, 1)]),
        q("planeAngle",                   &[(r, 1)]),
        q("solidAngle",                   &[(S, 1)]),

        q("frequency",                    &[(s, -1)]),
        q("radioactivity",                &[(s, -1)]),
        q("area",                         &[(m, 2)]),
        q("volume",                       &[(m, 3)]),
        q("speed",                        &[(m, 1), (s, -1)]),
        q("acceleration",                 &[(m, 1), (s, -2)]),
        q("angularSpeed",                 &[(r, 1), (s, -1)]),
        q("angularAcceleration",          &[(r, 1), (s, -2)]),
        q("waveNumber",                   &[(m, -1)]),
        q("specificVolume",               &[(m, 3), (g, -1)]),
        q("density",                      &[(g, 1), (m, -3)]),
        q("areaDensity",                  &[(g, 1), (m, -2)]),
        q("frequencyDrift",               &[(s, -2)]),
        q("fuelEfficiency",               &[(m, -2)]),

        q("force",                        &[(g, 1), (m, 1), (s, -2)]),
        q("energy",                       &[(g, 1), (m, 2), (s, -2)]),
        q("work",                         &[(g, 1), (m, 2), (s, -2)]),
        q("momentum",                     &[(g, 1), (m, 1), (s, -1)]),
        q("angularMomentum",              &[(g, 1), (m, 2), (s, -1)]),
        q("power",                        &[(g, 1), (m, 2), (s, -3)]),
        q("action",                       &[(g, 1), (m, 2), (s, -1)]),
        q("specificEnergy",               &[(m, 2), (s, -2)]),
        q("energyDensity",                &[(m, -1), (g, 1), (s, -2)]),
        q("surfaceTension",               &[(g, 1), (s, -2)]),
        q("fluxDensity",                  &[(g, 1), (s, -3)]),
        q("pressure",                     &[(g, 1), (m, -1), (s, -2)]),
        q("torque",                       &[(g, 1), (m, 2), (s, -2)]),
        q("momentOfInertia",              &[(m, 2), (g, 1)]),

        q("kinematicViscosity",           &[(m, 2), (s, -1)]),
        q("dynamicViscosity",             &[(m, -1), (g, 1), (s, -1)]),
        q("linearMassDensity",            &[(g, 1), (m, -1)]),
        q("volumetricFlow",               &[(m, 3), (s, -1)]),
        q("massFlow",                     &[(g, 1), (s, -1)]),
        q("energyFluxDensity",            &[(g, 1), (s, -3)]),
        q("compressibility",              &[(g, -1), (m, 1), (s, 2)]),

        q("heatCapacity",                 &[(m, 2), (g, 1), (s, -2), (K, -1)]),
        q("specificHeatCapacity",         &[(m, 2), (s, -2), (K, -1)]),
        q("thermalConductivity",          &[(m, 1), (g, 1), (s, -3), (K, -1)]),
        q("thermalResistance",            &[(m, -2), (g, -1), (s, 3), (K, 1)]),
        q("thermalExpansionCoefficient",  &[(K, -1)]),
        q("temperatureGradient",          &[(m, -1), (K, 1)]),

        q("electricCharge",               &[(s, 1), (A, 1)]),
        q("electricDisplacementField",    &[(s, 1), (A, 1), (m, -2)]),
        q("voltage",                      &[(g, 1), (m, 2), (A, -1), (s, -3)]),
        q("capacitance",                  &[(s, 4), (A, 2), (g, -1), (m, -2)]),
        q("resistance",                   &[(g, 1), (m, 2), (s, -3), (A, -2)]),
        q("resistivity",                  &[(g, 1), (m, 3), (s, -3), (A, -2)]),
        q("electricConductivity",         &[(s, 3), (A, 2), (g, -1), (m, -3)]),
        q("permittivity",                 &[(s, 4), (A, 2), (g, -1), (m, -3)]),
        q("conductance",                  &[(s, 3), (A, 2), (g, -1), (m, -2)]),
        q("electricFieldStrength",        &[(g, 1), (m, 1), (s, -3), (A, -1)]),
        q("inductance",                   &[(g, 1), (m, 2), (s, -2), (A, -2)]),
        q("currentDensity",               &[(A, 1), (m, -2)]),
        q("electricChargeDensity",        &[(A, 1), (m, -3), (s, 1)]),
        q("linearChargeDensity",          &[(A, 1), (m, -1), (s, 1)]),
        q("magneticDipoleMoment",         &[(A, 1), (m, 2)]),
        q("electronMobility",             &[(A, 1), (g, -1), (s, 2)]),
        q("radiationExposure",            &[(A, 1), (s, 1), (g, -1)]),

        q("magneticFlux",                 &[(g, 1), (m, 2), (s, -2), (A, -1)]),
        q("magneticFluxDensity",          &[(g, 1), (s, -2), (A, -1)]),
        q("magneticPermeability",         &[(g, 1), (m, 1), (s, -2), (A, -2)]),
        q("magneticFieldStrength",        &[(A, 1), (m, -1)]),
        q("magneticReluctance",           &[(m, -2), (g, -1), (s, 2), (A, 2)]),
        q("magneticVectorPotential",      &[(m, 1), (g, 1), (s, -2), (A, -1)]),
        q("magneticMoment",               &[(m, 3), (g, 1), (s, -2), (A, -1)]),
        q("magneticSusceptibility",       &[(m, 1), (g, -1), (s, 2), (A, 2)]),

        q("substanceConcentration",       &[(M, 1), (m, -3)]),
        q("molarity",                     &[(M, 1), (m, -3)]),
        q("molarVolume",                  &[(M, -1), (m, 3)]),
        q("molarHeatCapacity",            &[(M, -1), (m, 2), (g, 1), (s, -2), (K, -1)]),
        q("molarEnergy",                  &[(M, -1), (m, 2), (g, 1), (s, -2)]),
        q("molarConductivity",            &[(M, -1), (s, 3), (g, 1), (A, 2)]),
        q("molality",                     &[(M, 1), (g, -1)]),
        q("molarMass",                    &[(M, -1), (g, 1)]),
        q("catalyticEfficiency",          &[(M, -1), (m, 3), (s, -1)]),

        q("luminousFlux",                 &[(c, 1), (S, 1)]),
        q("luminousEnergy",               &[(c, 1), (S, 1), (s, 1)]),
        q("luminousExposure",             &[(c, 1), (S, 1), (s, 1), (m, -2)]),
        q("illuminance",                  &[(c, 1), (S, 1), (m, -2)]),
        q("luminance",                    &[(c, 1), (m, -2)]),
        q("luminousEfficacy",             &[(c, 1), (S, 1), (m, -2), (g, -1), (s, 3)]),
        q("spectralRadiance",             &[(g, 1), (s, -3), (m, -1), (S, -1)]),
        q("spectralIrradiance",           &[(g, 1), (s, -3), (m, -1)]),
        q("spectralPower",                &[(g, 1), (s, -3), (m, 1)]),
        q("radiantIntensity",             &[(g, 1), (s, -3), (m, 2), (S, -1)]),
        q("spectralIntensity",            &[(g, 1), (s, -3), (m, 1), (S, -1)]),

        q("absorbedDose",                 &[(m, 2), (s, -2)]),
        q("absorbedDoseRate",             &[(m, 2), (s, -3)]),
        q("catalyticActivity",            &[(M, 1), (s, -1)]),
    ];
    quantities
}
