//! Symbolic unit expressions
//!
//! Every unit name is one of three shapes: a literal (`kilo-meter^2`), a
//! product of literals (`newton*meter`) or a fraction of two of those
//! (`kilo-gram*meter^2/second^3`). There are no parentheses and at most one
//! `/`. A [`UnitToken`] is the parsed form of such a name and also records how
//! a composed [`Unit`] was built.

use std::{collections::HashMap, num::IntErrorKind};

use serde::{Deserialize, Serialize};

use super::{Unit, UnitTable, MAX_POWER};
use crate::prefix::{PrefixProduct, PrefixTable};

/// A single unit, maybe prefixed and raised to a power
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// `None` means a power of 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i64>,
}

/// Parsed unit expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum UnitToken {
    Literal(Literal),
    Product(Vec<Literal>),
    Fraction {
        numerator: Box<UnitToken>,
        denominator: Box<UnitToken>,
    },
}

impl Literal {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            symbol: None,
            prefix: None,
            power: None,
        }
    }

    pub fn with_symbol(unit: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::new(unit)
        }
    }

    /// The dimensionless literal, empty name and symbol `1`
    pub fn scalar() -> Self {
        Self::with_symbol("", "1")
    }

    pub fn power(&self) -> i64 {
        self.power.unwrap_or(1)
    }

    fn set_power(&mut self, power: i64) {
        self.power = (power != 1).then_some(power);
    }

    fn key(&self) -> (Option<&str>, &str) {
        (self.prefix.as_deref(), &self.unit)
    }

    fn name(&self) -> String {
        let mut name = String::new();
        if let Some(prefix) = &self.prefix {
            name.push_str(prefix);
            name.push('-');
        }
        name.push_str(&self.unit);
        push_power(&mut name, self.power);
        name
    }

    fn symbol(&self, prefixes: &PrefixTable) -> String {
        let mut symbol = String::new();
        if let Some(prefix) = &self.prefix {
            match prefixes.get(prefix) {
                Some(p) => symbol.push_str(&p.symbol),
                None => symbol.push_str(prefix),
            }
        }
        symbol.push_str(self.symbol.as_deref().unwrap_or(&self.unit));
        push_power(&mut symbol, self.power);
        symbol
    }

    /// Parses `prefix-unit^power`
    ///
    /// A power that is not an integer is dropped, `meter^x` is `meter`.
    /// [`None`] if the unit is empty or the power is larger than
    /// [`MAX_POWER`].
    fn parse(text: &str) -> Option<Self> {
        let (rest, power) = match text.split_once('^') {
            Some((rest, power)) => (rest, parse_power(power)?),
            None => (text, None),
        };
        let (prefix, unit) = match rest.split_once('-') {
            Some((prefix, unit)) => (Some(prefix.to_string()), unit),
            None => (None, rest),
        };
        if unit.is_empty() {
            tracing::debug!(term = text, "empty unit term");
            return None;
        }
        Some(Self {
            prefix,
            power,
            ..Self::new(unit)
        })
    }
}

/// The outer [`None`] is an integer out of range, the inner one a power to
/// ignore
fn parse_power(text: &str) -> Option<Option<i64>> {
    match text.parse::<i64>() {
        Ok(power) if power.unsigned_abs() > u64::from(MAX_POWER) => {
            tracing::debug!(power, "power out of range");
            None
        }
        Ok(power) => Some((power != 1).then_some(power)),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            tracing::debug!(power = text, "power out of range");
            None
        }
        Err(_) => Some(None),
    }
}

fn push_power(text: &mut String, power: Option<i64>) {
    if let Some(power) = power.filter(|&p| p > 1) {
        text.push('^');
        text.push_str(&power.to_string());
    }
}

impl UnitToken {
    /// The scalar unit token
    pub fn scalar() -> Self {
        Self::Literal(Literal::scalar())
    }

    /// Parses a unit name
    ///
    /// Prefixes are simplified (`kilo-meter*kilo-meter` is
    /// `mega-meter*meter`) and with a `/` equal terms on both sides cancel
    /// out. Anything after a second `/` is part of the denominator text.
    ///
    /// Returns [`None`] if a term is empty, like in `meter*` or `kilo-`, or
    /// has a power out of range.
    ///
    /// ```
    /// # use unitcore::{prefix::PrefixTable, unit::UnitToken};
    /// let prefixes = PrefixTable::si();
    /// let token = UnitToken::parse("kilo-meter*second/milli-second", &prefixes).unwrap();
    /// assert_eq!(token.name(), "mega-meter");
    /// assert!(UnitToken::parse("meter*", &prefixes).is_none());
    /// ```
    pub fn parse(name: &str, prefixes: &PrefixTable) -> Option<Self> {
        let token = match name.split_once('/') {
            Some((numerator, denominator)) => {
                let mut numerators = parse_side(numerator)?;
                let mut denominators = parse_side(denominator)?;
                simplify_prefixes(&mut numerators, &mut denominators, prefixes);
                cancel_tokens(&mut numerators, &mut denominators);
                make_fraction(numerators, denominators)
            }
            None => {
                let mut tokens = parse_side(name)?;
                simplify_prefixes_within(&mut tokens, prefixes);
                make_product(tokens)
            }
        };
        Some(token)
    }

    /// Canonical name, `prefix-unit^power` terms joined by `*` and `/`
    pub fn name(&self) -> String {
        match self {
            UnitToken::Literal(literal) => literal.name(),
            UnitToken::Product(literals) => join(literals.iter().map(Literal::name)),
            UnitToken::Fraction {
                numerator,
                denominator,
            } => format!("{}/{}", numerator.name(), denominator.name()),
        }
    }

    /// Symbol built like the name, with a parenthesized denominator when
    /// it has more than one factor
    pub fn symbol(&self, prefixes: &PrefixTable) -> String {
        match self {
            UnitToken::Literal(literal) => literal.symbol(prefixes),
            UnitToken::Product(literals) => join(literals.iter().map(|l| l.symbol(prefixes))),
            UnitToken::Fraction {
                numerator,
                denominator,
            } => {
                let mut numerator = numerator.symbol(prefixes);
                if numerator.is_empty() {
                    numerator.push('1');
                }
                let denominator = denominator.symbol(prefixes);
                if denominator.contains('*') {
                    format!("{numerator}/({denominator})")
                } else {
                    format!("{numerator}/{denominator}")
                }
            }
        }
    }

    /// Every literal, flattened into numerator and denominator lists
    pub fn literals(&self) -> (Vec<Literal>, Vec<Literal>) {
        let mut numerators = Vec::new();
        let mut denominators = Vec::new();
        self.dump(&mut numerators, &mut denominators);
        (numerators, denominators)
    }

    // a/(b/c) = a*c/b
    fn dump(&self, numerators: &mut Vec<Literal>, denominators: &mut Vec<Literal>) {
        match self {
            UnitToken::Literal(literal) => numerators.push(literal.clone()),
            UnitToken::Product(literals) => numerators.extend(literals.iter().cloned()),
            UnitToken::Fraction {
                numerator,
                denominator,
            } => {
                numerator.dump(numerators, denominators);
                denominator.dump(denominators, numerators);
            }
        }
    }

    /// Builds the unit from a table
    ///
    /// Returns [`None`] if a name or prefix is unknown or a prefix cannot
    /// be applied.
    pub fn to_unit(&self, table: &impl UnitTable) -> Option<Unit> {
        let catalog = table.catalog();
        match self {
            UnitToken::Literal(literal) => literal_to_unit(literal, table),
            UnitToken::Product(literals) => {
                let units = literals
                    .iter()
                    .map(|l| literal_to_unit(l, table))
                    .collect::<Option<Vec<_>>>()?;
                let units: Vec<&Unit> = units.iter().collect();
                Some(Unit::derived(catalog, &units, &[]))
            }
            UnitToken::Fraction {
                numerator,
                denominator,
            } => {
                let numerator = numerator.to_unit(table)?;
                let denominator = denominator.to_unit(table)?;
                Some(Unit::derived(catalog, &[&numerator], &[&denominator]))
            }
        }
    }
}

fn literal_to_unit(literal: &Literal, table: &impl UnitTable) -> Option<Unit> {
    let Some(unit) = table.lookup(&literal.unit) else {
        tracing::debug!(unit = %literal.unit, "unknown unit");
        return None;
    };
    let catalog = table.catalog();
    let mut unit = match &literal.prefix {
        Some(name) => {
            let Some(prefix) = catalog.prefixes.get(name) else {
                tracing::debug!(prefix = %name, "unknown prefix");
                return None;
            };
            match Unit::prefixed(prefix, unit) {
                Ok(unit) => unit,
                Err(err) => {
                    tracing::debug!(%err, "cannot prefix unit");
                    return None;
                }
            }
        }
        None => unit.clone(),
    };
    if let Some(power) = literal.power.filter(|&p| p != 0 && p != 1) {
        unit = match Unit::powered(catalog, &unit, power) {
            Ok(unit) => unit,
            Err(err) => {
                tracing::debug!(%err, "cannot raise unit");
                return None;
            }
        };
    }
    Some(unit)
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join("*")
}

/// An empty side is the scalar unit, `/second`
fn parse_side(text: &str) -> Option<Vec<Literal>> {
    if text.is_empty() {
        return Some(Vec::new());
    }
    text.split('*').map(Literal::parse).collect()
}

/// Builds the construction of a "fraction" of units
///
/// The constructions of the operands are flattened, the scalar unit is
/// dropped, prefixes are simplified and equal terms cancel out.
pub fn construction(numerators: &[&Unit], denominators: &[&Unit], prefixes: &PrefixTable) -> UnitToken {
    let mut numerator_tokens = Vec::new();
    let mut denominator_tokens = Vec::new();
    for unit in numerators {
        unit.construction
            .dump(&mut numerator_tokens, &mut denominator_tokens);
    }
    for unit in denominators {
        unit.construction
            .dump(&mut denominator_tokens, &mut numerator_tokens);
    }
    numerator_tokens.retain(|t| !t.unit.is_empty());
    denominator_tokens.retain(|t| !t.unit.is_empty());

    simplify_prefixes(&mut numerator_tokens, &mut denominator_tokens, prefixes);
    cancel_tokens(&mut numerator_tokens, &mut denominator_tokens);
    make_fraction(numerator_tokens, denominator_tokens)
}

fn make_fraction(numerators: Vec<Literal>, denominators: Vec<Literal>) -> UnitToken {
    if denominators.is_empty() {
        return make_product(numerators);
    }
    UnitToken::Fraction {
        numerator: Box::new(make_product(numerators)),
        denominator: Box::new(make_product(denominators)),
    }
}

/// Literal or product out of a list, merging duplicates into powers
fn make_product(parts: Vec<Literal>) -> UnitToken {
    let mut merged: Vec<Literal> = Vec::with_capacity(parts.len());
    for part in parts {
        match merged.iter_mut().find(|m| m.key() == part.key()) {
            Some(existing) => existing.set_power(existing.power() + part.power()),
            None => merged.push(part),
        }
    }
    match merged.len() {
        0 => UnitToken::scalar(),
        1 => UnitToken::Literal(merged.remove(0)),
        _ => UnitToken::Product(merged),
    }
}

/// Merges prefixes of terms with the same power in a single list
///
/// `kilo-meter*kilo-second` is `mega-meter*second`. A pair that cancels out
/// leaves both terms unprefixed and a pair with no prefix for the product is
/// left alone.
fn simplify_prefixes_within(tokens: &mut [Literal], prefixes: &PrefixTable) {
    let mut by_power: HashMap<i64, Vec<usize>> = HashMap::new();
    for index in 0..tokens.len() {
        let Some(prefix) = tokens[index].prefix.clone() else {
            continue;
        };
        let group = by_power.entry(tokens[index].power()).or_default();
        let found = group.iter().enumerate().find_map(|(position, &other)| {
            let other_prefix = tokens[other].prefix.as_deref()?;
            let product = prefixes.product(other_prefix, &prefix)?;
            Some((position, other, product))
        });
        let Some((position, other, product)) = found else {
            group.push(index);
            continue;
        };
        tracing::trace!(?product, "merging prefix '{prefix}'");
        tokens[index].prefix = None;
        match product {
            PrefixProduct::Prefixed(name) => tokens[other].prefix = Some(name.to_string()),
            PrefixProduct::Unprefixed => {
                tokens[other].prefix = None;
                group.remove(position);
            }
        }
    }
}

/// Simplifies prefixes in both lists and then across them, where a
/// denominator prefix counts as its inverse
fn simplify_prefixes(numerators: &mut [Literal], denominators: &mut [Literal], prefixes: &PrefixTable) {
    simplify_prefixes_within(numerators, prefixes);
    simplify_prefixes_within(denominators, prefixes);

    let mut by_power: HashMap<i64, Vec<usize>> = HashMap::new();
    for (index, token) in numerators.iter().enumerate() {
        if token.prefix.is_some() {
            by_power.entry(token.power()).or_default().push(index);
        }
    }

    for token in denominators.iter_mut() {
        let Some(inverse) = token
            .prefix
            .as_deref()
            .and_then(|prefix| prefixes.inverse(prefix))
        else {
            continue;
        };
        let Some(group) = by_power.get_mut(&token.power()) else {
            continue;
        };
        let found = group.iter().enumerate().find_map(|(position, &other)| {
            let other_prefix = numerators[other].prefix.as_deref()?;
            let product = prefixes.product(other_prefix, &inverse.name)?;
            Some((position, other, product))
        });
        let Some((position, other, product)) = found else {
            continue;
        };
        tracing::trace!(?product, "cancelling prefix of '{}'", token.unit);
        token.prefix = None;
        match product {
            PrefixProduct::Prefixed(name) => numerators[other].prefix = Some(name.to_string()),
            PrefixProduct::Unprefixed => {
                numerators[other].prefix = None;
                group.remove(position);
            }
        }
    }
}

/// Merges equal terms in a list into powers
fn combine_powers(tokens: &mut Vec<Literal>) {
    let mut combined: Vec<Literal> = Vec::with_capacity(tokens.len());
    for token in tokens.drain(..) {
        match combined.iter_mut().find(|c| c.key() == token.key()) {
            Some(existing) => existing.set_power(existing.power() + token.power()),
            None => combined.push(token),
        }
    }
    *tokens = combined;
}

/// Cancels equal terms between numerator and denominator, subtracting
/// their powers
fn cancel_tokens(numerators: &mut Vec<Literal>, denominators: &mut Vec<Literal>) {
    use std::cmp::Ordering;

    combine_powers(numerators);
    combine_powers(denominators);

    denominators.retain_mut(|token| {
        let Some(index) = numerators.iter().position(|n| n.key() == token.key()) else {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use test_case::test_case;

    fn parse(name: &str) -> UnitToken {
        UnitToken::parse(name, &PrefixTable::si()).unwrap()
    }

    #[test_case("meter" => "meter")]
    #[test_case("kilo-meter" => "kilo-meter")]
    #[test_case("meter^2" => "meter^2")]
    #[test_case("meter*meter" => "meter^2" ; "duplicates become powers")]
    #[test_case("meter/second" => "meter/second")]
    #[test_case("meter^x" => "meter" ; "malformed power is dropped")]
    #[test_case("meter^1" => "meter")]
    #[test_case("meter*second/second" => "meter")]
    #[test_case("meter^3/meter" => "meter^2")]
    #[test_case("meter/meter^3" => "/meter^2")]
    #[test_case("kilo-meter*kilo-second" => "mega-meter*second")]
    #[test_case("kilo-meter*milli-second" => "meter*second")]
    #[test_case("kilo-meter/kilo-second" => "meter/second")]
    #[test_case("kilo-meter/milli-second" => "mega-meter/second")]
    #[test_case("hecto-meter*hecto-second" => "hecto-meter*hecto-second" ; "no prefix for product")]
    #[test_case("kilo-meter^2*kilo-second" => "kilo-meter^2*kilo-second" ; "different powers")]
    #[test_case("kilo-gram*meter^2/second^3*ampere^2" => "kilo-gram*meter^2/second^3*ampere^2")]
    fn parse_name(name: &str) -> String {
        parse(name).name()
    }

    #[test_case("kilo-" ; "prefix without unit")]
    #[test_case("^2" ; "power without unit")]
    #[test_case("*" ; "no factors")]
    #[test_case("meter*" ; "empty factor")]
    #[test_case("meter/second*" ; "empty denominator factor")]
    #[test_case("meter^65" ; "power over the limit")]
    #[test_case("meter^-65" ; "negative power over the limit")]
    #[test_case("meter^99999999999999999999" ; "power overflows")]
    fn parse_malformed(name: &str) {
        assert_eq!(UnitToken::parse(name, &PrefixTable::si()), None);
    }

    #[test]
    fn huge_powers_are_unknown() {
        let registry = Registry::base();
        assert!(registry.parse_unit("meter^9223372036854775807").is_none());
        assert!(registry.parse_unit("meter^-9223372036854775808").is_none());
        assert!(registry.parse_unit("meter^99999999999999999999").is_none());
        // merged terms can go over the limit too
        assert!(registry.parse_unit("meter^64*meter").is_none());
        let unit = registry.parse_unit("meter^64").unwrap();
        assert_eq!(unit.name(), "meter^64");
    }

    #[test]
    fn parse_structure() {
        assert_eq!(parse("meter"), UnitToken::Literal(Literal::new("meter")));
        assert_eq!(
            parse("milli-meter^3"),
            UnitToken::Literal(Literal {
                prefix: Some("milli".into()),
                power: Some(3),
                ..Literal::new("meter")
            })
        );
        assert!(matches!(parse("meter*second"), UnitToken::Product(v) if v.len() == 2));
        assert!(matches!(parse("meter/second"), UnitToken::Fraction { .. }));
        assert_eq!(parse(""), UnitToken::scalar());
    }

    #[test]
    fn name_round_trip() {
        let token = parse("kilo-gram*meter^2/second^3");
        let name = token.name();
        assert_eq!(name.matches('/').count(), 1);
        assert_eq!(parse(&name), token);
        let unit = token.to_unit(&Registry::base()).unwrap();
        assert_eq!(unit.name(), name);
        assert_eq!(unit.symbol(), "kg*m^2/s^3");
    }

    #[test]
    fn symbols() {
        let prefixes = PrefixTable::si();
        let registry = Registry::base();
        let symbol = |name: &str| parse(name).to_unit(&registry).unwrap().symbol().to_string();
        assert_eq!(symbol("meter/second*ampere"), "m/(s*A)");
        assert_eq!(symbol("/second"), "1/s");
        assert_eq!(symbol("micro-meter"), "µm");
        // unknown symbols fall back to the name
        assert_eq!(parse("milli-thing").symbol(&prefixes), "mthing");
    }

    #[test]
    fn to_unit() {
        let registry = Registry::base();
        let unit = parse("kilo-meter/second").to_unit(&registry).unwrap();
        assert_eq!(unit.quantity().name(), "speed");
        assert_eq!(unit.absolute_scale(), 1000.0);

        let unit = parse("newton*meter").to_unit(&registry).unwrap();
        assert_eq!(unit.quantity().name(), "energy");
        assert_eq!(unit.name(), "kilo-gram*meter^2/second^2");

        let unit = parse("meter^-1").to_unit(&registry).unwrap();
        assert_eq!(unit.quantity().name(), "waveNumber");
    }

    #[test_case("furlong" ; "unknown unit")]
    #[test_case("meter/fortnight" ; "unknown denominator")]
    #[test_case("kibi-meter" ; "unknown prefix")]
    fn to_unit_soft_failure(name: &str) {
        let registry = Registry::base();
        assert!(parse(name).to_unit(&registry).is_none());
    }

    #[test]
    fn prefix_on_named_derived_unit() {
        let registry = Registry::base();
        let unit = parse("kilo-newton*meter").to_unit(&registry).unwrap();
        assert_eq!(unit.quantity().name(), "energy");
        assert_eq!(unit.absolute_scale(), 1_000_000.0);
    }

    #[test]
    fn construction_cancels_and_swaps() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let meter = registry.find_unit("meter").unwrap();
        let second = registry.find_unit("second").unwrap();
        let speed = Unit::derived(catalog, &[&*meter], &[&*second]);

        // m / (m/s) = s
        let token = construction(&[&*meter], &[&speed], &catalog.prefixes);
        assert_eq!(token.name(), "second");

        // (m/s) / s
        let token = construction(&[&speed], &[&*second], &catalog.prefixes);
        assert_eq!(token.name(), "meter/second^2");

        // scalar is dropped
        let scalar = registry.find_unit("").unwrap();
        let token = construction(&[&*scalar, &*meter], &[], &catalog.prefixes);
        assert_eq!(token.name(), "meter");
        let token = construction(&[&*scalar], &[], &catalog.prefixes);
        assert_eq!(token, UnitToken::scalar());
    }

    #[test]
    fn serde() {
        let token = parse("kilo-meter/second");
        let json = serde_json::to_string(&token).unwrap();
        let back: UnitToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
