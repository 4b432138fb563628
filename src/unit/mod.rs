//! Units and their constructors
//!
//! A [`Unit`] has an exact [`Fraction`] scale relative to the base unit of its
//! quantity and an approximate float `scale_constant` for irrational factors
//! like π. Units are only created through the constructors here, and composing
//! units always recomputes both from the operands.

use std::{fmt::Display, sync::Arc};

use serde::Serialize;
use thiserror::Error;

use crate::{fraction::Fraction, prefix::Prefix, quantity::Quantity, registry::Catalog};

pub mod spec;
pub mod token;

pub use spec::UnitSpec;
pub use token::{Literal, UnitToken};

/// A concrete unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    name: String,
    symbol: String,
    quantity: Arc<Quantity>,
    scale: Fraction,
    scale_constant: f64,
    construction: UnitToken,
}

/// A name was not found in a trusted unit table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown unit: '{0}'")]
pub struct UnknownUnit(pub String);

/// Rules broken when creating a unit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("Cannot add a prefix to '{unit}', it is prefixed, powered or composite")]
    PrefixStacking { unit: String },

    #[error("Quantity mismatch: expected '{expected}' but the units make '{inferred}'")]
    QuantityMismatch { expected: String, inferred: String },

    #[error("Unit '{unit}' must have a positive scale")]
    NonPositiveScale { unit: String },

    #[error("Cannot raise '{unit}' to the power of {power}")]
    InvalidPower { unit: String, power: i64 },

    #[error(transparent)]
    UnknownUnit(#[from] UnknownUnit),

    #[error("Unknown prefix: '{0}'")]
    UnknownPrefix(String),

    #[error("Unknown quantity: '{0}'")]
    UnknownQuantity(String),

    #[error("Unknown scale constant: '{0}'")]
    UnknownConstant(String),
}

/// Where units are looked up by name
pub trait UnitTable {
    /// Quantities and prefixes used to compose new units
    fn catalog(&self) -> &Catalog;

    /// Unit registered with exactly this name
    fn lookup(&self, name: &str) -> Option<&Unit>;
}

/// Largest power a unit can be raised to, in either direction
pub const MAX_POWER: u32 = 64;

/// Characters that make a name not a plain unit name
const COMPOSITE_CHARS: &[char] = &['*', '/', '(', ')', '-', '^'];

impl Unit {
    /// Base unit of a quantity, with scale 1
    pub fn base(name: impl Into<String>, symbol: impl Into<String>, quantity: Arc<Quantity>) -> Self {
        let name = name.into();
        let symbol = symbol.into();
        let construction = UnitToken::Literal(Literal::with_symbol(name.clone(), symbol.clone()));
        Self {
            name,
            symbol,
            quantity,
            scale: Fraction::one(),
            scale_constant: 1.0,
            construction,
        }
    }

    /// A unit with an SI prefix, like `kilo-meter`
    ///
    /// Only plain units can be prefixed. Stacking prefixes or prefixing a
    /// powered or composite unit is an error.
    pub fn prefixed(prefix: &Prefix, unit: &Unit) -> Result<Self, CompositionError> {
        if unit.name.contains(COMPOSITE_CHARS) {
            return Err(CompositionError::PrefixStacking {
                unit: unit.name.clone(),
            });
        }
        let construction = UnitToken::Literal(Literal {
            prefix: Some(prefix.name.clone()),
            ..Literal::with_symbol(unit.name.clone(), unit.symbol.clone())
        });
        Ok(Self {
            name: format!("{}-{}", prefix.name, unit.name),
            symbol: format!(
                "{}{}",
                prefix.symbol,
                crate::quantity::parenthesize(&unit.symbol)
            ),
            quantity: Arc::clone(&unit.quantity),
            scale: &unit.scale * &prefix.factor,
            scale_constant: unit.scale_constant,
            construction,
        })
    }

    /// A new unit as a multiple of another, like `foot` from `meter`
    ///
    /// The scale is multiplied exactly. The `scale_constant` is taken as
    /// given, not multiplied by the one of `base`.
    pub fn scaled(
        name: impl Into<String>,
        symbol: impl Into<String>,
        base: &Unit,
        scale: &Fraction,
        scale_constant: f64,
    ) -> Result<Self, CompositionError> {
        let name = name.into();
        if scale.is_zero() || scale.is_negative() {
            return Err(CompositionError::NonPositiveScale { unit: name });
        }
        let symbol = symbol.into();
        let construction = UnitToken::Literal(Literal::with_symbol(name.clone(), symbol.clone()));
        Ok(Self {
            name,
            symbol,
            quantity: Arc::clone(&base.quantity),
            scale: &base.scale * scale,
            scale_constant,
            construction,
        })
    }

    /// Derived unit with everything given
    ///
    /// If `quantity` is given it must be equivalent to the quantity the
    /// operands make, otherwise that one is used.
    pub fn derived_with_construction(
        catalog: &Catalog,
        name: impl Into<String>,
        symbol: impl Into<String>,
        quantity: Option<Arc<Quantity>>,
        numerators: &[&Unit],
        denominators: &[&Unit],
        construction: UnitToken,
    ) -> Result<Self, CompositionError> {
        let inferred = infer_quantity(catalog, numerators, denominators);
        let quantity = match quantity {
            Some(quantity) if !quantity.is_equivalent(&inferred) => {
                return Err(CompositionError::QuantityMismatch {
                    expected: quantity.name().to_string(),
                    inferred: inferred.name().to_string(),
                })
            }
            Some(quantity) => quantity,
            None => inferred,
        };
        Ok(compose(
            name.into(),
            symbol.into(),
            quantity,
            numerators,
            denominators,
            construction,
        ))
    }

    /// Derived unit with a name and an explicit quantity
    pub fn derived_with_name_and_quantity(
        catalog: &Catalog,
        name: impl Into<String>,
        symbol: impl Into<String>,
        quantity: Arc<Quantity>,
        numerators: &[&Unit],
        denominators: &[&Unit],
    ) -> Result<Self, CompositionError> {
        let construction = token::construction(numerators, denominators, &catalog.prefixes);
        Self::derived_with_construction(
            catalog,
            name,
            symbol,
            Some(quantity),
            numerators,
            denominators,
            construction,
        )
    }

    /// Derived unit with a name, like `newton` from `kilo-gram*meter/second^2`
    ///
    /// When no construction is given it is built from the operands.
    pub fn derived_with_name(
        catalog: &Catalog,
        name: impl Into<String>,
        symbol: impl Into<String>,
        numerators: &[&Unit],
        denominators: &[&Unit],
        construction: Option<UnitToken>,
    ) -> Self {
        let construction = construction
            .unwrap_or_else(|| token::construction(numerators, denominators, &catalog.prefixes));
        compose(
            name.into(),
            symbol.into(),
            infer_quantity(catalog, numerators, denominators),
            numerators,
            denominators,
            construction,
        )
    }

    /// Derived unit named after its construction, with an optional symbol
    /// override
    pub fn derived_with_symbol(
        catalog: &Catalog,
        symbol: Option<&str>,
        numerators: &[&Unit],
        denominators: &[&Unit],
    ) -> Self {
        let construction = token::construction(numerators, denominators, &catalog.prefixes);
        let name = construction.name();
        let symbol = match symbol {
            Some(symbol) if !symbol.is_empty() => symbol.to_string(),
            _ => construction.symbol(&catalog.prefixes),
        };
        Self::derived_with_name(
            catalog,
            name,
            symbol,
            numerators,
            denominators,
            Some(construction),
        )
    }

    /// "Fraction" of units, named after the construction
    ///
    /// ```
    /// # use unitcore::registry::Registry;
    /// # use unitcore::unit::Unit;
    /// let registry = Registry::base();
    /// let meter = registry.find_unit("meter").unwrap();
    /// let second = registry.find_unit("second").unwrap();
    /// let speed = Unit::derived(registry.catalog(), &[meter.as_ref()], &[second.as_ref()]);
    /// assert_eq!(speed.name(), "meter/second");
    /// assert_eq!(speed.symbol(), "m/s");
    /// assert_eq!(speed.quantity().name(), "speed");
    /// ```
    pub fn derived(catalog: &Catalog, numerators: &[&Unit], denominators: &[&Unit]) -> Self {
        Self::derived_with_symbol(catalog, None, numerators, denominators)
    }

    /// Unit raised to an integer power. Negative powers go to the
    /// denominator.
    ///
    /// The power cannot be zero or larger than [`MAX_POWER`] in absolute
    /// value.
    pub fn powered(catalog: &Catalog, unit: &Unit, power: i64) -> Result<Self, CompositionError> {
        let count = power.unsigned_abs();
        if count == 0 || count > u64::from(MAX_POWER) {
            return Err(CompositionError::InvalidPower {
                unit: unit.name.clone(),
                power,
            });
        }
        let factors = vec![unit; count as usize];
        if power < 0 {
            Ok(Self::derived(catalog, &[], &factors))
        } else {
            Ok(Self::derived(catalog, &factors, &[]))
        }
    }

    /// Shallow copy with another symbol
    pub fn with_symbol(&self, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> &Arc<Quantity> {
        &self.quantity
    }

    pub fn scale(&self) -> &Fraction {
        &self.scale
    }

    pub fn scale_constant(&self) -> f64 {
        self.scale_constant
    }

    pub fn construction(&self) -> &UnitToken {
        &self.construction
    }

    /// Scale relative to the base unit as a float, constant included
    pub fn absolute_scale(&self) -> f64 {
        self.scale_constant * self.scale.to_f64()
    }
}

impl Display for Unit {
    /// The symbol, or the name with the alternate flag (`{:#}`)
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            f.write_str(&self.name)
        } else {
            f.write_str(&self.symbol)
        }
    }
}

fn infer_quantity(catalog: &Catalog, numerators: &[&Unit], denominators: &[&Unit]) -> Arc<Quantity> {
    let numerators: Vec<&Quantity> = numerators.iter().map(|u| u.quantity.as_ref()).collect();
    let denominators: Vec<&Quantity> = denominators.iter().map(|u| u.quantity.as_ref()).collect();
    catalog.quantities.make_quantity(&numerators, &denominators)
}

fn compose(
    name: String,
    symbol: String,
    quantity: Arc<Quantity>,
    numerators: &[&Unit],
    denominators: &[&Unit],
    construction: UnitToken,
) -> Unit {
    let numerator_scale = Fraction::product(numerators.iter().map(|u| &u.scale));
    let denominator_scale = Fraction::product(denominators.iter().map(|u| &u.scale));
    let constant = numerators.iter().map(|u| u.scale_constant).product::<f64>()
        / denominators.iter().map(|u| u.scale_constant).product::<f64>();
    Unit {
        name,
        symbol,
        quantity,
        // unit scales are never zero
        scale: &numerator_scale / &denominator_scale,
        scale_constant: constant,
        construction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn unit(registry: &Registry, name: &str) -> Unit {
        registry.find_unit(name).unwrap().as_ref().clone()
    }

    #[test]
    fn base_unit() {
        let registry = Registry::base();
        let meter = unit(&registry, "meter");
        assert_eq!(meter.symbol(), "m");
        assert!(meter.scale().is_one());
        assert_eq!(meter.scale_constant(), 1.0);
        assert_eq!(meter.quantity().name(), "length");
        assert_eq!(meter.to_string(), "m");
        assert_eq!(format!("{meter:#}"), "meter");
    }

    #[test]
    fn prefixed() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let kilo = catalog.prefixes.get("kilo").unwrap();
        let meter = unit(&registry, "meter");
        let km = Unit::prefixed(kilo, &meter).unwrap();
        assert_eq!(km.name(), "kilo-meter");
        assert_eq!(km.symbol(), "km");
        assert_eq!(km.scale(), &Fraction::from_integer(1000));
        assert!(km.quantity().is_equivalent(meter.quantity()));
    }

    #[test]
    fn prefix_stacking() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let kilo = catalog.prefixes.get("kilo").unwrap();
        let meter = unit(&registry, "meter");
        let km = Unit::prefixed(kilo, &meter).unwrap();
        assert!(matches!(
            Unit::prefixed(kilo, &km),
            Err(CompositionError::PrefixStacking { .. })
        ));
        let area = Unit::powered(catalog, &meter, 2).unwrap();
        assert!(Unit::prefixed(kilo, &area).is_err());
        let second = unit(&registry, "second");
        let speed = Unit::derived(catalog, &[&meter], &[&second]);
        assert!(Unit::prefixed(kilo, &speed).is_err());
    }

    #[test]
    fn powered() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let meter = unit(&registry, "meter");
        let squared = Unit::powered(catalog, &meter, 2).unwrap();
        assert_eq!(squared.symbol(), "m^2");
        assert_eq!(squared.name(), "meter^2");
        assert!(squared
            .quantity()
            .is_equivalent(catalog.quantities.get("area").unwrap()));
        assert_eq!(squared.quantity().name(), "area");

        let inverse = Unit::powered(catalog, &meter, -1).unwrap();
        assert_eq!(inverse.name(), "/meter");
        assert_eq!(inverse.symbol(), "1/m");
        assert_eq!(inverse.quantity().name(), "waveNumber");
    }

    #[test]
    fn power_limits() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let meter = unit(&registry, "meter");
        let max = i64::from(MAX_POWER);
        assert_eq!(
            Unit::powered(catalog, &meter, max).unwrap().name(),
            format!("meter^{max}")
        );
        assert!(Unit::powered(catalog, &meter, -max).is_ok());
        for power in [0, max + 1, -max - 1, i64::MAX, i64::MIN] {
            assert_eq!(
                Unit::powered(catalog, &meter, power),
                Err(CompositionError::InvalidPower {
                    unit: "meter".into(),
                    power
                })
            );
        }
    }

    #[test]
    fn derived_scale_is_exact() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let milli = catalog.prefixes.get("milli").unwrap();
        let meter = unit(&registry, "meter");
        let second = unit(&registry, "second");
        let mm = Unit::prefixed(milli, &meter).unwrap();
        let ms = Unit::prefixed(milli, &second).unwrap();
        let u = Unit::derived(catalog, &[&mm, &mm], &[&ms]);
        assert_eq!(u.scale(), &Fraction::new(1, 1000).unwrap());
        assert_eq!(u.quantity().search_key(), "mm/s");
    }

    #[test]
    fn scaled_keeps_given_constant() {
        let registry = Registry::base();
        let radian = unit(&registry, "radian");
        let degree = Unit::scaled(
            "degree",
            "°",
            &radian,
            &Fraction::new(1, 180).unwrap(),
            std::f64::consts::PI,
        )
        .unwrap();
        let arcminute = Unit::scaled(
            "arcminute",
            "'",
            &degree,
            &Fraction::new(1, 60).unwrap(),
            std::f64::consts::PI,
        )
        .unwrap();
        assert_eq!(arcminute.scale(), &Fraction::new(1, 10800).unwrap());
        assert_eq!(arcminute.scale_constant(), std::f64::consts::PI);
        assert!(Unit::scaled("zero", "0", &radian, &Fraction::from_integer(0), 1.0).is_err());
        assert_eq!(
            Unit::scaled("back", "b", &radian, &Fraction::from_integer(-1), 1.0),
            Err(CompositionError::NonPositiveScale { unit: "back".into() })
        );
    }

    #[test]
    fn derived_constant_is_approximate_quotient() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let radian = unit(&registry, "radian");
        let second = unit(&registry, "second");
        let degree = Unit::scaled(
            "degree",
            "°",
            &radian,
            &Fraction::new(1, 180).unwrap(),
            std::f64::consts::PI,
        )
        .unwrap();
        let u = Unit::derived(catalog, &[&degree], &[&second]);
        assert_eq!(u.scale_constant(), std::f64::consts::PI);
        let u = Unit::derived(catalog, &[&second], &[&degree]);
        assert_eq!(u.scale_constant(), 1.0 / std::f64::consts::PI);
        assert_eq!(u.name(), "second/degree");
        assert_eq!(u.symbol(), "s/°");
    }

    #[test]
    fn explicit_quantity() {
        let registry = Registry::base();
        let catalog = registry.catalog();
        let second = unit(&registry, "second");
        let meter = unit(&registry, "meter");
        let radioactivity = catalog.quantities.get("radioactivity").unwrap();
        let bq = Unit::derived_with_name_and_quantity(
            catalog,
            "becquerel",
            "Bq",
            Arc::clone(radioactivity),
            &[],
            &[&second],
        )
        .unwrap();
        assert_eq!(bq.quantity().name(), "radioactivity");

        let err = Unit::derived_with_name_and_quantity(
            catalog,
            "nope",
            "x",
            Arc::clone(radioactivity),
            &[&meter],
            &[&second],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompositionError::QuantityMismatch {
                expected: "radioactivity".into(),
                inferred: "speed".into()
            }
        );
    }

    #[test]
    fn symbol_override_is_a_copy() {
        let registry = Registry::base();
        let meter = unit(&registry, "meter");
        let other = meter.with_symbol("M");
        assert_eq!(other.symbol(), "M");
        assert_eq!(meter.symbol(), "m");
        assert_eq!(other.name(), meter.name());
    }

    #[test]
    fn named_derived_unit() {
        let registry = Registry::base();
        let newton = unit(&registry, "newton");
        assert_eq!(newton.symbol(), "N");
        assert_eq!(newton.quantity().name(), "force");
        assert_eq!(newton.construction().name(), "kilo-gram*meter/second^2");
        assert_eq!(newton.scale(), &Fraction::from_integer(1000));
    }
}
