use serde::{Deserialize, Serialize};

use super::{CompositionError, Unit, UnitTable, UnknownUnit};

/// Declarative description of a unit, as written in a
/// [`UnitsFile`](crate::registry::UnitsFile)
///
/// Unlike free text, a spec comes from trusted configuration, so every name
/// in it must exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitSpec {
    /// A registered unit, `"meter"`
    Name(String),
    /// A registered unit with a prefix, power or symbol applied,
    /// `{ prefix = "deci", unit = "meter", power = 3 }`
    Literal {
        unit: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        power: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
    },
    /// A "fraction" of other specs,
    /// `{ numerator = ["meter"], denominator = ["second"] }`
    Fraction {
        numerator: Vec<UnitSpec>,
        #[serde(default)]
        denominator: Vec<UnitSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
    },
}

impl UnitSpec {
    pub fn resolve(&self, table: &impl UnitTable) -> Result<Unit, CompositionError> {
        let catalog = table.catalog();
        match self {
            UnitSpec::Name(name) => lookup(table, name).cloned(),
            UnitSpec::Literal {
                unit,
                prefix,
                power,
                symbol,
            } => {
                let mut result = lookup(table, unit)?.clone();
                if let Some(prefix) = prefix {
                    let prefix = catalog
                        .prefixes
                        .get(prefix)
                        .ok_or_else(|| CompositionError::UnknownPrefix(prefix.clone()))?;
                    result = Unit::prefixed(prefix, &result)?;
                }
                if let Some(power) = power.filter(|&p| p != 1) {
                    result = Unit::powered(catalog, &result, power)?;
                }
                if let Some(symbol) = symbol {
                    result = result.with_symbol(symbol);
                }
                Ok(result)
            }
            UnitSpec::Fraction {
                numerator,
                denominator,
                symbol,
            } => {
                let numerator = resolve_all(numerator, table)?;
                let denominator = resolve_all(denominator, table)?;
                Ok(Unit::derived_with_symbol(
                    catalog,
                    symbol.as_deref(),
                    &numerator.iter().collect::<Vec<_>>(),
                    &denominator.iter().collect::<Vec<_>>(),
                ))
            }
        }
    }
}

impl From<&str> for UnitSpec {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

fn lookup<'t>(table: &'t impl UnitTable, name: &str) -> Result<&'t Unit, CompositionError> {
    table
        .lookup(name)
        .ok_or_else(|| UnknownUnit(name.to_string()).into())
}

fn resolve_all(specs: &[UnitSpec], table: &impl UnitTable) -> Result<Vec<Unit>, CompositionError> {
    specs.iter().map(|spec| spec.resolve(table)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fraction::Fraction, registry::Registry};

    fn spec(json: &str) -> UnitSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserialize_shapes() {
        assert_eq!(spec(r#""meter""#), UnitSpec::from("meter"));
        assert!(matches!(
            spec(r#"{"unit": "meter", "prefix": "deci", "power": 3}"#),
            UnitSpec::Literal { power: Some(3), .. }
        ));
        assert!(matches!(
            spec(r#"{"numerator": ["meter"], "denominator": ["second"]}"#),
            UnitSpec::Fraction { .. }
        ));
    }

    #[test]
    fn resolve_name() {
        let registry = Registry::base();
        let unit = UnitSpec::from("meter").resolve(&registry).unwrap();
        assert_eq!(unit.name(), "meter");
    }

    #[test]
    fn resolve_literal() {
        let registry = Registry::base();
        let liter = spec(r#"{"unit": "meter", "prefix": "deci", "power": 3, "symbol": "L"}"#)
            .resolve(&registry)
            .unwrap();
        assert_eq!(liter.symbol(), "L");
        // equal prefixes merge into one
        assert_eq!(liter.name(), "milli-meter*meter^2");
        assert_eq!(liter.quantity().name(), "volume");
        assert_eq!(liter.scale(), &Fraction::new(1, 1000).unwrap());
    }

    #[test]
    fn resolve_fraction() {
        let registry = Registry::base();
        let unit = spec(
            r#"{"numerator": [{"unit": "meter", "prefix": "kilo"}], "denominator": ["second"], "symbol": "kps"}"#,
        )
        .resolve(&registry)
        .unwrap();
        assert_eq!(unit.symbol(), "kps");
        assert_eq!(unit.name(), "kilo-meter/second");
        assert_eq!(unit.quantity().name(), "speed");
    }

    #[test]
    fn unknown_names_fail_loudly() {
        let registry = Registry::base();
        assert_eq!(
            UnitSpec::from("furlong").resolve(&registry),
            Err(CompositionError::UnknownUnit(UnknownUnit("furlong".into())))
        );
        assert_eq!(
            spec(r#"{"unit": "meter", "prefix": "kibi"}"#).resolve(&registry),
            Err(CompositionError::UnknownPrefix("kibi".into()))
        );
        assert!(matches!(
            spec(r#"{"numerator": ["meter"], "denominator": ["fortnight"]}"#).resolve(&registry),
            Err(CompositionError::UnknownUnit(_))
        ));
    }

    #[test]
    fn invalid_powers_fail() {
        let registry = Registry::base();
        assert_eq!(
            spec(r#"{"unit": "meter", "power": 0}"#).resolve(&registry),
            Err(CompositionError::InvalidPower {
                unit: "meter".into(),
                power: 0
            })
        );
        assert!(matches!(
            spec(r#"{"unit": "meter", "power": 9223372036854775807}"#).resolve(&registry),
            Err(CompositionError::InvalidPower { .. })
        ));
        let inverse = spec(r#"{"unit": "second", "power": -1}"#)
            .resolve(&registry)
            .unwrap();
        assert_eq!(inverse.name(), "/second");
    }
}
