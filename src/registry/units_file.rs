//! Configuration data structures used in [`RegistryBuilder`](super::RegistryBuilder)

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{fraction::Fraction, unit::UnitSpec};

/// Configuration struct for units used in [`RegistryBuilder`](super::RegistryBuilder)
///
/// This structure is designed for deserializing [TOML](https://toml.io/en/),
/// but you can try other formats supported by serde.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnitsFile {
    /// Named float constants that scaled units can reference, like `pi`
    #[serde(default)]
    pub constants: IndexMap<String, f64>,
    /// Declare new units as multiples of others
    ///
    /// Order matters, a unit can use the ones declared before it.
    #[serde(default)]
    pub units: Vec<ScaledUnitEntry>,
    /// Offset from absolute zero, in the unit itself
    ///
    /// This is only needed for units with a non-ratio scale like degrees
    /// Celsius.
    #[serde(default)]
    pub zero_points: IndexMap<String, f64>,
    /// Recommended units for each quantity, by quantity name
    ///
    /// This will override the list of a layer before.
    #[serde(default)]
    pub defaults: IndexMap<String, Vec<UnitSpec>>,
}

/// A unit declared in a [`UnitsFile`]
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScaledUnitEntry {
    /// Unit this one is a multiple of
    pub base: UnitSpec,
    /// Unique name, it cannot contain `*`, `/`, `-`, `^` or parentheses
    pub name: String,
    pub symbol: String,
    /// Exact scale relative to `base`. `"n/d"`, `"n.d"` or `"n"`.
    #[serde(default = "Fraction::one")]
    pub scale: Fraction,
    /// Approximate extra factor, a number or the name of a constant
    #[serde(default)]
    pub constant: ScaleConstant,
}

/// Float factor of a [`ScaledUnitEntry`]
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ScaleConstant {
    Value(f64),
    Named(String),
}

impl Default for ScaleConstant {
    fn default() -> Self {
        Self::Value(1.0)
    }
}

#[cfg(feature = "bundled_units")]
impl UnitsFile {
    /// Get the bundled units file
    ///
    /// This is only available with the `bundled_units` feature.
    pub fn bundled() -> Self {
        toml::from_str(BUNDLED_UNITS).expect("bundled units file is valid")
    }
}

#[cfg(feature = "bundled_units")]
const BUNDLED_UNITS: &str = include_str!("../../units.toml");
