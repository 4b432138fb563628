//! Immutable tables of quantities, prefixes and units
//!
//! A [`Registry`] is built once with a [`RegistryBuilder`] and is read only
//! afterwards. There are no globals, so independent registries can live side
//! by side.

use std::{borrow::Cow, sync::Arc};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    convert::{self, ConvertError, ConvertUnit, ZeroPoints},
    prefix::PrefixTable,
    quantity::{Quantity, QuantityTable},
    unit::{CompositionError, Unit, UnitSpec, UnitTable, UnitToken, UnknownUnit},
};

pub use builder::{RegistryBuilder, RegistryError};
pub use units_file::UnitsFile;

mod builder;
pub mod units_file;

/// Quantities and prefixes, everything needed to compose units
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub quantities: QuantityTable,
    pub prefixes: PrefixTable,
}

/// Main struct to look up units and perform conversions
///
/// To create one use [`Registry::builder`].
///
/// [`Registry::default`] changes with the feature `bundled_units`:
/// - When enabled, [`Registry::bundled`].
/// - When disabled, [`Registry::base`].
#[derive(Debug, Clone)]
pub struct Registry {
    catalog: Catalog,
    units: IndexMap<String, Arc<Unit>>,
    zero_points: ZeroPoints,
    defaults: IndexMap<String, Vec<Arc<Unit>>>,
}

/// Labeled list of units, see [`Registry::unit_groups`]
#[derive(Debug, Clone, Serialize)]
pub struct UnitGroup {
    pub label: String,
    pub units: Vec<Arc<Unit>>,
}

/// Labeled list of quantities, see [`Registry::quantity_groups`]
#[derive(Debug, Clone, Serialize)]
pub struct QuantityGroup {
    pub label: String,
    pub quantities: Vec<Arc<Quantity>>,
}

impl Registry {
    /// Start to create a new [`Registry`]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry with only the built-in SI units
    ///
    /// That is the base units, the scalar unit and the named derived units.
    pub fn base() -> Self {
        RegistryBuilder::new().finish().expect("built-in units are valid")
    }

    /// Registry with the bundled units
    ///
    /// This is only available when the `bundled_units` feature is enabled.
    ///
    /// This is the default when the `bundled_units` feature is enabled.
    #[cfg(feature = "bundled_units")]
    pub fn bundled() -> Self {
        RegistryBuilder::new()
            .with_units_file(UnitsFile::bundled())
            .expect("bundled units are valid")
            .finish()
            .expect("bundled units are valid")
    }

    pub(crate) fn from_parts(
        catalog: Catalog,
        units: IndexMap<String, Arc<Unit>>,
        zero_points: ZeroPoints,
        defaults: IndexMap<String, Vec<Arc<Unit>>>,
    ) -> Self {
        Self {
            catalog,
            units,
            zero_points,
            defaults,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn quantities(&self) -> &QuantityTable {
        &self.catalog.quantities
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.catalog.prefixes
    }

    pub fn zero_points(&self) -> &ZeroPoints {
        &self.zero_points
    }

    /// Get the total number of registered units
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Get an iterator of all the registered units, in registration order
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values().map(|u| u.as_ref())
    }

    /// Find a registered unit by its exact name
    pub fn find_unit(&self, name: &str) -> Option<Arc<Unit>> {
        self.units.get(name).cloned()
    }

    /// Parses a free text unit expression, like `kilo-meter/hour`
    ///
    /// Returns [`None`] when any part of it is unknown or malformed.
    #[tracing::instrument(level = "trace", skip_all, fields(text = %text))]
    pub fn parse_unit(&self, text: &str) -> Option<Unit> {
        if let Some(unit) = self.units.get(text) {
            return Some(unit.as_ref().clone());
        }
        let token = UnitToken::parse(text, &self.catalog.prefixes)?;
        self.unit_from_token(&token)
    }

    /// Builds the unit of a token, [`None`] if any part of it is unknown
    pub fn unit_from_token(&self, token: &UnitToken) -> Option<Unit> {
        token.to_unit(self)
    }

    /// Resolves a trusted [`UnitSpec`], failing on any unknown name
    pub fn resolve(&self, spec: &UnitSpec) -> Result<Unit, CompositionError> {
        spec.resolve(self)
    }

    /// If the unit has a registered zero point
    pub fn has_zero_point(&self, unit: &Unit) -> bool {
        self.zero_points.contains(unit)
    }

    /// Recommended units for a quantity, if any
    pub fn default_units(&self, quantity: &Quantity) -> Option<&[Arc<Unit>]> {
        self.defaults.get(quantity.name()).map(Vec::as_slice)
    }

    /// Registered units split in recommended and the rest
    ///
    /// When the quantity has no recommended units there is a single group
    /// with an empty label.
    pub fn unit_groups(&self, quantity: &Quantity) -> Vec<UnitGroup> {
        let compatible = || {
            self.units
                .values()
                .filter(|unit| quantity.is_compatible(unit.quantity()))
        };
        match self.default_units(quantity) {
            Some(recommended) => {
                let rest = compatible()
                    .filter(|unit| !recommended.iter().any(|r| r.name() == unit.name()))
                    .cloned()
                    .collect();
                vec![
                    UnitGroup {
                        label: "main:unitsRecommended".to_string(),
                        units: recommended.to_vec(),
                    },
                    UnitGroup {
                        label: "main:unitsRest".to_string(),
                        units: rest,
                    },
                ]
            }
            None => vec![UnitGroup {
                label: String::new(),
                units: compatible().cloned().collect(),
            }],
        }
    }

    /// Every unit for a quantity, recommended ones first
    pub fn units_for_quantity(&self, quantity: &Quantity) -> Vec<Arc<Unit>> {
        self.unit_groups(quantity)
            .into_iter()
            .flat_map(|group| group.units)
            .collect()
    }

    /// Registered quantities split in those with a choice of units and the
    /// rest
    pub fn quantity_groups(&self) -> Vec<QuantityGroup> {
        let (common, other): (Vec<_>, Vec<_>) = self
            .catalog
            .quantities
            .iter()
            .cloned()
            .partition(|quantity| self.units_for_quantity(quantity).len() > 1);
        vec![
            QuantityGroup {
                label: "main:quantitiesRecommended".to_string(),
                quantities: common,
            },
            QuantityGroup {
                label: "main:quantitiesRest".to_string(),
                quantities: other,
            },
        ]
    }

    fn get_unit<'a>(&'a self, unit: ConvertUnit<'a>) -> Result<Cow<'a, Unit>, UnknownUnit> {
        match unit {
            ConvertUnit::Unit(unit) => Ok(Cow::Borrowed(unit)),
            ConvertUnit::Key(key) => match self.units.get(key) {
                Some(unit) => Ok(Cow::Borrowed(unit.as_ref())),
                None => self
                    .parse_unit(key)
                    .map(Cow::Owned)
                    .ok_or_else(|| UnknownUnit(key.to_string())),
            },
        }
    }

    /// Linear conversion, see [`convert::linear_conversion`]
    pub fn convert<'a>(
        &'a self,
        value: f64,
        from: impl Into<ConvertUnit<'a>>,
        to: impl Into<ConvertUnit<'a>>,
    ) -> Result<f64, ConvertError> {
        let from = self.get_unit(from.into())?;
        let to = self.get_unit(to.into())?;
        convert::linear_conversion(&from, &to, value)
    }

    /// Conversion using the registered zero points, see
    /// [`convert::absolute_conversion`]
    pub fn convert_absolute<'a>(
        &'a self,
        value: f64,
        from: impl Into<ConvertUnit<'a>>,
        to: impl Into<ConvertUnit<'a>>,
    ) -> Result<f64, ConvertError> {
        let from = self.get_unit(from.into())?;
        let to = self.get_unit(to.into())?;
        convert::absolute_conversion(&self.zero_points, &from, &to, value)
    }

    /// Sum and decomposition, see [`convert::additive_conversion`]
    pub fn convert_additive<'a>(
        &'a self,
        values: &[f64],
        from: &[ConvertUnit<'a>],
        to: &[ConvertUnit<'a>],
    ) -> Result<Vec<f64>, ConvertError> {
        let from = from
            .iter()
            .map(|&u| self.get_unit(u))
            .collect::<Result<Vec<_>, _>>()?;
        let to = to
            .iter()
            .map(|&u| self.get_unit(u))
            .collect::<Result<Vec<_>, _>>()?;
        let from: Vec<&Unit> = from.iter().map(|u| u.as_ref()).collect();
        let to: Vec<&Unit> = to.iter().map(|u| u.as_ref()).collect();
        convert::additive_conversion(&from, &to, values)
    }
}

impl UnitTable for Registry {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lookup(&self, name: &str) -> Option<&Unit> {
        self.units.get(name).map(|u| u.as_ref())
    }
}

#[cfg(not(feature = "bundled_units"))]
impl Default for Registry {
    /// Same as [`Registry::base`]
    fn default() -> Self {
        Self::base()
    }
}

#[cfg(feature = "bundled_units")]
impl Default for Registry {
    /// Same as [`Registry::bundled`]
    fn default() -> Self {
        Self::bundled()
    }
}
