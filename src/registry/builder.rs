use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use super::{
    units_file::{ScaleConstant, ScaledUnitEntry},
    Catalog, Registry, UnitsFile,
};
use crate::{
    convert::ZeroPoints,
    fraction::{FormatError, Fraction},
    quantity::BaseQuantity,
    unit::{CompositionError, Unit, UnitSpec, UnitTable, UnknownUnit},
};

/// Builder to create a custom [`Registry`]
///
/// A new builder already has the built-in SI units. [`UnitsFile`]s add more.
/// More than one file can be layered and order matters, as one file can use
/// the units and constants of another added before.
#[derive(Debug)]
pub struct RegistryBuilder {
    catalog: Catalog,
    units: IndexMap<String, Arc<Unit>>,
    constants: IndexMap<String, f64>,
    zero_points: IndexMap<String, f64>,
    defaults: IndexMap<String, Vec<UnitSpec>>,
}

impl RegistryBuilder {
    /// New builder with the built-in units
    pub fn new() -> Self {
        Self::with_catalog(Catalog::default())
    }

    /// New builder with the built-in units over a custom catalog
    ///
    /// # Panics
    /// If the catalog lacks a quantity the built-in units need.
    pub fn with_catalog(catalog: Catalog) -> Self {
        let mut builder = Self {
            catalog,
            units: IndexMap::new(),
            constants: IndexMap::new(),
            zero_points: IndexMap::new(),
            defaults: IndexMap::new(),
        };
        let units = builtin_units(&builder.catalog).expect("built-in units are consistent");
        for unit in units {
            builder
                .add_unit(unit)
                .expect("built-in units have unique names");
        }
        builder
    }

    /// Add the bundled units to the builder
    ///
    /// This is only available with the `bundled_units` feature.
    #[cfg(feature = "bundled_units")]
    pub fn with_bundled_units(mut self) -> Result<Self, RegistryError> {
        self.add_units_file(UnitsFile::bundled())?;
        Ok(self)
    }

    /// Add a [`UnitsFile`] to the builder
    pub fn with_units_file(mut self, file: UnitsFile) -> Result<Self, RegistryError> {
        self.add_units_file(file)?;
        Ok(self)
    }

    /// Add a [`UnitsFile`] written in TOML to the builder
    ///
    /// This is only available with the `bundled_units` feature.
    #[cfg(feature = "bundled_units")]
    pub fn add_units_toml(&mut self, text: &str) -> Result<&mut Self, RegistryError> {
        let file: UnitsFile = toml::from_str(text)?;
        self.add_units_file(file)
    }

    /// Add a [`UnitsFile`] to the builder
    #[tracing::instrument(level = "debug", skip_all, fields(units = file.units.len()))]
    pub fn add_units_file(&mut self, file: UnitsFile) -> Result<&mut Self, RegistryError> {
        self.constants.extend(file.constants);

        for entry in file.units {
            let unit = self.scaled_unit(entry)?;
            self.add_unit(unit)?;
        }

        for (name, offset) in file.zero_points {
            if !self.units.contains_key(&name) {
                return Err(CompositionError::from(UnknownUnit(name)).into());
            }
            self.zero_points.insert(name, offset);
        }

        // recommended units always override
        for (quantity, specs) in file.defaults {
            if self.catalog.quantities.get(&quantity).is_none() {
                return Err(CompositionError::UnknownQuantity(quantity).into());
            }
            self.defaults.insert(quantity, specs);
        }

        Ok(self)
    }

    /// Add a single scaled unit, with the scale as fraction text
    pub fn add_scaled_unit(
        &mut self,
        base: UnitSpec,
        name: &str,
        symbol: &str,
        scale: &str,
        constant: f64,
    ) -> Result<&mut Self, RegistryError> {
        let entry = ScaledUnitEntry {
            base,
            name: name.to_string(),
            symbol: symbol.to_string(),
            scale: scale.parse::<Fraction>()?,
            constant: ScaleConstant::Value(constant),
        };
        let unit = self.scaled_unit(entry)?;
        self.add_unit(unit)?;
        Ok(self)
    }

    fn scaled_unit(&self, entry: ScaledUnitEntry) -> Result<Unit, RegistryError> {
        if entry.name.is_empty() || entry.name.contains(['*', '/', '(', ')', '-', '^']) {
            return Err(RegistryError::InvalidName(entry.name));
        }
        let base = entry.base.resolve(self)?;
        let constant = match entry.constant {
            ScaleConstant::Value(value) => value,
            ScaleConstant::Named(name) => match self.constants.get(&name) {
                Some(value) => *value,
                None => return Err(CompositionError::UnknownConstant(name).into()),
            },
        };
        Ok(Unit::scaled(
            entry.name,
            entry.symbol,
            &base,
            &entry.scale,
            constant,
        )?)
    }

    fn add_unit(&mut self, unit: Unit) -> Result<(), RegistryError> {
        if self.units.contains_key(unit.name()) {
            return Err(RegistryError::DuplicateUnit {
                name: unit.name().to_string(),
            });
        }
        self.units.insert(unit.name().to_string(), Arc::new(unit));
        Ok(())
    }

    /// Resolve the recommended units and create the [`Registry`]
    #[tracing::instrument(level = "debug", name = "registry_finish", skip_all, fields(units = self.units.len()))]
    pub fn finish(self) -> Result<Registry, RegistryError> {
        let mut defaults = IndexMap::with_capacity(self.defaults.len());
        for (quantity, specs) in &self.defaults {
            let units = specs
                .iter()
                .map(|spec| spec.resolve(&self).map(Arc::new))
                .collect::<Result<Vec<_>, _>>()?;
            defaults.insert(quantity.clone(), units);
        }

        Ok(Registry::from_parts(
            self.catalog,
            self.units,
            ZeroPoints::new(self.zero_points),
            defaults,
        ))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTable for RegistryBuilder {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lookup(&self, name: &str) -> Option<&Unit> {
        self.units.get(name).map(|u| u.as_ref())
    }
}

/// Errors when building a [`Registry`]
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate unit: {name}")]
    DuplicateUnit { name: String },

    #[error("Invalid unit name: '{0}'")]
    InvalidName(String),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[cfg(feature = "bundled_units")]
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// SI base units, the scalar unit and the named derived units
fn builtin_units(catalog: &Catalog) -> Result<Vec<Unit>, CompositionError> {
    let quantities = &catalog.quantities;
    let base = |name: &str, symbol: &str, quantity: BaseQuantity| {
        Unit::base(name, symbol, quantities.base(quantity))
    };

    let s = base("second", "s", BaseQuantity::Time);
    let m = base("meter", "m", BaseQuantity::Length);
    let g = base("gram", "g", BaseQuantity::Mass);
    let a = base("ampere", "A", BaseQuantity::ElectricCurrent);
    let k = base("kelvin", "K", BaseQuantity::Temperature);
    let mol = base("mole", "mol", BaseQuantity::AmountOfSubstance);
    let cd = base("candela", "cd", BaseQuantity::LuminousIntensity);
    let rad = base("radian", "rad", BaseQuantity::PlaneAngle);
    let sr = base("steradian", "sr", BaseQuantity::SolidAngle);

    let kilo = catalog
        .prefixes
        .get("kilo")
        .ok_or_else(|| CompositionError::UnknownPrefix("kilo".to_string()))?;
    let kg = Unit::prefixed(kilo, &g)?;

    let named = |symbol: &str, name: &str, numerators: &[&Unit], denominators: &[&Unit]| {
        Unit::derived_with_name(catalog, name, symbol, numerators, denominators, None)
    };
    let with_quantity = |symbol: &str,
                         name: &str,
                         quantity: &str,
                         numerators: &[&Unit],
                         denominators: &[&Unit]|
     -> Result<Unit, CompositionError> {
        let quantity = quantities
            .get(quantity)
            .cloned()
            .ok_or_else(|| CompositionError::UnknownQuantity(quantity.to_string()))?;
        Unit::derived_with_name_and_quantity(catalog, name, symbol, quantity, numerators, denominators)
    };

    #[rustfmt::skip]
    let derived = vec![
        named("Hz", "hertz",      &[],                   &[&s]),
        named("N", "newton",      &[&kg, &m],            &[&s, &s]),
        named("Pa", "pascal",     &[&kg, &m],            &[&m, &m, &s, &s]),
        named("J", "joule",       &[&kg, &m, &m],        &[&s, &s]),
        named("W", "watt",        &[&kg, &m, &m],        &[&s, &s, &s]),

        named("C", "coulomb",     &[&s, &a],             &[]),
        named("V", "volt",        &[&kg, &m, &m],        &[&s, &s, &s, &a]),
        named("F", "farad",       &[&s, &s, &s, &s, &a, &a], &[&kg, &m, &m]),
        named("\u{3a9}", "ohm",   &[&kg, &m, &m],        &[&s, &s, &s, &a, &a]),
        named("S", "siemens",     &[&s, &s, &s, &a, &a], &[&kg, &m, &m]),
        named("Wb", "weber",      &[&kg, &m, &m],        &[&s, &s, &a]),
        named("T", "tesla",       &[&kg],                &[&s, &s, &a]),
        named("H", "henry",       &[&kg, &m, &m],        &[&s, &s, &a, &a]),

        named("lm", "lumen",      &[&cd, &sr],           &[]),
        named("lx", "lux",        &[&cd, &sr],           &[&m, &m]),

        with_quantity("Bq", "becquerel", "radioactivity",     &[],     &[&s])?,
        with_quantity("Gy", "gray",      "absorbedDose",      &[&m, &m], &[&s, &s])?,
        with_quantity("kat", "katal",    "catalyticActivity", &[&mol], &[&s])?,
    ];

    let scalar = Unit::base("", "1", quantities.scalar());
    let mut units = vec![scalar, s, m, g, a, k, mol, cd, rad, sr];
    units.extend(derived);
    Ok(units)
}

#[cfg(all(test, feature = "bundled_units"))]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn layered_files() {
        let mut builder = RegistryBuilder::new();
        builder
            .add_units_toml(indoc! {r#"
                [[units]]
                base = "meter"
                name = "foot"
                symbol = "ft"
                scale = "0.3048"
            "#})
            .unwrap();
        builder
            .add_units_toml(indoc! {r#"
                [[units]]
                base = "foot"
                name = "inch"
                symbol = "in"
                scale = "1/12"

                [defaults]
                length = ["meter", "foot", "inch"]
            "#})
            .unwrap();
        let registry = builder.finish().unwrap();
        let inch = registry.find_unit("inch").unwrap();
        assert_eq!(inch.scale(), &"0.0254".parse::<Fraction>().unwrap());
        let length = registry.quantities().get("length").unwrap();
        let defaults: Vec<_> = registry
            .default_units(length)
            .unwrap()
            .iter()
            .map(|u| u.name())
            .collect();
        assert_eq!(defaults, ["meter", "foot", "inch"]);
    }

    #[test]
    fn duplicate_unit() {
        let result = RegistryBuilder::new().add_units_toml(indoc! {r#"
            [[units]]
            base = "meter"
            name = "meter"
            symbol = "M"
        "#})
        .map(|_| ());
        assert!(matches!(result, Err(RegistryError::DuplicateUnit { name }) if name == "meter"));
    }

    #[test]
    fn unknown_base_and_constant() {
        let result = RegistryBuilder::new().add_units_toml(indoc! {r#"
            [[units]]
            base = "furlong"
            name = "chain"
            symbol = "ch"
        "#})
        .map(|_| ());
        assert!(matches!(
            result,
            Err(RegistryError::Composition(CompositionError::UnknownUnit(_)))
        ));

        let result = RegistryBuilder::new().add_units_toml(indoc! {r#"
            [[units]]
            base = "radian"
            name = "degree"
            symbol = "°"
            scale = "1/180"
            constant = "tau"
        "#})
        .map(|_| ());
        assert!(matches!(
            result,
            Err(RegistryError::Composition(CompositionError::UnknownConstant(c))) if c == "tau"
        ));
    }

    #[test]
    fn invalid_entries() {
        let mut builder = RegistryBuilder::new();
        assert!(matches!(
            builder.add_scaled_unit("meter".into(), "kilo-foot", "kft", "304.8", 1.0),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(matches!(
            builder.add_scaled_unit("meter".into(), "foot", "ft", "0,3048", 1.0),
            Err(RegistryError::Format(_))
        ));
        assert!(matches!(
            builder.add_scaled_unit("meter".into(), "nothing", "_", "0", 1.0),
            Err(RegistryError::Composition(CompositionError::NonPositiveScale { .. }))
        ));
        assert!(matches!(
            builder.add_scaled_unit("meter".into(), "backwards", "_", "-1", 1.0),
            Err(RegistryError::Composition(CompositionError::NonPositiveScale { .. }))
        ));
        assert!(matches!(
            builder.add_units_toml("[zero_points]\nfurlong = 1.0\n"),
            Err(RegistryError::Composition(CompositionError::UnknownUnit(_)))
        ));
        assert!(matches!(
            builder.add_units_toml("[defaults]\nwarpFactor = [\"meter\"]\n"),
            Err(RegistryError::Composition(CompositionError::UnknownQuantity(_)))
        ));
        assert!(matches!(
            builder.add_units_toml("[units]\n"),
            Err(RegistryError::Toml(_))
        ));
    }

    #[test]
    fn unknown_default_unit_fails_on_finish() {
        let mut builder = RegistryBuilder::new();
        builder
            .add_units_toml("[defaults]\nlength = [\"furlong\"]\n")
            .unwrap();
        assert!(matches!(
            builder.finish(),
            Err(RegistryError::Composition(CompositionError::UnknownUnit(_)))
        ));
    }
}
