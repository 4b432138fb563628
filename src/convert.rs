//! Conversions between units
//!
//! - Linear, a value times the scale between two units.
//! - Absolute, for units with an offset zero like degrees Celsius.
//! - Additive, a sum of values in some units decomposed into others, like
//!   `1.8 m` into `5 ft 10.87 in`.
//!
//! All of them need the units to have equivalent quantities and the inputs to
//! be finite numbers. The exact scales only become floats at the very end.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::unit::{Unit, UnknownUnit};

/// Offsets from absolute zero by unit name
///
/// Units without an entry have their zero at absolute zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZeroPoints(IndexMap<String, f64>);

impl ZeroPoints {
    pub fn new(points: IndexMap<String, f64>) -> Self {
        Self(points)
    }

    /// Offset of a unit, 0 when not registered
    pub fn get(&self, unit: &Unit) -> f64 {
        self.0.get(unit.name()).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, unit: &Unit) -> bool {
        self.0.contains_key(unit.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, &offset)| (name.as_str(), offset))
    }
}

impl FromIterator<(String, f64)> for ZeroPoints {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Float factor to go from one unit to another
///
/// The exact scales are divided first and the result converted to a float,
/// then multiplied by the ratio of the constants.
pub fn scale_between(from: &Unit, to: &Unit) -> f64 {
    let constant = from.scale_constant() / to.scale_constant();
    let exact = from
        .scale()
        .checked_div(to.scale())
        .map(|f| f.to_f64())
        .unwrap_or(f64::NAN);
    constant * exact
}

fn check_compatible(from: &Unit, to: &Unit) -> Result<(), ConvertError> {
    if !from.quantity().is_equivalent(to.quantity()) {
        return Err(ConvertError::MixedQuantities {
            from: from.quantity().name().to_string(),
            to: to.quantity().name().to_string(),
        });
    }
    Ok(())
}

fn check_finite(value: f64) -> Result<(), ConvertError> {
    if !value.is_finite() {
        return Err(ConvertError::NonFinite(value));
    }
    Ok(())
}

/// Converts a value multiplying it by [`scale_between`]
#[tracing::instrument(level = "trace", skip_all, fields(from = %from, to = %to), ret)]
pub fn linear_conversion(from: &Unit, to: &Unit, value: f64) -> Result<f64, ConvertError> {
    check_compatible(from, to)?;
    check_finite(value)?;
    Ok(value * scale_between(from, to))
}

/// Converts a value taking into account where the zero of each unit is
///
/// ```
/// # use unitcore::registry::Registry;
/// let registry = Registry::bundled();
/// let celsius = registry.find_unit("celsius").unwrap();
/// let kelvin = registry.find_unit("kelvin").unwrap();
/// let value = registry.convert_absolute(0.0, &celsius, &kelvin).unwrap();
/// assert!((value - 273.15).abs() < 1e-9);
/// ```
#[tracing::instrument(level = "trace", skip_all, fields(from = %from, to = %to), ret)]
pub fn absolute_conversion(
    zero_points: &ZeroPoints,
    from: &Unit,
    to: &Unit,
    value: f64,
) -> Result<f64, ConvertError> {
    check_compatible(from, to)?;
    check_finite(value)?;
    let scale = scale_between(from, to);
    Ok((value - zero_points.get(from)) * scale + zero_points.get(to))
}

/// Sum of the values in the base unit of their quantity
///
/// The units and values must have the same length.
pub fn additive_total(units: &[&Unit], values: &[f64]) -> Result<f64, ConvertError> {
    if units.len() != values.len() {
        return Err(ConvertError::InputCount {
            units: units.len(),
            inputs: values.len(),
        });
    }
    let mut total = 0.0;
    for (unit, &value) in units.iter().zip(values) {
        check_finite(value)?;
        total += value * unit.absolute_scale();
    }
    Ok(total)
}

/// Decomposes a sum of values into a list of units
///
/// The target units have to be sorted from the largest to the smallest.
/// Every target but the last gets a whole number, and the last one gets the
/// remainder. The order is not checked, unsorted targets just give a
/// strange (but still equal in total) result.
#[tracing::instrument(level = "trace", skip_all, fields(inputs = ?values), ret)]
pub fn additive_conversion(
    from: &[&Unit],
    to: &[&Unit],
    values: &[f64],
) -> Result<Vec<f64>, ConvertError> {
    for pair in from.iter().chain(to).collect::<Vec<_>>().windows(2) {
        check_compatible(pair[0], pair[1])?;
    }
    let total = additive_total(from, values)?;

    let Some((last, rest)) = to.split_last() else {
        return Ok(Vec::new());
    };
    let mut results = Vec::with_capacity(to.len());
    let mut spare = total;
    for unit in rest {
        let scale = unit.absolute_scale();
        let whole = (spare / scale).floor();
        results.push(whole);
        spare -= whole * scale;
    }
    results.push(spare / last.absolute_scale());
    Ok(results)
}

/// Errors from a conversion
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Mixed quantities: {from} {to}")]
    MixedQuantities { from: String, to: String },

    #[error("Cannot convert a non finite number: {0}")]
    NonFinite(f64),

    #[error("Got {inputs} values for {units} units")]
    InputCount { units: usize, inputs: usize },

    #[error(transparent)]
    UnknownUnit(#[from] UnknownUnit),
}

/// Input unit for [`Registry`](crate::registry::Registry) conversions
#[derive(Debug, Clone, Copy)]
pub enum ConvertUnit<'a> {
    /// A unit directly
    Unit(&'a Unit),
    /// A registered name or any unit expression, like `kilo-meter/hour`
    Key(&'a str),
}

impl<'a> From<&'a str> for ConvertUnit<'a> {
    fn from(value: &'a str) -> Self {
        Self::Key(value)
    }
}

impl<'a> From<&'a Unit> for ConvertUnit<'a> {
    fn from(value: &'a Unit) -> Self {
        Self::Unit(value)
    }
}

impl<'a> From<&'a Arc<Unit>> for ConvertUnit<'a> {
    fn from(value: &'a Arc<Unit>) -> Self {
        Self::Unit(value.as_ref())
    }
}
