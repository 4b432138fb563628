//! Dimensional analysis and exact unit arithmetic.
//!
//! Units are measured against the base unit of their quantity with an exact
//! rational scale, so `foot` to `inch` is exactly `12` and not a float that
//! is almost 12. Quantities are tracked by their dimensions, so `joule` and
//! `newton*meter` are interchangeable while `meter` and `second` are not.
//!
//! Also includes:
//! - Parsing and composing unit expressions like `kilo-meter/hour`, with
//!   prefix simplification and cancellation.
//! - Linear, absolute (offset zero) and additive (`5 ft 10 in`) conversions.
//! - Formatting results with no more precision than the inputs have.
//!
//! # Basic usage
//! Most things start with a [`Registry`]. [`Registry::default`] has the SI
//! units and, with the `bundled_units` feature, a set of common units.
//!
//! ```rust
//! # use unitcore::Registry;
//! let registry = Registry::default();
//! let km_h = registry.convert(36.0, "kilo-meter/hour", "meter/second")?;
//! assert!((km_h - 10.0).abs() < 1e-12);
//! # Ok::<(), unitcore::convert::ConvertError>(())
//! ```
//!
//! Any unit expression is understood, as long as every name in it is
//! registered:
//!
//! ```rust
//! # use unitcore::Registry;
//! let registry = Registry::default();
//! let unit = registry.parse_unit("kilo-gram*meter/second^2").unwrap();
//! assert_eq!(unit.quantity().name(), "force");
//! assert!(registry.parse_unit("furlong/fortnight").is_none());
//! ```
//!
//! To add units, layer [`UnitsFile`](registry::UnitsFile)s with a
//! [`RegistryBuilder`].

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

#[cfg(doc)]
pub mod _features {
    //! This lib has 1 feature, enabled by default:
    //! - `bundled_units`. Includes a units file with common units (imperial
    //!   lengths and masses, time, angles, temperatures...). These units are
    //!   available to load without the need to read a file. The default
    //!   [`Registry`](crate::Registry) uses them if this feature is enabled.
    //!   It also enables reading units files written in TOML.
}

pub mod convert;
pub mod fraction;
pub mod localize;
pub mod prefix;
pub mod quantity;
pub mod registry;
pub mod significance;
pub mod unit;

pub use convert::{ConvertError, ConvertUnit};
pub use fraction::Fraction;
pub use quantity::{BaseQuantity, Quantity};
pub use registry::{Registry, RegistryBuilder};
pub use significance::Significance;
pub use unit::{Unit, UnitSpec, UnitToken};
