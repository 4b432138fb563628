//! Display text for quantities and units
//!
//! The crate does not ship translations. Anything that needs a localized
//! string goes through a [`Translate`] given by the caller, usually a closure
//! around the application's own lookup.

use crate::{
    prefix::PrefixTable,
    quantity::parenthesize,
    unit::{Literal, UnitToken},
};

/// Marks a quantity name typed by the user instead of a registered one
const CUSTOM_MARKER: char = '!';

/// Looks up a localized string by key, interpolating named values
pub trait Translate {
    fn translate(&self, key: &str, values: &[(&str, &str)]) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str, &[(&str, &str)]) -> String,
{
    fn translate(&self, key: &str, values: &[(&str, &str)]) -> String {
        self(key, values)
    }
}

/// Localized name of a quantity
///
/// Registered quantities use the `quantity:<name>` key. Names made with
/// [`custom_quantity_name`] use `main:quantityCustom` with the name as the
/// `name` value.
///
/// ```
/// # use unitcore::localize::{quantity_name, custom_quantity_name};
/// let t = |key: &str, values: &[(&str, &str)]| match values {
///     [("name", name)] => format!("{key}({name})"),
///     _ => key.to_string(),
/// };
/// assert_eq!(quantity_name("speed", &t), "quantity:speed");
/// assert_eq!(quantity_name(&custom_quantity_name("pace"), &t), "main:quantityCustom(pace)");
/// ```
pub fn quantity_name(name: &str, translate: &impl Translate) -> String {
    match name.strip_prefix(CUSTOM_MARKER) {
        Some(custom) => translate.translate("main:quantityCustom", &[("name", custom)]),
        None => translate.translate(&format!("quantity:{name}"), &[]),
    }
}

/// Marks a name as a custom quantity name for [`quantity_name`]
pub fn custom_quantity_name(name: &str) -> String {
    format!("{CUSTOM_MARKER}{name}")
}

/// Language independent text of a unit, `kilo-meter / (hour^2)`
pub fn unit_text(token: &UnitToken) -> String {
    match token {
        UnitToken::Literal(literal) => literal_text(literal),
        UnitToken::Product(product) => product
            .iter()
            .map(literal_text)
            .collect::<Vec<_>>()
            .join(" * "),
        UnitToken::Fraction {
            numerator,
            denominator,
        } => format!(
            "{} / {}",
            unit_text(numerator),
            parenthesize(&unit_text(denominator))
        ),
    }
}

/// [`unit_text`] of a unit name, or the name itself if it cannot be parsed
pub fn unit_name_text(name: &str, prefixes: &PrefixTable) -> String {
    match UnitToken::parse(name, prefixes) {
        Some(token) => unit_text(&token),
        None => name.to_string(),
    }
}

fn literal_text(literal: &Literal) -> String {
    let mut text = String::new();
    if let Some(prefix) = &literal.prefix {
        text.push_str(prefix);
        text.push('-');
    }
    text.push_str(&literal.unit);
    if let Some(power) = literal.power {
        text.push('^');
        text.push_str(&power.to_string());
    }
    text
}

/// English words for a unit, `square kilometer per hour`
///
/// Fractions use the `main:unitPer` key, with `numerator` and `denominator`
/// values, or `main:unitReciprocal` with only `denominator` when the
/// numerator is the scalar unit.
pub fn english_unit_text(token: &UnitToken, translate: &impl Translate) -> String {
    match token {
        UnitToken::Literal(literal) => english_literal(literal),
        UnitToken::Product(product) => product
            .iter()
            .map(english_literal)
            .collect::<Vec<_>>()
            .join("-"),
        UnitToken::Fraction {
            numerator,
            denominator,
        } => {
            let denominator = english_unit_text(denominator, translate);
            match numerator.as_ref() {
                UnitToken::Literal(literal) if literal.unit.is_empty() => translate
                    .translate("main:unitReciprocal", &[("denominator", denominator.as_str())]),
                numerator => {
                    let numerator = english_unit_text(numerator, translate);
                    translate.translate(
                        "main:unitPer",
                        &[
                            ("numerator", numerator.as_str()),
                            ("denominator", denominator.as_str()),
                        ],
                    )
                }
            }
        }
    }
}

fn english_literal(literal: &Literal) -> String {
    let prefix = literal.prefix.as_deref().unwrap_or("");
    let unit = &literal.unit;
    match literal.power {
        Some(2) => format!("square {prefix}{unit}"),
        Some(3) => format!("cubic {prefix}{unit}"),
        Some(power) if power >= 4 => {
            format!("{prefix}{unit} to the {} power", ordinal(power))
        }
        _ => format!("{prefix}{unit}"),
    }
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
