//! Digit precision tracking and number formatting
//!
//! A [`Significance`] estimates how many decimals of a number mean something,
//! based on its magnitude and on how the user wrote it. Results are formatted
//! with no more precision than the inputs support, while still preferring the
//! plain rendering when that one is shorter.

use serde::{Deserialize, Serialize};
use thousands::{digits, Separable, SeparatorPolicy};

use crate::{convert::scale_between, unit::Unit};

/// Decimals always shown on top of the magnitude
const SIGNIFICANCE_BUFFER: f64 = 2.0;
/// Minimum decimals of a fixed rendering
const DIGITS_ALWAYS: i32 = 2;
/// Maximum fraction digits when formatting for a locale
const MAX_LOCALE_DIGITS: i32 = 20;
/// Maximum fraction digits when formatting without a locale
const MAX_PLAIN_DIGITS: i32 = 100;

/// Estimated meaningful digits of a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Significance {
    /// Decimals from the magnitude of the value
    pub decimals: i32,
    /// Digits typed beyond a bare integer rendering of the value
    pub additional: i32,
}

impl Significance {
    pub fn new(decimals: i32, additional: i32) -> Self {
        Self {
            decimals,
            additional,
        }
    }

    /// Total digits, used to compare
    pub fn total(&self) -> i32 {
        self.decimals + self.additional
    }

    /// Same significance with the decimals moved by `offset`
    pub fn offset_decimals(self, offset: i32) -> Self {
        Self {
            decimals: self.decimals + offset,
            ..self
        }
    }
}

/// Separators used to read and write numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub decimal_point: String,
    pub group_separator: String,
}

impl NumberLocale {
    pub fn new(decimal_point: impl Into<String>, group_separator: impl Into<String>) -> Self {
        Self {
            decimal_point: decimal_point.into(),
            group_separator: group_separator.into(),
        }
    }

    /// [`get_significance`] for text written in this locale
    pub fn significance(&self, value: f64, text: &str) -> Significance {
        Significance {
            decimals: magnitude_decimals(value),
            additional: redundant_digits(value, text, self),
        }
    }

    /// Writes a plain decimal rendering with these separators
    fn localize(&self, plain: &str) -> String {
        let (integer, fraction) = match plain.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (plain, None),
        };
        let policy = SeparatorPolicy {
            separator: &self.group_separator,
            groups: &[3],
            digits: digits::ASCII_DECIMAL,
        };
        let mut out = integer.separate_by_policy(policy);
        if let Some(fraction) = fraction.filter(|f| !f.is_empty()) {
            out.push_str(&self.decimal_point);
            out.push_str(fraction);
        }
        out
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::new(".", ",")
    }
}

fn safe_log10(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        0.0
    } else {
        value.abs().log10()
    }
}

fn magnitude_decimals(value: f64) -> i32 {
    (SIGNIFICANCE_BUFFER - safe_log10(value)).ceil() as i32
}

fn redundant_digits(value: f64, text: &str, locale: &NumberLocale) -> i32 {
    let mut text = text.to_string();
    if let Some(pos) = text.find(['+', '-']) {
        text.remove(pos);
    }
    for separator in [&locale.decimal_point, &locale.group_separator] {
        if !separator.is_empty() {
            text = text.replace(separator.as_str(), "");
        }
    }
    let typed = text.chars().count() as i32;
    let effective = if value.is_finite() {
        format!("{:.0}", value.abs().round()).len() as i32
    } else {
        0
    };
    (typed - effective).max(0)
}

/// Significance of a value the user typed as `text`
///
/// The text is read with the default [`NumberLocale`].
///
/// ```
/// # use unitcore::significance::get_significance;
/// let s = get_significance(1.5, "1.50");
/// assert_eq!(s.decimals, 2);
/// assert_eq!(s.additional, 2);
/// ```
pub fn get_significance(value: f64, text: &str) -> Significance {
    NumberLocale::default().significance(value, text)
}

/// The entry with the most total digits, the first one on a tie
///
/// `None` for an empty list.
pub fn maximum_significance(significances: &[Significance]) -> Option<Significance> {
    let (first, rest) = significances.split_first()?;
    Some(rest.iter().fold(*first, |best, s| {
        if best.total() >= s.total() {
            best
        } else {
            *s
        }
    }))
}

/// Decimals in the shortest rendering that reads back as the same value
pub fn lowest_place_decimal(value: f64) -> usize {
    let text = value.to_string();
    text.split_once('.').map(|(_, f)| f.len()).unwrap_or(0)
}

fn unconstrained(value: f64, locale: Option<&NumberLocale>) -> String {
    match locale {
        None => value.to_string(),
        Some(locale) => {
            let decimals = lowest_place_decimal(value).min(MAX_LOCALE_DIGITS as usize);
            locale.localize(&format!("{value:.decimals$}"))
        }
    }
}

fn strip_zeros(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.')
}

fn fixed(value: f64, digits: f64, locale: Option<&NumberLocale>) -> String {
    let digits = (digits.ceil() as i32).max(DIGITS_ALWAYS);
    let text = match locale {
        Some(locale) => {
            let decimals = digits.min(MAX_LOCALE_DIGITS) as usize;
            let text = format!("{value:.decimals$}");
            locale.localize(strip_zeros(&text))
        }
        None => {
            let depth = -safe_log10(value);
            let decimals = (digits as f64 + depth.max(0.0)).ceil() as i32;
            let decimals = decimals.min(MAX_PLAIN_DIGITS) as usize;
            strip_zeros(&format!("{value:.decimals$}")).to_string()
        }
    };
    if text.is_empty() {
        "0".to_string()
    } else {
        text
    }
}

/// Formats a value with no more precision than its significance supports
///
/// Without a significance the value is formatted plainly. With one, the
/// shorter of the plain and the fixed-decimals renderings is used,
/// preferring the plain one on a tie. Non finite values are formatted as is.
///
/// ```
/// # use unitcore::significance::{format_with_significance, Significance};
/// let s = Significance::new(1, 0);
/// assert_eq!(format_with_significance(2.0 / 3.0, Some(s), None), "0.667");
/// assert_eq!(format_with_significance(0.5, Some(s), None), "0.5");
/// ```
pub fn format_with_significance(
    value: f64,
    significance: Option<Significance>,
    locale: Option<&NumberLocale>,
) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let plain = unconstrained(value, locale);
    let Some(significance) = significance else {
        return plain;
    };
    let digits = significance.decimals.max(0) + significance.additional;
    let fixed = fixed(value, digits as f64, locale);
    if fixed.chars().count() < plain.chars().count() {
        fixed
    } else {
        plain
    }
}

/// Formats a converted value, widening the decimals by how much finer the
/// target unit is than the source one
pub fn format_with_significance_and_units(
    value: f64,
    significance: Option<Significance>,
    locale: Option<&NumberLocale>,
    from: &Unit,
    to: &Unit,
) -> String {
    let offset = 1.0 - scale_between(from, to).log10();
    let significance = significance.map(|s| {
        // the fixed rendering rounds the digits up anyway
        let offset = if offset.is_finite() { offset.ceil() as i32 } else { 0 };
        s.offset_decimals(offset)
    });
    format_with_significance(value, significance, locale)
}
