//! SI magnitude prefixes
//!
//! Besides the prefixes themselves, the table knows which prefix is the
//! reciprocal of another and which prefix is the product of two others. Unit
//! tokens use that to simplify `kilo-meter/milli-meter` and alike.

use std::collections::HashMap;

use serde::Serialize;

use crate::fraction::Fraction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefix {
    pub name: String,
    pub symbol: String,
    pub factor: Fraction,
}

/// Result of multiplying two prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixProduct<'a> {
    /// The factors cancel out, like kilo and milli
    Unprefixed,
    /// Another prefix, like kilo and kilo make mega
    Prefixed(&'a str),
}

/// A set of prefixes with precomputed inverse and product tables
#[derive(Debug, Clone)]
pub struct PrefixTable {
    prefixes: Vec<Prefix>,
    by_name: HashMap<String, usize>,
    inverse: HashMap<usize, usize>,
    product: HashMap<(usize, usize), Option<usize>>,
}

impl PrefixTable {
    pub fn new(prefixes: Vec<Prefix>) -> Self {
        let by_name = prefixes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        let one = Fraction::one();
        let mut by_factor: HashMap<&Fraction, Option<usize>> = prefixes
            .iter()
            .enumerate()
            .map(|(i, p)| (&p.factor, Some(i)))
            .collect();
        by_factor.insert(&one, None);

        let mut inverse = HashMap::new();
        let mut product = HashMap::new();
        for (a, prefix) in prefixes.iter().enumerate() {
            if let Some(b) = prefix
                .factor
                .recip()
                .and_then(|recip| prefixes.iter().position(|p| p.factor == recip))
            {
                inverse.insert(a, b);
            }
            for (b, other) in prefixes.iter().enumerate() {
                let factor = &prefix.factor * &other.factor;
                if let Some(&result) = by_factor.get(&factor) {
                    product.insert((a, b), result);
                }
            }
        }

        Self {
            prefixes,
            by_name,
            inverse,
            product,
        }
    }

    /// The 20 SI prefixes, from yotta to yocto
    pub fn si() -> Self {
        #[rustfmt::skip]
        let prefixes = [
            ("Y",  "yotta",  24),
            ("Z",  "zetta",  21),
            ("E",  "exa",    18),
            ("P",  "peta",   15),
            ("T",  "tera",   12),
            ("G",  "giga",    9),
            ("M",  "mega",    6),
            ("k",  "kilo",    3),
            ("h",  "hecto",   2),
            ("da", "deca",    1),
            ("d",  "deci",   -1),
            ("c",  "centi",  -2),
            ("m",  "milli",  -3),
            ("\u{b5}", "micro", -6),
            ("n",  "nano",   -9),
            ("p",  "pico",  -12),
            ("f",  "femto", -15),
            ("a",  "atto",  -18),
            ("z",  "zepto", -21),
            ("y",  "yocto", -24),
        ];
        Self::new(
            prefixes
                .into_iter()
                .map(|(symbol, name, power)| Prefix {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                    factor: Fraction::power_of_ten(power),
                })
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Prefix> {
        self.by_name.get(name).map(|&i| &self.prefixes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prefix> {
        self.prefixes.iter()
    }

    /// The prefix with the reciprocal factor, like milli for kilo
    pub fn inverse(&self, name: &str) -> Option<&Prefix> {
        let index = self.by_name.get(name)?;
        self.inverse.get(index).map(|&i| &self.prefixes[i])
    }

    /// Multiplies two prefixes
    ///
    /// [`None`] if there is no prefix for the product, like for exa and exa.
    pub fn product(&self, a: &str, b: &str) -> Option<PrefixProduct<'_>> {
        let a = *self.by_name.get(a)?;
        let b = *self.by_name.get(b)?;
        let result = self.product.get(&(a, b))?;
        Some(match result {
            Some(i) => PrefixProduct::Prefixed(&self.prefixes[*i].name),
            None => PrefixProduct::Unprefixed,
        })
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::si()
    }
}
