// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fractional order keys for work item execution order.
//!
//! A key is a base-62 fraction `0.d1 d2 d3 ...` written with the digits
//! `0-9A-Za-z`. The digit alphabet is in ASCII order, so comparing keys as
//! byte strings (Rust `Ord` on `String`, SQLite `BINARY` collation) matches
//! comparing the fractions. Keys never end in `0`, which guarantees that a
//! key strictly between any two distinct keys exists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u8 = 62;

/// A position in a totally ordered, dense key space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey(String);

impl OrderKey {
    /// Returns the key used for the first item of an empty list.
    pub fn first() -> Self {
        OrderKey(encode(&midpoint(&[], None)))
    }

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a key strictly between `lo` and `hi`.
    ///
    /// `None` stands for the open end of the list (before the first key or
    /// after the last one).
    pub fn between(lo: Option<&OrderKey>, hi: Option<&OrderKey>) -> Result<Self> {
        check_bounds(lo, hi)?;
        let lo_digits = lo.map(|k| decode(&k.0)).unwrap_or_default();
        let hi_digits = hi.map(|k| decode(&k.0));
        Ok(OrderKey(encode(&midpoint(&lo_digits, hi_digits.as_deref()))))
    }

    /// Returns `n` strictly increasing keys strictly between `lo` and `hi`.
    ///
    /// Keys are produced by bisection so that their lengths stay balanced.
    pub fn n_between(lo: Option<&OrderKey>, hi: Option<&OrderKey>, n: usize) -> Result<Vec<Self>> {
        check_bounds(lo, hi)?;
        let mut keys = Vec::with_capacity(n);
        bisect(lo, hi, n, &mut keys)?;
        Ok(keys)
    }

    /// Returns the key following `last`, or [`OrderKey::first`] for an empty list.
    pub fn after(last: Option<&OrderKey>) -> Result<Self> {
        match last {
            Some(key) => OrderKey::between(Some(key), None),
            None => Ok(OrderKey::first()),
        }
    }
}

fn check_bounds(lo: Option<&OrderKey>, hi: Option<&OrderKey>) -> Result<()> {
    if let (Some(lo), Some(hi)) = (lo, hi) {
        if lo >= hi {
            return Err(Error::InvalidOrderKey(format!(
                "lower bound {lo} is not below upper bound {hi}"
            )));
        }
    }
    Ok(())
}

fn bisect(
    lo: Option<&OrderKey>,
    hi: Option<&OrderKey>,
    n: usize,
    out: &mut Vec<OrderKey>,
) -> Result<()> {
    if n == 0 {
        return Ok(());
    }
    let mid = OrderKey::between(lo, hi)?;
    let left = n / 2;
    bisect(lo, Some(&mid), left, out)?;
    out.push(mid.clone());
    bisect(Some(&mid), hi, n - left - 1, out)
}

/// Digits of the fraction strictly between `a` and `b` (`None` = 1.0).
///
/// Requires `a < b` and neither side ending in a zero digit.
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Vec<u8> {
    if let Some(b) = b {
        // Shared prefix, treating missing digits of `a` as zeros.
        let n = b
            .iter()
            .enumerate()
            .take_while(|(i, d)| a.get(*i).copied().unwrap_or(0) == **d)
            .count();
        if n > 0 {
            let mut out = b[..n].to_vec();
            out.extend(midpoint(a.get(n..).unwrap_or(&[]), Some(&b[n..])));
            return out;
        }
    }

    let da = a.first().copied().unwrap_or(0);
    let db = b.and_then(|b| b.first().copied()).unwrap_or(BASE);
    if db - da > 1 {
        return vec![(da + db) / 2];
    }
    match b {
        Some(b) if b.len() > 1 => vec![b[0]],
        _ => {
            let mut out = vec![da];
            out.extend(midpoint(a.get(1..).unwrap_or(&[]), None));
            out
        }
    }
}

fn digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'Z' => Some(c - b'A' + 10),
        b'a'..=b'z' => Some(c - b'a' + 36),
        _ => None,
    }
}

fn decode(s: &str) -> Vec<u8> {
    s.bytes().filter_map(digit_value).collect()
}

fn encode(digits: &[u8]) -> String {
    digits.iter().map(|d| DIGITS[*d as usize] as char).collect()
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.ends_with('0') || s.bytes().any(|c| digit_value(c).is_none()) {
            return Err(Error::InvalidOrderKey(s.to_string()));
        }
        Ok(OrderKey(s.to_string()))
    }
}

impl TryFrom<String> for OrderKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.0
    }
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
