// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Wide String Type
//!
//! Key and value names are sequences of 16-bit code units, compared
//! case-insensitively. The sequence is not required to be valid UTF-16:
//! the snapshot escape syntax can produce arbitrary units, and they must
//! survive a save/load cycle unchanged.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An owned sequence of 16-bit code units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideString(Vec<u16>);

impl WideString {
    /// Creates an empty wide string.
    pub fn new() -> Self {
        WideString(Vec::new())
    }

    /// Wraps a raw unit vector.
    pub fn from_units(units: Vec<u16>) -> Self {
        WideString(units)
    }

    /// Borrows the raw code units.
    pub fn units(&self) -> &[u16] {
        &self.0
    }

    /// Number of code units.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, unit: u16) {
        self.0.push(unit);
    }

    /// Case-insensitive ordering against another wide string.
    pub fn cmp_ignore_case(&self, other: &WideString) -> Ordering {
        cmp_units_ignore_case(&self.0, &other.0)
    }

    pub fn eq_ignore_case(&self, other: &WideString) -> bool {
        self.cmp_ignore_case(other) == Ordering::Equal
    }

    /// Serialises the units as little-endian bytes (string-typed value data).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.0.len() * 2);
        for unit in &self.0 {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    /// Reads units back from little-endian bytes; a trailing odd byte is dropped.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let units = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        WideString(units)
    }
}

/// Folds one unit for comparison. Only the ASCII range participates in
/// case folding; all other units compare by raw value.
fn fold(unit: u16) -> u16 {
    if (b'A' as u16..=b'Z' as u16).contains(&unit) {
        unit + 32
    } else {
        unit
    }
}

/// Case-insensitive ordering over raw unit slices.
pub fn cmp_units_ignore_case(a: &[u16], b: &[u16]) -> Ordering {
    let mut ai = a.iter();
    let mut bi = b.iter();
    loop {
        match (ai.next(), bi.next()) {
            (Some(&x), Some(&y)) => {
                let ord = fold(x).cmp(&fold(y));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        WideString(s.encode_utf16().collect())
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf16_lossy(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trip() {
        let w = WideString::from("Software");
        assert_eq!(w.len(), 8);
        assert_eq!(w.to_string(), "Software");
    }

    #[test]
    fn test_cmp_ignore_case_ascii() {
        let a = WideString::from("alpha");
        let b = WideString::from("ALPHA");
        assert_eq!(a.cmp_ignore_case(&b), Ordering::Equal);
        assert!(a.eq_ignore_case(&b));
    }

    #[test]
    fn test_cmp_ignore_case_ordering() {
        let a = WideString::from("Alpha");
        let b = WideString::from("beta");
        let c = WideString::from("gamma");
        assert_eq!(a.cmp_ignore_case(&b), Ordering::Less);
        assert_eq!(c.cmp_ignore_case(&b), Ordering::Greater);
    }

    #[test]
    fn test_cmp_prefix_is_less() {
        let a = WideString::from("Soft");
        let b = WideString::from("Software");
        assert_eq!(a.cmp_ignore_case(&b), Ordering::Less);
    }

    #[test]
    fn test_non_ascii_units_compare_raw() {
        let a = WideString::from_units(vec![0x00e9]);
        let b = WideString::from_units(vec![0x00c9]);
        // No folding outside ASCII: U+00C9 < U+00E9.
        assert_eq!(b.cmp_ignore_case(&a), Ordering::Less);
    }

    #[test]
    fn test_le_bytes_round_trip() {
        let w = WideString::from_units(vec![0x0068, 0x1234, 0x0000, 0xd800]);
        let bytes = w.to_le_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(WideString::from_le_bytes(&bytes), w);
    }

    #[test]
    fn test_from_le_bytes_odd_tail_dropped() {
        let w = WideString::from_le_bytes(&[0x68, 0x00, 0x69]);
        assert_eq!(w.units(), &[0x0068]);
    }
}
