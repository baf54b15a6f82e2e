// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Snapshot String Escaping
//!
//! Strings in the snapshot format are escaped per 16-bit code unit: units
//! above 127 become `\x` hex escapes, control codes become C escapes or
//! octal, and the backslash plus the caller's two delimiter characters are
//! backslash-prefixed. Reading reverses all of it up to a terminator.

use crate::hivereg::hivestream::{parse_error, HiveResult};
use crate::hivereg::wide::WideString;
use std::fmt::Write;

/// C escape letters for control codes 0..32; '.' marks octal fallback.
const CTRL_ESCAPES: &[u8; 32] = b".......abtnvfr.............e....";

fn hex_digit(byte: u8) -> Option<u16> {
    (byte as char).to_digit(16).map(|d| d as u16)
}

/// Escapes `units` for the snapshot format.
///
/// ## Input
/// - `units`: raw code units; a trailing zero unit is dropped (strings are
///   implicitly terminated again on read)
/// - `delims`: the two delimiter characters that must be escaped in this
///   context, e.g. `['[', ']']` for key paths, `['"', '"']` for quoted
///   strings
///
/// ## Output
/// - ASCII string ready to embed between the delimiters
pub fn dump_str(units: &[u16], delims: [char; 2]) -> String {
    let d1 = delims[0] as u16;
    let d2 = delims[1] as u16;
    let mut out = String::with_capacity(units.len());
    for (i, &unit) in units.iter().enumerate() {
        let next = units.get(i + 1).copied();
        if unit > 127 {
            // Pad to four digits when a hex digit follows.
            let glued = next.map_or(false, |n| n < 128 && (n as u8 as char).is_ascii_hexdigit());
            if glued {
                let _ = write!(out, "\\x{:04x}", unit);
            } else {
                let _ = write!(out, "\\x{:x}", unit);
            }
            continue;
        }
        if unit < 32 {
            if unit == 0 && i + 1 == units.len() {
                continue;
            }
            let escape = CTRL_ESCAPES[unit as usize];
            if escape != b'.' {
                out.push('\\');
                out.push(escape as char);
            } else if next.map_or(false, |n| (0x30..=0x37).contains(&n)) {
                let _ = write!(out, "\\{:03o}", unit);
            } else {
                let _ = write!(out, "\\{:o}", unit);
            }
            continue;
        }
        if unit == b'\\' as u16 || unit == d1 || unit == d2 {
            out.push('\\');
        }
        out.push(unit as u8 as char);
    }
    out
}

/// Parses an escaped string up to the `endchar` terminator.
///
/// ## Output
/// - `(units, consumed)`: the decoded units and the number of input bytes
///   consumed, terminator included
///
/// ## Error Conditions
/// - `HiveError::ParseError` when the input ends before the terminator
pub fn parse_str(src: &str, endchar: char) -> HiveResult<(WideString, usize)> {
    let bytes = src.as_bytes();
    let end = endchar as u8;
    let mut units: Vec<u16> = Vec::new();
    let mut p = 0;
    while p < bytes.len() && bytes[p] != end {
        if bytes[p] != b'\\' {
            units.push(bytes[p] as u16);
            p += 1;
            continue;
        }
        p += 1;
        let escaped = match bytes.get(p) {
            Some(&b) => b,
            None => break, // trailing backslash: terminator is missing anyway
        };
        match escaped {
            b'a' => {
                units.push(0x07);
                p += 1;
            }
            b'b' => {
                units.push(0x08);
                p += 1;
            }
            b'e' => {
                units.push(0x1b);
                p += 1;
            }
            b'f' => {
                units.push(0x0c);
                p += 1;
            }
            b'n' => {
                units.push(0x0a);
                p += 1;
            }
            b'r' => {
                units.push(0x0d);
                p += 1;
            }
            b't' => {
                units.push(0x09);
                p += 1;
            }
            b'v' => {
                units.push(0x0b);
                p += 1;
            }
            b'x' => {
                p += 1;
                match bytes.get(p).and_then(|&b| hex_digit(b)) {
                    None => units.push(b'x' as u16),
                    Some(first) => {
                        let mut unit = first;
                        p += 1;
                        for _ in 0..3 {
                            match bytes.get(p).and_then(|&b| hex_digit(b)) {
                                Some(digit) => {
                                    unit = unit.wrapping_mul(16).wrapping_add(digit);
                                    p += 1;
                                }
                                None => break,
                            }
                        }
                        units.push(unit);
                    }
                }
            }
            b'0'..=b'7' => {
                let mut unit = (escaped - b'0') as u16;
                p += 1;
                for _ in 0..2 {
                    match bytes.get(p) {
                        Some(&b) if (b'0'..=b'7').contains(&b) => {
                            unit = unit * 8 + (b - b'0') as u16;
                            p += 1;
                        }
                        _ => break,
                    }
                }
                units.push(unit);
            }
            other => {
                units.push(other as u16);
                p += 1;
            }
        }
    }
    if p >= bytes.len() {
        return Err(parse_error(src, "unterminated string"));
    }
    Ok((WideString::from_units(units), p + 1))
}
