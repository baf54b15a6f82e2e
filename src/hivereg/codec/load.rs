// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Snapshot Loader
//!
//! Line-oriented loader for version 2 snapshots. The header line is
//! mandatory; after it, section lines switch the active key (created on
//! demand below the base key), value lines attach data to the active key,
//! and malformed lines are recorded as diagnostics without aborting the
//! load. Value loads raise the key's level but keep the stored
//! modification time.

use crate::hivereg::codec::escape::parse_str;
use crate::hivereg::hivebase::{KeyId, Registry, REG_BINARY, REG_DWORD, REG_SZ};
use crate::hivereg::hivestream::{current_timestamp, not_registry_file, HiveResult};
use crate::hivereg::wide::WideString;
use std::io::BufRead;

/// Expected first line of a version 2 snapshot.
const HEADER_V2: &str = "WINE REGISTRY Version 2";

/// Outcome of a snapshot load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of physical lines read.
    pub lines: usize,
    /// One entry per skipped line, with line number and reason.
    pub diagnostics: Vec<String>,
}

/// Line counter plus the diagnostics accumulated so far.
struct LoadInfo {
    line: usize,
    diagnostics: Vec<String>,
}

impl LoadInfo {
    fn error(&mut self, message: &str, line: &str) {
        self.diagnostics
            .push(format!("line {}: {} '{}'", self.line, message, line));
    }
}

/// Merges a version 2 snapshot into the subtree below `base`.
///
/// ## Output
/// - `LoadReport` with the line count and per-line diagnostics
///
/// ## Error Conditions
/// - `HiveError::NotRegistryFile` when the header line is missing or wrong
/// - `HiveError::IoError` when the source fails
pub fn load_registry<R: BufRead>(
    reg: &mut Registry,
    base: KeyId,
    input: &mut R,
) -> HiveResult<LoadReport> {
    let mut info = LoadInfo {
        line: 0,
        diagnostics: Vec::new(),
    };
    let mut buffer = String::new();

    if !read_next_line(input, &mut buffer, &mut info)? || buffer != HEADER_V2 {
        return Err(not_registry_file("first line must be the version 2 header"));
    }

    let mut subkey: Option<KeyId> = None;
    while read_next_line(input, &mut buffer, &mut info)? {
        let line = buffer.trim_start().to_string();
        match line.as_bytes().first().copied() {
            Some(b'[') => {
                if let Some(active) = subkey.take() {
                    reg.release(active);
                }
                subkey = load_key(reg, base, &line[1..], &mut info);
            }
            Some(b'@') | Some(b'"') => match subkey {
                Some(active) => {
                    load_value(reg, active, &line, input, &mut buffer, &mut info)?;
                }
                None => info.error("Value without key", &line),
            },
            Some(b'#') | Some(b';') | None => {}
            Some(_) => info.error("Unrecognized input", &line),
        }
    }

    if let Some(active) = subkey {
        reg.release(active);
    }
    Ok(LoadReport {
        lines: info.line,
        diagnostics: info.diagnostics,
    })
}

/// Reads one physical line, stripping the newline and a trailing carriage
/// return. Returns false on end of input.
fn read_next_line<R: BufRead>(
    input: &mut R,
    buffer: &mut String,
    info: &mut LoadInfo,
) -> HiveResult<bool> {
    info.line += 1;
    buffer.clear();
    if input.read_line(buffer)? == 0 {
        return Ok(false);
    }
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(true)
}

/// Parses a section line (after the opening bracket) and creates the key
/// below `base`. The first path component is the root name recorded at
/// save time; it is skipped, the base key stands in for it.
fn load_key(reg: &mut Registry, base: KeyId, buffer: &str, info: &mut LoadInfo) -> Option<KeyId> {
    let (path, consumed) = match parse_str(buffer, ']') {
        Ok(parsed) => parsed,
        Err(_) => {
            info.error("Malformed key", buffer);
            return None;
        }
    };
    let modif = buffer[consumed..]
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u64>().ok())
        .unwrap_or_else(current_timestamp);

    let units = path.units();
    let rest = units
        .iter()
        .position(|&unit| unit == b'\\' as u16)
        .map(|sep| &units[sep + 1..])
        .unwrap_or(&[]);
    match reg.create_key(
        base,
        &WideString::from_units(rest.to_vec()),
        None,
        0,
        modif,
    ) {
        Ok((id, _created)) => Some(id),
        Err(e) => {
            info.error(&e.to_string(), buffer);
            None
        }
    }
}

/// Maps a payload tag to `(value_type, parse_type, consumed)`.
///
/// `parse_type` selects the parsing branch: quoted string, dword or hex
/// bytes. `str(<decimal>):"` accepts any decimal tag; `hex(<hex>):`
/// accepts any hexadecimal tag.
fn get_data_type(buffer: &str) -> Option<(u32, u32, usize)> {
    if buffer.starts_with('"') {
        return Some((REG_SZ, REG_SZ, 1));
    }
    if buffer.starts_with("str:\"") {
        return Some((REG_SZ, REG_SZ, 5));
    }
    if let Some(rest) = buffer.strip_prefix("str(") {
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 || !rest[digits..].starts_with("):\"") {
            return None;
        }
        let tag = rest[..digits].parse::<u32>().ok()?;
        return Some((tag, REG_SZ, 4 + digits + 3));
    }
    if buffer.starts_with("dword:") {
        return Some((REG_DWORD, REG_DWORD, 6));
    }
    if let Some(rest) = buffer.strip_prefix("hex(") {
        let digits = rest.bytes().take_while(|b| b.is_ascii_hexdigit()).count();
        if digits == 0 || !rest[digits..].starts_with("):") {
            return None;
        }
        let tag = u32::from_str_radix(&rest[..digits], 16).ok()?;
        return Some((tag, REG_BINARY, 4 + digits + 2));
    }
    if buffer.starts_with("hex:") {
        return Some((REG_BINARY, REG_BINARY, 4));
    }
    None
}

/// Parses a comma-separated run of hex bytes, returning the number of
/// input bytes consumed.
fn parse_hex(dest: &mut Vec<u8>, src: &str) -> usize {
    let bytes = src.as_bytes();
    let mut p = 0;
    while p < bytes.len() {
        let hi = match (bytes[p] as char).to_digit(16) {
            Some(digit) => digit as u8,
            None => break,
        };
        p += 1;
        let value = match bytes.get(p).and_then(|&b| (b as char).to_digit(16)) {
            Some(lo) => {
                p += 1;
                hi * 16 + lo as u8
            }
            None => hi,
        };
        dest.push(value);
        if p < bytes.len() && bytes[p] == b',' {
            p += 1;
        }
    }
    p
}

/// Parses the value name prefix: `@` for the default value or a quoted,
/// escaped name. Returns the name and the offset just past the `=`.
fn parse_value_name(buffer: &str) -> Option<(WideString, usize)> {
    let (name, mut pos) = if buffer.starts_with('@') {
        (WideString::new(), 1)
    } else {
        let (name, consumed) = parse_str(buffer.get(1..)?, '"').ok()?;
        (name, consumed + 1)
    };
    if buffer.as_bytes().get(pos) != Some(&b'=') {
        return None;
    }
    pos += 1;
    Some((name, pos))
}

/// Parses one value line and attaches the value to `key`. Hex payloads may
/// continue across physical lines with a trailing backslash. The key's
/// level rises; its modification time is left as loaded.
fn load_value<R: BufRead>(
    reg: &mut Registry,
    key: KeyId,
    line: &str,
    input: &mut R,
    buffer: &mut String,
    info: &mut LoadInfo,
) -> HiveResult<()> {
    let (name, pos) = match parse_value_name(line) {
        Some(parsed) => parsed,
        None => {
            info.error("Malformed value name", line);
            return Ok(());
        }
    };
    let (value_type, parse_type, consumed) = match get_data_type(&line[pos..]) {
        Some(tag) => tag,
        None => {
            info.error("Malformed value", line);
            return Ok(());
        }
    };
    let payload = &line[pos + consumed..];

    let data: Vec<u8> = match parse_type {
        REG_SZ => match parse_str(payload, '"') {
            Ok((string, _)) => {
                let mut bytes = string.to_le_bytes();
                bytes.extend_from_slice(&[0, 0]); // implicit terminator
                bytes
            }
            Err(_) => {
                info.error("Malformed value", line);
                return Ok(());
            }
        },
        REG_DWORD => {
            let hex = payload.trim_start();
            let digits = hex.bytes().take_while(|b| b.is_ascii_hexdigit()).count();
            let dw = u32::from_str_radix(&hex[..digits], 16).unwrap_or(0);
            dw.to_le_bytes().to_vec()
        }
        _ => {
            // Hex bytes with backslash line continuation.
            let mut bytes = Vec::new();
            let mut chunk = payload.to_string();
            loop {
                let consumed = parse_hex(&mut bytes, &chunk);
                let rest = chunk[consumed..].trim_start();
                if rest.is_empty() {
                    break;
                }
                if !rest.starts_with('\\') {
                    info.error("Malformed value", line);
                    return Ok(());
                }
                if !read_next_line(input, buffer, info)? {
                    info.error("Malformed value", line);
                    return Ok(());
                }
                chunk = buffer.trim_start().to_string();
            }
            bytes
        }
    };

    let index = reg.insert_value(key, &name);
    let value = &mut reg.key_mut(key).values[index];
    value.value_type = value_type;
    value.data = data;
    // Raise the level but keep the stored modification time.
    let level = reg.current_level();
    let entry = reg.key_mut(key);
    entry.level = entry.level.max(level);
    Ok(())
}
