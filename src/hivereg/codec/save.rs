// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Snapshot Saver
//!
//! Writes a registry subtree to a text snapshot in pre-order. Version 2 is
//! the current format: one `[escaped\\path] modif` section per eligible
//! key followed by its values. Version 1 is the legacy indented format,
//! kept for export only. A key is eligible when its level meets the
//! saving level and it is not volatile.

use crate::hivereg::codec::escape::dump_str;
use crate::hivereg::hivebase::{
    KeyFlags, KeyId, KeyValue, Registry, RootKey, REG_BINARY, REG_DWORD, REG_EXPAND_SZ,
    REG_MULTI_SZ, REG_SZ,
};
use crate::hivereg::hivestream::{HiveError, HiveResult};
use crate::hivereg::wide::WideString;
use std::fmt::Write as _;
use std::io::Write;

/// Column after which hex byte runs wrap with a `\` continuation.
const HEX_WRAP_COLUMN: usize = 76;

/// Writes the subtree rooted at `key` to `out` in the configured format
/// version, header line included.
///
/// ## Error Conditions
/// - `HiveError::KeyDeleted` when `key` has been detached
/// - `HiveError::IoError` when the sink fails
pub fn save_registry<W: Write>(reg: &mut Registry, key: KeyId, out: &mut W) -> HiveResult<()> {
    if reg.key(key).flags.contains(KeyFlags::DELETED) {
        return Err(HiveError::KeyDeleted);
    }
    writeln!(out, "WINE REGISTRY Version {}", reg.saving_version())?;
    if reg.saving_version() == 2 {
        save_subkeys(reg, key, out)?;
    } else {
        update_level(reg, key);
        save_subkeys_v1(reg, key, 0, out)?;
    }
    Ok(())
}

/// Pre-order v2 traversal. A key with subkeys but no values is emitted
/// only implicitly, through its descendants' section paths.
fn save_subkeys<W: Write>(reg: &Registry, id: KeyId, out: &mut W) -> HiveResult<()> {
    let key = reg.key(id);
    if key.flags.contains(KeyFlags::VOLATILE) {
        return Ok(());
    }
    if key.level >= reg.saving_level() && (!key.values.is_empty() || key.subkeys.is_empty()) {
        let mut line = String::from("\n[");
        write_path(reg, id, &mut line);
        let _ = write!(line, "] {}", key.modif);
        line.push('\n');
        out.write_all(line.as_bytes())?;
        for value in &key.values {
            write_value(value, out)?;
        }
    }
    for &sub in &key.subkeys {
        save_subkeys(reg, sub, out)?;
    }
    Ok(())
}

/// Appends the full path of a key: root name first, then each component
/// escaped and prefixed with a double backslash.
fn write_path(reg: &Registry, id: KeyId, line: &mut String) {
    let key = reg.key(id);
    if let Some(parent) = key.parent {
        write_path(reg, parent, line);
    } else if key.name.is_some() {
        // Named key with no parent: a detached subtree.
        line.push_str("?????");
    }
    match &key.name {
        Some(name) => {
            line.push_str("\\\\");
            line.push_str(&dump_str(name.units(), ['[', ']']));
        }
        None => {
            for root in RootKey::ALL {
                if reg.roots[root.index()] == Some(id) {
                    line.push_str(root.name());
                }
            }
        }
    }
}

/// Writes one value line: quoted strings for the string types, `dword:`
/// for four-byte DWORDs, wrapped hex bytes for everything else.
fn write_value<W: Write>(value: &KeyValue, out: &mut W) -> HiveResult<()> {
    let mut line = String::new();
    if !value.name.is_empty() {
        line.push('"');
        line.push_str(&dump_str(value.name.units(), ['"', '"']));
        line.push_str("\"=");
    } else {
        line.push_str("@=");
    }
    match value.value_type {
        REG_SZ | REG_EXPAND_SZ | REG_MULTI_SZ => {
            if value.value_type != REG_SZ {
                let _ = write!(line, "str({}):", value.value_type);
            }
            let units = WideString::from_le_bytes(&value.data);
            line.push('"');
            line.push_str(&dump_str(units.units(), ['"', '"']));
            line.push('"');
        }
        REG_DWORD if value.data.len() == 4 => {
            let dw = u32::from_le_bytes([
                value.data[0],
                value.data[1],
                value.data[2],
                value.data[3],
            ]);
            let _ = write!(line, "dword:{:08x}", dw);
        }
        _ => {
            if value.value_type == REG_BINARY {
                line.push_str("hex:");
            } else {
                let _ = write!(line, "hex({:x}):", value.value_type);
            }
            let mut count = line.len();
            for (i, byte) in value.data.iter().enumerate() {
                let _ = write!(line, "{:02x}", byte);
                count += 2;
                if i + 1 < value.data.len() {
                    line.push(',');
                    count += 1;
                    if count > HEX_WRAP_COLUMN {
                        line.push_str("\\\n  ");
                        count = 2;
                    }
                }
            }
        }
    }
    line.push('\n');
    out.write_all(line.as_bytes())?;
    Ok(())
}

/// Propagates each key's level up from its subtree; the v1 filter skips a
/// key before visiting its children, so parents must carry the maximum.
fn update_level(reg: &mut Registry, id: KeyId) -> u32 {
    let mut max = reg.key(id).level;
    let subkeys = reg.key(id).subkeys.clone();
    for sub in subkeys {
        max = max.max(update_level(reg, sub));
    }
    reg.key_mut(id).level = max;
    max
}

/// Escapes a v1 string: `\uNNNN` for non-ASCII, newline and the equals
/// sign; doubled backslash; everything else literal. Stops at a zero unit.
fn save_string_v1(units: &[u16], line: &mut String) {
    for &unit in units {
        if unit == 0 {
            break;
        }
        if unit > 0x7f || unit == b'\n' as u16 || unit == b'=' as u16 {
            let _ = write!(line, "\\u{:04x}", unit);
        } else {
            if unit == b'\\' as u16 {
                line.push('\\');
            }
            line.push(unit as u8 as char);
        }
    }
}

/// Legacy v1 traversal: one `name=type,0,payload` line per value, one
/// `name` line per child, children indented one tab deeper.
fn save_subkeys_v1<W: Write>(
    reg: &Registry,
    id: KeyId,
    nesting: usize,
    out: &mut W,
) -> HiveResult<()> {
    let key = reg.key(id);
    if key.flags.contains(KeyFlags::VOLATILE) || key.level < reg.saving_level() {
        return Ok(());
    }
    for value in &key.values {
        let mut line = "\t".repeat(nesting);
        save_string_v1(value.name.units(), &mut line);
        let _ = write!(line, "={},{},", value.value_type, 0);
        if value.value_type == REG_SZ || value.value_type == REG_EXPAND_SZ {
            let units = WideString::from_le_bytes(&value.data);
            save_string_v1(units.units(), &mut line);
        } else {
            for byte in &value.data {
                let _ = write!(line, "{:02x}", byte);
            }
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    for &sub in &key.subkeys {
        let mut line = "\t".repeat(nesting);
        save_string_v1(reg.key(sub).name_units(), &mut line);
        line.push('\n');
        out.write_all(line.as_bytes())?;
        save_subkeys_v1(reg, sub, nesting + 1, out)?;
    }
    Ok(())
}
