// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI Value Commands
//!
//! Provides CLI command handlers for value operations:
//! - value:set, value:get, value:list, value:delete
//!
//! The value name "@" addresses the key's default value. String data is
//! stored as little-endian 16-bit units with an implicit terminator, the
//! way registry clients expect it.

use crate::hivereg::cli::session::{load_store, save_store, split_path, store_dir};
use crate::hivereg::dispatch::{HiveServer, ValueReply, MAXIMUM_ALLOWED};
use crate::hivereg::hivebase::{
    REG_BINARY, REG_DWORD, REG_EXPAND_SZ, REG_MULTI_SZ, REG_SZ,
};
use crate::hivereg::hivestream::{invalid_command, parse_error, HiveError, HiveResult};
use crate::hivereg::wide::WideString;
use std::collections::HashMap;
use std::fmt::Write;

/// Maps the CLI value name argument; "@" is the default value.
fn value_name(arg: &str) -> &str {
    if arg == "@" {
        ""
    } else {
        arg
    }
}

/// Encodes CLI data according to the `--type` flag (default `sz`).
fn encode_value(type_flag: &str, data: &str) -> HiveResult<(u32, Vec<u8>)> {
    match type_flag {
        "sz" | "expand" => {
            let mut bytes = WideString::from(data).to_le_bytes();
            bytes.extend_from_slice(&[0, 0]);
            let tag = if type_flag == "sz" { REG_SZ } else { REG_EXPAND_SZ };
            Ok((tag, bytes))
        }
        "multi" => {
            // Semicolon-separated strings, each terminated, plus the final
            // empty terminator.
            let mut bytes = Vec::new();
            for part in data.split(';') {
                bytes.extend_from_slice(&WideString::from(part).to_le_bytes());
                bytes.extend_from_slice(&[0, 0]);
            }
            bytes.extend_from_slice(&[0, 0]);
            Ok((REG_MULTI_SZ, bytes))
        }
        "dword" => {
            let value = if let Some(hex) = data.strip_prefix("0x") {
                u32::from_str_radix(hex, 16)
            } else {
                data.parse::<u32>()
            }
            .map_err(|_| parse_error(data, "expected a decimal or 0x-prefixed dword"))?;
            Ok((REG_DWORD, value.to_le_bytes().to_vec()))
        }
        "hex" => {
            let mut bytes = Vec::new();
            for part in data.split(|c: char| c == ',' || c.is_whitespace()) {
                if part.is_empty() {
                    continue;
                }
                let byte = u8::from_str_radix(part, 16)
                    .map_err(|_| parse_error(data, "expected comma-separated hex bytes"))?;
                bytes.push(byte);
            }
            Ok((REG_BINARY, bytes))
        }
        other => Err(parse_error(
            other,
            "expected one of: sz, expand, multi, dword, hex",
        )),
    }
}

/// Renders value data for terminal output.
fn render_data(value: &ValueReply) -> String {
    match value.value_type {
        REG_SZ | REG_EXPAND_SZ => {
            let wide = WideString::from_le_bytes(&value.data);
            let units = wide.units();
            let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
            format!("\"{}\"", WideString::from_units(units[..end].to_vec()))
        }
        REG_MULTI_SZ => {
            let wide = WideString::from_le_bytes(&value.data);
            let parts: Vec<String> = wide
                .units()
                .split(|&u| u == 0)
                .filter(|part| !part.is_empty())
                .map(|part| WideString::from_units(part.to_vec()).to_string())
                .collect();
            format!("\"{}\"", parts.join(";"))
        }
        REG_DWORD if value.data.len() == 4 => {
            let dw = u32::from_le_bytes([
                value.data[0],
                value.data[1],
                value.data[2],
                value.data[3],
            ]);
            format!("{:#010x} ({})", dw, dw)
        }
        _ => value
            .data
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Human-readable type tag.
fn type_name(value_type: u32) -> String {
    match value_type {
        REG_SZ => "sz".to_string(),
        REG_EXPAND_SZ => "expand".to_string(),
        REG_BINARY => "hex".to_string(),
        REG_DWORD => "dword".to_string(),
        REG_MULTI_SZ => "multi".to_string(),
        other => format!("type({})", other),
    }
}

/// Sets a value via CLI.
///
/// ## Arguments
/// - args[0]: key path
/// - args[1]: value name ("@" for the default value)
/// - args[2]: data
/// - flags["type"]: sz (default), expand, multi, dword or hex
///
/// ## Example Usage
/// ```bash
/// hive value:set "HKLM\\Software\\App" Version 0x10000 --type dword
/// ```
pub fn value_set(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    if args.len() < 3 {
        return Err(invalid_command(
            "value:set",
            "Requires 3 arguments: key path, value name, data",
        ));
    }
    let (hkey, sub) = split_path(&args[0])?;
    let name = value_name(&args[1]);
    let type_flag = flags.get("type").map(String::as_str).unwrap_or("sz");
    let (value_type, data) = encode_value(type_flag, &args[2])?;
    let dir = store_dir(flags);

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    let handle = if sub.is_empty() {
        hkey
    } else {
        server.open_key(hkey, sub, MAXIMUM_ALLOWED)?
    };
    server.set_key_value(handle, name, value_type, &data)?;
    server.close_key(handle)?;
    save_store(&mut server, &dir, hkey)?;
    server.close();

    Ok(format!("✓ Value set: {}\\{} = {}", args[0], args[1], args[2]))
}

/// Reads a value via CLI.
///
/// ## Arguments
/// - args[0]: key path
/// - args[1]: value name ("@" for the default value)
/// - flags["json"]: JSON output
pub fn value_get(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    if args.len() < 2 {
        return Err(invalid_command(
            "value:get",
            "Requires 2 arguments: key path, value name",
        ));
    }
    let (hkey, sub) = split_path(&args[0])?;
    let dir = store_dir(flags);

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    let handle = if sub.is_empty() {
        hkey
    } else {
        server.open_key(hkey, sub, MAXIMUM_ALLOWED)?
    };
    let value = server.get_key_value(handle, value_name(&args[1]))?;
    server.close_key(handle)?;
    server.close();

    if flags.contains_key("json") {
        return serde_json::to_string_pretty(&value)
            .map_err(|e| parse_error("json", e.to_string()));
    }
    Ok(format!(
        "{} ({}, {} bytes): {}",
        args[1],
        type_name(value.value_type),
        value.len,
        render_data(&value)
    ))
}

/// Lists all values of a key in sort order.
///
/// ## Arguments
/// - args[0]: key path
/// - flags["json"]: JSON output
pub fn value_list(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    let path = args.first().ok_or_else(|| {
        invalid_command("value:list", "Requires 1 argument: key path")
    })?;
    let (hkey, sub) = split_path(path)?;
    let dir = store_dir(flags);

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    let handle = if sub.is_empty() {
        hkey
    } else {
        server.open_key(hkey, sub, MAXIMUM_ALLOWED)?
    };

    let mut values: Vec<ValueReply> = Vec::new();
    let mut index = 0;
    loop {
        match server.enum_key_value(handle, index) {
            Ok(value) => {
                values.push(value);
                index += 1;
            }
            Err(HiveError::NoMoreItems) => break,
            Err(e) => return Err(e),
        }
    }
    server.close_key(handle)?;
    server.close();

    if flags.contains_key("json") {
        return serde_json::to_string_pretty(&values)
            .map_err(|e| parse_error("json", e.to_string()));
    }
    let mut output = format!("{} ({} values)", path, values.len());
    for value in &values {
        let shown = if value.name.is_empty() { "@" } else { &value.name };
        let _ = write!(
            output,
            "\n  {} ({}) = {}",
            shown,
            type_name(value.value_type),
            render_data(value)
        );
    }
    Ok(output)
}

/// Deletes a value via CLI.
///
/// ## Arguments
/// - args[0]: key path
/// - args[1]: value name ("@" for the default value)
pub fn value_delete(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    if args.len() < 2 {
        return Err(invalid_command(
            "value:delete",
            "Requires 2 arguments: key path, value name",
        ));
    }
    let (hkey, sub) = split_path(&args[0])?;
    let dir = store_dir(flags);

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    let handle = if sub.is_empty() {
        hkey
    } else {
        server.open_key(hkey, sub, MAXIMUM_ALLOWED)?
    };
    server.delete_key_value(handle, value_name(&args[1]))?;
    server.close_key(handle)?;
    save_store(&mut server, &dir, hkey)?;
    server.close();

    Ok(format!("✓ Value deleted: {}\\{}", args[0], args[1]))
}
