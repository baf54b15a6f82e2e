// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI Key Commands
//!
//! Provides CLI command handlers for key operations:
//! - key:create, key:delete, key:list, key:info

use crate::hivereg::cli::session::{load_store, save_store, split_path, store_dir};
use crate::hivereg::dispatch::{HiveServer, SubkeyReply, MAXIMUM_ALLOWED};
use crate::hivereg::hivebase::REG_OPTION_VOLATILE;
use crate::hivereg::hivestream::{
    current_timestamp, invalid_command, parse_error, HiveError, HiveResult,
};
use std::collections::HashMap;
use std::fmt::Write;

/// Creates a key via CLI.
///
/// ## Arguments
/// - args[0]: key path (e.g., "HKLM\\Software\\App")
/// - flags["volatile"]: create volatile keys
/// - flags["class"]: class string for the terminal key
/// - flags["dir"]: store directory
///
/// ## Example Usage
/// ```bash
/// hive key:create "HKLM\\Software\\App" --class Config
/// ```
pub fn key_create(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    let path = args.first().ok_or_else(|| {
        invalid_command("key:create", "Requires 1 argument: key path")
    })?;
    let (hkey, sub) = split_path(path)?;
    let dir = store_dir(flags);
    let volatile = flags.contains_key("volatile");

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    let created = server.create_key(
        hkey,
        sub,
        flags.get("class").map(String::as_str),
        if volatile { REG_OPTION_VOLATILE } else { 0 },
        current_timestamp(),
        MAXIMUM_ALLOWED,
    )?;
    save_store(&mut server, &dir, hkey)?;
    server.close();

    if created.created {
        Ok(format!("✓ Key created: {}", path))
    } else {
        Ok(format!("✓ Key already exists: {}", path))
    }
}

/// Deletes a key via CLI.
///
/// ## Arguments
/// - args[0]: key path; the key must have no subkeys
pub fn key_delete(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    let path = args.first().ok_or_else(|| {
        invalid_command("key:delete", "Requires 1 argument: key path")
    })?;
    let (hkey, sub) = split_path(path)?;
    let dir = store_dir(flags);

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    server.delete_key(hkey, sub)?;
    save_store(&mut server, &dir, hkey)?;
    server.close();

    Ok(format!("✓ Key deleted: {}", path))
}

/// Lists the subkeys of a key in sort order.
///
/// ## Arguments
/// - args[0]: key path
/// - flags["json"]: JSON output
pub fn key_list(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    let path = args.first().ok_or_else(|| {
        invalid_command("key:list", "Requires 1 argument: key path")
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

    let mut subkeys: Vec<SubkeyReply> = Vec::new();
    let mut index = 0;
    loop {
        match server.enum_key(handle, index) {
            Ok(info) => {
                subkeys.push(info);
                index += 1;
            }
            Err(HiveError::NoMoreItems) => break,
            Err(e) => return Err(e),
        }
    }
    server.close_key(handle)?;
    server.close();

    if flags.contains_key("json") {
        return serde_json::to_string_pretty(&subkeys)
            .map_err(|e| parse_error("json", e.to_string()));
    }
    let mut output = format!("{} ({} subkeys)", path, subkeys.len());
    for subkey in &subkeys {
        let _ = write!(output, "\n  {}", subkey.name);
        if let Some(class) = &subkey.class {
            let _ = write!(output, " [{}]", class);
        }
    }
    Ok(output)
}

/// Prints aggregate information about a key.
///
/// ## Arguments
/// - args[0]: key path
/// - flags["json"]: JSON output
pub fn key_info(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    let path = args.first().ok_or_else(|| {
        invalid_command("key:info", "Requires 1 argument: key path")
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
    let info = server.query_key_info(handle)?;
    server.close_key(handle)?;
    server.close();

    if flags.contains_key("json") {
        return serde_json::to_string_pretty(&info)
            .map_err(|e| parse_error("json", e.to_string()));
    }
    let modified = chrono::DateTime::from_timestamp(info.modif as i64, 0)
        .map(|when| when.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| info.modif.to_string());
    let mut output = format!(
        "{}\n  Subkeys: {} (longest name {})\n  Values: {} (longest name {}, largest data {} bytes)\n  Modified: {}",
        path, info.subkeys, info.max_subkey, info.values, info.max_value, info.max_data, modified
    );
    if let Some(class) = &info.class {
        let _ = write!(output, "\n  Class: {}", class);
    }
    Ok(output)
}
