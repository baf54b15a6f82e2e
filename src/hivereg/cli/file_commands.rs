// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI File Commands
//!
//! Provides CLI command handlers for snapshot exchange:
//! - file:export writes a subtree to a snapshot file (version 2, or the
//!   legacy version 1 with --v1)
//! - file:import merges a version 2 snapshot below a root

use crate::hivereg::cli::session::{load_store, save_store, split_path, store_dir};
use crate::hivereg::dispatch::{HiveServer, MAXIMUM_ALLOWED};
use crate::hivereg::hivestream::{invalid_command, io_error, HiveResult};
use std::collections::HashMap;
use std::fs;
use std::io::BufReader;

/// Exports a subtree to a snapshot file.
///
/// ## Arguments
/// - args[0]: key path (root, or deeper)
/// - args[1]: destination file
/// - flags["v1"]: write the legacy version 1 format
///
/// ## Example Usage
/// ```bash
/// hive file:export HKLM machine.reg
/// hive file:export "HKLM\\Software" software.reg --v1
/// ```
pub fn file_export(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    if args.len() < 2 {
        return Err(invalid_command(
            "file:export",
            "Requires 2 arguments: key path, destination file",
        ));
    }
    let (hkey, sub) = split_path(&args[0])?;
    let dir = store_dir(flags);
    let version = if flags.contains_key("v1") { 1 } else { 2 };

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    server.set_registry_levels(0, 0, version)?;
    let handle = if sub.is_empty() {
        hkey
    } else {
        server.open_key(hkey, sub, MAXIMUM_ALLOWED)?
    };

    let mut content: Vec<u8> = Vec::new();
    server.save_registry(handle, &mut content)?;
    server.close_key(handle)?;
    server.close();

    fs::write(&args[1], content).map_err(|e| io_error("write", &args[1], e.to_string()))?;
    Ok(format!("✓ Exported {} to {}", args[0], args[1]))
}

/// Merges a version 2 snapshot below a root.
///
/// ## Arguments
/// - args[0]: source file
/// - args[1]: root key name or alias
///
/// ## Example Usage
/// ```bash
/// hive file:import software.reg HKLM
/// ```
pub fn file_import(args: &[String], flags: &HashMap<String, String>) -> HiveResult<String> {
    if args.len() < 2 {
        return Err(invalid_command(
            "file:import",
            "Requires 2 arguments: source file, root key",
        ));
    }
    let (hkey, sub) = split_path(&args[1])?;
    if !sub.is_empty() {
        return Err(invalid_command(
            "file:import",
            "Import target must be a root key",
        ));
    }
    let dir = store_dir(flags);

    let mut server = HiveServer::new();
    load_store(&mut server, &dir, hkey)?;
    let file =
        fs::File::open(&args[0]).map_err(|e| io_error("open", &args[0], e.to_string()))?;
    let mut reader = BufReader::new(file);
    let report = server.load_registry(hkey, &mut reader)?;
    for diagnostic in &report.diagnostics {
        eprintln!("{}: {}", args[0], diagnostic);
    }
    save_store(&mut server, &dir, hkey)?;
    server.close();

    if report.diagnostics.is_empty() {
        Ok(format!("✓ Imported {} ({} lines)", args[0], report.lines))
    } else {
        Ok(format!(
            "✓ Imported {} ({} lines, {} skipped)",
            args[0],
            report.lines,
            report.diagnostics.len()
        ))
    }
}
