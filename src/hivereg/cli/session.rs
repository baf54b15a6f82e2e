// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI Store Session
//!
//! Every CLI invocation works against per-root snapshot files in the store
//! directory (`hklm.reg`, `hkcu.reg`, ...): load the root's snapshot into
//! a fresh server, run the command, and write the snapshot back atomically
//! for mutating commands.

use crate::hivereg::dispatch::{
    Handle, HiveServer, HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_DYN_DATA,
    HKEY_LOCAL_MACHINE, HKEY_PERFORMANCE_DATA, HKEY_USERS,
};
use crate::hivereg::hivestream::{invalid_command, io_error, HiveResult};
use std::collections::HashMap;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Splits a CLI key path into its root handle and the remaining subpath.
///
/// The first component accepts canonical root names and the usual short
/// aliases, case-insensitively.
///
/// ## Example Usage
/// ```text
/// "HKLM\Software\App" -> (HKEY_LOCAL_MACHINE, "Software\App")
/// ```
pub fn split_path(path: &str) -> HiveResult<(Handle, &str)> {
    let (first, rest) = match path.find('\\') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => (path, ""),
    };
    let hkey = parse_root(first).ok_or_else(|| {
        invalid_command(
            path,
            format!("'{}' is not a root key name or alias", first),
        )
    })?;
    Ok((hkey, rest))
}

/// Resolves a root name or alias to its reserved handle value.
pub fn parse_root(name: &str) -> Option<Handle> {
    match name.to_ascii_uppercase().as_str() {
        "HKEY_CLASSES_ROOT" | "HKCR" => Some(HKEY_CLASSES_ROOT),
        "HKEY_CURRENT_USER" | "HKCU" => Some(HKEY_CURRENT_USER),
        "HKEY_LOCAL_MACHINE" | "HKLM" => Some(HKEY_LOCAL_MACHINE),
        "HKEY_USERS" | "HKU" => Some(HKEY_USERS),
        "HKEY_PERFORMANCE_DATA" | "HKPD" => Some(HKEY_PERFORMANCE_DATA),
        "HKEY_CURRENT_CONFIG" | "HKCC" => Some(HKEY_CURRENT_CONFIG),
        "HKEY_DYN_DATA" | "HKDD" => Some(HKEY_DYN_DATA),
        _ => None,
    }
}

/// Root whose snapshot file actually backs a handle. The classes root is
/// an alias into the machine tree, so its data lives in the machine store;
/// a separate file would double-nest the alias path on reload.
fn store_root(hkey: Handle) -> Handle {
    if hkey == HKEY_CLASSES_ROOT {
        HKEY_LOCAL_MACHINE
    } else {
        hkey
    }
}

/// Snapshot file name for a root handle.
fn store_file(hkey: Handle) -> &'static str {
    match hkey {
        HKEY_CURRENT_USER => "hkcu.reg",
        HKEY_USERS => "hku.reg",
        HKEY_PERFORMANCE_DATA => "hkpd.reg",
        HKEY_CURRENT_CONFIG => "hkcc.reg",
        HKEY_DYN_DATA => "hkdd.reg",
        _ => "hklm.reg",
    }
}

/// Store directory from the `--dir` flag, defaulting to the working
/// directory.
pub fn store_dir(flags: &HashMap<String, String>) -> PathBuf {
    PathBuf::from(flags.get("dir").map(String::as_str).unwrap_or("."))
}

/// Path of the snapshot file backing one root.
pub fn store_path(dir: &Path, hkey: Handle) -> PathBuf {
    dir.join(store_file(store_root(hkey)))
}

/// Loads the root's snapshot into the server, if one exists. Per-line
/// diagnostics go to stderr; a missing file is simply an empty store.
pub fn load_store(server: &mut HiveServer, dir: &Path, hkey: Handle) -> HiveResult<()> {
    let path = store_path(dir, hkey);
    if !path.exists() {
        return Ok(());
    }
    let file = fs::File::open(&path)
        .map_err(|e| io_error("open", path.to_string_lossy(), e.to_string()))?;
    let mut reader = BufReader::new(file);
    let report = server.load_registry(store_root(hkey), &mut reader)?;
    for diagnostic in &report.diagnostics {
        eprintln!("{}: {}", path.display(), diagnostic);
    }
    Ok(())
}

/// Writes the root's snapshot back in version 2, via temp file + rename so
/// a failed write never truncates the store.
pub fn save_store(server: &mut HiveServer, dir: &Path, hkey: Handle) -> HiveResult<()> {
    let path = store_path(dir, hkey);
    server.set_registry_levels(0, 0, 2)?;

    let mut content: Vec<u8> = Vec::new();
    server.save_registry(store_root(hkey), &mut content)?;

    let temp_path = path.with_extension("reg.tmp");
    fs::write(&temp_path, content)
        .map_err(|e| io_error("write", temp_path.to_string_lossy(), e.to_string()))?;
    fs::rename(&temp_path, &path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("rename", path.to_string_lossy(), e.to_string())
    })?;
    Ok(())
}
