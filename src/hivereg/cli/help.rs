// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI help system.

use crate::hivereg::hivestream::HiveResult;

/// General help text.
pub fn print_general_help() -> HiveResult<String> {
    Ok("\
hive - hierarchical registry store

USAGE:
    hive namespace:action [args] [--flags]

KEY COMMANDS:
    key:create <path>                Create a key (--volatile, --class <s>)
    key:delete <path>                Delete a key without subkeys
    key:list <path>                  List subkeys in sort order
    key:info <path>                  Show counts, sizes and timestamps

VALUE COMMANDS:
    value:set <path> <name> <data>   Store a value (--type sz|expand|multi|dword|hex)
    value:get <path> <name>          Read a value
    value:list <path>                List values in sort order
    value:delete <path> <name>       Remove a value

FILE COMMANDS:
    file:export <path> <dest>        Write a subtree snapshot (--v1 for legacy format)
    file:import <src> <root>         Merge a snapshot below a root

Paths start with a root key: HKEY_LOCAL_MACHINE (HKLM), HKEY_CURRENT_USER
(HKCU), HKEY_CLASSES_ROOT (HKCR), HKEY_USERS (HKU) and friends. The value
name '@' addresses a key's default value.

GLOBAL FLAGS:
    --dir <path>    Store directory (default: current directory)
    --json          JSON output for read commands
    --help, -h      This help, or per-command help after a command
    --version, -v   Version information"
        .to_string())
}

/// Version line.
pub fn print_version() -> HiveResult<String> {
    Ok(format!("hive {}", env!("CARGO_PKG_VERSION")))
}

/// Per-command help.
pub fn print_command_help(namespace: &str, action: &str) -> HiveResult<String> {
    let text = match (namespace, action) {
        ("key", "create") => {
            "key:create <path>\n\nCreates the key and any missing parents.\n\nFLAGS:\n    --volatile     Keys are never written to the store\n    --class <s>    Attach a class string to the key"
        }
        ("key", "delete") => {
            "key:delete <path>\n\nDeletes a key. Fails while the key still has subkeys."
        }
        ("key", "list") => "key:list <path>\n\nLists direct subkeys in case-insensitive sort order.",
        ("key", "info") => {
            "key:info <path>\n\nShows subkey/value counts, the widest name lengths and the\nmodification timestamp."
        }
        ("value", "set") => {
            "value:set <path> <name> <data>\n\nStores a value; '@' names the default value.\n\nFLAGS:\n    --type sz|expand|multi|dword|hex   Data encoding (default sz);\n        multi splits on ';', dword takes decimal or 0x hex, hex takes\n        comma-separated bytes"
        }
        ("value", "get") => "value:get <path> <name>\n\nReads one value; '@' names the default value.",
        ("value", "list") => "value:list <path>\n\nLists values in case-insensitive sort order.",
        ("value", "delete") => "value:delete <path> <name>\n\nRemoves one value.",
        ("file", "export") => {
            "file:export <path> <dest>\n\nWrites the subtree at <path> to <dest>.\n\nFLAGS:\n    --v1    Legacy indented format (cannot be imported back)"
        }
        ("file", "import") => {
            "file:import <src> <root>\n\nMerges a version 2 snapshot below the given root key. Lines that\nfail to parse are reported and skipped."
        }
        _ => return print_general_help(),
    };
    Ok(text.to_string())
}
