// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI argument parsing.
//!
//! A command line is `hive <namespace>:<action>` followed by positional
//! arguments and `--flag` options. Flags either stand alone (boolean) or
//! swallow the following argument as their value.

use crate::hivereg::hivestream::{invalid_command, parse_error, HiveResult};
use std::collections::HashMap;

/// A fully parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The part before the colon, e.g. "value".
    pub namespace: String,
    /// The part after the colon, e.g. "set".
    pub action: String,
    /// Arguments in the order they appeared.
    pub args: Vec<String>,
    /// Flag name to value; boolean flags store "true".
    pub flags: HashMap<String, String>,
}

impl Command {
    /// Value of a flag, if one was given.
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    /// True when a boolean flag was given.
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(value) if value == "true")
    }
}

/// Flags that never take a value.
fn takes_no_value(flag: &str) -> bool {
    matches!(flag, "help" | "h" | "json" | "v1" | "volatile")
}

/// Turns raw CLI arguments (binary name excluded) into a `Command`.
///
/// The first argument must be the `namespace:action` word; everything
/// after it is either a flag or a positional argument, in any order.
///
/// ## Error Conditions
/// - No arguments, or a first word without exactly one colon
/// - Namespace or action empty, or containing unexpected characters
/// - A value flag at the end of the line, or followed by another flag
///
/// ## Example Usage
/// ```text
/// hive value:set "HKLM\Software\App" Version 7 --type dword
///   -> namespace "value", action "set",
///      args ["HKLM\Software\App", "Version", "7"], flag type=dword
/// ```
pub fn parse_command(args: Vec<String>) -> HiveResult<Command> {
    let mut words = args.into_iter();

    let spec = words
        .next()
        .ok_or_else(|| invalid_command("", "no command given"))?;
    let (namespace, action) = split_spec(&spec)?;

    let mut positional = Vec::new();
    let mut flags = HashMap::new();
    while let Some(word) = words.next() {
        if let Some(name) = word.strip_prefix("--") {
            if name.is_empty() {
                return Err(parse_error(word, "'--' alone is not a flag"));
            }
            if takes_no_value(name) {
                flags.insert(name.to_string(), "true".to_string());
                continue;
            }
            let value = words.next().ok_or_else(|| {
                invalid_command(&word, format!("flag '--{}' needs a value", name))
            })?;
            // A dash here almost always means the value was forgotten.
            if value.starts_with('-') {
                return Err(invalid_command(
                    &word,
                    format!("flag '--{}' needs a value, found '{}'", name, value),
                ));
            }
            flags.insert(name.to_string(), value);
        } else if word.len() == 2 && word.starts_with('-') {
            // Single-letter form, boolean by definition.
            flags.insert(word[1..].to_string(), "true".to_string());
        } else {
            positional.push(word);
        }
    }

    Ok(Command {
        namespace,
        action,
        args: positional,
        flags,
    })
}

/// Splits the `namespace:action` word and checks both halves.
fn split_spec(spec: &str) -> HiveResult<(String, String)> {
    let (namespace, action) = spec.split_once(':').ok_or_else(|| {
        invalid_command(
            spec,
            "commands are written 'namespace:action', e.g. 'key:list'",
        )
    })?;
    if action.contains(':') {
        return Err(invalid_command(spec, "only one colon allowed"));
    }
    for (word, role) in [(namespace, "namespace"), (action, "action")] {
        if word.is_empty() {
            return Err(invalid_command(spec, format!("empty {}", role)));
        }
        let well_formed = word
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !well_formed {
            return Err(parse_error(
                word,
                format!("{} may use letters, digits, '_' and '-' only", role),
            ));
        }
    }
    Ok((namespace.to_string(), action.to_string()))
}
