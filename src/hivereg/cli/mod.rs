// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI Layer module organisation.

pub mod file_commands;
pub mod help;
pub mod key_commands;
pub mod parser;
pub mod router;
pub mod session;
pub mod value_commands;

#[cfg(test)]
mod key_commands_test;
#[cfg(test)]
mod parser_test;
#[cfg(test)]
mod value_commands_test;

pub use help::{print_command_help, print_general_help, print_version};
pub use parser::{parse_command, Command};
pub use router::{create_router, CommandHandler, Router};

use crate::hivereg::hivestream::HiveResult;

/// Main CLI entry point.
///
/// ## Input
/// - args: CLI arguments (excluding binary name)
///
/// ## Output
/// - String output to print to stdout
///
/// ## Error Conditions
/// - Parse errors
/// - Unknown commands
/// - Command execution errors
pub fn run(args: Vec<String>) -> HiveResult<String> {
    // Handle special cases first
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        return print_general_help();
    }

    if args[0] == "--version" || args[0] == "-v" {
        return print_version();
    }

    // Parse command
    let cmd = parse_command(args)?;

    // Route and execute
    let router = create_router();
    router.route(cmd)
}
