// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! CLI command router.
//!
//! Routes parsed commands to appropriate handler functions.

use crate::hivereg::cli::parser::Command;
use crate::hivereg::hivestream::{HiveError, HiveResult};
use std::collections::HashMap;

/// Command handler function type.
pub type CommandHandler = fn(&[String], &HashMap<String, String>) -> HiveResult<String>;

/// Command router with registered handlers.
pub struct Router {
    handlers: HashMap<(String, String), CommandHandler>,
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a command handler.
    pub fn register(&mut self, namespace: &str, action: &str, handler: CommandHandler) {
        self.handlers
            .insert((namespace.to_string(), action.to_string()), handler);
    }

    /// Routes command to appropriate handler.
    ///
    /// ## Error Conditions
    /// - Unknown command (no handler registered)
    /// - Handler execution errors
    pub fn route(&self, cmd: Command) -> HiveResult<String> {
        // Intercept --help before routing
        if cmd.is_set("help") || cmd.is_set("h") {
            return super::help::print_command_help(&cmd.namespace, &cmd.action);
        }

        let key = (cmd.namespace.clone(), cmd.action.clone());
        let handler = self
            .handlers
            .get(&key)
            .ok_or_else(|| HiveError::InvalidCommand {
                command: format!("{}:{}", cmd.namespace, cmd.action),
                reason: format!(
                    "Unknown command '{}:{}'. Use 'hive --help' for available commands.",
                    cmd.namespace, cmd.action
                ),
            })?;

        handler(&cmd.args, &cmd.flags)
    }

    /// Lists all registered commands.
    pub fn list_commands(&self) -> Vec<(String, String)> {
        self.handlers.keys().cloned().collect()
    }

    /// Checks if a command is registered.
    pub fn has_command(&self, namespace: &str, action: &str) -> bool {
        self.handlers
            .contains_key(&(namespace.to_string(), action.to_string()))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates router with all command handlers registered.
pub fn create_router() -> Router {
    let mut router = Router::new();

    use super::{file_commands, key_commands, value_commands};

    router.register("key", "create", key_commands::key_create);
    router.register("key", "delete", key_commands::key_delete);
    router.register("key", "list", key_commands::key_list);
    router.register("key", "info", key_commands::key_info);

    router.register("value", "set", value_commands::value_set);
    router.register("value", "get", value_commands::value_get);
    router.register("value", "list", value_commands::value_list);
    router.register("value", "delete", value_commands::value_delete);

    router.register("file", "export", file_commands::file_export);
    router.register("file", "import", file_commands::file_import);

    router
}
