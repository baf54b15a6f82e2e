// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Predefined Root Keys
//!
//! Seven well-known roots, lazily instantiated on first use. Six are
//! nameless detached keys; `HKEY_CLASSES_ROOT` is an alias for the
//! `SOFTWARE\Classes` subkey of `HKEY_LOCAL_MACHINE`, created through the
//! normal create path so both views share one key.

use crate::hivereg::hivebase::{KeyFlags, KeyId, Registry};
use crate::hivereg::hivestream::{current_timestamp, parse_error, HiveResult};
use crate::hivereg::wide::WideString;
use serde::{Deserialize, Serialize};

/// Number of predefined root keys.
pub const NB_ROOT_KEYS: usize = 7;

/// The predefined top-level keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootKey {
    ClassesRoot,
    CurrentUser,
    LocalMachine,
    Users,
    PerformanceData,
    CurrentConfig,
    DynData,
}

impl RootKey {
    pub const ALL: [RootKey; NB_ROOT_KEYS] = [
        RootKey::ClassesRoot,
        RootKey::CurrentUser,
        RootKey::LocalMachine,
        RootKey::Users,
        RootKey::PerformanceData,
        RootKey::CurrentConfig,
        RootKey::DynData,
    ];

    /// Canonical name as used in textual key paths.
    pub fn name(self) -> &'static str {
        match self {
            RootKey::ClassesRoot => "HKEY_CLASSES_ROOT",
            RootKey::CurrentUser => "HKEY_CURRENT_USER",
            RootKey::LocalMachine => "HKEY_LOCAL_MACHINE",
            RootKey::Users => "HKEY_USERS",
            RootKey::PerformanceData => "HKEY_PERFORMANCE_DATA",
            RootKey::CurrentConfig => "HKEY_CURRENT_CONFIG",
            RootKey::DynData => "HKEY_DYN_DATA",
        }
    }

    /// Position in the registry's root table.
    pub fn index(self) -> usize {
        match self {
            RootKey::ClassesRoot => 0,
            RootKey::CurrentUser => 1,
            RootKey::LocalMachine => 2,
            RootKey::Users => 3,
            RootKey::PerformanceData => 4,
            RootKey::CurrentConfig => 5,
            RootKey::DynData => 6,
        }
    }

    /// Resolves a canonical root name.
    pub fn from_name(name: &str) -> Option<RootKey> {
        RootKey::ALL.iter().copied().find(|root| root.name() == name)
    }
}

impl Registry {
    /// Returns a root key, instantiating it on first use. The caller
    /// receives one reference; the root table keeps its own.
    pub fn root_key(&mut self, root: RootKey) -> HiveResult<KeyId> {
        if let Some(id) = self.roots[root.index()] {
            self.grab(id);
            return Ok(id);
        }
        let id = match root {
            RootKey::ClassesRoot => {
                let machine = self.root_key(RootKey::LocalMachine)?;
                let result = self.create_key(
                    machine,
                    &WideString::from("SOFTWARE\\Classes"),
                    None,
                    0,
                    current_timestamp(),
                );
                self.release(machine);
                // The reference returned by create becomes the table's.
                result?.0
            }
            _ => self.alloc_key(None, current_timestamp()),
        };
        self.key_mut(id).flags |= KeyFlags::ROOT;
        self.roots[root.index()] = Some(id);
        self.grab(id);
        Ok(id)
    }

    /// Updates the saving configuration.
    ///
    /// ## Input
    /// - `current`: level stamped into keys on creation and modification
    /// - `saving`: minimum level a key needs in order to get saved
    /// - `version`: snapshot format version, 1 (legacy) or 2
    pub fn set_levels(&mut self, current: u32, saving: u32, version: u32) -> HiveResult<()> {
        if version != 1 && version != 2 {
            return Err(parse_error(
                version.to_string(),
                "snapshot format version must be 1 or 2",
            ));
        }
        self.current_level = current;
        self.saving_level = saving;
        self.saving_version = version;
        Ok(())
    }

    /// Releases all instantiated roots; the shutdown hook.
    pub fn close(&mut self) {
        for index in 0..NB_ROOT_KEYS {
            if let Some(id) = self.roots[index].take() {
                self.release(id);
            }
        }
    }
}
