// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Handle Table
//!
//! Opaque handles stand between clients and key nodes. Seven reserved
//! handle values name the predefined roots and are never allocated or
//! closed; all other handles come from this table, each carrying the
//! access mask granted when it was opened.

use crate::hivereg::hivebase::{KeyId, RootKey};
use crate::hivereg::hivestream::{access_denied, invalid_command, HiveResult};
use std::collections::HashMap;

/// An opaque registry handle.
pub type Handle = u32;

/// Reserved handle values for the predefined roots.
pub const HKEY_CLASSES_ROOT: Handle = 0x8000_0000;
pub const HKEY_CURRENT_USER: Handle = 0x8000_0001;
pub const HKEY_LOCAL_MACHINE: Handle = 0x8000_0002;
pub const HKEY_USERS: Handle = 0x8000_0003;
pub const HKEY_PERFORMANCE_DATA: Handle = 0x8000_0004;
pub const HKEY_CURRENT_CONFIG: Handle = 0x8000_0005;
pub const HKEY_DYN_DATA: Handle = 0x8000_0006;

/// Registry access rights.
pub const KEY_QUERY_VALUE: u32 = 0x0001;
pub const KEY_SET_VALUE: u32 = 0x0002;
pub const KEY_CREATE_SUB_KEY: u32 = 0x0004;
pub const KEY_ENUMERATE_SUB_KEYS: u32 = 0x0008;
pub const KEY_NOTIFY: u32 = 0x0010;
pub const KEY_CREATE_LINK: u32 = 0x0020;
pub const KEY_ALL_ACCESS: u32 = 0x000f_003f;

/// Generic request for the widest access the caller may have.
pub const MAXIMUM_ALLOWED: u32 = 0x0200_0000;

/// True for the seven reserved root handle values.
pub fn is_root_handle(handle: Handle) -> bool {
    (HKEY_CLASSES_ROOT..=HKEY_DYN_DATA).contains(&handle)
}

/// Maps a reserved handle value to its root key.
pub fn root_from_handle(handle: Handle) -> Option<RootKey> {
    match handle {
        HKEY_CLASSES_ROOT => Some(RootKey::ClassesRoot),
        HKEY_CURRENT_USER => Some(RootKey::CurrentUser),
        HKEY_LOCAL_MACHINE => Some(RootKey::LocalMachine),
        HKEY_USERS => Some(RootKey::Users),
        HKEY_PERFORMANCE_DATA => Some(RootKey::PerformanceData),
        HKEY_CURRENT_CONFIG => Some(RootKey::CurrentConfig),
        HKEY_DYN_DATA => Some(RootKey::DynData),
        _ => None,
    }
}

struct HandleEntry {
    key: KeyId,
    access: u32,
}

/// Allocator and lookup table for non-root handles.
pub struct HandleTable {
    entries: HashMap<Handle, HandleEntry>,
    next: Handle,
}

impl HandleTable {
    pub fn new() -> Self {
        HandleTable {
            entries: HashMap::new(),
            next: 1,
        }
    }

    /// Issues a handle for a key. The caller's key reference is taken over
    /// by the table and dropped again on close.
    pub fn alloc(&mut self, key: KeyId, access: u32) -> Handle {
        let handle = self.next;
        self.next += 1;
        self.entries.insert(handle, HandleEntry { key, access });
        handle
    }

    /// Resolves a handle, requiring every bit of `access` to have been
    /// granted at open time.
    pub fn get(&self, handle: Handle, access: u32) -> HiveResult<KeyId> {
        let entry = self
            .entries
            .get(&handle)
            .ok_or_else(|| invalid_command(format!("{:#x}", handle), "unknown handle"))?;
        if access & !entry.access != 0 {
            return Err(access_denied("handle lacks the required access rights"));
        }
        Ok(entry.key)
    }

    /// Closes a handle, returning the key whose reference the caller must
    /// now release.
    pub fn close(&mut self, handle: Handle) -> HiveResult<KeyId> {
        self.entries
            .remove(&handle)
            .map(|entry| entry.key)
            .ok_or_else(|| invalid_command(format!("{:#x}", handle), "unknown handle"))
    }

    /// Removes every entry, returning the keys to release; shutdown path.
    pub fn drain(&mut self) -> Vec<KeyId> {
        self.entries.drain().map(|(_, entry)| entry.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}
