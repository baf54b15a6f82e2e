// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! HiveBase - In-Memory Registry Tree
//!
//! The registry is a tree of named keys, each carrying an ordered set of
//! typed values. All mutable module state lives in one `Registry` value:
//! the key arena, the seven lazily created root keys, and the saving-level
//! configuration. Keys are reference counted; the parent's child array
//! holds one reference and every open handle holds another.

mod capacity;
mod key;
mod path;
mod roots;
mod value;

pub use key::{KeyInfo, SubkeyInfo};
pub use path::{MAX_COMPONENT_LEN, REG_OPTION_VOLATILE};
pub use roots::{RootKey, NB_ROOT_KEYS};
pub use value::{
    KeyValue, MAX_VALUE_DATA, REG_BINARY, REG_DWORD, REG_DWORD_BIG_ENDIAN, REG_EXPAND_SZ,
    REG_LINK, REG_MULTI_SZ, REG_NONE, REG_SZ,
};

#[cfg(test)]
mod roots_test;

use crate::hivereg::wide::WideString;
use bitflags::bitflags;

bitflags! {
    /// Key state flags.
    pub struct KeyFlags: u16 {
        /// Never persisted; may not have non-volatile descendants.
        const VOLATILE = 0x0001;
        /// Detached from the tree; reachable only through open handles.
        const DELETED = 0x0002;
        /// Predefined top-level key; cannot be deleted.
        const ROOT = 0x0004;
    }
}

/// Index of a key in the registry arena.
///
/// Stable for as long as at least one reference to the key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId(pub(crate) u32);

/// A registry key.
#[derive(Debug)]
pub(crate) struct Key {
    /// Key name; `None` only for the nameless root keys.
    pub(crate) name: Option<WideString>,
    /// Informational class string.
    pub(crate) class: Option<WideString>,
    /// Back-link to the parent; cleared on unlink.
    pub(crate) parent: Option<KeyId>,
    /// Children, sorted ascending by case-insensitive name.
    pub(crate) subkeys: Vec<KeyId>,
    /// Values, sorted ascending by case-insensitive name.
    pub(crate) values: Vec<KeyValue>,
    pub(crate) flags: KeyFlags,
    /// Saving level; rises to the current level on every touch.
    pub(crate) level: u32,
    /// Last modification time, seconds since the epoch.
    pub(crate) modif: u64,
    /// References held by the parent link and by open handles.
    pub(crate) refs: u32,
}

impl Key {
    /// Name units for sorting; roots sort as the empty name.
    pub(crate) fn name_units(&self) -> &[u16] {
        self.name.as_ref().map(|n| n.units()).unwrap_or(&[])
    }
}

/// The registry context: key arena, root table and saving configuration.
pub struct Registry {
    slots: Vec<Option<Key>>,
    free: Vec<u32>,
    pub(crate) roots: [Option<KeyId>; NB_ROOT_KEYS],
    /// Level stamped into newly created or modified keys.
    pub(crate) current_level: u32,
    /// Minimum level a key needs in order to get saved.
    pub(crate) saving_level: u32,
    /// Snapshot format version produced by the saver.
    pub(crate) saving_version: u32,
}

impl Registry {
    /// Creates an empty registry with default levels and format version 1.
    pub fn new() -> Self {
        Registry {
            slots: Vec::new(),
            free: Vec::new(),
            roots: [None; NB_ROOT_KEYS],
            current_level: 0,
            saving_level: 0,
            saving_version: 1,
        }
    }

    pub fn saving_version(&self) -> u32 {
        self.saving_version
    }

    pub fn saving_level(&self) -> u32 {
        self.saving_level
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Borrows a live key. The arena slot is guaranteed occupied while any
    /// reference to the key is held, which is the only way a `KeyId`
    /// reaches callers.
    pub(crate) fn key(&self, id: KeyId) -> &Key {
        match self.slots.get(id.0 as usize) {
            Some(Some(key)) => key,
            _ => unreachable!("key id {:?} outlived its references", id),
        }
    }

    pub(crate) fn key_mut(&mut self, id: KeyId) -> &mut Key {
        match self.slots.get_mut(id.0 as usize) {
            Some(Some(key)) => key,
            _ => unreachable!("key id {:?} outlived its references", id),
        }
    }

    /// Adds a reference to a key.
    pub fn grab(&mut self, id: KeyId) {
        self.key_mut(id).refs += 1;
    }

    /// Drops a reference; the last reference destroys the key, clearing the
    /// children's back-links and releasing the child references in turn.
    pub fn release(&mut self, id: KeyId) {
        let key = self.key_mut(id);
        key.refs -= 1;
        if key.refs > 0 {
            return;
        }
        let key = match self.slots[id.0 as usize].take() {
            Some(key) => key,
            None => return,
        };
        self.free.push(id.0);
        for child in key.subkeys {
            self.key_mut(child).parent = None;
            self.release(child);
        }
    }

    /// Inserts a key into the arena with one reference (the creator's).
    pub(crate) fn insert_slot(&mut self, key: Key) -> KeyId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(key);
                KeyId(index)
            }
            None => {
                self.slots.push(Some(key));
                KeyId((self.slots.len() - 1) as u32)
            }
        }
    }

    /// Number of live keys, detached ones included.
    pub fn live_keys(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
