// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Key Node Operations
//!
//! Allocation and destruction of keys, sorted child lookup, modification
//! tracking and the aggregate queries clients use to size their buffers.

use crate::hivereg::hivebase::capacity::{reserve_slot, shrink_slots};
use crate::hivereg::hivebase::{Key, KeyFlags, KeyId, Registry};
use crate::hivereg::hivestream::{current_timestamp, HiveError, HiveResult};
use crate::hivereg::wide::{cmp_units_ignore_case, WideString};
use serde::Serialize;
use std::cmp::Ordering;

/// Aggregate information about one key, as returned by `query_key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInfo {
    /// Number of direct subkeys.
    pub subkeys: usize,
    /// Length in units of the longest subkey name.
    pub max_subkey: usize,
    /// Length in units of the longest subkey class.
    pub max_class: usize,
    /// Number of values.
    pub values: usize,
    /// Length in units of the longest value name.
    pub max_value: usize,
    /// Length in bytes of the largest value data.
    pub max_data: usize,
    /// Last modification time.
    pub modif: u64,
    /// The key's own class string.
    pub class: Option<WideString>,
}

/// One subkey as seen by index enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubkeyInfo {
    pub name: WideString,
    pub class: Option<WideString>,
    pub modif: u64,
}

impl Registry {
    /// Allocates a detached key carrying one reference for the caller.
    pub(crate) fn alloc_key(&mut self, name: Option<WideString>, modif: u64) -> KeyId {
        let key = Key {
            name,
            class: None,
            parent: None,
            subkeys: Vec::new(),
            values: Vec::new(),
            flags: KeyFlags::empty(),
            level: self.current_level,
            modif,
            refs: 1,
        };
        self.insert_slot(key)
    }

    /// Allocates a named child and links it into the parent's sorted child
    /// array at `index`. The new key's single reference belongs to the
    /// parent link.
    pub(crate) fn alloc_subkey(
        &mut self,
        parent: KeyId,
        name: WideString,
        index: usize,
        modif: u64,
    ) -> KeyId {
        let id = self.alloc_key(Some(name), modif);
        self.key_mut(id).parent = Some(parent);
        let parent_key = self.key_mut(parent);
        reserve_slot(&mut parent_key.subkeys);
        parent_key.subkeys.insert(index, id);
        id
    }

    /// Unlinks the child at `index`, marks it deleted and drops the parent's
    /// reference. Destruction cascades through the child's own subtree once
    /// the last handle lets go.
    pub(crate) fn free_subkey(&mut self, parent: KeyId, index: usize) {
        let id = {
            let parent_key = self.key_mut(parent);
            let id = parent_key.subkeys.remove(index);
            shrink_slots(&mut parent_key.subkeys);
            id
        };
        let key = self.key_mut(id);
        key.flags |= KeyFlags::DELETED;
        key.parent = None;
        self.release(id);
    }

    /// Binary search for a named child.
    ///
    /// ## Output
    /// - `Ok((id, index))`: the matching child and its position
    /// - `Err(index)`: the insertion point that preserves sort order
    pub(crate) fn find_subkey(&self, id: KeyId, name: &[u16]) -> Result<(KeyId, usize), usize> {
        let subkeys = &self.key(id).subkeys;
        let mut lo = 0;
        let mut hi = subkeys.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            match cmp_units_ignore_case(self.key(subkeys[mid]).name_units(), name) {
                Ordering::Equal => return Ok((subkeys[mid], mid)),
                Ordering::Greater => hi = mid,
                Ordering::Less => lo = mid + 1,
            }
        }
        Err(lo)
    }

    /// Stamps the key with the current time and raises its level.
    pub(crate) fn touch_key(&mut self, id: KeyId) {
        let level = self.current_level;
        let key = self.key_mut(id);
        key.modif = current_timestamp();
        key.level = key.level.max(level);
    }

    /// Collects counts and maximum name/class/data lengths across all
    /// children and values of a key.
    pub fn query_key(&self, id: KeyId) -> KeyInfo {
        let key = self.key(id);
        let mut max_subkey = 0;
        let mut max_class = 0;
        for &sub in &key.subkeys {
            let subkey = self.key(sub);
            max_subkey = max_subkey.max(subkey.name_units().len());
            if let Some(class) = &subkey.class {
                max_class = max_class.max(class.len());
            }
        }
        let mut max_value = 0;
        let mut max_data = 0;
        for value in &key.values {
            max_value = max_value.max(value.name.len());
            max_data = max_data.max(value.data.len());
        }
        KeyInfo {
            subkeys: key.subkeys.len(),
            max_subkey,
            max_class,
            values: key.values.len(),
            max_value,
            max_data,
            modif: key.modif,
            class: key.class.clone(),
        }
    }

    /// Returns the `index`-th child in sort order.
    pub fn enum_key(&self, id: KeyId, index: usize) -> HiveResult<SubkeyInfo> {
        let key = self.key(id);
        match key.subkeys.get(index) {
            Some(&sub) => {
                let subkey = self.key(sub);
                Ok(SubkeyInfo {
                    name: subkey.name.clone().unwrap_or_default(),
                    class: subkey.class.clone(),
                    modif: subkey.modif,
                })
            }
            None => Err(HiveError::NoMoreItems),
        }
    }
}
