// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Value Array Operations
//!
//! Every key carries an ordered array of named, typed values, sorted
//! ascending by case-insensitive name. The empty name denotes the key's
//! default value. Unknown type tags pass through opaquely.

use crate::hivereg::hivebase::capacity::{reserve_slot, shrink_slots};
use crate::hivereg::hivebase::{KeyId, Registry};
use crate::hivereg::hivestream::{not_found, out_of_memory, HiveError, HiveResult};
use crate::hivereg::wide::{cmp_units_ignore_case, WideString};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Well-known value type tags.
pub const REG_NONE: u32 = 0;
pub const REG_SZ: u32 = 1;
pub const REG_EXPAND_SZ: u32 = 2;
pub const REG_BINARY: u32 = 3;
pub const REG_DWORD: u32 = 4;
pub const REG_DWORD_BIG_ENDIAN: u32 = 5;
pub const REG_LINK: u32 = 6;
pub const REG_MULTI_SZ: u32 = 7;

/// Upper bound on value data accepted from a request.
pub const MAX_VALUE_DATA: usize = 0x0010_0000;

/// A named, typed byte-string stored on a key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Value name; empty for the default value.
    pub name: WideString,
    /// Type tag; not interpreted beyond the snapshot rendering choice.
    pub value_type: u32,
    /// Raw data bytes; may be empty.
    pub data: Vec<u8>,
}

impl Registry {
    /// Binary search for a named value.
    ///
    /// ## Output
    /// - `Ok(index)`: position of the matching value
    /// - `Err(index)`: the insertion point that preserves sort order
    pub(crate) fn find_value(&self, id: KeyId, name: &[u16]) -> Result<usize, usize> {
        let values = &self.key(id).values;
        let mut lo = 0;
        let mut hi = values.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            match cmp_units_ignore_case(values[mid].name.units(), name) {
                Ordering::Equal => return Ok(mid),
                Ordering::Greater => hi = mid,
                Ordering::Less => lo = mid + 1,
            }
        }
        Err(lo)
    }

    /// Returns the index of the named value, inserting an empty one at the
    /// sort-preserving position if it does not exist yet.
    pub(crate) fn insert_value(&mut self, id: KeyId, name: &WideString) -> usize {
        match self.find_value(id, name.units()) {
            Ok(index) => index,
            Err(index) => {
                let values = &mut self.key_mut(id).values;
                reserve_slot(values);
                values.insert(
                    index,
                    KeyValue {
                        name: name.clone(),
                        value_type: REG_NONE,
                        data: Vec::new(),
                    },
                );
                index
            }
        }
    }

    /// Stores a value, replacing any previous data of the same name.
    ///
    /// The data buffer is prepared before the value array is modified, so a
    /// rejected request leaves the key unchanged.
    pub fn set_value(
        &mut self,
        id: KeyId,
        name: &WideString,
        value_type: u32,
        data: &[u8],
    ) -> HiveResult<()> {
        if data.len() > MAX_VALUE_DATA {
            return Err(out_of_memory(data.len()));
        }
        let copy = data.to_vec();
        let index = self.insert_value(id, name);
        let value = &mut self.key_mut(id).values[index];
        value.value_type = value_type;
        value.data = copy;
        self.touch_key(id);
        Ok(())
    }

    /// Looks up a value by name.
    pub fn get_value(&self, id: KeyId, name: &WideString) -> HiveResult<(u32, &[u8])> {
        match self.find_value(id, name.units()) {
            Ok(index) => {
                let value = &self.key(id).values[index];
                Ok((value.value_type, &value.data))
            }
            Err(_) => Err(not_found(name.to_string())),
        }
    }

    /// Returns the `index`-th value in sort order.
    pub fn enum_value(&self, id: KeyId, index: usize) -> HiveResult<&KeyValue> {
        self.key(id)
            .values
            .get(index)
            .ok_or(HiveError::NoMoreItems)
    }

    /// Removes a value by name.
    pub fn delete_value(&mut self, id: KeyId, name: &WideString) -> HiveResult<()> {
        let index = self
            .find_value(id, name.units())
            .map_err(|_| not_found(name.to_string()))?;
        let values = &mut self.key_mut(id).values;
        values.remove(index);
        shrink_slots(values);
        self.touch_key(id);
        Ok(())
    }
}
