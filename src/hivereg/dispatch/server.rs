// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Request Dispatcher
//!
//! One method per registry request. Every method follows the same shape:
//! resolve the handle to a key with the declared access mask, perform the
//! operation on the tree or the codec, then drop the operation's key
//! reference whether or not the operation succeeded. Root handles resolve
//! through lazy root instantiation and ignore close requests.

use crate::hivereg::codec::{load_registry, save_registry, LoadReport};
use crate::hivereg::dispatch::handles::{
    is_root_handle, root_from_handle, Handle, HandleTable, KEY_ALL_ACCESS, KEY_CREATE_SUB_KEY,
    KEY_ENUMERATE_SUB_KEYS, KEY_QUERY_VALUE, KEY_SET_VALUE, MAXIMUM_ALLOWED,
};
use crate::hivereg::hivebase::{KeyId, KeyInfo, Registry};
use crate::hivereg::hivestream::HiveResult;
use crate::hivereg::wide::WideString;
use serde::Serialize;
use std::io::{BufRead, Write};

/// Result of `create_key`: the new handle and whether any key was created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedKey {
    pub hkey: Handle,
    pub created: bool,
}

/// One subkey as returned by `enum_key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubkeyReply {
    pub name: String,
    pub class: Option<String>,
    pub modif: u64,
}

/// One value as returned by `get_key_value` and `enum_key_value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueReply {
    pub name: String,
    pub value_type: u32,
    pub len: usize,
    pub data: Vec<u8>,
}

/// Aggregate key information as returned by `query_key_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInfoReply {
    pub subkeys: usize,
    pub max_subkey: usize,
    pub max_class: usize,
    pub values: usize,
    pub max_value: usize,
    pub max_data: usize,
    pub modif: u64,
    pub class: Option<String>,
}

impl From<KeyInfo> for KeyInfoReply {
    fn from(info: KeyInfo) -> Self {
        KeyInfoReply {
            subkeys: info.subkeys,
            max_subkey: info.max_subkey,
            max_class: info.max_class,
            values: info.values,
            max_value: info.max_value,
            max_data: info.max_data,
            modif: info.modif,
            class: info.class.map(|class| class.to_string()),
        }
    }
}

/// The registry request surface: tree, codec and handle table behind one
/// dispatch type.
pub struct HiveServer {
    registry: Registry,
    handles: HandleTable,
}

impl HiveServer {
    pub fn new() -> Self {
        HiveServer {
            registry: Registry::new(),
            handles: HandleTable::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Resolves a handle to a key with one reference for the operation.
    /// Root handles instantiate their root on first use.
    fn get_hkey(&mut self, hkey: Handle, access: u32) -> HiveResult<KeyId> {
        match root_from_handle(hkey) {
            Some(root) => self.registry.root_key(root),
            None => {
                let id = self.handles.get(hkey, access)?;
                self.registry.grab(id);
                Ok(id)
            }
        }
    }

    /// Widens `MAXIMUM_ALLOWED` before a handle is allocated.
    fn widen_access(access: u32) -> u32 {
        if access & MAXIMUM_ALLOWED != 0 {
            KEY_ALL_ACCESS
        } else {
            access
        }
    }

    /// Creates (or opens) the key at `name` below the parent handle.
    pub fn create_key(
        &mut self,
        parent: Handle,
        name: &str,
        class: Option<&str>,
        options: u32,
        modif: u64,
        access: u32,
    ) -> HiveResult<CreatedKey> {
        let access = Self::widen_access(access);
        let parent_id = self.get_hkey(parent, KEY_CREATE_SUB_KEY)?;
        let result = self.registry.create_key(
            parent_id,
            &WideString::from(name),
            class.map(WideString::from),
            options,
            modif,
        );
        self.registry.release(parent_id);
        let (key, created) = result?;
        let hkey = self.handles.alloc(key, access);
        Ok(CreatedKey { hkey, created })
    }

    /// Opens an existing key below the parent handle.
    pub fn open_key(&mut self, parent: Handle, name: &str, access: u32) -> HiveResult<Handle> {
        let access = Self::widen_access(access);
        let parent_id = self.get_hkey(parent, 0)?;
        let result = self.registry.open_key(parent_id, &WideString::from(name));
        self.registry.release(parent_id);
        let key = result?;
        Ok(self.handles.alloc(key, access))
    }

    /// Deletes the key at `name` below the handle; the empty name deletes
    /// the handle's key itself.
    pub fn delete_key(&mut self, hkey: Handle, name: &str) -> HiveResult<()> {
        let id = self.get_hkey(hkey, KEY_CREATE_SUB_KEY)?;
        let result = self.registry.delete_key(id, &WideString::from(name));
        self.registry.release(id);
        result
    }

    /// Closes a handle; attempts to close a root handle are ignored.
    pub fn close_key(&mut self, hkey: Handle) -> HiveResult<()> {
        if is_root_handle(hkey) {
            return Ok(());
        }
        let id = self.handles.close(hkey)?;
        self.registry.release(id);
        Ok(())
    }

    /// Enumerates the handle's subkeys by sort index.
    pub fn enum_key(&mut self, hkey: Handle, index: usize) -> HiveResult<SubkeyReply> {
        let id = self.get_hkey(hkey, KEY_ENUMERATE_SUB_KEYS)?;
        let result = self.registry.enum_key(id, index);
        self.registry.release(id);
        let info = result?;
        Ok(SubkeyReply {
            name: info.name.to_string(),
            class: info.class.map(|class| class.to_string()),
            modif: info.modif,
        })
    }

    /// Returns counts and maximum lengths for the handle's key.
    pub fn query_key_info(&mut self, hkey: Handle) -> HiveResult<KeyInfoReply> {
        let id = self.get_hkey(hkey, KEY_QUERY_VALUE)?;
        let info = self.registry.query_key(id);
        self.registry.release(id);
        Ok(info.into())
    }

    /// Stores a value on the handle's key.
    pub fn set_key_value(
        &mut self,
        hkey: Handle,
        name: &str,
        value_type: u32,
        data: &[u8],
    ) -> HiveResult<()> {
        let id = self.get_hkey(hkey, KEY_SET_VALUE)?;
        let result = self
            .registry
            .set_value(id, &WideString::from(name), value_type, data);
        self.registry.release(id);
        result
    }

    /// Reads a value from the handle's key.
    pub fn get_key_value(&mut self, hkey: Handle, name: &str) -> HiveResult<ValueReply> {
        let id = self.get_hkey(hkey, KEY_QUERY_VALUE)?;
        let result = self
            .registry
            .get_value(id, &WideString::from(name))
            .map(|(value_type, data)| ValueReply {
                name: name.to_string(),
                value_type,
                len: data.len(),
                data: data.to_vec(),
            });
        self.registry.release(id);
        result
    }

    /// Enumerates the handle's values by sort index.
    pub fn enum_key_value(&mut self, hkey: Handle, index: usize) -> HiveResult<ValueReply> {
        let id = self.get_hkey(hkey, KEY_QUERY_VALUE)?;
        let result = self.registry.enum_value(id, index).map(|value| ValueReply {
            name: value.name.to_string(),
            value_type: value.value_type,
            len: value.data.len(),
            data: value.data.clone(),
        });
        self.registry.release(id);
        result
    }

    /// Removes a value from the handle's key.
    pub fn delete_key_value(&mut self, hkey: Handle, name: &str) -> HiveResult<()> {
        let id = self.get_hkey(hkey, KEY_SET_VALUE)?;
        let result = self.registry.delete_value(id, &WideString::from(name));
        self.registry.release(id);
        result
    }

    /// Merges a version 2 snapshot below the handle's key.
    pub fn load_registry<R: BufRead>(
        &mut self,
        hkey: Handle,
        input: &mut R,
    ) -> HiveResult<LoadReport> {
        let id = self.get_hkey(hkey, KEY_SET_VALUE | KEY_CREATE_SUB_KEY)?;
        let result = load_registry(&mut self.registry, id, input);
        self.registry.release(id);
        result
    }

    /// Writes the handle's subtree as a snapshot in the configured format.
    pub fn save_registry<W: Write>(&mut self, hkey: Handle, out: &mut W) -> HiveResult<()> {
        let id = self.get_hkey(hkey, KEY_QUERY_VALUE | KEY_ENUMERATE_SUB_KEYS)?;
        let result = save_registry(&mut self.registry, id, out);
        self.registry.release(id);
        result
    }

    /// Updates the level and format configuration.
    pub fn set_registry_levels(
        &mut self,
        current: u32,
        saving: u32,
        version: u32,
    ) -> HiveResult<()> {
        self.registry.set_levels(current, saving, version)
    }

    /// Releases every open handle and the root table; shutdown path.
    pub fn close(&mut self) {
        for key in self.handles.drain() {
            self.registry.release(key);
        }
        self.registry.close();
    }
}

impl Default for HiveServer {
    fn default() -> Self {
        Self::new()
    }
}
