// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Dispatch Layer module organisation.

pub mod handles;
pub mod server;

pub use handles::{
    is_root_handle, root_from_handle, Handle, HandleTable, HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG,
    HKEY_CURRENT_USER, HKEY_DYN_DATA, HKEY_LOCAL_MACHINE, HKEY_PERFORMANCE_DATA, HKEY_USERS,
    KEY_ALL_ACCESS, KEY_CREATE_LINK, KEY_CREATE_SUB_KEY, KEY_ENUMERATE_SUB_KEYS, KEY_NOTIFY,
    KEY_QUERY_VALUE, KEY_SET_VALUE, MAXIMUM_ALLOWED,
};
pub use server::{CreatedKey, HiveServer, KeyInfoReply, SubkeyReply, ValueReply};
