// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Path Resolution
//!
//! Registry paths are backslash-separated component sequences. Leading and
//! repeated separators are skipped, the empty path denotes the key itself,
//! and a zero unit terminates the whole path. The tokeniser keeps its
//! cursor in an explicit struct so one resolver call chain owns its state.

use crate::hivereg::hivebase::{KeyFlags, KeyId, Registry};
use crate::hivereg::hivestream::{access_denied, not_found, HiveError, HiveResult};
use crate::hivereg::wide::WideString;

/// Create option: the new keys are volatile (never persisted).
pub const REG_OPTION_VOLATILE: u32 = 0x0001;

/// Upper bound on one path component, in units; longer components are
/// truncated, matching the fixed token buffer of registry clients.
pub const MAX_COMPONENT_LEN: usize = 255;

const SEPARATOR: u16 = b'\\' as u16;

/// Backslash-path tokeniser with an explicit cursor.
pub(crate) struct PathTokenizer<'a> {
    path: &'a [u16],
    pos: usize,
}

impl<'a> PathTokenizer<'a> {
    pub(crate) fn new(path: &'a WideString) -> Self {
        PathTokenizer {
            path: path.units(),
            pos: 0,
        }
    }

    /// Returns the next component, or an empty slice once the path is
    /// exhausted or a zero unit is reached.
    pub(crate) fn next_token(&mut self) -> &'a [u16] {
        while self.pos < self.path.len() && self.path[self.pos] == SEPARATOR {
            self.pos += 1;
        }
        let start = self.pos;
        while self.pos < self.path.len() {
            let unit = self.path[self.pos];
            if unit == 0 || unit == SEPARATOR {
                break;
            }
            self.pos += 1;
        }
        let token = &self.path[start..self.pos];
        if token.len() > MAX_COMPONENT_LEN {
            &token[..MAX_COMPONENT_LEN]
        } else {
            token
        }
    }
}

impl Registry {
    /// Resolves `path` below `base` without creating anything.
    ///
    /// ## Output
    /// - `KeyId` of the terminal key, with one reference added for the caller
    ///
    /// ## Error Conditions
    /// - `HiveError::NotFound` on the first missing component
    pub fn open_key(&mut self, base: KeyId, path: &WideString) -> HiveResult<KeyId> {
        let mut tokens = PathTokenizer::new(path);
        let mut key = base;
        let mut token = tokens.next_token();
        while !token.is_empty() {
            match self.find_subkey(key, token) {
                Ok((sub, _)) => key = sub,
                Err(_) => return Err(not_found(path.to_string())),
            }
            token = tokens.next_token();
        }
        self.grab(key);
        Ok(key)
    }

    /// Resolves `path` below `base`, creating the missing tail.
    ///
    /// New keys inherit the volatile option; the class attaches to the
    /// terminal key only, whether or not it was just created.
    ///
    /// ## Output
    /// - `(KeyId, bool)`: terminal key with one reference added for the
    ///   caller, and whether at least one key was created
    ///
    /// ## Error Conditions
    /// - `HiveError::KeyDeleted` when `base` has been detached
    /// - `HiveError::ChildMustBeVolatile` when a non-volatile key would be
    ///   created below a volatile one
    pub fn create_key(
        &mut self,
        base: KeyId,
        path: &WideString,
        class: Option<WideString>,
        options: u32,
        modif: u64,
    ) -> HiveResult<(KeyId, bool)> {
        let base_key = self.key(base);
        if base_key.flags.contains(KeyFlags::DELETED) {
            return Err(HiveError::KeyDeleted);
        }
        let mut flags = KeyFlags::empty();
        if options & REG_OPTION_VOLATILE != 0 {
            flags |= KeyFlags::VOLATILE;
        } else if base_key.flags.contains(KeyFlags::VOLATILE) {
            return Err(HiveError::ChildMustBeVolatile);
        }

        let mut tokens = PathTokenizer::new(path);
        let mut key = base;
        let mut token = tokens.next_token();
        let mut insert_at = 0;
        while !token.is_empty() {
            match self.find_subkey(key, token) {
                Ok((sub, _)) => {
                    key = sub;
                    token = tokens.next_token();
                }
                Err(index) => {
                    insert_at = index;
                    break;
                }
            }
        }

        // Create the remaining part.
        let mut created = false;
        if !token.is_empty() {
            if self.key(key).flags.contains(KeyFlags::VOLATILE)
                && !flags.contains(KeyFlags::VOLATILE)
            {
                return Err(HiveError::ChildMustBeVolatile);
            }
            created = true;
            key = self.alloc_subkey(key, WideString::from_units(token.to_vec()), insert_at, modif);
            self.key_mut(key).flags |= flags;
            loop {
                token = tokens.next_token();
                if token.is_empty() {
                    break;
                }
                // The index is always 0 in a freshly created key.
                key = self.alloc_subkey(key, WideString::from_units(token.to_vec()), 0, modif);
                self.key_mut(key).flags |= flags;
            }
        }

        if class.is_some() {
            self.key_mut(key).class = class;
        }
        self.grab(key);
        Ok((key, created))
    }

    /// Deletes the key at `path` below `base`; the empty path deletes the
    /// base key itself. The target must not be a root, must still be
    /// linked, and must have no subkeys.
    pub fn delete_key(&mut self, base: KeyId, path: &WideString) -> HiveResult<()> {
        let mut tokens = PathTokenizer::new(path);
        let mut token = tokens.next_token();

        let (parent, key, index) = if token.is_empty() {
            // Deleting the base key: locate it in its parent's child array.
            let base_key = self.key(base);
            if base_key.flags.contains(KeyFlags::ROOT) {
                return Err(access_denied("cannot delete a root key"));
            }
            if base_key.flags.contains(KeyFlags::DELETED) {
                return Err(HiveError::KeyDeleted);
            }
            let parent = match base_key.parent {
                Some(parent) => parent,
                None => return Err(HiveError::KeyDeleted),
            };
            let index = self
                .key(parent)
                .subkeys
                .iter()
                .position(|&sub| sub == base)
                .ok_or(HiveError::KeyDeleted)?;
            (parent, base, index)
        } else {
            let mut parent = base;
            let mut key = base;
            let mut index = 0;
            while !token.is_empty() {
                parent = key;
                match self.find_subkey(parent, token) {
                    Ok((sub, i)) => {
                        key = sub;
                        index = i;
                    }
                    Err(_) => return Err(not_found(path.to_string())),
                }
                token = tokens.next_token();
            }
            (parent, key, index)
        };

        let target = self.key(key);
        if target.flags.contains(KeyFlags::ROOT) || !target.subkeys.is_empty() {
            return Err(access_denied("key has subkeys"));
        }
        self.free_subkey(parent, index);
        self.touch_key(parent);
        Ok(())
    }
}
