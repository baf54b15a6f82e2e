// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Snapshot Codec for HiveReg
//!
//! Text serialisation of registry subtrees:
//! - Escaped wide strings shared by paths, names and string values
//! - Version 2 reader and writer (the current format)
//! - Version 1 writer (legacy, export only)

mod escape;
mod load;
mod save;

pub use escape::{dump_str, parse_str};
pub use load::{load_registry, LoadReport};
pub use save::save_registry;

#[cfg(test)]
mod escape_test;
