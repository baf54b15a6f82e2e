// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! HiveReg - Server-Resident Hierarchical Registry Store
//!
//! This is the main library entry point for HiveReg.

pub mod hivereg;
