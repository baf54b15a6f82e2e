// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! HiveReg module organisation.

pub mod cli;
pub mod codec;
pub mod dispatch;
pub mod hivebase;
pub mod hivestream;
pub mod wide;
