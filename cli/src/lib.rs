// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0
//! NE-AI CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Engine assembly and command implementations for the `neai` binary

pub mod commands;
pub mod engine;
