// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0
//! NE-AI cognition engine
//!
//! Decides whether a perception event is already known, new enough to learn,
//! or uncertain enough to ask a human about, and keeps a confidence-scored
//! memory that human feedback can reinforce.
//!
//! # Architecture
//!
//! - **Layer:** Learning & Memory Layer
//! - **Purpose:** Domain types, the decision service and its file-backed stores

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::*;
pub use domain::*;
pub use infrastructure::*;
