// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Knowledge items, perception events, decisions, history events and the
//! pure scoring functions of the cognition engine.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Types and invariants shared by application and infrastructure

pub mod confidence;
pub mod decision;
pub mod engine_config;
pub mod errors;
pub mod events;
pub mod knowledge;
pub mod perception;
pub mod similarity;

pub use decision::*;
pub use engine_config::EngineConfig;
pub use errors::*;
pub use events::*;
pub use knowledge::*;
pub use perception::*;
