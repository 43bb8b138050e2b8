// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Application layer: the decision service and the actor that serializes
//! access to it.

pub mod cognition_service;
pub mod decision_actor;

pub use cognition_service::{CognitionService, StandardCognitionService};
pub use decision_actor::{ActorReport, DecisionActor, DecisionHandle, DecisionRequest};
