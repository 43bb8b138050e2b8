// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the NE-AI CLI

pub mod config;
pub mod feedback;
pub mod history;
pub mod memory;
pub mod observe;
pub mod run;

pub use self::config::ConfigCommand;
pub use self::feedback::FeedbackCommand;
pub use self::history::HistoryCommand;
pub use self::memory::MemoryCommand;
pub use self::observe::ObserveCommand;
pub use self::run::RunCommand;
