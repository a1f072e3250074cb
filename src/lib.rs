//! Plan-scoped task tracking with edit gating and GitHub issue mirroring.

pub mod commands;
pub mod error;
pub mod git;
pub mod model;
pub mod notify;
pub mod output;
pub mod store;
pub mod tracker;
