//! Domain model for the task manager core.
//!
//! # Responsibility
//! - Define canonical entity records returned by the repository layer.
//! - Define persist-ready payloads produced by validated forms.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID.
//! - Many-to-many id lists are sorted and free of duplicates.

pub mod catalog;
pub mod project;
pub mod task;
pub mod team;
pub mod worker;
