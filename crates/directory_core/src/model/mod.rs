//! Directory domain model.
//!
//! # Responsibility
//! - Define the read models returned by repositories and services.
//! - Keep list projections separate from full aggregates.
//!
//! # Invariants
//! - Every entity is identified by its SQLite integer primary key.
//! - Activity parent links form a forest; the writing path guarantees it.

pub mod activity;
pub mod company;
