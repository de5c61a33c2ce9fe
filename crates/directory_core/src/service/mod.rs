//! Directory use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into search and lookup APIs.
//! - Keep callers (CLI, HTTP adapters) decoupled from storage details.

pub mod company_service;
