//! Company search inputs and query composition.
//!
//! # Responsibility
//! - Model the optional search inputs (`FilterSet`).
//! - Compose them into one predicate shared by the paged fetch and count.

pub mod compose;
pub mod filter;
