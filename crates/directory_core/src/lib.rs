//! Core domain logic for the company directory.
//! This crate is the single source of truth for search and lookup semantics.

pub mod config;
pub mod db;
pub mod geo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod seed;
pub mod service;

pub use config::{DirectorySettings, SettingsError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use geo::{distance_m, GeoPoint, GeoPredicate, GeoRect};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{Activity, ActivityId};
pub use model::company::{
    Building, BuildingId, Company, CompanyId, CompanyPage, CompanySummary, Phone,
};
pub use repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
pub use repo::company_repo::{CompanyRepository, PageRequest, SqliteCompanyRepository};
pub use repo::{RepoError, RepoResult};
pub use search::compose::{compose, CompanyPredicate};
pub use search::filter::{FilterError, FilterSet};
pub use service::company_service::{CompanyService, DirectoryError, DirectoryResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
