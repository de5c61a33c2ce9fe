//! Company search and lookup use-case service.
//!
//! # Responsibility
//! - Orchestrate hierarchy resolution, geo planning and filter composition
//!   into one paged search.
//! - Load one company aggregate by id with an explicit not-found outcome.
//!
//! # Invariants
//! - Page size and activity depth come from injected settings only.
//! - Search and lookup never write.
//! - Logged fields are metadata only; user-entered text is never logged.

use crate::config::DirectorySettings;
use crate::geo::plan_geo_predicates;
use crate::model::activity::ActivityId;
use crate::model::company::{Company, CompanyId, CompanyPage};
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::company_repo::{CompanyRepository, PageRequest};
use crate::repo::RepoError;
use crate::search::compose::compose;
use crate::search::filter::{FilterError, FilterSet};
use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors surfaced to directory callers.
#[derive(Debug)]
pub enum DirectoryError {
    /// No company has the requested id.
    NotFound(CompanyId),
    /// Filter input cannot be turned into a query.
    InvalidFilter(FilterError),
    /// Store failure; fatal for this request, never retried.
    Store(RepoError),
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "company not found: {id}"),
            Self::InvalidFilter(err) => write!(f, "invalid filter: {err}"),
            Self::Store(err) => write!(f, "directory store error: {err}"),
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::InvalidFilter(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RepoError> for DirectoryError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<FilterError> for DirectoryError {
    fn from(value: FilterError) -> Self {
        Self::InvalidFilter(value)
    }
}

/// Company directory service facade.
pub struct CompanyService<C: CompanyRepository, A: ActivityRepository> {
    companies: C,
    activities: A,
    settings: DirectorySettings,
}

impl<C: CompanyRepository, A: ActivityRepository> CompanyService<C, A> {
    /// Creates service from repositories and validated settings.
    pub fn new(companies: C, activities: A, settings: DirectorySettings) -> Self {
        Self {
            companies,
            activities,
            settings,
        }
    }

    pub fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    /// Searches companies matching every active filter.
    ///
    /// # Contract
    /// - Returns at most `page_size` summaries ordered by id, starting at
    ///   `filters.offset`.
    /// - `total` counts all matches regardless of offset and page size.
    /// - An offset past the last match yields an empty page, not an error.
    pub fn search(&self, filters: &FilterSet) -> DirectoryResult<CompanyPage> {
        let started_at = Instant::now();
        let filter_summary = filters.summary();

        if let Err(err) = filters.validate() {
            warn!(
                "event=company_search module=service status=rejected filters={} error={}",
                filter_summary, err
            );
            return Err(err.into());
        }

        for mode in plan_geo_predicates(filters).ignored {
            warn!(
                "event=geo_filter_ignored module=service mode={} reason=incomplete_inputs",
                mode.as_str()
            );
        }

        let result = self.run_search(filters);
        match &result {
            Ok(page) => info!(
                "event=company_search module=service status=ok filters={} offset={} returned={} total={} duration_ms={}",
                filter_summary,
                filters.offset,
                page.items.len(),
                page.total,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=company_search module=service status=error filters={} duration_ms={} error={}",
                filter_summary,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Loads one company aggregate.
    ///
    /// Returns [`DirectoryError::NotFound`] when the id is unknown.
    pub fn get_company(&self, id: CompanyId) -> DirectoryResult<Company> {
        match self.companies.get_company(id) {
            Ok(Some(company)) => Ok(company),
            Ok(None) => {
                debug!("event=company_get module=service status=not_found company_id={id}");
                Err(DirectoryError::NotFound(id))
            }
            Err(err) => {
                error!(
                    "event=company_get module=service status=error company_id={} error={}",
                    id, err
                );
                Err(err.into())
            }
        }
    }

    fn run_search(&self, filters: &FilterSet) -> DirectoryResult<CompanyPage> {
        let descendants = self.resolve_descendants(filters)?;
        let predicate = compose(filters, &descendants);
        let page = PageRequest {
            limit: self.settings.page_size,
            offset: filters.offset,
        };
        Ok(self.companies.fetch_page(&predicate, page)?)
    }

    fn resolve_descendants(&self, filters: &FilterSet) -> DirectoryResult<BTreeSet<ActivityId>> {
        match filters.activity() {
            Some(activity) if activity.include_children => {
                let ids = self
                    .activities
                    .descendant_ids(activity.activity_id, self.settings.activity_depth)?;
                debug!(
                    "event=activity_descendants module=service activity_id={} depth={} resolved={}",
                    activity.activity_id,
                    self.settings.activity_depth,
                    ids.len()
                );
                Ok(ids)
            }
            _ => Ok(BTreeSet::new()),
        }
    }
}
