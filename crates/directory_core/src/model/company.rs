//! Company aggregate and its list projection.
//!
//! # Responsibility
//! - Define the full `Company` aggregate returned by id lookup.
//! - Define `CompanySummary` and `CompanyPage` returned by search.
//!
//! # Invariants
//! - `Company::phones` is sorted by phone id ascending.
//! - `Company::activities` is sorted by activity id ascending.
//! - `CompanyPage::total` counts every match, not just the returned page.

use crate::geo::GeoPoint;
use crate::model::activity::Activity;
use serde::{Deserialize, Serialize};

pub type CompanyId = i64;
pub type BuildingId = i64;
pub type PhoneId = i64;

/// Building that hosts one or more companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub address: String,
    /// WGS84 degrees.
    pub latitude: f64,
    /// WGS84 degrees.
    pub longitude: f64,
}

impl Building {
    /// Returns the building location as a geo point.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Contact phone owned by one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: PhoneId,
    pub number: String,
}

/// Full company aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub legal_form: String,
    pub building: Building,
    pub phones: Vec<Phone>,
    pub activities: Vec<Activity>,
}

/// List projection of a company used in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
    pub legal_form: String,
}

/// One page of search results.
///
/// Serializes as `{"items": [...], "total": N}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPage {
    pub items: Vec<CompanySummary>,
    pub total: u64,
}

impl CompanyPage {
    /// Returns whether the page carries no items.
    ///
    /// An empty page can still report a non-zero `total` when the offset
    /// points past the last match.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
