//! Search filter set.
//!
//! # Responsibility
//! - Hold every optional search input for one company search call.
//! - Normalize inputs that need it (name needle) and reject unusable ones.
//!
//! # Invariants
//! - Field names mirror the public query-string parameters.
//! - A `FilterSet` is never mutated by the search path.

use crate::model::activity::ActivityId;
use crate::model::company::BuildingId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected filter input.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Coordinate is NaN or infinite.
    NonFiniteCoordinate { field: &'static str, value: f64 },
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteCoordinate { field, value } => {
                write!(f, "coordinate `{field}` must be finite, got {value}")
            }
        }
    }
}

impl Error for FilterError {}

/// Category part of a filter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityFilter {
    pub activity_id: ActivityId,
    /// Also match descendants of `activity_id` within the configured depth.
    pub include_children: bool,
}

/// All optional inputs for one company search.
///
/// Unset fields contribute no condition. Radius mode needs all of
/// `lat`, `lng`, `radius`; rectangle mode needs all of `lngx`, `latx`,
/// `lngy`, `laty`, where corner A is `(lngx, latx)` and corner B is
/// `(lngy, laty)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    pub building_id: Option<BuildingId>,
    pub activity_id: Option<ActivityId>,
    pub activity_children: bool,
    /// Case-insensitive substring of the company name.
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Meters.
    pub radius: Option<u32>,
    pub latx: Option<f64>,
    pub lngx: Option<f64>,
    pub laty: Option<f64>,
    pub lngy: Option<f64>,
    pub offset: u32,
}

impl FilterSet {
    /// Creates an unfiltered search starting at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_building(mut self, building_id: BuildingId) -> Self {
        self.building_id = Some(building_id);
        self
    }

    pub fn with_activity(mut self, activity_id: ActivityId, include_children: bool) -> Self {
        self.activity_id = Some(activity_id);
        self.activity_children = include_children;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets radius mode inputs.
    pub fn near(mut self, lat: f64, lng: f64, radius_m: u32) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self.radius = Some(radius_m);
        self
    }

    /// Sets rectangle mode inputs from corner A `(lngx, latx)` and corner B
    /// `(lngy, laty)`.
    pub fn within_corners(mut self, lngx: f64, latx: f64, lngy: f64, laty: f64) -> Self {
        self.lngx = Some(lngx);
        self.latx = Some(latx);
        self.lngy = Some(lngy);
        self.laty = Some(laty);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the category filter, if any.
    pub fn activity(&self) -> Option<ActivityFilter> {
        self.activity_id.map(|activity_id| ActivityFilter {
            activity_id,
            include_children: self.activity_children,
        })
    }

    /// Returns the lowercased name needle, or `None` for a missing or empty
    /// name.
    pub fn name_needle(&self) -> Option<String> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
    }

    /// Rejects coordinates that cannot be compared.
    ///
    /// Missing coordinates are fine; partial geo modes are simply inactive.
    pub fn validate(&self) -> Result<(), FilterError> {
        let coordinates = [
            ("lat", self.lat),
            ("lng", self.lng),
            ("latx", self.latx),
            ("lngx", self.lngx),
            ("laty", self.laty),
            ("lngy", self.lngy),
        ];
        for (field, value) in coordinates {
            if let Some(value) = value.filter(|value| !value.is_finite()) {
                return Err(FilterError::NonFiniteCoordinate { field, value });
            }
        }
        Ok(())
    }

    /// Comma-separated names of the filter groups that carry input.
    ///
    /// Used for metadata-only logging; never includes user text.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.building_id.is_some() {
            parts.push("building");
        }
        if self.activity_id.is_some() {
            parts.push(if self.activity_children {
                "activity_tree"
            } else {
                "activity"
            });
        }
        if self.name_needle().is_some() {
            parts.push("name");
        }
        if self.lat.is_some() || self.lng.is_some() || self.radius.is_some() {
            parts.push("radius");
        }
        if [self.latx, self.lngx, self.laty, self.lngy]
            .iter()
            .any(Option::is_some)
        {
            parts.push("rectangle");
        }
        if parts.is_empty() {
            return "none".to_string();
        }
        parts.join(",")
    }
}
