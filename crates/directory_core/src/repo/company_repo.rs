//! Company repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load the full company aggregate by id.
//! - Execute a composed search predicate as a page plus a total count.
//!
//! # Invariants
//! - Phones and activities of an aggregate are ordered by id ascending.
//! - Page and total come from one read snapshot.
//! - `total` ignores limit and offset.

use crate::model::activity::Activity;
use crate::model::company::{Building, Company, CompanyId, CompanyPage, CompanySummary, Phone};
use crate::repo::{ensure_connection_ready, read_snapshot, RepoError, RepoResult};
use crate::search::compose::CompanyPredicate;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

const COMPANY_AGGREGATE_SQL: &str = "SELECT
    c.id AS id,
    c.name AS name,
    c.legal_form AS legal_form,
    b.id AS building_id,
    b.address AS address,
    b.latitude AS latitude,
    b.longitude AS longitude
FROM companies c
INNER JOIN buildings b ON b.id = c.building_id
WHERE c.id = ?1;";

const COMPANY_PHONES_SQL: &str = "SELECT id, number
FROM phones
WHERE company_id = ?1
ORDER BY id ASC;";

const COMPANY_ACTIVITIES_SQL: &str = "SELECT
    a.id AS id,
    a.name AS name,
    a.parent_id AS parent_id
FROM activities a
INNER JOIN company_activities ca ON ca.activity_id = a.id
WHERE ca.company_id = ?1
ORDER BY a.id ASC;";

/// Pagination window for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

/// Repository interface for company reads.
pub trait CompanyRepository {
    /// Loads one company aggregate, or `None` when the id is unknown.
    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>>;
    /// Fetches one page of summaries matching `predicate` plus the total
    /// match count.
    fn fetch_page(&self, predicate: &CompanyPredicate, page: PageRequest)
        -> RepoResult<CompanyPage>;
}

/// SQLite-backed company repository.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                "companies",
                "buildings",
                "phones",
                "activities",
                "company_activities",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        read_snapshot(self.conn, |conn| {
            let Some(mut company) = conn
                .query_row(COMPANY_AGGREGATE_SQL, [id], parse_company_row)
                .optional()?
            else {
                return Ok(None);
            };

            let mut phones = conn.prepare(COMPANY_PHONES_SQL)?;
            company.phones = phones
                .query_map([id], |row| {
                    Ok(Phone {
                        id: row.get("id")?,
                        number: row.get("number")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut activities = conn.prepare(COMPANY_ACTIVITIES_SQL)?;
            company.activities = activities
                .query_map([id], |row| {
                    Ok(Activity {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        parent_id: row.get("parent_id")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Some(company))
        })
    }

    fn fetch_page(
        &self,
        predicate: &CompanyPredicate,
        page: PageRequest,
    ) -> RepoResult<CompanyPage> {
        read_snapshot(self.conn, |conn| {
            let mut stmt = conn.prepare(&predicate.select_sql())?;
            let items = stmt
                .query_map(
                    params_from_iter(predicate.select_binds(page.limit, page.offset)),
                    parse_summary_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let total: i64 = conn.query_row(
                &predicate.count_sql(),
                params_from_iter(predicate.bind_values()),
                |row| row.get(0),
            )?;
            let total = u64::try_from(total)
                .map_err(|_| RepoError::InvalidData(format!("negative company count {total}")))?;

            Ok(CompanyPage { items, total })
        })
    }
}

fn parse_company_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get("id")?,
        name: row.get("name")?,
        legal_form: row.get("legal_form")?,
        building: Building {
            id: row.get("building_id")?,
            address: row.get("address")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        },
        phones: Vec::new(),
        activities: Vec::new(),
    })
}

fn parse_summary_row(row: &Row<'_>) -> rusqlite::Result<CompanySummary> {
    Ok(CompanySummary {
        id: row.get("id")?,
        name: row.get("name")?,
        legal_form: row.get("legal_form")?,
    })
}
