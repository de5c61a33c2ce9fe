//! Demo directory seeding and low-level insert helpers.
//!
//! # Responsibility
//! - Provide the only write path into the directory store.
//! - Populate a fresh database with the demo activity forest and companies.
//!
//! # Invariants
//! - `seed_demo_directory` is all-or-nothing: it runs in one transaction.
//! - Search and lookup code never calls into this module.

use crate::db::DbResult;
use crate::geo::GeoPoint;
use crate::model::activity::ActivityId;
use crate::model::company::{BuildingId, CompanyId, PhoneId};
use log::info;
use rusqlite::{params, Connection};

/// Central Moscow.
pub const DEMO_CITY_CENTER: GeoPoint = GeoPoint::new(55.7558, 37.6173);
/// Rostov-on-Don, far outside any city-scale radius.
pub const DEMO_REGION_POINT: GeoPoint = GeoPoint::new(47.2357, 39.7015);

/// Inserts one activity and returns its id.
pub fn insert_activity(
    conn: &Connection,
    name: &str,
    parent_id: Option<ActivityId>,
) -> DbResult<ActivityId> {
    conn.execute(
        "INSERT INTO activities (name, parent_id) VALUES (?1, ?2);",
        params![name, parent_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts one building and returns its id.
pub fn insert_building(conn: &Connection, address: &str, location: GeoPoint) -> DbResult<BuildingId> {
    conn.execute(
        "INSERT INTO buildings (address, latitude, longitude) VALUES (?1, ?2, ?3);",
        params![address, location.latitude, location.longitude],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts one company and returns its id.
pub fn insert_company(
    conn: &Connection,
    name: &str,
    legal_form: &str,
    building_id: BuildingId,
) -> DbResult<CompanyId> {
    conn.execute(
        "INSERT INTO companies (name, legal_form, building_id) VALUES (?1, ?2, ?3);",
        params![name, legal_form, building_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_phone(conn: &Connection, company_id: CompanyId, number: &str) -> DbResult<PhoneId> {
    conn.execute(
        "INSERT INTO phones (company_id, number) VALUES (?1, ?2);",
        params![company_id, number],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Tags `company_id` with `activity_id`. Re-linking the same pair is a no-op.
pub fn link_activity(
    conn: &Connection,
    company_id: CompanyId,
    activity_id: ActivityId,
) -> DbResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO company_activities (company_id, activity_id) VALUES (?1, ?2);",
        params![company_id, activity_id],
    )?;
    Ok(())
}

/// Ids of the demo activity forest.
///
/// ```text
/// Food
/// Auto
///   Cars
///     Parts
///       Engine
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoActivities {
    pub food: ActivityId,
    pub auto: ActivityId,
    pub cars: ActivityId,
    pub parts: ActivityId,
    pub engine: ActivityId,
}

/// Ids of the demo companies, one per demo activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoCompanies {
    /// In [`DEMO_CITY_CENTER`]; has two phones.
    pub food: CompanyId,
    pub auto: CompanyId,
    pub cars: CompanyId,
    pub parts: CompanyId,
    pub engine: CompanyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDirectory {
    pub activities: DemoActivities,
    pub companies: DemoCompanies,
    /// Building of the food company.
    pub city_building: BuildingId,
}

/// Seeds the demo forest and five demo companies in one transaction.
pub fn seed_demo_directory(conn: &mut Connection) -> DbResult<DemoDirectory> {
    let tx = conn.transaction()?;

    let food = insert_activity(&tx, "Food", None)?;
    let auto = insert_activity(&tx, "Auto", None)?;
    let cars = insert_activity(&tx, "Cars", Some(auto))?;
    let parts = insert_activity(&tx, "Parts", Some(cars))?;
    let engine = insert_activity(&tx, "Engine", Some(parts))?;
    let activities = DemoActivities {
        food,
        auto,
        cars,
        parts,
        engine,
    };

    let city_building = insert_building(&tx, "Moscow, Tverskaya St 1", DEMO_CITY_CENTER)?;
    let food_company = insert_company(&tx, "Московская еда", "LLC", city_building)?;
    insert_phone(&tx, food_company, "2-222-222")?;
    insert_phone(&tx, food_company, "8-923-666-13-13")?;
    link_activity(&tx, food_company, food)?;

    let mut regional = Vec::with_capacity(4);
    for (index, (name, activity_id)) in [
        ("Auto Trade", auto),
        ("Cars Center", cars),
        ("Parts Depot", parts),
        ("Engine Works", engine),
    ]
    .into_iter()
    .enumerate()
    {
        let address = format!("Rostov-on-Don, Bolshaya Sadovaya St {}", index + 1);
        let building_id = insert_building(&tx, &address, DEMO_REGION_POINT)?;
        let company_id = insert_company(&tx, name, "JSC", building_id)?;
        link_activity(&tx, company_id, activity_id)?;
        regional.push(company_id);
    }

    tx.commit()?;

    let companies = DemoCompanies {
        food: food_company,
        auto: regional[0],
        cars: regional[1],
        parts: regional[2],
        engine: regional[3],
    };
    info!(
        "event=demo_seed module=seed status=ok activities=5 companies={}",
        regional.len() + 1
    );

    Ok(DemoDirectory {
        activities,
        companies,
        city_building,
    })
}
