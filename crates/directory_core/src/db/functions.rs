//! Scalar SQL functions registered on every directory connection.
//!
//! SQLite has no geography type and its `lower()` only folds ASCII, so the
//! geo and name filters call back into Rust through these functions.

use crate::geo::{distance_m, GeoPoint};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// `geo_distance_m(lat1, lng1, lat2, lng2)`: great-circle distance in meters.
pub const GEO_DISTANCE_FN: &str = "geo_distance_m";
/// `casefold(text)`: Unicode lowercase of `text`, `NULL` stays `NULL`.
pub const CASEFOLD_FN: &str = "casefold";

/// Registers directory scalar functions on `conn`.
pub fn register_directory_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function(GEO_DISTANCE_FN, 4, flags, |ctx| {
        let from = GeoPoint::new(ctx.get::<f64>(0)?, ctx.get::<f64>(1)?);
        let to = GeoPoint::new(ctx.get::<f64>(2)?, ctx.get::<f64>(3)?);
        Ok(distance_m(from, to))
    })?;

    conn.create_scalar_function(CASEFOLD_FN, 1, flags, |ctx| {
        let value = ctx.get::<Option<String>>(0)?;
        Ok(value.map(|text| text.to_lowercase()))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::register_directory_functions;
    use rusqlite::Connection;

    fn connection() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory sqlite");
        register_directory_functions(&conn).expect("functions register");
        conn
    }

    #[test]
    fn casefold_lowercases_cyrillic() {
        let conn = connection();
        let folded: String = conn
            .query_row("SELECT casefold('Московская ЕДА');", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "московская еда");
    }

    #[test]
    fn casefold_keeps_null() {
        let conn = connection();
        let folded: Option<String> = conn
            .query_row("SELECT casefold(NULL);", [], |row| row.get(0))
            .unwrap();
        assert!(folded.is_none());
    }

    #[test]
    fn geo_distance_is_zero_for_same_point() {
        let conn = connection();
        let meters: f64 = conn
            .query_row(
                "SELECT geo_distance_m(55.7558, 37.6173, 55.7558, 37.6173);",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(meters.abs() < 1e-6);
    }

    #[test]
    fn geo_distance_accepts_integer_arguments() {
        let conn = connection();
        let meters: f64 = conn
            .query_row("SELECT geo_distance_m(0, 0, 0, 1);", [], |row| row.get(0))
            .unwrap();
        assert!((meters - 111_195.0).abs() < 10.0, "got {meters}");
    }
}
