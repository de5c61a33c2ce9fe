//! Company directory command-line entry point.
//!
//! # Responsibility
//! - Expose seeding, search, lookup and activity listing over one database.
//! - Print results as JSON shaped like the public API responses.
//!
//! Without `--db` (or `DIRECTORY_DB_PATH`) the CLI works on a fresh
//! in-memory database pre-filled with the demo directory.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use directory_core::repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
use directory_core::repo::company_repo::SqliteCompanyRepository;
use directory_core::seed::seed_demo_directory;
use directory_core::{
    core_version, default_log_level, init_logging, open_db, open_db_in_memory, ActivityId,
    BuildingId, CompanyId, CompanyService, DirectorySettings, FilterSet,
};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "directory", version, about = "Query the company directory.")]
struct Cli {
    /// SQLite database file; falls back to `DIRECTORY_DB_PATH`, then to an
    /// in-memory demo directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the demo activity forest and companies.
    Seed,
    /// Search companies; prints `{"items": [...], "total": N}`.
    Search(SearchArgs),
    /// Print one company with building, phones and activities.
    Get {
        id: CompanyId,
    },
    /// List child activities, or root activities without `--parent`.
    Activities {
        #[arg(long)]
        parent: Option<ActivityId>,
    },
}

#[derive(Args, Debug, Default)]
struct SearchArgs {
    #[arg(long)]
    building_id: Option<BuildingId>,
    #[arg(long)]
    activity_id: Option<ActivityId>,
    /// Also match descendants of `--activity-id`.
    #[arg(long, requires = "activity_id")]
    activity_children: bool,
    /// Case-insensitive name substring.
    #[arg(long)]
    name: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    lng: Option<f64>,
    /// Radius in meters around `--lat`/`--lng`.
    #[arg(long)]
    radius: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    latx: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    lngx: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    laty: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    lngy: Option<f64>,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

impl From<SearchArgs> for FilterSet {
    fn from(args: SearchArgs) -> Self {
        FilterSet {
            building_id: args.building_id,
            activity_id: args.activity_id,
            activity_children: args.activity_children,
            name: args.name,
            lat: args.lat,
            lng: args.lng,
            radius: args.radius,
            latx: args.latx,
            lngx: args.lngx,
            laty: args.laty,
            lngy: args.lngy,
            offset: args.offset,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = DirectorySettings::from_env().context("invalid directory settings")?;

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).context("failed to start logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let db_path = cli.db.clone().or_else(|| settings.database_path.clone());
    let prefill_demo = !matches!(cli.command, Command::Seed);
    let mut conn = open_connection(db_path.as_ref(), prefill_demo)?;

    match cli.command {
        Command::Seed => {
            let demo = seed_demo_directory(&mut conn).context("failed to seed demo directory")?;
            print_json(&serde_json::json!({
                "activities": [
                    demo.activities.food,
                    demo.activities.auto,
                    demo.activities.cars,
                    demo.activities.parts,
                    demo.activities.engine,
                ],
                "companies": [
                    demo.companies.food,
                    demo.companies.auto,
                    demo.companies.cars,
                    demo.companies.parts,
                    demo.companies.engine,
                ],
            }))
        }
        Command::Search(args) => {
            let service = company_service(&conn, settings)?;
            let page = service.search(&FilterSet::from(args))?;
            print_json(&page)
        }
        Command::Get { id } => {
            let service = company_service(&conn, settings)?;
            let company = service.get_company(id)?;
            print_json(&company)
        }
        Command::Activities { parent } => {
            let repo = SqliteActivityRepository::try_new(&conn)?;
            print_json(&repo.list_children(parent)?)
        }
    }
}

fn open_connection(path: Option<&PathBuf>, prefill_demo: bool) -> Result<Connection> {
    match path {
        Some(path) => {
            open_db(path).with_context(|| format!("failed to open database {}", path.display()))
        }
        None => {
            let mut conn = open_db_in_memory().context("failed to open in-memory database")?;
            if prefill_demo {
                seed_demo_directory(&mut conn).context("failed to seed demo directory")?;
            }
            Ok(conn)
        }
    }
}

fn company_service(
    conn: &Connection,
    settings: DirectorySettings,
) -> Result<CompanyService<SqliteCompanyRepository<'_>, SqliteActivityRepository<'_>>> {
    Ok(CompanyService::new(
        SqliteCompanyRepository::try_new(conn)?,
        SqliteActivityRepository::try_new(conn)?,
        settings,
    ))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use directory_core::FilterSet;

    #[test]
    fn search_flags_map_onto_filter_set() {
        let cli = Cli::try_parse_from([
            "directory",
            "search",
            "--activity-id",
            "2",
            "--activity-children",
            "--lat",
            "-33.86",
            "--lng",
            "151.2",
            "--radius",
            "500",
            "--offset",
            "10",
        ])
        .unwrap();

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        let filters = FilterSet::from(args);
        assert_eq!(
            filters,
            FilterSet::new()
                .with_activity(2, true)
                .near(-33.86, 151.2, 500)
                .with_offset(10)
        );
    }

    #[test]
    fn children_flag_requires_activity() {
        assert!(Cli::try_parse_from(["directory", "search", "--activity-children"]).is_err());
    }

    #[test]
    fn get_takes_company_id() {
        let cli = Cli::try_parse_from(["directory", "get", "7"]).unwrap();
        assert!(matches!(cli.command, Command::Get { id: 7 }));
    }
}
