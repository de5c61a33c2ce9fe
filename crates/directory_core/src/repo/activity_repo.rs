//! Activity forest repository and hierarchy resolver.
//!
//! # Responsibility
//! - Read activity nodes and their direct children.
//! - Resolve the bounded descendant set of one activity.
//!
//! # Invariants
//! - Child listing is deterministic: `id ASC`.
//! - Descendant traversal never exceeds `max_depth` levels and never
//!   returns the root, even if a faulty writer left a cycle behind.

use crate::model::activity::{Activity, ActivityId};
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

const ACTIVITY_SELECT_SQL: &str = "SELECT id, name, parent_id FROM activities";

// Level 1 holds the direct children of ?1; a row at level L only expands
// while L < ?2. `path` lists visited ids as `,a,b,` so a cycle left by a
// faulty writer stops expanding instead of looping until the level cap.
const DESCENDANTS_SQL: &str = "WITH RECURSIVE activity_tree(id, level, path) AS (
    SELECT id, 1, ',' || ?1 || ',' || id || ','
    FROM activities
    WHERE parent_id = ?1 AND id <> ?1
    UNION ALL
    SELECT child.id, parent.level + 1, parent.path || child.id || ','
    FROM activities child
    INNER JOIN activity_tree parent ON child.parent_id = parent.id
    WHERE parent.level < ?2
      AND instr(parent.path, ',' || child.id || ',') = 0
)
SELECT DISTINCT id
FROM activity_tree
WHERE id <> ?1
ORDER BY id ASC;";

/// Repository interface for activity reads.
pub trait ActivityRepository {
    /// Loads one activity by id.
    fn get_activity(&self, id: ActivityId) -> RepoResult<Option<Activity>>;
    /// Lists direct children of `parent_id`, or root activities for `None`.
    fn list_children(&self, parent_id: Option<ActivityId>) -> RepoResult<Vec<Activity>>;
    /// Ids reachable from `root_id` within `max_depth` parent-to-child hops.
    ///
    /// Returns an empty set for an unknown root or `max_depth == 0`.
    fn descendant_ids(&self, root_id: ActivityId, max_depth: u32)
        -> RepoResult<BTreeSet<ActivityId>>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["activities"])?;
        Ok(Self { conn })
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn get_activity(&self, id: ActivityId) -> RepoResult<Option<Activity>> {
        let activity = self
            .conn
            .query_row(
                &format!("{ACTIVITY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_activity_row,
            )
            .optional()?;
        Ok(activity)
    }

    fn list_children(&self, parent_id: Option<ActivityId>) -> RepoResult<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACTIVITY_SELECT_SQL}
             WHERE parent_id IS ?1
             ORDER BY id ASC;"
        ))?;
        let activities = stmt
            .query_map([parent_id], parse_activity_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(activities)
    }

    fn descendant_ids(
        &self,
        root_id: ActivityId,
        max_depth: u32,
    ) -> RepoResult<BTreeSet<ActivityId>> {
        if max_depth == 0 {
            return Ok(BTreeSet::new());
        }

        let mut stmt = self.conn.prepare(DESCENDANTS_SQL)?;
        let ids = stmt
            .query_map(params![root_id, max_depth], |row| row.get::<_, ActivityId>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(ids)
    }
}

fn parse_activity_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
    })
}
