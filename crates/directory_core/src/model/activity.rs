//! Business activity (category) model.

use serde::{Deserialize, Serialize};

/// Identifier of one activity node.
pub type ActivityId = i64;

/// One node of the activity forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// `None` for root activities.
    pub parent_id: Option<ActivityId>,
}

impl Activity {
    /// Returns whether this activity has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
