//! Filter composer for company search.
//!
//! # Responsibility
//! - Fold the optional filters of a [`FilterSet`] into one conjunctive
//!   predicate over `companies c`.
//! - Render the paged select and the count from the same conditions.
//!
//! # Invariants
//! - Zero conditions render no `WHERE`; one renders bare; more are AND-ed.
//! - Select and count bind the same condition values in the same order.
//! - Composition is pure: no I/O, no logging.

use crate::geo::plan_geo_predicates;
use crate::model::activity::ActivityId;
use crate::search::filter::FilterSet;
use rusqlite::types::Value;
use std::collections::BTreeSet;

const SUMMARY_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.name AS name,
    c.legal_form AS legal_form
FROM companies c";

const COUNT_SELECT_SQL: &str = "SELECT COUNT(*) FROM companies c";

/// One boolean SQL condition with its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sql: String,
    binds: Vec<Value>,
}

impl Condition {
    pub(crate) fn new(sql: impl Into<String>, binds: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }
}

/// Conjunction of company conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPredicate {
    conditions: Vec<Condition>,
}

impl CompanyPredicate {
    /// Predicate that matches every company.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Adds one condition to the conjunction.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_match_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders the `WHERE` clause, including its leading space.
    pub fn where_clause(&self) -> String {
        match self.conditions.as_slice() {
            [] => String::new(),
            [single] => format!(" WHERE {}", single.sql),
            many => {
                let joined = many
                    .iter()
                    .map(|condition| format!("({})", condition.sql))
                    .collect::<Vec<_>>()
                    .join(" AND ");
                format!(" WHERE {joined}")
            }
        }
    }

    /// Bind values of the `WHERE` clause in placeholder order.
    pub fn bind_values(&self) -> Vec<Value> {
        self.conditions
            .iter()
            .flat_map(|condition| condition.binds.iter().cloned())
            .collect()
    }

    /// Paged summary select ordered by company id.
    ///
    /// Bind with [`Self::select_binds`].
    pub fn select_sql(&self) -> String {
        format!(
            "{SUMMARY_SELECT_SQL}{} ORDER BY c.id ASC LIMIT ? OFFSET ?",
            self.where_clause()
        )
    }

    pub fn select_binds(&self, limit: u32, offset: u32) -> Vec<Value> {
        let mut binds = self.bind_values();
        binds.push(Value::Integer(i64::from(limit)));
        binds.push(Value::Integer(i64::from(offset)));
        binds
    }

    /// Count over the same conditions as [`Self::select_sql`].
    ///
    /// Bind with [`Self::bind_values`].
    pub fn count_sql(&self) -> String {
        format!("{COUNT_SELECT_SQL}{}", self.where_clause())
    }
}

/// Composes the company predicate for `filters`.
///
/// `descendants` is the resolved descendant set of `filters.activity_id`;
/// it only widens the category match when `activity_children` is set.
pub fn compose(filters: &FilterSet, descendants: &BTreeSet<ActivityId>) -> CompanyPredicate {
    let mut predicate = CompanyPredicate::match_all();

    if let Some(building_id) = filters.building_id {
        predicate = predicate.and(Condition::new(
            "c.building_id = ?",
            vec![Value::Integer(building_id)],
        ));
    }

    if let Some(needle) = filters.name_needle() {
        predicate = predicate.and(Condition::new(
            "instr(casefold(c.name), ?) > 0",
            vec![Value::Text(needle)],
        ));
    }

    for geo in plan_geo_predicates(filters).predicates {
        predicate = predicate.and(geo.building_condition());
    }

    if let Some(activity) = filters.activity() {
        let mut scope = BTreeSet::from([activity.activity_id]);
        if activity.include_children {
            scope.extend(descendants.iter().copied());
        }
        predicate = predicate.and(activity_membership(&scope));
    }

    predicate
}

fn activity_membership(scope: &BTreeSet<ActivityId>) -> Condition {
    let placeholders = vec!["?"; scope.len()].join(", ");
    Condition::new(
        format!(
            "c.id IN (
                SELECT ca.company_id FROM company_activities ca
                WHERE ca.activity_id IN ({placeholders})
            )"
        ),
        scope.iter().copied().map(Value::Integer).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{compose, CompanyPredicate};
    use crate::search::filter::FilterSet;
    use rusqlite::types::Value;
    use std::collections::BTreeSet;

    fn no_descendants() -> BTreeSet<i64> {
        BTreeSet::new()
    }

    #[test]
    fn unfiltered_search_has_no_where_clause() {
        let predicate = compose(&FilterSet::new(), &no_descendants());
        assert!(predicate.is_match_all());
        assert_eq!(predicate.where_clause(), "");
        assert_eq!(predicate.count_sql(), "SELECT COUNT(*) FROM companies c");
        assert!(predicate.select_sql().ends_with("ORDER BY c.id ASC LIMIT ? OFFSET ?"));
        assert_eq!(
            predicate.select_binds(10, 20),
            vec![Value::Integer(10), Value::Integer(20)]
        );
    }

    #[test]
    fn single_condition_is_not_wrapped() {
        let predicate = compose(&FilterSet::new().with_building(4), &no_descendants());
        assert_eq!(predicate.where_clause(), " WHERE c.building_id = ?");
        assert_eq!(predicate.bind_values(), vec![Value::Integer(4)]);
    }

    #[test]
    fn several_conditions_are_conjoined() {
        let filters = FilterSet::new().with_building(4).with_name("Еда");
        let predicate = compose(&filters, &no_descendants());
        assert_eq!(
            predicate.where_clause(),
            " WHERE (c.building_id = ?) AND (instr(casefold(c.name), ?) > 0)"
        );
        assert_eq!(
            predicate.bind_values(),
            vec![Value::Integer(4), Value::Text("еда".to_string())]
        );
    }

    #[test]
    fn count_and_select_share_conditions() {
        let filters = FilterSet::new()
            .with_activity(1, false)
            .near(55.0, 37.0, 100)
            .with_offset(30);
        let predicate = compose(&filters, &no_descendants());
        let where_clause = predicate.where_clause();
        assert!(predicate.count_sql().ends_with(&where_clause));
        assert!(predicate.select_sql().contains(&where_clause));

        let select_binds = predicate.select_binds(10, 30);
        assert_eq!(
            &select_binds[..select_binds.len() - 2],
            predicate.bind_values().as_slice()
        );
    }

    #[test]
    fn descendants_only_apply_with_children_flag() {
        let descendants = BTreeSet::from([2, 3]);

        let exact = compose(&FilterSet::new().with_activity(1, false), &descendants);
        assert_eq!(exact.bind_values(), vec![Value::Integer(1)]);

        let tree = compose(&FilterSet::new().with_activity(1, true), &descendants);
        assert_eq!(
            tree.bind_values(),
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
        assert!(tree.conditions()[0].sql().contains("IN (?, ?, ?)"));
    }

    #[test]
    fn partial_geo_inputs_add_nothing() {
        let filters = FilterSet {
            lat: Some(55.0),
            radius: Some(100),
            ..FilterSet::default()
        };
        assert_eq!(compose(&filters, &no_descendants()), CompanyPredicate::match_all());
    }

    #[test]
    fn both_geo_modes_add_two_conditions() {
        let filters = FilterSet::new()
            .near(55.7558, 37.6173, 500)
            .within_corners(37.4275, 55.7571, 37.7994, 55.6241);
        let predicate = compose(&filters, &no_descendants());
        assert_eq!(predicate.conditions().len(), 2);
        assert!(predicate.conditions()[0].sql().contains("geo_distance_m"));
        assert!(predicate.conditions()[1].sql().contains("b.longitude BETWEEN"));
    }
}
