use directory_core::db::open_db_in_memory;
use directory_core::repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
use directory_core::seed::{insert_activity, seed_demo_directory};
use std::collections::BTreeSet;

#[test]
fn descendants_stop_at_requested_depth() {
    let mut conn = open_db_in_memory().unwrap();
    let demo = seed_demo_directory(&mut conn).unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();
    let a = demo.activities;

    assert_eq!(
        repo.descendant_ids(a.auto, 1).unwrap(),
        BTreeSet::from([a.cars])
    );
    assert_eq!(
        repo.descendant_ids(a.auto, 2).unwrap(),
        BTreeSet::from([a.cars, a.parts])
    );
    assert_eq!(
        repo.descendant_ids(a.auto, 3).unwrap(),
        BTreeSet::from([a.cars, a.parts, a.engine])
    );
    assert_eq!(
        repo.descendant_ids(a.cars, 10).unwrap(),
        BTreeSet::from([a.parts, a.engine])
    );
}

#[test]
fn leaf_unknown_and_zero_depth_give_empty_set() {
    let mut conn = open_db_in_memory().unwrap();
    let demo = seed_demo_directory(&mut conn).unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    assert!(repo.descendant_ids(demo.activities.food, 2).unwrap().is_empty());
    assert!(repo.descendant_ids(demo.activities.engine, 2).unwrap().is_empty());
    assert!(repo.descendant_ids(9_999, 2).unwrap().is_empty());
    assert!(repo.descendant_ids(demo.activities.auto, 0).unwrap().is_empty());
}

#[test]
fn descendants_include_every_branch() {
    let conn = open_db_in_memory().unwrap();
    let root = insert_activity(&conn, "Services", None).unwrap();
    let left = insert_activity(&conn, "Cleaning", Some(root)).unwrap();
    let right = insert_activity(&conn, "Repair", Some(root)).unwrap();
    let right_child = insert_activity(&conn, "Plumbing", Some(right)).unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.descendant_ids(root, 2).unwrap(),
        BTreeSet::from([left, right, right_child])
    );
}

#[test]
fn cyclic_forest_terminates_and_excludes_root() {
    let mut conn = open_db_in_memory().unwrap();
    let demo = seed_demo_directory(&mut conn).unwrap();
    let a = demo.activities;
    conn.execute(
        "UPDATE activities SET parent_id = ?1 WHERE id = ?2;",
        [a.parts, a.auto],
    )
    .unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.descendant_ids(a.auto, u32::MAX).unwrap(),
        BTreeSet::from([a.cars, a.parts, a.engine])
    );
    assert_eq!(
        repo.descendant_ids(a.cars, u32::MAX).unwrap(),
        BTreeSet::from([a.parts, a.auto, a.engine])
    );
}

#[test]
fn self_parented_activity_has_no_descendants() {
    let conn = open_db_in_memory().unwrap();
    let looped = insert_activity(&conn, "Loop", None).unwrap();
    conn.execute(
        "UPDATE activities SET parent_id = id WHERE id = ?1;",
        [looped],
    )
    .unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    assert!(repo.descendant_ids(looped, 5).unwrap().is_empty());
}

#[test]
fn list_children_is_ordered_and_supports_roots() {
    let mut conn = open_db_in_memory().unwrap();
    let demo = seed_demo_directory(&mut conn).unwrap();
    let extra = insert_activity(&conn, "Trucks", Some(demo.activities.auto)).unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let roots = repo.list_children(None).unwrap();
    let root_ids = roots.iter().map(|activity| activity.id).collect::<Vec<_>>();
    assert_eq!(root_ids, vec![demo.activities.food, demo.activities.auto]);
    assert!(roots.iter().all(|activity| activity.is_root()));

    let children = repo.list_children(Some(demo.activities.auto)).unwrap();
    let child_ids = children.iter().map(|activity| activity.id).collect::<Vec<_>>();
    assert_eq!(child_ids, vec![demo.activities.cars, extra]);
}

#[test]
fn get_activity_reports_absence_as_none() {
    let mut conn = open_db_in_memory().unwrap();
    let demo = seed_demo_directory(&mut conn).unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let cars = repo.get_activity(demo.activities.cars).unwrap().unwrap();
    assert_eq!(cars.name, "Cars");
    assert_eq!(cars.parent_id, Some(demo.activities.auto));
    assert!(repo.get_activity(9_999).unwrap().is_none());
}
