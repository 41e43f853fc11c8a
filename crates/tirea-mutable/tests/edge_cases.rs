//! Edge cases: lifecycle misuse, faults during analysis and change set output.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tirea_mutable::{
    ChangedFields, Equaler, JsonStyle, Mutable, MutableError, Shared, Status, Tracker,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
struct Engine {
    #[serde(skip)]
    tracker: Tracker<Engine>,
    pub power: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
struct Car {
    #[serde(skip)]
    tracker: Tracker<Car>,
    pub color: String,
    pub doors: u8,
    #[mutable(deep)]
    pub engine: Engine,
    #[mutable(deep)]
    pub turbo: Shared<Engine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Fragile(u8);

impl Equaler for Fragile {
    fn equal(&self, _other: &Self) -> bool {
        panic!("comparison exploded")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Mutable)]
struct WithFragile {
    #[serde(skip)]
    tracker: Tracker<WithFragile>,
    pub before: String,
    #[mutable(equaler)]
    pub fragile: Fragile,
    pub after: String,
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_reset_is_idempotent() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.reset().unwrap();

    assert_eq!(car.status(), Status::NotChanged);
    assert!(car.changed_fields().is_empty());
    assert!(car.analyze_changes().is_empty());
}

#[test]
fn test_reset_clears_status_and_changes() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.set_value("doors", 4u8).unwrap();
    assert_eq!(car.status(), Status::Changed);

    car.reset().unwrap();
    assert_eq!(car.status(), Status::NotChanged);
    assert!(car.changed_fields().is_empty());
    assert_eq!(car.checkpoint().unwrap().doors, 4);
}

#[test]
fn test_reset_without_tracker_is_invalid_target() {
    let mut point = Point::default();
    let err = point.reset().unwrap_err();
    assert!(err.is_invalid_target());
    assert!(err.to_string().contains("Point"));
}

#[test]
fn test_analyze_before_reset_is_empty() {
    let mut car = Car::default();
    car.color = "red".into();
    assert!(car.analyze_changes().is_empty());
    assert!(!car.has_checkpoint());
}

#[test]
fn test_checkpoint_holds_no_nested_checkpoints() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.reset().unwrap();

    let checkpoint = car.checkpoint().unwrap();
    assert!(!checkpoint.has_checkpoint());
    assert!(!checkpoint.engine.has_checkpoint());
    assert!(car.engine.has_checkpoint());
}

#[test]
fn test_analysis_leaves_status_alone() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.set_status(Status::Added);
    car.doors = 2;

    car.analyze_changes();
    assert_eq!(car.status(), Status::Added);
}

#[test]
fn test_analysis_merges_into_change_set() {
    let mut car = Car::default();
    car.reset().unwrap();

    car.set_value("color", "blue").unwrap();
    car.doors = 5;

    let changes = car.analyze_changes();
    assert_eq!(changes.keys(), vec!["color", "doors"]);
    assert_eq!(car.changed_fields().keys(), vec!["color", "doors"]);
}

#[test]
fn test_nested_reset_failure_names_member() {
    let mut car = Car::default();
    let handle = car.turbo.clone();
    let _guard = handle.borrow();

    let err = car.reset().unwrap_err();
    assert!(err.is_nested_reset());
    match err {
        MutableError::NestedReset { field, source } => {
            assert_eq!(field, "turbo");
            assert!(matches!(*source, MutableError::AlreadyBorrowed { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_failed_reset_keeps_previous_checkpoint() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.set_value("doors", 4u8).unwrap();

    let handle = car.turbo.clone();
    let guard = handle.borrow();
    assert!(car.reset().unwrap_err().is_nested_reset());

    assert_eq!(car.status(), Status::Changed);
    assert!(car.changed_fields().contains("doors"));
    assert_eq!(car.checkpoint().map(|c| c.doors), Some(0));

    drop(guard);
    car.reset().unwrap();
    assert_eq!(car.status(), Status::NotChanged);
    assert_eq!(car.checkpoint().map(|c| c.doors), Some(4));
}

#[test]
fn test_diff_against_explicit_baseline() {
    let baseline = Point { x: 1, y: 2 };
    let mut moved = Point { x: 1, y: 3 };

    let changes = moved.diff_against(&baseline);
    assert_eq!(changes.keys(), vec!["y"]);
    assert_eq!(changes.get("y").unwrap().old_value, json!(2));
}

// ============================================================================
// Faults during analysis
// ============================================================================

#[test]
fn test_panicking_equaler_returns_partial_result() {
    let mut item = WithFragile::default();
    item.reset().unwrap();

    item.before = "x".into();
    item.after = "y".into();

    let changes = item.analyze_changes();
    assert_eq!(changes.keys(), vec!["before"]);

    // The checkpoint survives the fault.
    assert!(item.has_checkpoint());
}

#[test]
fn test_borrowed_shared_member_aborts_analysis() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.color = "green".into();
    car.doors = 3;

    let handle = car.turbo.clone();
    let _guard = handle.borrow_mut();

    let changes = car.analyze_changes();
    assert!(changes.contains("color"));
    assert!(changes.contains("doors"));
    assert!(!changes.contains("turbo"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_compact_json_output() {
    let mut car = Car {
        color: "one".into(),
        ..Default::default()
    };
    car.reset().unwrap();
    car.color = "two".into();
    car.engine.power = 90;

    let changes = car.analyze_changes();
    let text = changes.to_json(JsonStyle::Compact).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(
        parsed,
        json!({
            "color": {"old_value": "one", "new_value": "two"},
            "engine": {
                "old_value": null,
                "new_value": null,
                "nested_fields": {
                    "power": {"old_value": 0, "new_value": 90}
                }
            }
        })
    );
}

#[test]
fn test_pretty_output_round_trips() {
    let mut car = Car::default();
    car.reset().unwrap();
    car.doors = 4;

    let changes = car.analyze_changes();
    let text = changes.to_string();
    assert!(text.contains("\n\t\"doors\""));

    let back: ChangedFields = serde_json::from_str(&text).unwrap();
    assert_eq!(back.get("doors").unwrap().name, "doors");
    assert_eq!(back.get("doors").unwrap().new_value, json!(4));
}
