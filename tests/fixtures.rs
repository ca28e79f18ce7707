//! # Fixture-Based Tests for the Indexviz B+ Tree
//!
//! These tests pin the exact tree shape produced by known insertion sequences
//! against JSON fixtures under `tests/fixtures/`. The fixtures use the same
//! snapshot format a renderer consumes.

use indexviz::{Explorer, NodeSnapshot, Tree, TreeSnapshot};
use serde_json::{json, Value};

const SCENARIO_JSON: &str = include_str!("fixtures/scenario.json");

fn scenario_tree() -> Tree<i32> {
	[10, 20, 5, 6, 12, 30, 7, 17].into_iter().collect()
}

// ===========================================================================
// Scenario Fixture
// ===========================================================================

#[test]
fn scenario_matches_fixture() {
	let expected: Value = serde_json::from_str(SCENARIO_JSON).unwrap();
	let actual = serde_json::to_value(scenario_tree().snapshot()).unwrap();
	assert_eq!(actual, expected);
}

#[test]
fn scenario_fixture_deserialises() {
	let fixture: TreeSnapshot<i32> = serde_json::from_str(SCENARIO_JSON).unwrap();
	assert_eq!(fixture, scenario_tree().snapshot());

	let leaves: Vec<&NodeSnapshot<i32>> = fixture.root.leaves();
	let ids: Vec<usize> = leaves.iter().map(|leaf| leaf.id().index()).collect();
	assert_eq!(ids, vec![0, 4, 3, 7, 1]);
}

#[test]
fn scenario_paths_against_fixture() {
	let tree = scenario_tree();

	let miss = tree.search(&15);
	assert!(!miss.found);
	assert_eq!(serde_json::to_value(&miss).unwrap(), json!({ "found": false, "path": [6, 5, 3] }));

	let scan = tree.range_scan(&6, &17);
	let path: Vec<usize> = scan.path().iter().map(|id| id.index()).collect();
	assert_eq!(path, vec![6, 2, 0]);
}

// ===========================================================================
// Small Fixtures
// ===========================================================================

#[test]
fn first_split_fixture() {
	let tree: Tree<i32> = [1, 2, 3].into_iter().collect();
	let expected = json!({
		"order": 3,
		"height": 2,
		"len": 3,
		"root": {
			"kind": "internal",
			"id": 2,
			"keys": [3],
			"children": [
				{ "kind": "leaf", "id": 0, "keys": [1, 2], "next": 1 },
				{ "kind": "leaf", "id": 1, "keys": [3], "next": null }
			]
		}
	});
	assert_eq!(serde_json::to_value(tree.snapshot()).unwrap(), expected);
}

#[test]
fn empty_tree_fixture() {
	let tree: Tree<i32> = Tree::new();
	let expected = json!({
		"order": 3,
		"height": 1,
		"len": 0,
		"root": { "kind": "leaf", "id": 0, "keys": [], "next": null }
	});
	assert_eq!(serde_json::to_value(tree.snapshot()).unwrap(), expected);
}

#[test]
fn explorer_snapshot_uses_numbers() {
	let explorer = Explorer::new();
	explorer.bulk_load(&[2.5, 1.0]).unwrap();
	let expected = json!({
		"order": 3,
		"height": 1,
		"len": 2,
		"root": { "kind": "leaf", "id": 0, "keys": [1.0, 2.5], "next": null }
	});
	assert_eq!(serde_json::to_value(explorer.snapshot()).unwrap(), expected);
}
