#![cfg(feature = "serde")]
//! Tests for serde support.

use rstest::rstest;
use shoki::persistent::{Hamt, HashSet};

#[rstest]
fn test_hamt_serializes_as_map() {
    let map = Hamt::new().put("key".to_string(), 1);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"key":1}"#);
}

#[rstest]
fn test_hamt_deserializes_from_map() {
    let map: Hamt<String, i32> = serde_json::from_str(r#"{"a":1,"b":2,"c":3}"#).unwrap();
    assert_eq!(map.size(), 3);
    assert_eq!(map.get("b"), Some(&2));
}

#[rstest]
fn test_hamt_survives_serialization() {
    let map: Hamt<String, Vec<u8>> = (0..50)
        .map(|index| (format!("key{index}"), vec![index; 2]))
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    let restored: Hamt<String, Vec<u8>> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);
}

#[rstest]
fn test_hamt_rejects_non_map() {
    let result: Result<Hamt<String, i32>, _> = serde_json::from_str("[1, 2]");
    assert!(result.is_err());
}

#[rstest]
fn test_hashset_serializes_as_sequence() {
    let set = HashSet::new().add(7);
    assert_eq!(serde_json::to_string(&set).unwrap(), "[7]");
}

#[rstest]
fn test_hashset_deserializes_duplicates_once() {
    let set: HashSet<i32> = serde_json::from_str("[1, 2, 2, 3]").unwrap();
    assert_eq!(set.size(), 3);
    assert!(set.contains(&2));
}
