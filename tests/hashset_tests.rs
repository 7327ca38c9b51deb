//! Unit tests for HashSet.

use rstest::rstest;
use shoki::persistent::HashSet;
use shoki::typeclass::{Sizable, SizeInfo};

#[rstest]
fn test_add_and_contains() {
    let set = HashSet::new().add("a").add("b");
    assert!(set.contains(&"a"));
    assert!(set.contains(&"b"));
    assert!(!set.contains(&"c"));
    assert_eq!(set.size(), 2);
}

#[rstest]
fn test_add_leaves_receiver_untouched() {
    let set: HashSet<i32> = (0..10).collect();
    let extended = set.add(10);
    assert_eq!(set.size(), 10);
    assert_eq!(extended.size(), 11);
    assert!(!set.contains(&10));
}

#[rstest]
fn test_remove_everything() {
    let set: HashSet<u32> = (0..1_000).collect();
    let emptied = (0..1_000).fold(set.clone(), |set, element| set.remove(&element));

    assert!(emptied.is_empty());
    assert_eq!(emptied.size_info(), SizeInfo::known(0));
    assert_eq!(set.size(), 1_000);
}

#[rstest]
fn test_iter_yields_each_element_once() {
    let set: HashSet<i32> = [3, 1, 2, 3, 1].into_iter().collect();
    let mut elements: Vec<i32> = set.iter().copied().collect();
    elements.sort_unstable();
    assert_eq!(elements, vec![1, 2, 3]);
    assert_eq!((&set).into_iter().count(), 3);
}

#[rstest]
fn test_custom_strategies_with_collisions() {
    let set = HashSet::empty(|left: &i32, right: &i32| left == right, |_: &i32| 0_u32);
    let set = (0..20).fold(set, |set, element| set.add(element));

    assert_eq!(set.size(), 20);
    assert!((0..20).all(|element| set.contains(&element)));
    assert_eq!(set.remove(&5).size(), 19);
}

#[rstest]
fn test_clone_and_equality() {
    let set: HashSet<String> = ["x", "y"].into_iter().map(String::from).collect();
    let cloned = set.clone();
    assert_eq!(set, cloned);
    assert_ne!(set, cloned.add("z".to_string()));
}
