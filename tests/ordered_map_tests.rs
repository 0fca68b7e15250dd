#![cfg(feature = "collection")]
//! Integration tests for `OrderedMap`.

use fpkit::collection::{OrderedMap, OrderedSet};
use rstest::rstest;

fn scores() -> OrderedMap<&'static str, i32> {
    [("carol", 72), ("alice", 90), ("bob", 85)].into_iter().collect()
}

#[rstest]
fn test_new_and_singleton() {
    let empty: OrderedMap<i32, i32> = OrderedMap::new();
    assert!(empty.is_empty());
    let single = OrderedMap::singleton(1, "one");
    assert_eq!(single.len(), 1);
    assert_eq!(single.get(&1), Some(&"one"));
}

#[rstest]
fn test_entries_are_sorted_by_key() {
    let map = scores();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["alice", "bob", "carol"]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![90, 85, 72]);
    assert_eq!(map.first(), Some((&"alice", &90)));
    assert_eq!(map.last(), Some((&"carol", &72)));
}

#[rstest]
fn test_from_iterator_last_duplicate_wins() {
    let map: OrderedMap<char, i32> = [('a', 1), ('b', 2), ('a', 3)].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&'a'), Some(&3));
}

#[rstest]
fn test_lookup() {
    let map = scores();
    assert_eq!(map.get(&"bob"), Some(&85));
    assert_eq!(map.get(&"dave"), None);
    assert_eq!(map.get_key_value(&"carol"), Some((&"carol", &72)));
    assert!(map.contains_key(&"alice"));
}

#[rstest]
fn test_string_keys_with_borrowed_lookup() {
    let map: OrderedMap<String, usize> = ["x", "yy"].into_iter().map(|key| (key.to_string(), key.len())).collect();
    assert_eq!(map.get("yy"), Some(&2));
    assert!(map.contains_key("x"));
    assert_eq!(map.remove("x").len(), 1);
}

#[rstest]
fn test_insert_replaces_and_preserves_original() {
    let original = scores();
    let updated = original.insert("bob", 99).insert("dave", 60);
    assert_eq!(original.get(&"bob"), Some(&85));
    assert_eq!(updated.get(&"bob"), Some(&99));
    assert_eq!(updated.len(), 4);
}

#[rstest]
fn test_insert_with_merges_existing_value() {
    let map = scores()
        .insert_with("alice", 5, |existing, incoming| existing + incoming)
        .insert_with("erin", 5, |existing, incoming| existing + incoming);
    assert_eq!(map.get(&"alice"), Some(&95));
    assert_eq!(map.get(&"erin"), Some(&5));
}

#[rstest]
#[case("bob", Some(86))]
#[case("zed", None)]
fn test_update(#[case] key: &'static str, #[case] expected: Option<i32>) {
    let map = scores().update(&key, |value| value + 1);
    assert_eq!(map.get(&key), expected.as_ref());
    assert_eq!(map.len(), 3);
}

#[rstest]
fn test_remove() {
    let map = scores().remove(&"alice");
    assert!(!map.contains_key(&"alice"));
    assert_eq!(map.len(), 2);
    assert_eq!(scores().remove(&"nobody"), scores());
}

#[rstest]
fn test_range() {
    let map: OrderedMap<i32, char> = (1..=5).zip('a'..='e').collect();
    let middle: Vec<(i32, char)> = map.range(2..=4).map(|(key, value)| (*key, *value)).collect();
    assert_eq!(middle, vec![(2, 'b'), (3, 'c'), (4, 'd')]);
}

#[rstest]
fn test_merge_with_resolves_shared_keys() {
    let left: OrderedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    let right: OrderedMap<&str, i32> = [("b", 10), ("c", 20)].into_iter().collect();
    let merged = left.merge_with(&right, |_, mine, theirs| mine + theirs);
    assert_eq!(
        merged.iter().map(|(key, value)| (*key, *value)).collect::<Vec<_>>(),
        vec![("a", 1), ("b", 12), ("c", 20)]
    );
}

#[rstest]
fn test_key_set() {
    let keys: OrderedSet<&str> = scores().key_set();
    assert_eq!(keys.as_slice(), &["alice", "bob", "carol"]);
}

#[rstest]
fn test_into_iterator_and_debug() {
    let map: OrderedMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    assert_eq!(map.clone().into_iter().collect::<Vec<_>>(), vec![(1, 'a'), (2, 'b')]);
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
}

#[cfg(feature = "stream")]
#[rstest]
#[tokio::test]
async fn test_into_stream_yields_entries() {
    let total = scores().into_stream().map(|(_, score)| score).sum().await;
    assert_eq!(total, 247);
}
