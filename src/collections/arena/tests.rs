#![cfg(test)]

use super::*;

#[test]
fn test_stale_keys() {
    let mut arena = Arena::new();
    let a = arena.insert("a");
    let b = arena.insert("b");

    assert_eq!(arena.remove(a), Some("a"));
    assert!(!arena.contains(a), "A removed key shouldn't resolve.");
    assert_eq!(arena.remove(a), None, "Removing twice should fail the second time.");

    let c = arena.insert("c");
    assert_eq!(
        arena.get(a), None,
        "A stale key shouldn't resolve to the value reusing its slot."
    );
    assert_eq!(arena.get(c), Some(&"c"));
    assert_eq!(arena.get(b), Some(&"b"));
    assert_eq!(arena.len(), 2);
}

#[test]
fn test_slot_reuse() {
    let mut arena = Arena::new();
    let keys: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
    for key in &keys {
        arena.remove(*key);
    }
    assert!(arena.is_empty());

    for i in 10..14 {
        arena.insert(i);
    }
    assert_eq!(arena.capacity(), 4, "Vacant slots should be reused before growing.");
    assert!(keys.iter().all(|key| !arena.contains(*key)));
}

#[test]
fn test_get_mut_and_drain() {
    let mut arena = Arena::new();
    let a = arena.insert(1);
    let b = arena.insert(2);
    let removed = arena.insert(3);
    arena.remove(removed);

    if let Some(value) = arena.get_mut(a) {
        *value += 10;
    }

    let mut drained: Vec<_> = arena.drain().collect();
    drained.sort();
    assert_eq!(drained, [2, 11], "Drain should yield only occupied slots.");
    assert!(arena.is_empty());
    assert!(!arena.contains(a) && !arena.contains(b), "Drained keys should be stale.");

    let fresh = arena.insert(4);
    assert_eq!(arena.get(fresh), Some(&4), "An arena should be reusable after a drain.");
}
