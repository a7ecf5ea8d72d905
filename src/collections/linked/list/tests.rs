#![cfg(test)]

use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::collections::linked::{DetachedEntry, Entry, Position};
use crate::util::alloc::CountedDrop;
use crate::util::panic::assert_panics;

fn values<T: Copy>(list: &LinkedList<T>) -> Vec<T> {
    list.iter().map(|entry| *entry.value()).collect()
}

fn list_of<T>(items: impl IntoIterator<Item = T>) -> (LinkedList<T>, Vec<Entry<T>>) {
    let list = LinkedList::new();
    let entries: Vec<_> = items.into_iter().map(Entry::new).collect();
    for entry in &entries {
        list.put(entry);
    }
    (list, entries)
}

#[test]
fn test_insert_positions() {
    let list = LinkedList::new();
    let [a, b, c, y, z] = ["a", "b", "c", "y", "z"].map(Entry::new);

    list.insert_at_bottom(&a);
    list.insert_at_bottom(&b);
    list.insert_at_top(&z);
    list.insert_after(&c, &a);
    list.insert_before(&y, &z);

    assert_eq!(values(&list), ["y", "z", "a", "c", "b"]);
    assert_eq!(list.first(), Some(y.clone()));
    assert_eq!(list.last(), Some(b.clone()));
    assert_eq!(list.len(), 5);
    list.verify_links();

    let d = Entry::new("d");
    list.insert_after(&d, &b);
    assert_eq!(list.last(), Some(d), "Inserting after the tail should move last.");
    list.verify_links();
}

#[test]
fn test_empty_list() {
    let list = LinkedList::<u8>::new();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(list.first(), None);
    assert_eq!(list.last(), None);
    assert_eq!(list.remove_first(), None);
    assert_eq!(list.iter().count(), 0);
    assert_eq!(list.to_string(), "()");
    list.verify_links();
}

#[test]
fn test_insert_errors() {
    let (list, entries) = list_of([1, 2]);
    let other = LinkedList::new();
    let loose = Entry::new(3);

    assert_eq!(list.try_insert_at_bottom(&entries[0]), Err(AlreadyInList));
    assert_eq!(
        other.try_insert_at_top(&entries[0]),
        Err(AlreadyInList),
        "An entry should belong to at most one list."
    );

    let error = list.try_insert_after(&entries[1], &entries[0]).unwrap_err();
    assert!(error.is_already_in_list());

    let error = other.try_insert_after(&loose, &entries[0]).unwrap_err();
    assert!(error.is_not_in_list(), "The anchor must be in the list being inserted into.");
    assert!(!loose.is_attached(), "A failed insertion shouldn't attach the entry.");

    let error = other.try_insert_before(&loose, &Entry::new(4)).unwrap_err();
    assert_eq!(error, InsertError::NotInList(NotInList));

    assert_panics!({
        list.put(&entries[1]);
    });
    list.verify_links();
    other.verify_links();
}

#[test]
fn test_remove() {
    let (list, entries) = list_of(0..5);

    assert_eq!(list.remove(&entries[2]), entries[2]);
    assert!(!entries[2].is_attached());
    assert!(!list.contains(&entries[2]));
    assert_eq!(values(&list), [0, 1, 3, 4]);

    assert_eq!(
        list.try_remove(&entries[2]),
        Err(NotInList),
        "Removing an entry twice should fail the second time."
    );

    list.remove(&entries[0]);
    list.remove(&entries[4]);
    assert_eq!(list.first(), Some(entries[1].clone()));
    assert_eq!(list.last(), Some(entries[3].clone()));
    list.verify_links();

    let other = LinkedList::new();
    assert_eq!(other.try_remove(&entries[1]), Err(NotInList));
    assert!(list.contains(&entries[1]), "A failed removal shouldn't disturb the real owner.");

    assert_eq!(list.remove_first(), Some(entries[1].clone()));
    assert_eq!(list.remove_first(), Some(entries[3].clone()));
    assert_eq!(list.remove_first(), None);
    assert!(list.is_empty());
    list.verify_links();

    list.put(&entries[2]);
    assert_eq!(values(&list), [2], "A removed entry should be insertable again.");
}

#[test]
fn test_entry_navigation() {
    let (list, entries) = list_of(["a", "b", "c"]);
    let [a, b, c] = [&entries[0], &entries[1], &entries[2]];

    assert_eq!(a.previous(), None);
    assert_eq!(a.next(), Some(b.clone()));
    assert_eq!(c.previous(), Some(b.clone()));
    assert_eq!(c.next(), None);
    assert_eq!(b.list(), Some(list.clone()));

    let d = Entry::new("d");
    b.insert_after(&d);
    assert_eq!(values(&list), ["a", "b", "d", "c"]);

    b.remove();
    assert_eq!(values(&list), ["a", "d", "c"]);
    assert_eq!(b.list(), None);
    assert_eq!(b.try_next(), Err(DetachedEntry));
    assert_eq!(b.try_previous(), Err(DetachedEntry));
    assert_eq!(b.try_remove(), Err(DetachedEntry));
    assert!(b.try_insert_after(&Entry::new("e")).unwrap_err().is_detached());
    assert!(a.try_insert_after(&d).unwrap_err().is_already_in_list());
    assert_panics!({
        b.next();
    });
    list.verify_links();
}

#[test]
fn test_entry_identity() {
    let a = Entry::new(1);
    let b = Entry::new(1);
    assert_ne!(a, b, "Entries should compare by identity, not by payload.");
    assert_eq!(a, a.clone());
    assert_eq!(format!("{a:?}"), "Entry { value: 1, attached: false }");
}

#[test]
fn test_transfer() {
    let (source, entries) = list_of([1, 2, 3]);
    let (target, _) = list_of([0]);
    let cursor = source.new_cursor(Some("scanner"));
    cursor.move_to_entry(&entries[1]);

    assert_eq!(target.transfer(&source), 3);
    assert_eq!(values(&target), [0, 1, 2, 3]);
    assert!(source.is_empty());
    assert_eq!(source.first(), None);
    assert_eq!(
        cursor.position(),
        Position::AtTop,
        "Cursors on moved entries should park at the top of the drained list."
    );

    for entry in &entries {
        assert!(target.contains(entry));
        assert!(!source.contains(entry));
        assert_eq!(entry.list(), Some(target.clone()));
    }
    assert_eq!(entries[0].previous().map(|e| *e.value()), Some(0));
    source.verify_links();
    target.verify_links();

    assert_eq!(target.transfer(&source), 0, "Transferring an empty list moves nothing.");
    assert_eq!(target.transfer(&target.clone()), 0, "Transferring into itself is a no-op.");
    assert_eq!(values(&target), [0, 1, 2, 3]);
}

#[test]
fn test_transfer_matches_repeated_removal() {
    let (source_a, _) = list_of(0..6);
    let (target_a, _) = list_of(10..12);
    let (source_b, _) = list_of(0..6);
    let (target_b, _) = list_of(10..12);

    target_a.transfer(&source_a);
    while let Some(entry) = source_b.remove_first() {
        target_b.put(&entry);
    }

    assert_eq!(values(&target_a), values(&target_b));
    assert_eq!(source_a.is_empty(), source_b.is_empty());
}

#[test]
fn test_drop_detaches_entries() {
    let entry = Entry::new("a");
    {
        let list = LinkedList::new();
        list.put(&entry);
        assert!(entry.is_attached());
    }
    assert!(!entry.is_attached(), "Dropping a list should detach its entries.");

    let list = LinkedList::new();
    list.put(&entry);
    assert!(list.contains(&entry));
}

#[test]
fn test_payloads_released() {
    let counter = CountedDrop::new();
    {
        let list: LinkedList<_> = (0..3).map(|_| counter.clone()).collect();
        let cursor = list.new_cursor(None);
        cursor.next();
        list.remove_first();
    }
    assert_eq!(counter.dropped(), 3, "Every payload should be dropped with its last handle.");
}

#[test]
fn test_iter_stays_exhausted() {
    let list = LinkedList::new();
    let mut iter = list.iter();
    assert_eq!(iter.next(), None);

    list.put(&Entry::new(1));
    assert_eq!(
        iter.next(),
        None,
        "An exhausted iterator shouldn't yield entries inserted into a list that was empty."
    );

    let mut iter = list.iter();
    assert_eq!(iter.next().map(|entry| *entry.value()), Some(1));
    assert_eq!(iter.next(), None);
    list.insert_at_top(&Entry::new(0));
    list.put(&Entry::new(2));
    assert_eq!(iter.next(), None, "An exhausted iterator should stay exhausted.");
    assert_eq!(values(&list), [0, 1, 2]);
}

#[test]
fn test_display() {
    let list: LinkedList<_> = [1, 2, 3].into_iter().collect();
    assert_eq!(list.to_string(), "(1) -> (2) -> (3)");
    assert!(format!("{list:?}").contains("contents: [1, 2, 3], len: 3"));
}

#[test]
fn test_randomized_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let list = LinkedList::new();
    let cursors: Vec<_> = (0..4).map(|_| list.new_cursor(None)).collect();
    let mut model: Vec<Entry<u32>> = Vec::new();

    for value in 0..2_000 {
        match rng.gen_range(0..7) {
            0 => {
                let entry = Entry::new(value);
                list.insert_at_bottom(&entry);
                model.push(entry);
            },
            1 => {
                let entry = Entry::new(value);
                list.insert_at_top(&entry);
                model.insert(0, entry);
            },
            2 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                let entry = Entry::new(value);
                list.insert_after(&entry, &model[index]);
                model.insert(index + 1, entry);
            },
            3 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                let entry = Entry::new(value);
                list.insert_before(&entry, &model[index]);
                model.insert(index, entry);
            },
            4 | 5 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                let expected = match index {
                    0 => Position::AtTop,
                    _ => Position::OnEntry(model[index - 1].clone()),
                };
                let bound: Vec<_> = cursors
                    .iter()
                    .filter(|cursor| cursor.current().as_ref() == Some(&model[index]))
                    .collect();

                list.remove(&model.remove(index));
                for cursor in bound {
                    assert_eq!(
                        cursor.position(),
                        expected,
                        "A cursor on a removed entry should move to its predecessor."
                    );
                }
            },
            _ => {
                let cursor = &cursors[rng.gen_range(0..cursors.len())];
                if rng.gen_bool(0.5) {
                    cursor.next();
                } else {
                    cursor.previous();
                }
            },
        }

        list.verify_links();
        assert_eq!(list.len(), model.len());
        assert_eq!(list.first(), model.first().cloned());
        assert_eq!(list.last(), model.last().cloned());
    }

    let listed: Vec<_> = list.iter().collect();
    assert_eq!(listed, model, "The list should hold the same entries in the same order.");
}

#[test]
fn test_concurrent_producers_and_consumers() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;

    let list = LinkedList::new();
    let consumed: Vec<Vec<usize>> = thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let list = &list;
            scope.spawn(move || {
                for i in 0..PER_PRODUCER {
                    list.put(&Entry::new(producer * PER_PRODUCER + i));
                }
            });
        }

        let consumers: Vec<_> = (0..PRODUCERS)
            .map(|_| {
                let list = &list;
                scope.spawn(move || {
                    let mut taken = Vec::new();
                    while taken.len() < PER_PRODUCER {
                        match list.remove_first() {
                            Some(entry) => taken.push(*entry.value()),
                            None => thread::yield_now(),
                        }
                    }
                    taken
                })
            })
            .collect();

        consumers
            .into_iter()
            .map(|consumer| consumer.join().unwrap())
            .collect()
    });

    let mut all: Vec<_> = consumed.into_iter().flatten().collect();
    all.sort();
    assert_eq!(all, (0..PRODUCERS * PER_PRODUCER).collect::<Vec<_>>());
    assert!(list.is_empty());
    list.verify_links();
}

#[test]
fn test_reciprocal_transfers() {
    let (a, _) = list_of(0..50);
    let (b, _) = list_of(50..100);

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..500 {
                a.transfer(&b);
            }
        });
        scope.spawn(|| {
            for _ in 0..500 {
                b.transfer(&a);
            }
        });
    });

    assert_eq!(a.len() + b.len(), 100, "Transfers shouldn't lose or duplicate entries.");
    assert!(a.is_empty() || b.is_empty(), "The last transfer should have drained one list.");
    a.verify_links();
    b.verify_links();
}

#[test]
fn test_racing_insertions_claim_once() {
    let lists: Vec<LinkedList<usize>> = (0..4).map(|_| LinkedList::new()).collect();
    let entries: Vec<_> = (0..200).map(Entry::new).collect();

    thread::scope(|scope| {
        for list in &lists {
            let entries = &entries;
            scope.spawn(move || {
                for entry in entries {
                    let _ = list.try_put(entry);
                }
            });
        }
    });

    let total: usize = lists.iter().map(LinkedList::len).sum();
    assert_eq!(total, entries.len(), "Each entry should end up in exactly one list.");
    for entry in &entries {
        assert_eq!(lists.iter().filter(|list| list.contains(entry)).count(), 1);
    }
}
