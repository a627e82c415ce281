//! Concurrent access from many request threads sharing one manager.

use std::sync::{Arc, Barrier};
use std::thread;

use scoped_identifiers::IdentifierManager;

#[test]
fn concurrent_inserts_on_one_scope_store_one_entry() {
    let manager = Arc::new(IdentifierManager::new());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let digests: Vec<String> = (0..threads)
        .map(|_| {
            let manager = manager.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                manager.get_temporary_identifier("shared", 77_u64).unwrap()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(digests.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(manager.scope_len("shared"), 1);
    assert_eq!(
        manager.try_get_identifier::<u64>("shared", &digests[0]),
        Some(77)
    );
}

#[test]
fn concurrent_scopes_do_not_interfere() {
    let manager = IdentifierManager::new();

    thread::scope(|s| {
        for t in 0..8_u32 {
            let manager = &manager;
            s.spawn(move || {
                let scope = format!("session-{}", t);
                for id in 0..100_u32 {
                    let digest = manager.get_temporary_identifier(&scope, id).unwrap();
                    assert_eq!(manager.try_get_identifier::<u32>(&scope, &digest), Some(id));
                }
            });
        }
    });

    assert_eq!(manager.scope_count(), 8);
    for t in 0..8 {
        assert_eq!(manager.scope_len(&format!("session-{}", t)), 100);
    }
}

#[test]
fn eviction_racing_with_lookups_sees_whole_or_nothing() {
    let manager = IdentifierManager::new();
    let digests: Vec<(u32, String)> = (0..50_u32)
        .map(|id| (id, manager.get_temporary_identifier("S1", id).unwrap()))
        .collect();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..20 {
                    for (id, digest) in &digests {
                        let found = manager.try_get_identifier::<u32>("S1", digest);
                        assert!(found.is_none() || found == Some(*id));
                    }
                }
            });
        }
        s.spawn(|| {
            manager.remove_identifiers("S1");
        });
    });

    assert!(!manager.contains_scope("S1"));
    for (_, digest) in &digests {
        assert_eq!(manager.try_get_identifier::<u32>("S1", digest), None);
    }
}

#[test]
fn eviction_racing_with_writes_never_returns_another_value() {
    for _ in 0..50 {
        let manager = IdentifierManager::new();
        let barrier = Barrier::new(5);

        let issued: Vec<(u32, String)> = thread::scope(|s| {
            let writers: Vec<_> = (0..4_u32)
                .map(|w| {
                    let manager = &manager;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        (0..50_u32)
                            .map(|i| {
                                let id = w * 1_000 + i;
                                (id, manager.get_temporary_identifier("S", id).unwrap())
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            s.spawn(|| {
                barrier.wait();
                manager.remove_identifiers("S");
            });
            writers
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        for (id, digest) in &issued {
            let found = manager.try_get_identifier::<u32>("S", digest);
            assert!(
                found.is_none() || found == Some(*id),
                "digest for {} resolved to {:?}",
                id,
                found
            );
        }
        assert!(manager.scope_len("S") <= issued.len());
    }
}
