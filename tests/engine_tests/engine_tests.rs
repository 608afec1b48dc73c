//! Tests for Engine
//!
//! These tests verify:
//! - Opening (directory creation, in-memory mode, config validation)
//! - Persistence across close/reopen
//! - Waiting for a file held by another handle
//! - Command execution
//! - Concurrent access patterns
//! - Engine lifecycle (open/close) and accessors

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use grovekv::config::{Config, SyncStrategy};
use grovekv::engine::Engine;
use grovekv::{CollectionKind, Command, Direction, GroveError, Reply};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("test.redb"))
        .sync_strategy(SyncStrategy::Immediate)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

// =============================================================================
// Open / Close
// =============================================================================

#[test]
fn test_engine_open_creates_directories() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("dirs").join("grove.redb");

    let _engine = Engine::open(Config::builder().path(&db_path).build()).unwrap();

    assert!(db_path.exists());
}

#[test]
fn test_engine_in_memory() {
    let engine = Engine::in_memory().unwrap();

    engine.hset("h", b"f", b"v").unwrap();
    engine.zadd("z", 1.0, b"m").unwrap();

    assert_eq!(engine.hget("h", b"f").unwrap(), Some(b"v".to_vec()));
    assert_eq!(engine.zcard("z").unwrap(), 1);
    assert_eq!(engine.path(), None);
}

#[test]
fn test_engine_rejects_invalid_config() {
    let config = Config::builder().open_timeout(Duration::ZERO).build();

    assert!(matches!(Engine::open(config), Err(GroveError::Config(_))));
}

#[test]
fn test_engine_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.redb");

    {
        let engine = Engine::open_path(&db_path).unwrap();
        engine.hset("user", b"name", b"Alice").unwrap();
        engine.hincr("user", b"visits", 3).unwrap();
        engine.zadd("board", 42.0, b"alice").unwrap();
        engine.zadd("board", -1.0, b"bob").unwrap();
        engine.close().unwrap();
    }

    let engine = Engine::open_path(&db_path).unwrap();
    assert_eq!(engine.hget("user", b"name").unwrap(), Some(b"Alice".to_vec()));
    assert_eq!(engine.hget_int("user", b"visits").unwrap(), 3);
    assert_eq!(engine.zrange("board", 0, -1).unwrap(), vec![b"bob".to_vec(), b"alice".to_vec()]);
    assert_eq!(engine.kind("board").unwrap(), Some(CollectionKind::SortedSet));
}

#[test]
fn test_engine_open_times_out_while_locked() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.redb");
    let _holder = Engine::open_path(&db_path).unwrap();

    let config = Config::builder()
        .path(&db_path)
        .open_timeout(Duration::from_millis(100))
        .build();
    let started = Instant::now();

    assert!(matches!(Engine::open(config), Err(GroveError::Open { .. })));
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_engine_open_waits_for_release() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.redb");
    let holder = Engine::open_path(&db_path).unwrap();
    holder.hset("h", b"f", b"v").unwrap();

    let releaser = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        holder.close().unwrap();
    });

    let config = Config::builder()
        .path(&db_path)
        .open_timeout(Duration::from_secs(10))
        .build();
    let engine = Engine::open(config).unwrap();
    releaser.join().unwrap();

    assert_eq!(engine.hget("h", b"f").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn test_engine_eventual_sync() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("test.redb"))
        .sync_strategy(SyncStrategy::Eventual)
        .build();
    let engine = Engine::open(config).unwrap();

    engine.hincr("c", b"n", 1).unwrap();
    engine.hincr("c", b"n", 1).unwrap();

    assert_eq!(engine.hget_int("c", b"n").unwrap(), 2);
}

#[test]
fn test_engine_open_path_convenience() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("grove.redb");

    let engine = Engine::open_path(&db_path).unwrap();

    assert_eq!(engine.path(), Some(db_path.as_path()));
    assert_eq!(engine.config().open_timeout, Duration::from_secs(1));
}

// =============================================================================
// Command Execution
// =============================================================================

#[test]
fn test_engine_execute_hash_commands() {
    let (_temp, engine) = setup_temp_engine();

    let reply = engine
        .execute(Command::HSet {
            key: "user".into(),
            field: b"name".to_vec(),
            value: b"Alice".to_vec(),
        })
        .unwrap();
    assert_eq!(reply, Reply::Ok);

    let reply = engine
        .execute(Command::HGet {
            key: "user".into(),
            field: b"name".to_vec(),
        })
        .unwrap();
    assert_eq!(reply, Reply::Value(Some(b"Alice".to_vec())));

    let reply = engine
        .execute(Command::HIncr {
            key: "user".into(),
            field: b"visits".to_vec(),
            delta: -4,
        })
        .unwrap();
    assert_eq!(reply, Reply::Int(-4));

    let reply = engine
        .execute(Command::HDel {
            key: "user".into(),
            fields: vec![b"name".to_vec()],
        })
        .unwrap();
    assert_eq!(reply, Reply::Ok);

    let reply = engine.execute(Command::HLen { key: "user".into() }).unwrap();
    assert_eq!(reply, Reply::Count(1));
}

#[test]
fn test_engine_execute_sorted_set_commands() {
    let (_temp, engine) = setup_temp_engine();

    for (score, member) in [(3.0, "c"), (1.0, "a"), (2.0, "b")] {
        let reply = engine
            .execute(Command::ZAdd {
                key: "z".into(),
                score,
                member: member.as_bytes().to_vec(),
            })
            .unwrap();
        assert_eq!(reply, Reply::Bool(true));
    }

    let reply = engine
        .execute(Command::ZRange {
            key: "z".into(),
            start: 0,
            stop: 1,
            direction: Direction::Reverse,
            with_scores: false,
        })
        .unwrap();
    assert_eq!(reply, Reply::Members(vec![b"c".to_vec(), b"b".to_vec()]));

    let reply = engine
        .execute(Command::ZRange {
            key: "z".into(),
            start: -1,
            stop: -1,
            direction: Direction::Forward,
            with_scores: true,
        })
        .unwrap();
    assert_eq!(reply, Reply::Scored(vec![(b"c".to_vec(), 3.0)]));

    let reply = engine
        .execute(Command::ZScore {
            key: "z".into(),
            member: b"b".to_vec(),
        })
        .unwrap();
    assert_eq!(reply, Reply::Float(2.0));

    let reply = engine
        .execute(Command::ZRem {
            key: "z".into(),
            member: b"b".to_vec(),
        })
        .unwrap();
    assert_eq!(reply, Reply::Bool(true));

    let reply = engine.execute(Command::ZCard { key: "z".into() }).unwrap();
    assert_eq!(reply, Reply::Count(2));
}

#[test]
fn test_engine_execute_catalog_commands() {
    let (_temp, engine) = setup_temp_engine();
    engine.hset("h", b"f", b"v").unwrap();

    let reply = engine.execute(Command::Kind { key: "h".into() }).unwrap();
    assert_eq!(reply, Reply::Kind(Some(CollectionKind::Hash)));

    let reply = engine.execute(Command::Collections).unwrap();
    assert_eq!(reply, Reply::Collections(vec![("h".to_string(), CollectionKind::Hash)]));

    let reply = engine.execute(Command::Del { key: "h".into() }).unwrap();
    assert_eq!(reply, Reply::Ok);

    let reply = engine.execute(Command::Kind { key: "h".into() }).unwrap();
    assert_eq!(reply, Reply::Kind(None));
}

#[test]
fn test_engine_execute_propagates_errors() {
    let (_temp, engine) = setup_temp_engine();
    engine.hset("h", b"f", b"v").unwrap();

    let result = engine.execute(Command::ZCard { key: "h".into() });

    assert!(matches!(result, Err(GroveError::WrongType { .. })));
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_engine_concurrent_increments() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let mut handles = vec![];
    for _ in 0..4 {
        let engine_clone = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                engine_clone.hincr("counters", b"hits", 1).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.hget_int("counters", b"hits").unwrap(), 100);
}

#[test]
fn test_engine_concurrent_readers_see_consistent_sets() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..50 {
                let member = format!("m{i}");
                engine.zadd("z", i as f64, member.as_bytes()).unwrap();
                engine.zadd("z", -(i as f64), member.as_bytes()).unwrap();
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..3 {
        let engine = Arc::clone(&engine);
        readers.push(thread::spawn(move || {
            for _ in 0..50 {
                let ranked = engine.zrange_with_scores("z", 0, -1, Direction::Forward).unwrap();
                let mut members: Vec<_> = ranked.iter().map(|(m, _)| m.clone()).collect();
                members.sort();
                members.dedup();
                assert_eq!(members.len(), ranked.len());
            }
        }));
    }

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(engine.zcard("z").unwrap(), 50);
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_engine_binary_data() {
    let (_temp, engine) = setup_temp_engine();

    let field = b"\x00\x01\x02\xFF\xFE";
    let value = b"\xFF\x00\xAB\xCD\x00";

    engine.hset("bin", field, value).unwrap();
    engine.zadd("bin_z", 1.0, field).unwrap();

    assert_eq!(engine.hget("bin", field).unwrap(), Some(value.to_vec()));
    assert_eq!(engine.zrange("bin_z", 0, -1).unwrap(), vec![field.to_vec()]);
}

#[test]
fn test_engine_large_value() {
    let (_temp, engine) = setup_temp_engine();

    let large_value = vec![0xAB; 100_000]; // 100 KB
    engine.hset("big", b"blob", &large_value).unwrap();

    assert_eq!(engine.hget("big", b"blob").unwrap(), Some(large_value));
}
