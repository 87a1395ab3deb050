//! End-to-end tests for index metadata records and their two encodings.

use std::collections::BTreeSet;
use std::sync::Arc;

use index_meta::{
    Error, IndexMetadata, IndexMetadataBuilder, Settings, ValidationReason, SETTING_ALIASES,
    SETTING_NUMBER_OF_REPLICAS, SETTING_NUMBER_OF_SHARDS,
};
use tempfile::TempDir;

const DOC_SOURCE: &str = "{\"properties\":{}}";

/// Helper for the "logs" index used throughout: 3 shards, 2 replicas, one mapping.
fn logs() -> IndexMetadata {
    let mut builder = IndexMetadata::builder("logs");
    builder
        .number_of_shards(3)
        .number_of_replicas(2)
        .put_mapping("doc", DOC_SOURCE);
    builder.build().unwrap()
}

fn with_aliases(aliases: &[&str]) -> IndexMetadata {
    let settings = Settings::builder()
        .put(SETTING_NUMBER_OF_SHARDS, 1)
        .put(SETTING_NUMBER_OF_REPLICAS, 1)
        .put_array(SETTING_ALIASES, aliases)
        .build();
    let mut builder = IndexMetadata::builder("aliased");
    builder.settings(settings);
    builder.build().unwrap()
}

#[test]
fn test_logs_scenario() {
    let meta = logs();
    assert_eq!(meta.total_number_of_shards(), 9);

    let json = meta.to_json_value();
    let settings = json["logs"]["settings"].as_object().unwrap();
    assert!(settings.contains_key(SETTING_NUMBER_OF_SHARDS));
    assert!(settings.contains_key(SETTING_NUMBER_OF_REPLICAS));
    assert_eq!(json["logs"]["mappings"]["doc"]["source"], DOC_SOURCE);
}

#[test]
fn test_total_shards_for_valid_counts() {
    for shards in 0..8i64 {
        for replicas in 0..4i64 {
            let mut builder = IndexMetadata::builder("grid");
            builder.number_of_shards(shards).number_of_replicas(replicas);
            let meta = builder.build().unwrap();
            assert_eq!(
                meta.total_number_of_shards() as i64,
                shards * (replicas + 1)
            );
        }
    }
}

#[test]
fn test_missing_or_negative_counts_fail() {
    let cases: [(Option<i64>, Option<i64>); 5] = [
        (None, None),
        (Some(1), None),
        (None, Some(1)),
        (Some(-1), Some(1)),
        (Some(1), Some(-3)),
    ];

    for (shards, replicas) in cases.iter() {
        let mut builder = IndexMetadata::builder("broken");
        if let Some(n) = shards {
            builder.number_of_shards(*n);
        }
        if let Some(n) = replicas {
            builder.number_of_replicas(*n);
        }

        match builder.build() {
            Err(Error::Validation { index, reason, .. }) => {
                assert_eq!(index, "broken");
                assert!(matches!(
                    reason,
                    ValidationReason::Missing | ValidationReason::Negative(_)
                ));
            }
            other => panic!(
                "{:?}/{:?}: expected validation error, got {:?}",
                shards, replicas, other
            ),
        }
    }
}

#[test]
fn test_binary_round_trip() {
    let records = vec![
        logs(),
        with_aliases(&["a", "b"]),
        {
            let mut builder = IndexMetadata::builder("minimal");
            builder.number_of_shards(1).number_of_replicas(0);
            builder.build().unwrap()
        },
    ];

    for meta in records {
        let decoded = IndexMetadata::from_bytes(&meta.to_bytes(), None).unwrap();
        assert_eq!(decoded, meta);
        assert_eq!(decoded.aliases(), meta.aliases());
        assert_eq!(decoded.total_number_of_shards(), meta.total_number_of_shards());
    }
}

#[test]
fn test_text_round_trip() {
    for meta in vec![logs(), with_aliases(&["x"])] {
        let decoded = IndexMetadata::from_json_str(&meta.to_json_string(), None).unwrap();
        assert_eq!(decoded, meta);
    }
}

#[test]
fn test_round_trip_with_shared_globals() {
    let globals = Settings::builder()
        .put("index.refresh_interval", "1s")
        .put(SETTING_NUMBER_OF_REPLICAS, 1)
        .build();

    let mut builder = IndexMetadata::builder("events");
    builder.settings(
        Settings::builder()
            .global_settings(Some(&globals))
            .put(SETTING_NUMBER_OF_SHARDS, 4)
            .build(),
    );
    let meta = builder.build().unwrap();
    assert_eq!(meta.total_number_of_shards(), 8);

    let from_binary = IndexMetadata::from_bytes(&meta.to_bytes(), Some(&globals)).unwrap();
    let from_text = IndexMetadata::from_json_str(&meta.to_json_string(), Some(&globals)).unwrap();
    assert_eq!(from_binary, meta);
    assert_eq!(from_text, meta);
}

#[test]
fn test_update_by_copy_isolation() {
    let first = with_aliases(&["a", "b"]);
    let mut staged = IndexMetadataBuilder::from(&first);
    staged
        .put_mapping("doc", DOC_SOURCE)
        .settings(
            Settings::builder()
                .put(SETTING_NUMBER_OF_SHARDS, 2)
                .put(SETTING_NUMBER_OF_REPLICAS, 0)
                .build(),
        );
    let second = staged.build().unwrap();

    let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(first.aliases(), &expected);
    assert!(first.mappings().is_empty());
    assert!(second.aliases().is_empty());
    assert_eq!(second.mapping("doc"), Some(DOC_SOURCE));
}

#[test]
fn test_aliases_derivation() {
    let meta = with_aliases(&["a", "b"]);
    let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(meta.aliases(), &expected);

    assert!(logs().aliases().is_empty());
}

#[test]
fn test_truncated_mapping_table() {
    let mut builder = IndexMetadata::builder("logs");
    builder
        .number_of_shards(3)
        .number_of_replicas(2)
        .put_mapping("a", "{}")
        .put_mapping("b", "{}")
        .put_mapping("c", "{}");
    let bytes = builder.build().unwrap().to_bytes();

    // Chop the last two (type, source) pairs: each is 2 + 3 bytes.
    let cut = &bytes[..bytes.len() - 10];
    match IndexMetadata::from_bytes(cut, None) {
        Err(Error::TruncatedStream { .. }) => {}
        other => panic!("expected truncated stream, got {:?}", other),
    }
}

#[test]
fn test_records_shared_across_threads() {
    let meta = Arc::new(logs());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let meta = Arc::clone(&meta);
            std::thread::spawn(move || (meta.total_number_of_shards(), meta.to_bytes()))
        })
        .collect();

    let expected = meta.to_bytes();
    for handle in handles {
        let (total, bytes) = handle.join().unwrap();
        assert_eq!(total, 9);
        assert_eq!(bytes, expected);
    }
}

#[test]
fn test_files_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let meta = logs();

    let json_path = temp_dir.path().join("logs.json");
    std::fs::write(&json_path, meta.to_json_string_pretty()).unwrap();
    let bin_path = temp_dir.path().join("logs.meta");
    let mut file = std::fs::File::create(&bin_path).unwrap();
    meta.write_to(&mut file).unwrap();
    drop(file);

    let from_json =
        IndexMetadata::from_json_reader(std::fs::File::open(&json_path).unwrap(), None).unwrap();
    let from_bin =
        IndexMetadata::read_from(&mut std::fs::File::open(&bin_path).unwrap(), None).unwrap();
    assert_eq!(from_json, meta);
    assert_eq!(from_bin, meta);
}
