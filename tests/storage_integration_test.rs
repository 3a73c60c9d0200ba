//! Integration tests for the storage backends
//!
//! Tests can be filtered by database backend using the DATABASE_BACKEND environment variable:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test` - Run only PostgreSQL tests
//! - By default, both backends are tested; PostgreSQL tests are skipped
//!   unless DATABASE_URL points at a reachable server

use snip::storage::{PostgresStorage, SqliteStorage, Storage, StorageError};
use std::sync::Arc;

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true,
    }
}

/// Helper to create SQLite test storage
async fn create_sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create PostgreSQL test storage
async fn create_postgres_storage() -> Option<Arc<dyn Storage>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    if !db_url.starts_with("postgres") {
        return None;
    }
    let storage = PostgresStorage::new(&db_url, 5).await.ok()?;
    storage.init().await.ok()?;
    Some(Arc::new(storage))
}

async fn check_insert_and_find(storage: Arc<dyn Storage>, suffix: &str) {
    let code = format!("test123{suffix}");
    let url = format!("https://example.com/{suffix}");

    let before = chrono::Utc::now();
    let created = storage.insert(&code, &url, true).await.unwrap();
    assert_eq!(created.short_code, code);
    assert_eq!(created.original_url, url);
    assert!(created.is_custom);
    assert!((created.created_at - before).num_seconds().abs() < 5);

    let found = storage.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(found.short_code, code);
    assert_eq!(found.original_url, url);
    assert!(found.is_custom);

    let by_url = storage.find_by_url(&url).await.unwrap().unwrap();
    assert_eq!(by_url.short_code, code);
}

async fn check_unique_short_code(storage: Arc<dyn Storage>, suffix: &str) {
    let code = format!("dup{suffix}");
    storage
        .insert(&code, "https://example.com", false)
        .await
        .unwrap();

    let err = storage
        .insert(&code, "https://another-example.com", false)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    // The first record is untouched
    let found = storage.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://example.com");
}

#[tokio::test]
async fn test_insert_and_find_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_insert_and_find(create_sqlite_storage().await, "").await;
}

#[tokio::test]
async fn test_insert_and_find_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    let Some(storage) = create_postgres_storage().await else {
        return;
    };
    let suffix = format!("-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));
    check_insert_and_find(storage, &suffix).await;
}

#[tokio::test]
async fn test_unique_short_code_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_unique_short_code(create_sqlite_storage().await, "").await;
}

#[tokio::test]
async fn test_unique_short_code_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    let Some(storage) = create_postgres_storage().await else {
        return;
    };
    let suffix = format!("-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));
    check_unique_short_code(storage, &suffix).await;
}

#[tokio::test]
async fn test_missing_records_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    let storage = create_sqlite_storage().await;

    assert!(storage.find_by_code("nothing").await.unwrap().is_none());
    assert!(storage
        .find_by_url("https://nowhere.example")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_lookup_is_case_sensitive_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    let storage = create_sqlite_storage().await;

    storage
        .insert("MixedCase", "https://example.com", true)
        .await
        .unwrap();

    assert!(storage.find_by_code("MixedCase").await.unwrap().is_some());
    assert!(storage.find_by_code("mixedcase").await.unwrap().is_none());
    assert!(storage.find_by_code("MIXEDCASE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_url_prefers_non_custom_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    let storage = create_sqlite_storage().await;
    let url = "https://example.com/shared";

    storage.insert("custom-one", url, true).await.unwrap();
    storage.insert("0a1b2c3d", url, false).await.unwrap();
    storage.insert("custom-two", url, true).await.unwrap();

    let found = storage.find_by_url(url).await.unwrap().unwrap();
    assert_eq!(found.short_code, "0a1b2c3d");
    assert!(!found.is_custom);
}

#[tokio::test]
async fn test_find_by_url_matches_exact_string_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    let storage = create_sqlite_storage().await;

    storage
        .insert("slashless", "https://example.com", true)
        .await
        .unwrap();

    assert!(storage
        .find_by_url("https://example.com/")
        .await
        .unwrap()
        .is_none());
    assert!(storage
        .find_by_url("https://EXAMPLE.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_concurrent_insert_same_code_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    // Test that concurrent inserts of one code resolve through the uniqueness constraint
    let storage = create_sqlite_storage().await;

    let mut handles = vec![];
    for i in 0..10 {
        let storage_clone = Arc::clone(&storage);
        let handle = tokio::spawn(async move {
            storage_clone
                .insert("same-code", &format!("https://example.com/{i}"), true)
                .await
        });
        handles.push(handle);
    }

    // Exactly one should succeed, others should get Conflict error
    let mut success_count = 0;
    let mut conflict_count = 0;

    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => success_count += 1,
            Err(StorageError::Conflict) => conflict_count += 1,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    assert_eq!(success_count, 1, "Exactly one insert should succeed");
    assert_eq!(conflict_count, 9, "All others should get conflict");
}

#[tokio::test]
async fn test_init_is_idempotent_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    let storage = create_sqlite_storage().await;
    storage
        .insert("keepme", "https://example.com", true)
        .await
        .unwrap();

    storage.init().await.unwrap();

    assert!(storage.find_by_code("keepme").await.unwrap().is_some());
}
