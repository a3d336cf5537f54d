//! Scenario 2: expiry purges. Three entries at different TTLs; after a
//! sleep past the shortest TTL, `cleanup()` removes only the expired one.

use llmcache_cache::{L2ConfigBuilder, FileCache};
use llmcache_core::{Fingerprint, FingerprintKey};
use std::time::Duration;

fn fp(tag: &str) -> Fingerprint {
    Fingerprint::of(&FingerprintKey {
        backend_id: "openai".into(),
        model_id: "gpt-x".into(),
        captured_context: tag.into(),
        language: "en".into(),
        request_kind: "suggestion".into(),
        prompt: None,
    })
    .unwrap()
}

#[tokio::test]
async fn cleanup_purges_only_expired_entries() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(L2ConfigBuilder::new().cache_dir(dir.path()).max_ttl(Duration::from_secs(3600)).build())
        .await
        .unwrap();

    let (short, long, medium) = (fp("short"), fp("long"), fp("medium"));
    cache.set(short.clone(), "short", "1", Duration::from_millis(50)).await.unwrap();
    cache.set(long.clone(), "long", "2", Duration::from_secs(3600)).await.unwrap();
    cache.set(medium.clone(), "medium", "3", Duration::from_millis(100)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(75)).await;

    let purged = cache.cleanup().await.unwrap();
    assert_eq!(purged, 1);

    assert_eq!(cache.get(&short).await, None);
    assert_eq!(cache.get(&medium).await.map(|(v, _)| v), Some("3".to_string()));
    assert_eq!(cache.get(&long).await.map(|(v, _)| v), Some("2".to_string()));
}

#[tokio::test]
async fn second_cleanup_with_no_new_writes_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(L2ConfigBuilder::new().cache_dir(dir.path()).build()).await.unwrap();
    cache.set(fp("a"), "a", "1", Duration::from_secs(3600)).await.unwrap();

    assert_eq!(cache.cleanup().await.unwrap(), 0);
    assert_eq!(cache.cleanup().await.unwrap(), 0);
}

#[tokio::test]
async fn payload_at_the_size_limit_succeeds_one_byte_over_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(L2ConfigBuilder::new().cache_dir(dir.path()).max_file_size(8).build()).await.unwrap();

    let ok = "a".repeat(8);
    let too_big = "a".repeat(9);

    assert!(cache.set(fp("ok"), "ok", &ok, Duration::from_secs(60)).await.is_ok());
    assert!(cache.set(fp("big"), "big", &too_big, Duration::from_secs(60)).await.is_err());
}

#[tokio::test]
async fn read_failure_degrades_to_a_miss_and_self_heals_the_index() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(L2ConfigBuilder::new().cache_dir(dir.path()).build()).await.unwrap();
    let key = fp("orphan");
    cache.set(key.clone(), "orphan", "v", Duration::from_secs(600)).await.unwrap();

    // Corrupt state directly on disk: remove the payload file but leave the
    // index entry in place, simulating an out-of-band deletion.
    let payload_path = dir.path().join(key.as_str());
    std::fs::remove_file(&payload_path).unwrap();

    assert_eq!(cache.get(&key).await, None);
    // Self-healed: the index entry no longer exists either.
    assert_eq!(cache.len().await, 0);
}
