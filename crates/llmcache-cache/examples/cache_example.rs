use llmcache_cache::{FileCache, L1ConfigBuilder, L2ConfigBuilder, LayeredCache, LayeredCacheConfigBuilder, MemoryCache};
use llmcache_core::{Fingerprint, FingerprintKey};
use std::sync::Arc;
use std::time::Duration;

fn key(prompt: &str) -> Fingerprint {
    Fingerprint::of(&FingerprintKey {
        backend_id: "openai".into(),
        model_id: "gpt-x".into(),
        captured_context: "git push".into(),
        language: "en".into(),
        request_kind: "suggestion".into(),
        prompt: Some(prompt.to_string()),
    })
    .unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Layered Cache Example");
    println!("=====================\n");

    let dir = tempfile::tempdir()?;
    let l1 = MemoryCache::new(
        L1ConfigBuilder::new()
            .capacity(3)
            .default_ttl(Duration::from_secs(2))
            .name("example-l1")
            .build(),
    );
    let l2 = FileCache::new(
        L2ConfigBuilder::new()
            .cache_dir(dir.path())
            .default_ttl(Duration::from_secs(600))
            .name("example-l2")
            .build(),
    )
    .await?;
    let cache = LayeredCache::new(
        l1,
        Some(Arc::new(l2)),
        LayeredCacheConfigBuilder::new().write_through(true).name("example").build(),
    );

    let fp = key("explain this rejection");

    println!("Test 1: First get (miss)");
    println!("  Got: {:?}\n", cache.get(&fp).await);

    println!("Test 2: Set then get (L1 hit)");
    cache
        .set(fp.clone(), "git push", "use --force-with-lease".to_string(), Duration::from_secs(600))
        .await?;
    println!("  Got: {:?}\n", cache.get(&fp).await);

    println!("Test 3: Stats after one promotion-free hit");
    println!("  {:?}\n", cache.stats());

    println!("Test 4: Wait for L1 TTL, L2 still holds it (promotion)");
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!("  Got: {:?}", cache.get(&fp).await);
    println!("  {:?}", cache.stats());

    Ok(())
}
