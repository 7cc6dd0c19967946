//! Redis adapter parity tests.
//!
//! These need a live Redis (default localhost:6379, override with
//! `PRIME_CACHE_REDIS_HOST`/`PRIME_CACHE_REDIS_PORT`) and are ignored by
//! default.

use prime_cache::{CacheSettings, PrimeCacheKey, PrimeStore, RedisStore, StoreError};

fn key(position: i64) -> PrimeCacheKey {
    PrimeCacheKey::new(position).unwrap()
}

/// Positions high enough to stay clear of real cached data.
fn test_position(name: &str) -> i64 {
    let tag: i64 = name.bytes().map(i64::from).sum();
    1_000_000 + tag
}

async fn store() -> RedisStore {
    let settings = CacheSettings::from_env();
    RedisStore::connect(&settings.redis)
        .await
        .expect("requires a running Redis")
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn round_trip() {
    let store = store().await;
    let key = key(test_position("round_trip"));

    store.put(key, 29).await.unwrap();
    assert_eq!(store.get(key).await.unwrap(), Some(29));
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn overwrite_is_last_write_wins() {
    let store = store().await;
    let key = key(test_position("overwrite"));

    store.put(key, 4).await.unwrap();
    store.put(key, 29).await.unwrap();
    assert_eq!(store.get(key).await.unwrap(), Some(29));
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn absent_key_is_none_not_error() {
    let store = store().await;
    assert_eq!(store.get(key(999_999_999)).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn malformed_stored_value_is_an_error() {
    let settings = CacheSettings::from_env();
    let position = test_position("malformed");

    // Plant a non-numeric value under the store's namespace.
    let client = redis::Client::open(settings.redis.url()).unwrap();
    let mut conn = redis::aio::ConnectionManager::new(client).await.unwrap();
    let _: () = redis::AsyncCommands::set(
        &mut conn,
        format!("prime:cache:{position}"),
        "not-a-number",
    )
    .await
    .unwrap();

    let store = store().await;
    let err = store.get(key(position)).await.unwrap_err();
    assert!(matches!(err, StoreError::MalformedValue { .. }));
}
