//! Degraded Mode Demo
//!
//! Points the Redis backend at a closed port to show the startup fallback:
//! the probe fails, the system degrades to memory, and requests keep
//! returning correct primes.
//!
//! Run with: cargo run --example degraded_mode

use prime_cache::{CacheSettings, PrimeCacheSystem};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Prime Cache: Degraded Mode ===\n");

    let mut settings = CacheSettings {
        backend: Some("redis".to_string()),
        ..CacheSettings::default()
    };
    settings.redis.host = "127.0.0.1".to_string();
    settings.redis.port = 1;

    println!("Configured backend: redis at {} (unreachable)\n", settings.redis.url());
    let system = PrimeCacheSystem::new(settings).await?;

    let health = system.health();
    println!("Health: {}", serde_json::to_string_pretty(&health)?);
    println!();

    // Correctness is unaffected by the fallback.
    for position in [1, 5, 10] {
        println!("prime #{position} = {}", system.get_prime(position).await?);
    }

    println!();
    println!(
        "Info: {}",
        serde_json::to_string_pretty(&prime_cache::cache_info(system.selection()))?
    );

    Ok(())
}
