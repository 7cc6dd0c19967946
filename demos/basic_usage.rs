//! Basic Usage Demo
//!
//! Initializes the system from environment settings, requests a few primes,
//! and prints the cache counters.
//!
//! Run with: cargo run --example basic_usage

use prime_cache::PrimeCacheSystem;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Prime Cache: Basic Usage ===\n");

    // Backend comes from PRIME_CACHE_BACKEND (memory/redis/postgres);
    // unset or unreachable falls back to memory.
    let system = PrimeCacheSystem::from_env().await?;
    println!("Effective backend: {}\n", system.store_name());

    for position in [1, 5, 10, 10, 100] {
        let prime = system.get_prime(position).await?;
        println!("prime #{position} = {prime}");
    }
    println!();

    let snapshot = system.metrics().snapshot();
    println!("=== Cache Counters ===");
    println!("hits:       {}", snapshot.get_hits);
    println!("misses:     {}", snapshot.get_misses);
    println!("errors:     {}", snapshot.get_errors);
    println!("writes:     {}", snapshot.put_successes);
    println!("hit rate:   {:.1}%", snapshot.hit_rate());

    Ok(())
}
