//! Load a pack directory and print what a host would see.
//!
//! Reads the engine configuration (if given), reloads from the pack root,
//! prints the reload report, then spawns a few entities per category.
//!
//! Run with:
//! `RUST_LOG=debug cargo run -p varietal-data --example dump_variants -- <pack-root> [varietal.toml]`

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use varietal_core::SimRng;
use varietal_data::{ConfigIngestor, DirectoryProvider, EngineConfig};

const SPAWNS_PER_CATEGORY: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().ok_or("usage: dump_variants <pack-root> [config]")?);
    let config = match args.next() {
        Some(path) => EngineConfig::load(&PathBuf::from(path))?,
        None => EngineConfig::default(),
    };

    let store = config.store()?;
    let mut ingestor = ConfigIngestor::new(&config)?;
    let provider = DirectoryProvider::new(&root, config.fallback_namespace.clone());
    let report = ingestor.reload_from(&provider, &store)?;

    println!(
        "generation {}: {} variants, {} blacklisted, {} failures",
        report.generation,
        report.variants_loaded,
        report.blacklisted_removed,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  [{:?}] {}: {}", failure.class(), failure.reference, failure.error);
    }

    let snapshot = store.snapshot();
    let settings = snapshot.settings();
    println!(
        "settings: muddy pigs {} (timeout {}), child variant chance {}",
        settings.enable_muddy_pigs, settings.muddy_pig_timeout, settings.child_random_variant_chance
    );

    // --- Spawn a few entities per category ---

    let mut rng = SimRng::new(42);
    for category in snapshot.registry().categories() {
        let variants = snapshot.variants(category);
        println!("{category} ({} variants)", variants.len());
        for _ in 0..SPAWNS_PER_CATEGORY {
            let chosen = snapshot.select(category, &mut rng);
            let kinds: Vec<String> = chosen.modifiers().iter().map(|m| m.kind().to_string()).collect();
            println!("  -> {} [{}]", chosen.identifier(), kinds.join(", "));
        }
    }

    Ok(())
}
