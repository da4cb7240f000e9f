use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use asteroid_spawner::prelude::*;
use asteroid_spawner_demos::{init_tracing, DemoHost, SAMPLE_POPULATIONS};
use rand::rngs::StdRng;
use rand::SeedableRng;

const RELOADED_POPULATIONS: &str = r#"[
    (tag: "population", fields: {"name": "comets", "title": "C/", "spawn_rate": "2.0"}),
    (tag: "population", fields: {"name": "comets", "spawn_rate": "9.0"}),
]"#;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "populations.ron".to_string()),
    );
    std::fs::write(&path, SAMPLE_POPULATIONS)
        .with_context(|| format!("writing {}", path.display()))?;

    let source = RonConfigSource::from_path(&path);
    let mut handle = RegistryHandle::load(&source)?;
    let options = SpawnerOptions::new();
    let mut rng = StdRng::seed_from_u64(42);
    let mut host = DemoHost::new(0.0);
    let mut spawned_by: BTreeMap<String, usize> = BTreeMap::new();
    let mut tally = FnSink::new(|event: SpawnEvent| {
        if let SpawnEvent::SpawnTriggered { population, .. } = event {
            *spawned_by.entry(population).or_default() += 1;
        }
    });
    let mut log = VecSink::new();
    let mut events = MultiSink::with_sinks(vec![&mut log as &mut dyn EventSink, &mut tally]);

    let registry = handle.snapshot();
    let mut scheduler = SpawnScheduler::new(0.0, &registry, &options, &mut rng);
    run_days(&mut scheduler, &mut host, &handle, &options, &mut rng, &mut events, 10);
    println!(
        "before reload: {} populations, {} objects",
        registry.len(),
        host.world.objects.len()
    );

    // Replace the file. The duplicate "comets" entry keeps the first definition.
    std::fs::write(&path, RELOADED_POPULATIONS)
        .with_context(|| format!("writing {}", path.display()))?;
    let reloaded = handle.reload(&source)?;
    println!(
        "after reload: {} populations, comets rate {:?}",
        reloaded.len(),
        reloaded.get("comets").map(|p| p.spawn_rate)
    );
    run_days(&mut scheduler, &mut host, &handle, &options, &mut rng, &mut events, 10);
    println!("comets so far: {}", host.count_by_prefix("C/"));

    // A reload that fails keeps the previous registry.
    std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    if let Err(e) = handle.reload(&source) {
        println!(
            "reload failed ({e}); still using {} populations",
            handle.current().len()
        );
    }

    drop(events);
    drop(tally);
    for (population, count) in &spawned_by {
        println!("  {population:>10}: {count}");
    }
    let despawned = log
        .as_slice()
        .iter()
        .filter(|e| matches!(e, SpawnEvent::ObjectDespawned { .. }))
        .count();
    println!(
        "{} events, {} spawns, {} despawns",
        log.len(),
        log.spawn_count(),
        despawned
    );

    Ok(())
}

fn run_days(
    scheduler: &mut SpawnScheduler,
    host: &mut DemoHost,
    handle: &RegistryHandle,
    options: &SpawnerOptions,
    rng: &mut StdRng,
    sink: &mut dyn EventSink,
    days: u32,
) {
    let registry = handle.snapshot();
    for _ in 0..days {
        let now = host.now() + SECONDS_PER_DAY;
        host.set_now(now);
        scheduler.tick(now, &registry, &mut host.context(options), &mut *rng, sink);
        host.flush();
    }
}
