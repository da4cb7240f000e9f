use asteroid_spawner::prelude::*;
use asteroid_spawner_demos::{init_tracing, DemoHost, SAMPLE_POPULATIONS};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let options = SpawnerOptions::new().with_untracked_lifetime(5.0, 15.0);
    options.validate()?;

    // The malformed "broken" entry is skipped with a warning.
    let registry = Registry::load(&RonConfigSource::from_text(SAMPLE_POPULATIONS))?;
    println!(
        "{} populations, {} spawns per day",
        registry.len(),
        total_rate(&registry)
    );

    let mut host = DemoHost::new(0.0);
    let mut rng = StdRng::seed_from_u64(2025);
    let mut events = VecSink::new();

    // The stock spawner shows up on the fourth frame.
    let mut setup = SpawnerSetup::new(ReadinessPolicy::new(10, 1, 4));
    let mut frame = 0;
    while setup.status() == SetupStatus::Waiting {
        let spawner = &mut host.spawner;
        let available = frame >= 3;
        setup.poll(&options, || available.then_some(spawner));
        frame += 1;
    }
    println!(
        "setup {:?} after {} frame(s): lifetime {:?}, stock spawning suppressed: {}",
        setup.status(),
        frame,
        host.spawner.stock_lifetime,
        host.spawner.stock_suppressed
    );

    let mut scheduler = SpawnScheduler::new(host.now(), &registry, &options, &mut rng);

    // One simulated hour per frame for two days.
    for hour in 1..=48 {
        let now = hour as f64 * 3600.0;
        host.set_now(now);
        scheduler.tick(now, &registry, &mut host.context(&options), &mut rng, &mut events);
        host.flush();
    }
    println!(
        "after 2 days at normal speed: {} objects, {} spawn events",
        host.world.objects.len(),
        events.spawn_count()
    );

    // Keep the first object around for good.
    if let Some(id) = host.world.objects.first().map(|o| o.id) {
        host.discover(id);
    }

    // Jump 100 days in one frame. Every event in between fires now, after the sweep.
    events.clear();
    let now = host.now() + 100.0 * SECONDS_PER_DAY;
    host.set_now(now);
    let report = scheduler.tick(now, &registry, &mut host.context(&options), &mut rng, &mut events);
    host.flush();

    println!(
        "time warp: {} spawned, {} skipped, {} faded; next event {:?}",
        report.spawned,
        report.skipped,
        report.despawned.len(),
        scheduler.next_event()
    );
    for prefix in ["Ast.", "MBA", "NEA", "trojans"] {
        println!("  {prefix:>8}: {}", host.count_by_prefix(prefix));
    }

    Ok(())
}
