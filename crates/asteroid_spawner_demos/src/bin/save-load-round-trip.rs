use asteroid_spawner::prelude::*;
use asteroid_spawner_demos::{init_tracing, DemoHost, SAMPLE_POPULATIONS};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let registry = Registry::load(&RonConfigSource::from_text(SAMPLE_POPULATIONS))?;
    let mut store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(7);
    let mut events = VecSink::new();

    // Session 1: custom scheduling off. The timer is saved but never consulted.
    let disabled = SpawnerOptions::new().with_custom_scheduling(false);
    let scheduler = SpawnScheduler::new(1_000.0, &registry, &disabled, &mut rng);
    scheduler.save_to(&mut store);
    println!("session 1 saved: {:?}", store.read(SPAWN_STATE_KEY));

    // Session 2, 30 days later, with the flag still off: state comes back unchanged.
    let now = 1_000.0 + 30.0 * SECONDS_PER_DAY;
    let restored =
        SpawnScheduler::load_from(&store, now, &registry, &disabled, &mut rng, &mut events);
    println!(
        "session 2 restored exactly: {}",
        restored.save() == scheduler.save()
    );

    // Session 3: the player switched custom scheduling on. The stale timer is dropped
    // instead of releasing 30 days of backlog at once.
    let enabled = SpawnerOptions::new();
    let mut scheduler =
        SpawnScheduler::load_from(&store, now, &registry, &enabled, &mut rng, &mut events);
    for event in events.as_slice() {
        if let SpawnEvent::TimerReset { previous, next } = event {
            println!("timer reset: {previous:?} -> {next:?}");
        }
    }

    let mut host = DemoHost::new(now);
    let later = now + SECONDS_PER_DAY;
    host.set_now(later);
    let report = scheduler.tick(later, &registry, &mut host.context(&enabled), &mut rng, &mut ());
    host.flush();
    println!("one day after enabling: {} spawned", report.spawned);

    scheduler.save_to(&mut store);
    if let Some(record) = store.read(SPAWN_STATE_KEY) {
        for (field, value) in &record.fields {
            println!("  {field} = {value}");
        }
    }

    // A registry with no custom rate never fires, and says so in the save.
    let idle = Registry::new();
    let never = SpawnScheduler::new(later, &idle, &enabled, &mut rng);
    never.save_to(&mut store);
    println!("idle registry saved: {:?}", store.read(SPAWN_STATE_KEY));

    Ok(())
}
