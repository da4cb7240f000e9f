#![forbid(unsafe_code)]

use asteroid_spawner::prelude::*;

/// Sample population file shared by the demos.
pub const SAMPLE_POPULATIONS: &str = r#"[
    (tag: "default", fields: {"spawn_rate": "0.5", "title": "Ast."}),
    (tag: "population", fields: {"name": "main_belt", "title": "MBA", "spawn_rate": "3.0"},
     children: [(tag: "orbit", fields: {"semimajor_axis": "2.7e11"})]),
    (tag: "population", fields: {"name": "near_earth", "title": "NEA", "spawn_rate": "1.0"}),
    (tag: "population", fields: {"name": "trojans", "spawn_rate": "0.5"}),
    (tag: "population", fields: {"name": "broken", "spawn_rate": "lots"}),
]"#;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Object factory of the demo host. New objects wait in a queue until the host
/// [flushes](DemoHost::flush) them into its world.
#[derive(Debug)]
pub struct DemoSpawner {
    pub now: f64,
    /// Days an untracked object survives.
    pub untracked_lifetime: f64,
    pub stock_lifetime: Option<(f64, f64)>,
    pub stock_suppressed: bool,
    queued: Vec<TrackedObject>,
    next_id: u64,
}

impl SpawnSink for DemoSpawner {
    fn spawn_one(&mut self, population: PopulationRef<'_>) {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let name = format!("{} {}", population.title(), id.0);
        tracing::debug!("Host created '{}' from population '{}'.", name, population.name());
        self.queued.push(TrackedObject::new(
            id,
            name,
            DiscoveryState::Undiscovered,
            self.now + self.untracked_lifetime * SECONDS_PER_DAY,
        ));
    }
}

impl HostSpawnerControl for DemoSpawner {
    fn set_untracked_lifetime(&mut self, min: f64, max: f64) {
        self.stock_lifetime = Some((min, max));
        self.untracked_lifetime = (min + max) / 2.0;
    }

    fn suppress_spontaneous_spawns(&mut self) {
        self.stock_suppressed = true;
    }
}

/// Live objects of the demo host.
#[derive(Debug, Default)]
pub struct DemoWorld {
    pub objects: Vec<TrackedObject>,
}

impl TrackedObjectSource for DemoWorld {
    fn tracked_objects(&self) -> Vec<TrackedObject> {
        self.objects.clone()
    }

    fn remove(&mut self, id: ObjectId) {
        self.objects.retain(|o| o.id != id);
    }
}

/// In-memory stand-in for the host simulation.
#[derive(Debug)]
pub struct DemoHost {
    pub spawner: DemoSpawner,
    pub world: DemoWorld,
}

impl DemoHost {
    pub fn new(now: f64) -> Self {
        Self {
            spawner: DemoSpawner {
                now,
                untracked_lifetime: 10.0,
                stock_lifetime: None,
                stock_suppressed: false,
                queued: Vec::new(),
                next_id: 1,
            },
            world: DemoWorld::default(),
        }
    }

    pub fn now(&self) -> f64 {
        self.spawner.now
    }

    pub fn set_now(&mut self, now: f64) {
        self.spawner.now = now;
    }

    /// Borrows the host's collaborators for one scheduler tick.
    pub fn context<'a>(&'a mut self, flags: &'a dyn FeatureFlags) -> HostContext<'a> {
        HostContext::new(flags, &mut self.spawner, &mut self.world)
    }

    /// Moves freshly spawned objects into the world. Returns how many were added.
    pub fn flush(&mut self) -> usize {
        let added = self.spawner.queued.len();
        self.world.objects.append(&mut self.spawner.queued);
        added
    }

    /// Marks an object as discovered so it is never faded.
    pub fn discover(&mut self, id: ObjectId) {
        if let Some(object) = self.world.objects.iter_mut().find(|o| o.id == id) {
            object.discovery = DiscoveryState::Discovered;
        }
    }

    pub fn count_by_prefix(&self, prefix: &str) -> usize {
        self.world
            .objects
            .iter()
            .filter(|o| o.name.starts_with(prefix))
            .count()
    }
}
