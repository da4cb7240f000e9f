//! Forced cleanup of expired undiscovered objects.
//!
//! The host normally fades untracked objects itself, but its cleanup does not run
//! reliably while the clock is being fast-forwarded. The scheduler runs this sweep
//! before emitting due spawns.
use tracing::info;

use crate::host::{ObjectId, TrackedObjectSource};
use crate::spawn::events::{EventSink, SpawnEvent};

/// Removes every undiscovered object whose fade deadline is before `now`.
///
/// Discovered objects and objects that are not subject to discovery are never touched.
/// Returns the ids that were removed.
pub fn sweep(
    now: f64,
    objects: &mut dyn TrackedObjectSource,
    sink: &mut dyn EventSink,
) -> Vec<ObjectId> {
    // Collect first; removing while enumerating is up to the host.
    let expired: Vec<_> = objects
        .tracked_objects()
        .into_iter()
        .filter(|o| o.is_expired(now))
        .collect();

    let mut removed = Vec::with_capacity(expired.len());
    for object in expired {
        info!(
            "Removing expired object '{}' ({}), faded at {}.",
            object.name, object.id, object.fade_deadline
        );
        objects.remove(object.id);
        sink.send(SpawnEvent::ObjectDespawned {
            id: object.id,
            name: object.name,
            at: now,
        });
        removed.push(object.id);
    }
    removed
}
