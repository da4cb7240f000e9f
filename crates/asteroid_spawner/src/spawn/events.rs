//! Event types and sinks for observing the scheduler.
//!
//! This module defines [`SpawnEvent`] and sinks that collect or forward
//! events emitted by [`crate::spawn::SpawnScheduler`] and [`crate::spawn::sweep`].
//! Events complement the `tracing` output: logs are for operators, events are for code
//! that needs to react to a spawn or a despawn.
use crate::host::ObjectId;
use crate::spawn::NextEvent;

/// Describes events emitted by the spawn core.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnEvent {
    /// A spawn was handed to the host.
    SpawnTriggered {
        /// Scheduled time of the event (may lie in the past after a time jump).
        scheduled_at: f64,
        /// Name of the selected population.
        population: String,
        /// Whether the default population was selected.
        is_default: bool,
    },

    /// A scheduled event passed without a spawn because no population was eligible.
    SpawnSkipped {
        /// Scheduled time of the event.
        scheduled_at: f64,
        /// Human-readable reason.
        reason: String,
    },

    /// An expired undiscovered object was removed.
    ObjectDespawned {
        /// Id of the removed object.
        id: ObjectId,
        /// Display name of the removed object.
        name: String,
        /// Simulation time of the sweep.
        at: f64,
    },

    /// The pending timer was discarded and rearmed.
    TimerReset {
        /// Timer before the reset.
        previous: NextEvent,
        /// Timer after the reset.
        next: NextEvent,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. population name, persisted field).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`SpawnEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SpawnEvent);
}

/// Forwards to the borrowed sink, so a [`MultiSink`] can hold sinks the caller still owns.
impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: SpawnEvent) {
        (**self).send(event);
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SpawnEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SpawnEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SpawnEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SpawnEvent),
{
    #[inline]
    fn send(&mut self, event: SpawnEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SpawnEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<SpawnEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SpawnEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of [`SpawnEvent::SpawnTriggered`] events collected so far.
    pub fn spawn_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SpawnEvent::SpawnTriggered { .. }))
            .count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SpawnEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SpawnEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.send(event.clone());
        }
        last.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> SpawnEvent {
        SpawnEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_counts_spawns() {
        let mut sink = VecSink::new();
        sink.send(warning("a"));
        sink.send(SpawnEvent::SpawnTriggered {
            scheduled_at: 1.0,
            population: "belt".into(),
            is_default: false,
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.spawn_count(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        let sinks = multi.into_inner();
        assert_eq!(sinks[0].as_slice(), &[warning("ctx")]);
        assert_eq!(sinks[1].as_slice(), &[warning("ctx")]);
    }

    #[test]
    fn empty_multi_sink_drops_events() {
        let mut multi: MultiSink<VecSink> = MultiSink::new();
        multi.send(warning("ctx"));
        assert!(multi.into_inner().is_empty());
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("a"));
        sink.send(warning("b"));
        drop(sink);
        assert_eq!(count, 2);
    }

    #[test]
    fn multi_sink_over_borrowed_sinks_of_mixed_types() {
        let mut log = VecSink::new();
        let mut contexts = Vec::new();
        let mut tally = FnSink::new(|event: SpawnEvent| {
            if let SpawnEvent::Warning { context, .. } = event {
                contexts.push(context);
            }
        });

        let mut multi =
            MultiSink::with_sinks(vec![&mut log as &mut dyn EventSink, &mut tally]);
        multi.send(warning("a"));
        multi.send(warning("b"));
        drop(multi);
        drop(tally);

        assert_eq!(log.as_slice(), &[warning("a"), warning("b")]);
        assert_eq!(contexts, vec!["a".to_string(), "b".to_string()]);
    }
}
