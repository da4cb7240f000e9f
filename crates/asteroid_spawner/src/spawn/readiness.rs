//! Frame-driven wait for host services that come up some time after startup.
//!
//! A [`ReadinessGate`] is polled once per host frame. It probes the host, and after a
//! miss skips an exponentially growing number of frames before probing again. After
//! [`ReadinessPolicy::max_attempts`] misses it gives up for good.
use tracing::{debug, warn};

use crate::error::Error;

/// Retry schedule for a [`ReadinessGate`], in host frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Probes made before the gate times out. At least one probe is always made.
    pub max_attempts: u32,
    /// Frames skipped after the first miss.
    pub initial_backoff: u32,
    /// Upper bound on frames skipped between probes.
    pub max_backoff: u32,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            initial_backoff: 1,
            max_backoff: 32,
        }
    }
}

impl ReadinessPolicy {
    pub fn new(max_attempts: u32, initial_backoff: u32, max_backoff: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
        }
    }
}

/// Result of one [`ReadinessGate::poll`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readiness<T> {
    Ready(T),
    /// Not yet; poll again next frame.
    Pending,
    /// The probe missed `max_attempts` times. Further polls keep returning this.
    TimedOut,
}

#[derive(Clone, Debug)]
pub struct ReadinessGate {
    policy: ReadinessPolicy,
    attempts: u32,
    skip_frames: u32,
    backoff: u32,
    timed_out: bool,
}

impl ReadinessGate {
    pub fn new(policy: ReadinessPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            skip_frames: 0,
            backoff: policy.initial_backoff,
            timed_out: false,
        }
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    /// Probes made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Advances the gate by one frame, calling `probe` if the backoff window has passed.
    pub fn poll<T>(&mut self, probe: impl FnOnce() -> Option<T>) -> Readiness<T> {
        if self.timed_out {
            return Readiness::TimedOut;
        }
        if self.skip_frames > 0 {
            self.skip_frames -= 1;
            return Readiness::Pending;
        }

        self.attempts += 1;
        if let Some(value) = probe() {
            debug!("Host ready after {} probe(s).", self.attempts);
            return Readiness::Ready(value);
        }

        if self.attempts >= self.policy.max_attempts.max(1) {
            warn!("Host not ready after {} probe(s); giving up.", self.attempts);
            self.timed_out = true;
            return Readiness::TimedOut;
        }

        self.skip_frames = self.backoff;
        self.backoff = self
            .backoff
            .saturating_mul(2)
            .clamp(1, self.policy.max_backoff.max(1));
        Readiness::Pending
    }

    /// Like [`ReadinessGate::poll`], but reports a timeout as [`Error::NotReady`].
    pub fn try_poll<T>(
        &mut self,
        probe: impl FnOnce() -> Option<T>,
    ) -> crate::error::Result<Option<T>> {
        match self.poll(probe) {
            Readiness::Ready(value) => Ok(Some(value)),
            Readiness::Pending => Ok(None),
            Readiness::TimedOut => Err(Error::NotReady {
                attempts: self.attempts,
            }),
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new(ReadinessPolicy::default())
    }
}
