//! Bounded readiness polling for renderer backends
//!
//! A renderer library may still be initializing when the first preview
//! request arrives. The gate polls a readiness predicate on a fixed
//! interval and gives up after a bounded timeout; callers treat a timed-out
//! gate the same as "no renderer available", never as an error.

use std::time::{Duration, Instant};

/// Default total time to wait for a backend before giving up
pub const READY_TIMEOUT: Duration = Duration::from_millis(1500);

/// Default interval between predicate evaluations
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(60);

/// Result of one gate poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Predicate holds; proceed with the render
    Ready,

    /// Predicate does not hold yet; poll again later
    Pending,

    /// Timeout elapsed without the predicate holding
    TimedOut,
}

/// Cooperative poll-until-ready-or-timeout gate
///
/// Tick-driven: the host calls `poll` from its event loop. The predicate
/// is evaluated at most once per poll interval, so a cheap-but-not-free
/// readiness probe is not hammered on every tick.
///
/// # Example
///
/// ```
/// use libshelf_scheduler::{GateStatus, ReadinessGate};
/// use std::time::Instant;
///
/// let now = Instant::now();
/// let mut gate = ReadinessGate::new(now);
/// assert_eq!(gate.poll(now, || false), GateStatus::Pending);
/// assert_eq!(gate.poll(now, || true), GateStatus::Ready);
/// ```
pub struct ReadinessGate {
    deadline: Instant,
    poll_interval: Duration,
    next_poll: Instant,
}

impl ReadinessGate {
    /// Create a gate with default timeout and poll interval
    pub fn new(now: Instant) -> Self {
        Self::with_timings(now, READY_TIMEOUT, READY_POLL_INTERVAL)
    }

    /// Create a gate with custom timings
    pub fn with_timings(now: Instant, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            deadline: now + timeout,
            poll_interval,
            // first evaluation is immediate
            next_poll: now,
        }
    }

    /// Poll the gate
    ///
    /// Evaluates `predicate` when a poll is due. Resolves `Ready` as soon
    /// as the predicate holds, `TimedOut` once the deadline passes without
    /// it holding, `Pending` otherwise.
    pub fn poll<F: FnOnce() -> bool>(&mut self, now: Instant, predicate: F) -> GateStatus {
        if now >= self.next_poll {
            self.next_poll = now + self.poll_interval;
            if predicate() {
                return GateStatus::Ready;
            }
        }
        if now >= self.deadline {
            GateStatus::TimedOut
        } else {
            GateStatus::Pending
        }
    }
}

/// Blocking convenience wrapper around [`ReadinessGate`]
///
/// Sleeps between polls; intended for one-shot tools (the CLI), not the
/// event loop. Returns `true` as soon as the predicate holds, `false` on
/// timeout.
pub fn wait_ready<F: FnMut() -> bool>(
    mut predicate: F,
    timeout: Duration,
    poll_interval: Duration,
) -> bool {
    let start = Instant::now();
    let mut gate = ReadinessGate::with_timings(start, timeout, poll_interval);
    loop {
        match gate.poll(Instant::now(), &mut predicate) {
            GateStatus::Ready => return true,
            GateStatus::TimedOut => return false,
            GateStatus::Pending => std::thread::sleep(poll_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_immediately() {
        let now = Instant::now();
        let mut gate = ReadinessGate::new(now);
        assert_eq!(gate.poll(now, || true), GateStatus::Ready);
    }

    #[test]
    fn test_pending_until_deadline() {
        let now = Instant::now();
        let mut gate = ReadinessGate::with_timings(
            now,
            Duration::from_millis(100),
            Duration::from_millis(10),
        );

        assert_eq!(gate.poll(now, || false), GateStatus::Pending);
        assert_eq!(
            gate.poll(now + Duration::from_millis(50), || false),
            GateStatus::Pending
        );
        assert_eq!(
            gate.poll(now + Duration::from_millis(100), || false),
            GateStatus::TimedOut
        );
    }

    #[test]
    fn test_ready_wins_at_deadline() {
        // The predicate is evaluated before the deadline check, so a
        // backend that comes up on the final poll still resolves ready.
        let now = Instant::now();
        let mut gate = ReadinessGate::with_timings(
            now,
            Duration::from_millis(100),
            Duration::from_millis(10),
        );
        assert_eq!(
            gate.poll(now + Duration::from_millis(100), || true),
            GateStatus::Ready
        );
    }

    #[test]
    fn test_predicate_evaluated_once_per_interval() {
        let now = Instant::now();
        let mut gate = ReadinessGate::with_timings(
            now,
            Duration::from_millis(1000),
            Duration::from_millis(60),
        );
        let calls = std::cell::Cell::new(0);
        let probe = || {
            calls.set(calls.get() + 1);
            false
        };

        gate.poll(now, probe);
        gate.poll(now + Duration::from_millis(10), probe);
        gate.poll(now + Duration::from_millis(30), probe);
        assert_eq!(calls.get(), 1);

        gate.poll(now + Duration::from_millis(60), probe);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_wait_ready_predicate_holds() {
        assert!(wait_ready(
            || true,
            Duration::from_millis(100),
            Duration::from_millis(10),
        ));
    }

    #[test]
    fn test_wait_ready_times_out() {
        let start = Instant::now();
        assert!(!wait_ready(
            || false,
            Duration::from_millis(50),
            Duration::from_millis(10),
        ));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_wait_ready_flips_midway() {
        let start = Instant::now();
        assert!(wait_ready(
            || start.elapsed() >= Duration::from_millis(30),
            Duration::from_millis(500),
            Duration::from_millis(10),
        ));
    }
}
