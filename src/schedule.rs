//! Daily scheduler
//!
//! Fires the backup cycle once per calendar day at a configured wall-clock
//! time, polling roughly once per second through a cancellable wait so the
//! process can stop cleanly on an external signal. Cycle errors and panics
//! are caught at the loop boundary; the scheduler itself never terminates
//! on its own.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};

use crate::error::BackupResult;

/// How often the wait loop re-checks the clock
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Source of the current local time
///
/// Production uses [`SystemClock`]; tests drive a fake.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Cancellable shutdown signal shared between the signal handler and the
/// scheduler loop
///
/// `Condvar::wait_timeout` is backed by the monotonic clock, so the poll
/// interval is immune to wall-clock jumps, and `trigger` wakes a waiting
/// loop immediately instead of letting it sleep out the interval.
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Request shutdown and wake any waiting loop
    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *triggered = true;
        cvar.notify_all();
    }

    /// Check without blocking
    pub fn is_triggered(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block up to `timeout`, returning early if triggered
    ///
    /// Returns whether shutdown has been requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires a cycle once per day at a fixed time
pub struct Scheduler<C: Clock> {
    run_at: NaiveTime,
    last_fired: Option<NaiveDate>,
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    /// Create a scheduler firing daily at `run_at`
    ///
    /// A run time already past at construction first fires on the following
    /// day, matching the usual next-occurrence semantics of daily schedules.
    pub fn new(run_at: NaiveTime, clock: C) -> Self {
        let now = clock.now();
        let last_fired = if now.time() > run_at {
            Some(now.date_naive())
        } else {
            None
        };

        Self {
            run_at,
            last_fired,
            clock,
        }
    }

    /// Check whether the cycle should fire now
    ///
    /// Fires at most once per calendar day: the first check at or after the
    /// run time marks the day as done and returns it.
    pub fn due(&mut self) -> Option<NaiveDate> {
        let now = self.clock.now();
        let today = now.date_naive();
        if now.time() >= self.run_at && self.last_fired != Some(today) {
            self.last_fired = Some(today);
            Some(today)
        } else {
            None
        }
    }

    /// Run the scheduler loop until `shutdown` is triggered
    ///
    /// `cycle` is invoked synchronously at each firing; the loop blocks on
    /// it, so cycles can never overlap. A cycle that returns an error or
    /// panics is logged and the loop keeps waiting for the next day.
    pub fn run<F>(&mut self, shutdown: &Shutdown, mut cycle: F)
    where
        F: FnMut() -> BackupResult<()>,
    {
        while !shutdown.is_triggered() {
            if let Some(date) = self.due() {
                println!("Starting backup cycle for {}.", date.format("%Y-%m-%d"));
                match catch_unwind(AssertUnwindSafe(&mut cycle)) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => eprintln!("Backup cycle failed: {}", e),
                    Err(_) => {
                        eprintln!("Backup cycle panicked; waiting for the next scheduled run.")
                    }
                }
            }

            if shutdown.wait(POLL_INTERVAL) {
                break;
            }
        }
    }
}
