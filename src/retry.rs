use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Granularity at which [`ThreadSleeper`] polls the interrupt flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Pauses between consecutive attempts; one fewer than `max_attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut next = self.initial_delay;
        (1..self.max_attempts).map(move |_| {
            let current = next;
            next = next.saturating_mul(self.multiplier);
            current
        })
    }
}

/// Process-wide "stop now" flag, set from the Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}

pub trait Sleeper {
    /// Blocks for `duration`, or fails with [`Error::Interrupted`].
    fn sleep(&self, duration: Duration) -> Result<()>;
}

/// Real sleep that wakes early when the interrupt flag is raised.
#[derive(Debug, Clone, Default)]
pub struct ThreadSleeper {
    interrupt: Interrupt,
}

impl ThreadSleeper {
    pub fn new(interrupt: Interrupt) -> Self {
        Self { interrupt }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<()> {
        let mut remaining = duration;
        while !remaining.is_zero() {
            self.interrupt.check()?;
            let step = remaining.min(POLL_INTERVAL);
            thread::sleep(step);
            remaining -= step;
        }
        self.interrupt.check()
    }
}

#[derive(Debug)]
pub enum Outcome<T> {
    Succeeded { value: T, attempts: u32 },
    Exhausted { error: Error, attempts: u32 },
}

/// Runs `op` until it succeeds or `policy.max_attempts` is reached.
///
/// `op` receives the 1-based attempt number. `on_retry` is told about each
/// failure that will be retried, together with the pause about to be taken.
/// Only an interruption (from `op` or from the sleeper) is returned as `Err`;
/// every other failure ends up in [`Outcome::Exhausted`].
pub fn retry<T, F, R>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: F,
    mut on_retry: R,
) -> Result<Outcome<T>>
where
    F: FnMut(u32) -> Result<T>,
    R: FnMut(u32, &Error, Duration),
{
    let mut delays = policy.delays();
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(Outcome::Succeeded { value, attempts: attempt }),
            Err(Error::Interrupted) => return Err(Error::Interrupted),
            Err(error) => match delays.next() {
                Some(delay) => {
                    on_retry(attempt, &error, delay);
                    sleeper.sleep(delay)?;
                    attempt += 1;
                }
                None => return Ok(Outcome::Exhausted { error, attempts: attempt }),
            },
        }
    }
}
