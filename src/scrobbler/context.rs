/// Execution context passed into the poller
///
/// Bundles the clock and the status-message sink so the poller carries
/// no ambient global state and both can be substituted in tests.
use log::warn;
use std::time::SystemTime;

/// Source of the current wall-clock time
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Default clock backed by the system time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Sink for user-visible status messages
///
/// Write-only: the poller reports authentication failures here and never
/// queries it back.
pub trait StatusSink {
    fn report(&self, message: &str);
}

/// Default sink that forwards status messages to the log
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn report(&self, message: &str) {
        warn!("{}", message);
    }
}

pub struct Context {
    pub clock: Box<dyn Clock>,
    pub status: Box<dyn StatusSink>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            clock: Box::new(SystemClock),
            status: Box::new(LogStatus),
        }
    }

    pub fn with_parts(clock: Box<dyn Clock>, status: Box<dyn StatusSink>) -> Self {
        Self { clock, status }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
