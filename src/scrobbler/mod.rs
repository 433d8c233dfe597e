pub mod context;
pub mod poller;

pub use context::{Clock, Context, LogStatus, StatusSink, SystemClock};
pub use poller::ScrobblePoller;
