//! Background activity: the refresh scheduler and the usage poller.

pub mod poller;
pub mod scheduler;

pub use poller::{CycleReport, UsagePoller};
pub use scheduler::RefreshScheduler;
