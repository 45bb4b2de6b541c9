//! Public API layer (Facade) for usagebar-core.
//!
//! This module provides [`UsageCore`], a high-level entry-point that owns
//! the settings store, crossing tracker, usage cache and event channel, and
//! exposes typed query/action methods. The tray shell should use this API
//! instead of wiring the services itself.
//!
//! # Quick Start
//!
//! ```ignore
//! use usagebar_core::api::UsageCoreBuilder;
//!
//! let core = UsageCoreBuilder::new(&data_dir).build();
//! core.sync_autostart(&login_item);
//!
//! let mut menu = core.menu_controller(login_item);
//! let poller = core.poller(sources, notifier);
//! poller.start(core.subscribe());
//! core.start_scheduler();
//! ```

mod actions;
mod builder;
mod core;
pub mod events;
mod queries;
pub mod types;

pub use builder::UsageCoreBuilder;
pub use core::UsageCore;
pub use events::{CoreEvent, EventSender};
pub use types::ApiError;
