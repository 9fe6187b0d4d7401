//! Catalog events
//!
//! The admin API announces every successful change to the catalog. Register async callbacks on [`EventHooks`], turn
//! them into [`EventHandlers`] and hand the resulting [`EventProducers`] to the [`AdminApi`](crate::AdminApi).
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
