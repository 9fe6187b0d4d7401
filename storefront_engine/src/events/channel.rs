//! A small stateless pub-sub channel.
//!
//! Each [`EventHandler`] owns the receiving end of a bounded channel and runs one callback per event on its own task.
//! Handlers only ever see the event itself, never the state of the engine.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinSet,
};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, listener) = mpsc::channel(buffer_size.max(1));
        Self { listener, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer { sender: self.sender.clone() }
    }

    /// Runs until every producer has been dropped, then waits for the callbacks still running.
    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // Without our own sender, the channel closes once the last producer goes away.
        drop(self.sender);
        let mut jobs = JoinSet::new();
        while let Some(event) = self.listener.recv().await {
            trace!("📬️ Handling event");
            let handler = Arc::clone(&self.handler);
            jobs.spawn(async move { (handler)(event).await });
            // reap whatever has already finished so the set does not grow without bound
            while let Some(done) = jobs.try_join_next() {
                if let Err(e) = done {
                    warn!("📬️ An event callback panicked or was cancelled. {e}");
                }
            }
        }
        debug!("📬️ All producers are gone. Waiting for {} callbacks to finish", jobs.len());
        while let Some(done) = jobs.join_next().await {
            if let Err(e) = done {
                warn!("📬️ An event callback panicked or was cancelled. {e}");
            }
        }
        debug!("📬️ Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send> {
    sender: mpsc::Sender<E>,
}

impl<E: Send> EventProducer<E> {
    /// Queues `event` for the handler. Never waits: if the handler has fallen behind or stopped, the event is dropped
    /// and a warning is logged, so a slow subscriber cannot hold up a catalog write.
    pub fn publish_event(&self, event: E) {
        match self.sender.try_send(event) {
            Ok(()) => trace!("📬️ Event queued"),
            Err(TrySendError::Full(_)) => warn!("📬️ Event buffer is full. Dropping event."),
            Err(TrySendError::Closed(_)) => warn!("📬️ Event handler has shut down. Dropping event."),
        }
    }
}
