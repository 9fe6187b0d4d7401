use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{CatalogChangedEvent, EventHandler, EventProducer, Handler, ImageUploadedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub catalog_changed_producer: Vec<EventProducer<CatalogChangedEvent>>,
    pub image_uploaded_producer: Vec<EventProducer<ImageUploadedEvent>>,
}

impl EventProducers {
    pub fn catalog_changed(&self, event: CatalogChangedEvent) {
        for producer in &self.catalog_changed_producer {
            producer.publish_event(event.clone());
        }
    }

    pub fn image_uploaded(&self, event: ImageUploadedEvent) {
        for producer in &self.image_uploaded_producer {
            producer.publish_event(event.clone());
        }
    }
}

pub struct EventHandlers {
    pub on_catalog_changed: Option<EventHandler<CatalogChangedEvent>>,
    pub on_image_uploaded: Option<EventHandler<ImageUploadedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_catalog_changed = hooks.on_catalog_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_image_uploaded = hooks.on_image_uploaded.map(|f| EventHandler::new(buffer_size, f));
        Self { on_catalog_changed, on_image_uploaded }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_catalog_changed {
            result.catalog_changed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_image_uploaded {
            result.image_uploaded_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns a task per registered handler. Each one exits once its producers are all dropped.
    pub fn start_handlers(self) {
        if let Some(handler) = self.on_catalog_changed {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_image_uploaded {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_catalog_changed: Option<Handler<CatalogChangedEvent>>,
    pub on_image_uploaded: Option<Handler<ImageUploadedEvent>>,
}

impl EventHooks {
    pub fn on_catalog_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(CatalogChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_catalog_changed = Some(Arc::new(f));
        self
    }

    pub fn on_image_uploaded<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ImageUploadedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_image_uploaded = Some(Arc::new(f));
        self
    }
}
