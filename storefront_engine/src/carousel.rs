//! # Hero carousel
//!
//! [`Carousel`] is the slide list shown at the top of the storefront plus the index of the slide on display. Slides
//! come from the active banners in display order. With no active banners the carousel shows a single fallback slide.
//!
//! [`CarouselRotation`] advances a shared carousel on a fixed interval. Manual navigation does not pause or reset the
//! interval.
use std::{sync::Arc, time::Duration};

use log::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::db_types::Banner;

pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub image_url: String,
    pub title: Option<String>,
    pub link: Option<String>,
}

impl Slide {
    pub fn new<S: Into<String>>(image_url: S) -> Self {
        Self { image_url: image_url.into(), title: None, link: None }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl From<&Banner> for Slide {
    fn from(banner: &Banner) -> Self {
        Self { image_url: banner.image_url.clone(), title: banner.title.clone(), link: banner.link.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carousel {
    slides: Vec<Slide>,
    current: usize,
}

impl Carousel {
    /// A carousel over `slides`, or over the fallback alone if `slides` is empty.
    pub fn new(slides: Vec<Slide>, fallback: Slide) -> Self {
        let slides = if slides.is_empty() { vec![fallback] } else { slides };
        Self { slides, current: 0 }
    }

    /// Builds slides from the active banners, in display order.
    pub fn from_banners(banners: &[Banner], fallback: Slide) -> Self {
        let mut active = banners.iter().filter(|b| b.is_active).collect::<Vec<_>>();
        active.sort_by_key(|b| b.display_order);
        Self::new(active.into_iter().map(Slide::from).collect(), fallback)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Slide {
        &self.slides[self.current]
    }

    /// Only carousels with more than one slide rotate.
    pub fn rotates(&self) -> bool {
        self.slides.len() > 1
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.slides.len();
        self.current
    }

    pub fn prev(&mut self) -> usize {
        let n = self.slides.len();
        self.current = (self.current + n - 1) % n;
        self.current
    }

    /// Jumps to slide `index`. Out-of-range indices wrap.
    pub fn go_to(&mut self, index: usize) -> usize {
        self.current = index % self.slides.len();
        self.current
    }
}

/// Advances a shared [`Carousel`] every `interval` on a background task.
///
/// The task is only spawned when the carousel has more than one slide, and it is aborted when the rotation is
/// dropped.
pub struct CarouselRotation {
    carousel: Arc<Mutex<Carousel>>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl CarouselRotation {
    /// Must be called from within a tokio runtime.
    pub fn start(carousel: Carousel, interval: Duration) -> Self {
        let rotates = carousel.rotates();
        let carousel = Arc::new(Mutex::new(carousel));
        let task = if rotates && !interval.is_zero() {
            let shared = Arc::clone(&carousel);
            debug!("🎠️ Starting carousel rotation every {interval:?}");
            Some(tokio::spawn(async move {
                let mut ticks = interval_at(Instant::now() + interval, interval);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    let index = shared.lock().next();
                    trace!("🎠️ Rotated to slide {index}");
                }
            }))
        } else {
            debug!("🎠️ Carousel has a single slide. Not rotating.");
            None
        };
        Self { carousel, interval, task }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_rotating(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn current_index(&self) -> usize {
        self.carousel.lock().current_index()
    }

    pub fn current(&self) -> Slide {
        self.carousel.lock().current().clone()
    }

    pub fn next(&self) -> usize {
        self.carousel.lock().next()
    }

    pub fn prev(&self) -> usize {
        self.carousel.lock().prev()
    }

    pub fn snapshot(&self) -> Carousel {
        self.carousel.lock().clone()
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("🎠️ Carousel rotation stopped");
        }
    }
}

impl Drop for CarouselRotation {
    fn drop(&mut self) {
        self.stop();
    }
}
