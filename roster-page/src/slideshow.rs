//! Hero banner slideshow.
//!
//! Slides are numbered from 1. Moving past either end wraps around. Autoplay
//! advances on a tokio interval; any manual navigation pauses it and, if
//! autoplay is enabled, restarts it after the configured resume delay.
//! Repeated navigation within the delay keeps pushing the restart back.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

use roster_core::config::SlideshowConfig;
use roster_core::debounce::Debouncer;

use crate::events::Key;

/// Debounce key for resuming autoplay after manual navigation.
pub const RESUME_KEY: &str = "slideshow-resume";

/// One slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Image path.
    pub src: String,
    /// Carries the `is-current` marker.
    pub current: bool,
}

/// A manual navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Next slide.
    Next,
    /// Previous slide.
    Prev,
    /// A pagination dot, 1-based.
    To(usize),
}

#[derive(Debug, Default)]
struct SlideshowState {
    slides: Vec<Slide>,
    pagination: Vec<bool>,
    current: usize,
    autoplay: Option<AbortHandle>,
}

impl SlideshowState {
    /// Show slide `index`, wrapping 0 to the last slide and anything past the
    /// last slide to 1.
    fn go_to(&mut self, index: usize) {
        let max = self.slides.len();
        if max == 0 {
            return;
        }
        let index = if index > max {
            1
        } else if index < 1 {
            max
        } else {
            index
        };

        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.current = i + 1 == index;
        }
        for (i, dot) in self.pagination.iter_mut().enumerate() {
            *dot = i + 1 == index;
        }
        self.current = index;
    }
}

/// A rotating banner.
#[derive(Clone)]
pub struct Slideshow {
    state: Arc<Mutex<SlideshowState>>,
    config: Arc<SlideshowConfig>,
    debouncer: Debouncer,
}

impl Slideshow {
    /// Build the slides and show the first one. Autoplay does not start
    /// until [`Slideshow::start`].
    #[must_use]
    pub fn new(config: SlideshowConfig) -> Self {
        let slides: Vec<Slide> = config
            .images
            .iter()
            .map(|src| Slide {
                src: src.clone(),
                current: false,
            })
            .collect();
        let pagination = if config.show_pagination {
            vec![false; slides.len()]
        } else {
            Vec::new()
        };

        let mut state = SlideshowState {
            slides,
            pagination,
            current: 0,
            autoplay: None,
        };
        state.go_to(1);

        Self {
            state: Arc::new(Mutex::new(state)),
            config: Arc::new(config),
            debouncer: Debouncer::new(),
        }
    }

    /// Start autoplay if it is enabled. Must run inside a tokio runtime.
    pub fn start(&self) {
        if self.config.autoplay {
            self.start_autoplay();
        }
    }

    /// Current slide, 1-based; 0 when there are no slides.
    #[must_use]
    pub fn current(&self) -> usize {
        self.state.lock().current
    }

    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().slides.len()
    }

    /// Whether there are no slides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the slides.
    #[must_use]
    pub fn slides(&self) -> Vec<Slide> {
        self.state.lock().slides.clone()
    }

    /// Pagination dots, `true` on the current one. Empty when pagination is
    /// disabled.
    #[must_use]
    pub fn pagination(&self) -> Vec<bool> {
        self.state.lock().pagination.clone()
    }

    /// Whether the autoplay timer is running.
    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.state.lock().autoplay.is_some()
    }

    /// Show slide `index` without touching autoplay.
    pub fn go_to(&self, index: usize) {
        self.state.lock().go_to(index);
    }

    /// Advance one slide without touching autoplay.
    pub fn next(&self) {
        let mut st = self.state.lock();
        let target = st.current + 1;
        st.go_to(target);
    }

    /// Go back one slide without touching autoplay.
    pub fn prev(&self) {
        let mut st = self.state.lock();
        let target = st.current.saturating_sub(1);
        st.go_to(target);
    }

    /// Navigate on behalf of the user: pause autoplay, move, schedule resume.
    pub fn navigate(&self, nav: Navigation) {
        self.pause_autoplay();
        match nav {
            Navigation::Next => self.next(),
            Navigation::Prev => self.prev(),
            Navigation::To(index) => self.go_to(index),
        }
        self.resume_autoplay();
    }

    /// Arrow keys navigate. Returns whether the key was used.
    pub fn handle_key(&self, key: &Key) -> bool {
        match key {
            Key::ArrowLeft => self.navigate(Navigation::Prev),
            Key::ArrowRight => self.navigate(Navigation::Next),
            _ => return false,
        }
        true
    }

    /// Start advancing every `duration_ms`. Does nothing if already running
    /// or there is nothing to show.
    pub fn start_autoplay(&self) {
        let mut st = self.state.lock();
        if st.autoplay.is_some() || st.slides.is_empty() {
            return;
        }

        let period = Duration::from_millis(self.config.duration_ms);
        let shared = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let mut st = shared.lock();
                let target = st.current + 1;
                st.go_to(target);
                trace!(slide = st.current, "Slideshow advanced");
            }
        })
        .abort_handle();

        st.autoplay = Some(handle);
        debug!(period_ms = self.config.duration_ms, "Slideshow autoplay started");
    }

    /// Stop the autoplay timer.
    pub fn pause_autoplay(&self) {
        if let Some(handle) = self.state.lock().autoplay.take() {
            handle.abort();
            debug!("Slideshow autoplay paused");
        }
    }

    fn resume_autoplay(&self) {
        if !self.config.autoplay {
            return;
        }
        let this = self.clone();
        self.debouncer
            .debounce(RESUME_KEY, Duration::from_millis(self.config.resume_delay_ms), move || {
                this.start_autoplay();
            });
    }
}

impl std::fmt::Debug for Slideshow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slideshow")
            .field("current", &self.current())
            .field("len", &self.len())
            .field("autoplay", &self.is_autoplaying())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n: usize) -> SlideshowConfig {
        SlideshowConfig {
            images: (1..=n).map(|i| format!("hero/{i}.jpg")).collect(),
            ..SlideshowConfig::default()
        }
    }

    #[test]
    fn starts_on_first_slide() {
        let show = Slideshow::new(config(3));
        assert_eq!(show.current(), 1);
        assert!(show.slides()[0].current);
        assert_eq!(show.pagination(), vec![true, false, false]);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let show = Slideshow::new(config(3));
        show.prev();
        assert_eq!(show.current(), 3);
        show.next();
        assert_eq!(show.current(), 1);
        show.go_to(7);
        assert_eq!(show.current(), 1);
        assert_eq!(show.slides().iter().filter(|s| s.current).count(), 1);
    }

    #[test]
    fn pagination_can_be_disabled() {
        let show = Slideshow::new(SlideshowConfig {
            show_pagination: false,
            ..config(2)
        });
        assert!(show.pagination().is_empty());
    }

    #[test]
    fn empty_slideshow_is_inert() {
        let show = Slideshow::new(config(0));
        show.next();
        assert_eq!(show.current(), 0);
        assert!(show.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_advances_on_interval() {
        let show = Slideshow::new(config(3));
        show.start();
        assert!(show.is_autoplaying());

        tokio::time::sleep(Duration::from_millis(10_050)).await;
        assert_eq!(show.current(), 2);
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(show.current(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_pauses_then_resumes() {
        let show = Slideshow::new(config(3));
        show.start();

        assert!(show.handle_key(&Key::ArrowRight));
        assert_eq!(show.current(), 2);
        assert!(!show.is_autoplaying());

        tokio::time::sleep(Duration::from_millis(3_050)).await;
        assert!(show.is_autoplaying());
        assert_eq!(show.current(), 2);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(show.current(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_autoplay_never_resumes() {
        let show = Slideshow::new(SlideshowConfig {
            autoplay: false,
            ..config(3)
        });
        show.start();
        show.navigate(Navigation::To(3));
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert!(!show.is_autoplaying());
        assert_eq!(show.current(), 3);
        assert!(!show.handle_key(&Key::Escape));
    }
}
