use crate::foundation::{
    core::ScrollOffset,
    error::{PagewrightError, PagewrightResult},
};

/// Page viewport as seen by the tour.
pub trait Viewport {
    fn scroll_y(&self) -> ScrollOffset;
    fn scroll_to(&mut self, y: ScrollOffset);
    /// `Some(offset)`: pin the body (`scroll-locked` class, `top: -offset px`).
    /// `None`: remove the pin.
    fn set_body_lock(&mut self, pinned_at: Option<ScrollOffset>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourEnd {
    Completed,
    Cancelled,
}

/// Scroll state owned by one guided-tour lifecycle.
///
/// The saved offset only exists while the tour holds the lock, so a second lock cannot overwrite
/// it: the session must be unlocked or [`reset`](Self::reset) first.
#[derive(Debug, Default)]
pub struct TourSession {
    saved: Option<ScrollOffset>,
    last_end: Option<TourEnd>,
}

impl TourSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    pub fn saved_offset(&self) -> Option<ScrollOffset> {
        self.saved
    }

    pub fn last_end(&self) -> Option<TourEnd> {
        self.last_end
    }

    pub fn lock_scroll(&mut self, viewport: &mut dyn Viewport) -> PagewrightResult<ScrollOffset> {
        if let Some(saved) = self.saved {
            return Err(PagewrightError::session(format!(
                "scroll already locked at {}px",
                saved.0
            )));
        }
        let offset = viewport.scroll_y();
        viewport.set_body_lock(Some(offset));
        self.saved = Some(offset);
        tracing::debug!(offset = offset.0, "scroll locked");
        Ok(offset)
    }

    /// Restore the saved offset. Returns `None` when nothing was locked.
    pub fn unlock_scroll(&mut self, viewport: &mut dyn Viewport) -> Option<ScrollOffset> {
        let saved = self.saved.take()?;
        viewport.set_body_lock(None);
        viewport.scroll_to(saved);
        tracing::debug!(offset = saved.0, "scroll restored");
        Some(saved)
    }

    pub fn start_tour(&mut self, viewport: &mut dyn Viewport) -> PagewrightResult<()> {
        self.lock_scroll(viewport)?;
        self.last_end = None;
        Ok(())
    }

    pub fn end_tour(&mut self, end: TourEnd, viewport: &mut dyn Viewport) -> Option<ScrollOffset> {
        self.last_end = Some(end);
        self.unlock_scroll(viewport)
    }

    /// Drop any held lock, restoring the viewport, so a new tour can start.
    pub fn reset(&mut self, viewport: &mut dyn Viewport) {
        self.unlock_scroll(viewport);
        self.last_end = None;
    }
}
