use crate::foundation::error::{PagewrightError, PagewrightResult};

/// Half-open playback interval `[start, end)` in seconds of media time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// Inclusive window start.
    pub start: f64,
    /// Exclusive window end.
    pub end: f64, // exclusive
}

impl TimeWindow {
    /// Create a validated window with finite bounds, `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> PagewrightResult<Self> {
        let w = Self { start, end };
        w.validate()?;
        Ok(w)
    }

    pub fn validate(self) -> PagewrightResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(PagewrightError::validation("TimeWindow bounds must be finite"));
        }
        if self.start < 0.0 {
            return Err(PagewrightError::validation("TimeWindow start must be >= 0"));
        }
        if self.start >= self.end {
            return Err(PagewrightError::validation("TimeWindow start must be < end"));
        }
        Ok(())
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Return `true` when the two windows share any instant.
    ///
    /// Touching windows (`a.end == b.start`) do not overlap.
    pub fn overlaps(self, other: TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Vertical scroll offset in CSS pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ScrollOffset(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_half_open() {
        let w = TimeWindow::new(4.5, 8.5).unwrap();
        assert!(w.contains(4.5));
        assert!(w.contains(8.499));
        assert!(!w.contains(8.5));
        assert!(!w.contains(4.4));
    }

    #[test]
    fn rejects_degenerate_windows() {
        assert!(TimeWindow::new(2.0, 2.0).is_err());
        assert!(TimeWindow::new(3.0, 1.0).is_err());
        assert!(TimeWindow::new(-1.0, 1.0).is_err());
        assert!(TimeWindow::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let a = TimeWindow::new(0.0, 4.5).unwrap();
        let b = TimeWindow::new(4.5, 8.5).unwrap();
        let c = TimeWindow::new(4.0, 5.0).unwrap();
        assert!(!a.overlaps(b));
        assert!(a.overlaps(c));
        assert!(b.overlaps(c));
    }
}
