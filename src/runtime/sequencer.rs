use crate::foundation::{
    core::TimeWindow,
    error::{PagewrightError, PagewrightResult},
};

/// One element highlighted over a playback interval.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightWindow {
    pub target_id: String,
    #[serde(flatten)]
    pub window: TimeWindow,
}

impl HighlightWindow {
    pub fn new(target_id: impl Into<String>, start: f64, end: f64) -> PagewrightResult<Self> {
        Ok(Self {
            target_id: target_id.into(),
            window: TimeWindow::new(start, end)?,
        })
    }
}

/// Windows ordered by start time with no overlap. Immutable once built.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct HighlightSchedule {
    windows: Vec<HighlightWindow>,
}

impl HighlightSchedule {
    pub fn new(windows: Vec<HighlightWindow>) -> PagewrightResult<Self> {
        for w in &windows {
            if w.target_id.trim().is_empty() {
                return Err(PagewrightError::validation(
                    "highlight window target id must be non-empty",
                ));
            }
            w.window.validate()?;
        }
        for pair in windows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.window.start < a.window.start {
                return Err(PagewrightError::validation(format!(
                    "highlight window '{}' starts before '{}'",
                    b.target_id, a.target_id
                )));
            }
            if a.window.overlaps(b.window) {
                return Err(PagewrightError::validation(format!(
                    "highlight windows '{}' and '{}' overlap",
                    a.target_id, b.target_id
                )));
            }
        }
        Ok(Self { windows })
    }

    /// Narrated walkthrough of the four training control buttons.
    pub fn training_controls() -> Self {
        let w = |id: &str, start: f64, end: f64| HighlightWindow {
            target_id: id.to_string(),
            window: TimeWindow { start, end },
        };
        Self {
            windows: vec![
                w("btn-start-tour", 0.0, 4.5),
                w("btn-show-hotspots", 4.5, 8.5),
                w("btn-take-quiz", 8.5, 12.5),
                w("btn-reset", 12.5, 17.0),
            ],
        }
    }

    pub fn windows(&self) -> &[HighlightWindow] {
        &self.windows
    }

    /// Targets whose window contains `t`, in schedule order.
    pub fn active_at(&self, t: f64) -> Vec<&str> {
        self.windows
            .iter()
            .filter(|w| w.window.contains(t))
            .map(|w| w.target_id.as_str())
            .collect()
    }

    /// Every target id once, in first-appearance order.
    pub fn targets(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.windows.len());
        for w in &self.windows {
            if !out.contains(&w.target_id.as_str()) {
                out.push(&w.target_id);
            }
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
#[error("playback rejected: {0}")]
pub struct PlaybackRejected(pub String);

/// Media element the narration plays through.
pub trait MediaElement {
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn seek(&mut self, secs: f64);
}

/// Page elements that can be toggled into the highlighted look.
pub trait HighlightSurface {
    fn set_highlighted(&mut self, target_id: &str, on: bool);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequencerState {
    Idle,
    Playing { current_time: f64 },
    Completed,
}

pub struct HighlightSequencer {
    schedule: HighlightSchedule,
    state: SequencerState,
    active: Vec<String>,
}

impl HighlightSequencer {
    pub fn new(schedule: HighlightSchedule) -> Self {
        Self {
            schedule,
            state: SequencerState::Idle,
            active: Vec::new(),
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn schedule(&self) -> &HighlightSchedule {
        &self.schedule
    }

    /// Start playback. A missing or refusing media element leaves the sequencer idle.
    pub fn play(&mut self, media: Option<&mut dyn MediaElement>) -> SequencerState {
        if matches!(self.state, SequencerState::Playing { .. }) {
            return self.state;
        }
        let Some(media) = media else {
            tracing::warn!("narration audio not loaded");
            self.state = SequencerState::Idle;
            return self.state;
        };
        match media.play() {
            Ok(()) => {
                self.state = SequencerState::Playing { current_time: 0.0 };
            }
            Err(err) => {
                tracing::warn!(%err, "narration autoplay blocked");
                self.state = SequencerState::Idle;
            }
        }
        self.state
    }

    /// Recompute the active set for playback position `t`.
    ///
    /// Ignored unless playing; repeated calls with the same `t` are no-ops.
    pub fn on_time_update(&mut self, t: f64, surface: &mut dyn HighlightSurface) -> &[String] {
        let SequencerState::Playing { current_time } = &mut self.state else {
            return &self.active;
        };
        *current_time = t;

        let active = self.schedule.active_at(t);
        for target in self.schedule.targets() {
            surface.set_highlighted(target, active.contains(&target));
        }
        self.active = active.into_iter().map(str::to_string).collect();
        &self.active
    }

    /// Natural end of playback.
    pub fn on_ended(&mut self, surface: &mut dyn HighlightSurface) {
        if matches!(self.state, SequencerState::Playing { .. }) {
            self.state = SequencerState::Completed;
        }
        self.clear(surface);
    }

    /// Rewind and clear. Safe from any state, with or without media.
    pub fn stop(
        &mut self,
        media: Option<&mut dyn MediaElement>,
        surface: &mut dyn HighlightSurface,
    ) {
        if let Some(media) = media {
            media.pause();
            media.seek(0.0);
        }
        self.clear(surface);
        self.state = SequencerState::Idle;
    }

    fn clear(&mut self, surface: &mut dyn HighlightSurface) {
        for target in self.schedule.targets() {
            surface.set_highlighted(target, false);
        }
        self.active.clear();
    }
}
