use crate::constants::DEFAULT_TRANSITION_DURATION_SEC;
use std::fmt;
use std::str::FromStr;

/// Closed set of compositor blend algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionType {
    #[default]
    Crossfade,
    Dissolve,
    GlitchCut,
    ZoomBlur,
    Instant,
}

impl TransitionType {
    pub const ALL: [TransitionType; 5] = [
        TransitionType::Crossfade,
        TransitionType::Dissolve,
        TransitionType::GlitchCut,
        TransitionType::ZoomBlur,
        TransitionType::Instant,
    ];

    /// Value of the `kind` uniform in `transition.wgsl`.
    #[inline]
    pub fn shader_index(self) -> u32 {
        match self {
            TransitionType::Crossfade => 0,
            TransitionType::Dissolve => 1,
            TransitionType::GlitchCut => 2,
            TransitionType::ZoomBlur => 3,
            TransitionType::Instant => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransitionType::Crossfade => "crossfade",
            TransitionType::Dissolve => "dissolve",
            TransitionType::GlitchCut => "glitch-cut",
            TransitionType::ZoomBlur => "zoom-blur",
            TransitionType::Instant => "instant",
        }
    }

    /// Next type in cycling order, wrapping after `Instant`.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown transition type '{0}'")]
pub struct UnknownTransitionType(pub String);

impl FromStr for TransitionType {
    type Err = UnknownTransitionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        TransitionType::ALL
            .iter()
            .copied()
            .find(|t| t.label() == key)
            .ok_or_else(|| UnknownTransitionType(s.to_string()))
    }
}

/// Externally visible transition state.
///
/// `next_preset_id.is_some() == is_transitioning` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    pub active_preset_id: String,
    pub next_preset_id: Option<String>,
    pub is_transitioning: bool,
    pub transition_progress: f32,
    pub transition_type: TransitionType,
    /// Seconds. 0 only when a caller asked for a degenerate duration.
    pub transition_duration: f32,
}

impl TransitionState {
    pub fn new(active_preset_id: impl Into<String>) -> Self {
        Self {
            active_preset_id: active_preset_id.into(),
            next_preset_id: None,
            is_transitioning: false,
            transition_progress: 0.0,
            transition_type: TransitionType::default(),
            transition_duration: DEFAULT_TRANSITION_DURATION_SEC,
        }
    }

    /// Request a transition. Returns `false` (and changes nothing) when the
    /// target is already active or another transition is running.
    ///
    /// `kind`/`duration` become the defaults for later requests, as the
    /// operator expects the last used style to stick.
    pub fn start_transition(
        &mut self,
        target: &str,
        kind: Option<TransitionType>,
        duration: Option<f32>,
    ) -> bool {
        if self.is_transitioning || target == self.active_preset_id {
            return false;
        }
        if let Some(k) = kind {
            self.transition_type = k;
        }
        if let Some(d) = duration {
            self.transition_duration = sanitize_duration(d);
        }
        self.next_preset_id = Some(target.to_string());
        self.transition_progress = 0.0;
        self.is_transitioning = true;
        log::info!(
            "[conductor] {} -> {} ({}, {:.2}s)",
            self.active_preset_id,
            target,
            self.transition_type,
            self.transition_duration
        );
        true
    }

    pub fn set_transition_type(&mut self, kind: TransitionType) {
        self.transition_type = kind;
    }

    pub fn set_transition_duration(&mut self, duration: f32) {
        self.transition_duration = sanitize_duration(duration);
    }

    pub fn update_progress(&mut self, progress: f32) {
        if self.is_transitioning {
            self.transition_progress = progress.clamp(0.0, 1.0);
        }
    }

    /// Commit the pending target. No-op when idle.
    pub fn complete_transition(&mut self) {
        if let Some(next) = self.next_preset_id.take() {
            log::info!("[conductor] now showing {}", next);
            self.active_preset_id = next;
        }
        self.is_transitioning = false;
        self.transition_progress = 0.0;
    }
}

#[inline]
fn sanitize_duration(d: f32) -> f32 {
    if d.is_finite() && d > 0.0 {
        d
    } else {
        0.0
    }
}

/// `clamp(elapsed / duration, 0, 1)`; a zero duration is already complete.
#[inline]
pub fn transition_progress(elapsed_sec: f64, duration_sec: f32) -> f32 {
    if duration_sec <= 0.0 {
        return 1.0;
    }
    (elapsed_sec / duration_sec as f64).clamp(0.0, 1.0) as f32
}

/// One of the two persistent compositor slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// What the compositor has to do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlan {
    /// Slot rendered every frame and bound as the `from` texture.
    pub from: Slot,
    /// Bound as `to`; equals `from` while idle.
    pub to: Slot,
    /// Whether the inactive slot must be refreshed this frame.
    pub render_inactive: bool,
    pub progress: f32,
    pub kind: TransitionType,
    /// This frame committed the transition and flipped the active slot.
    pub completed: bool,
}

/// Slot bookkeeping for the dual-buffer compositor.
///
/// Content identities are assigned per slot and never cleared: only the
/// active label flips when a transition completes, so whatever a slot shows
/// keeps its state until a later transition targets that slot again.
#[derive(Clone, Debug)]
pub struct SlotScheduler {
    active: Slot,
    content: [Option<String>; 2],
    started_at: Option<f64>,
}

impl SlotScheduler {
    pub fn new(initial_preset_id: impl Into<String>) -> Self {
        Self {
            active: Slot::A,
            content: [Some(initial_preset_id.into()), None],
            started_at: None,
        }
    }

    pub fn active(&self) -> Slot {
        self.active
    }

    pub fn content(&self, slot: Slot) -> Option<&str> {
        self.content[slot.index()].as_deref()
    }

    /// Advance one frame at time `now` (seconds on any monotonic timeline).
    pub fn frame(&mut self, state: &mut TransitionState, now: f64) -> FramePlan {
        let from = self.active;
        let inactive = from.other();
        let kind = state.transition_type;

        let next = match (state.is_transitioning, state.next_preset_id.as_deref()) {
            (true, Some(next)) => next,
            _ => {
                self.started_at = None;
                return FramePlan {
                    from,
                    to: from,
                    render_inactive: false,
                    progress: 0.0,
                    kind,
                    completed: false,
                };
            }
        };

        // First frame of this transition: load the target and start timing here,
        // so request-to-render latency doesn't eat into the fade.
        let started_at = match self.started_at {
            Some(t) => t,
            None => {
                if self.content[inactive.index()].as_deref() != Some(next) {
                    self.content[inactive.index()] = Some(next.to_string());
                }
                self.started_at = Some(now);
                now
            }
        };

        let progress = transition_progress(now - started_at, state.transition_duration);
        state.update_progress(progress);

        let completed = progress >= 1.0;
        if completed {
            self.active = inactive;
            self.started_at = None;
            state.complete_transition();
        }

        FramePlan {
            from,
            to: inactive,
            render_inactive: true,
            progress,
            kind,
            completed,
        }
    }
}
