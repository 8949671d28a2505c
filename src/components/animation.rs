//! Animation playback state and a rule-based clip controller.
//!
//! [`Animation`] is the per-entity state machine. It holds a shared handle to
//! the character's [`AnimationTable`], the [`PlaybackState`] of the active clip
//! and the direction the entity faces. The machine starts uninitialised (no
//! clip) and moves between clips only through [`Animation::play`].
//!
//! [`AnimationController`] picks which clip an entity should be playing from
//! its [`Signals`](crate::components::signals::Signals); the first matching
//! rule wins and the fallback is used otherwise.

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::components::signals::Signals;
use crate::error::{AnimationError, LoadError};
use crate::resources::animationstore::{AnimationClip, AnimationTable, FrameRect};

/// Relative slack added to `elapsed * fps` before flooring, so that a frame
/// boundary hit exactly (up to rounding) counts as reached.
const FRAME_EPSILON: f64 = 1e-9;

/// Horizontal direction an entity looks at. Sheets are authored facing right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Sign of the direction along the x axis.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Progress through the active clip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    /// Active clip, `None` until the first [`Animation::play`].
    pub clip: Option<String>,
    /// Always below the active clip's frame count.
    pub frame_index: usize,
    /// Playback seconds folded in before the current run of equal steps.
    pub base: f64,
    /// Steps of `step` seconds taken since `base`.
    pub steps: u64,
    pub step: f64,
    /// Set once a one-shot clip has played through.
    pub finished: bool,
}

impl PlaybackState {
    /// Seconds played since the clip was switched in.
    ///
    /// A fixed tick gives `k * T` in one multiplication, never a running sum.
    pub fn elapsed(&self) -> f64 {
        self.base + self.steps as f64 * self.step
    }

    fn push_step(&mut self, dt: f64) {
        if self.steps > 0 && self.step != dt {
            self.base = self.elapsed();
            self.steps = 0;
        }
        self.step = dt;
        self.steps += 1;
    }
}

#[derive(Debug, Clone, Component)]
pub struct Animation {
    table: Arc<AnimationTable>,
    pub state: PlaybackState,
    pub facing: Facing,
}

impl Animation {
    /// Uninitialised animation over `table`.
    pub fn new(table: Arc<AnimationTable>) -> Self {
        Self {
            table,
            state: PlaybackState::default(),
            facing: Facing::default(),
        }
    }

    /// Animation already playing `clip`.
    pub fn with_clip(table: Arc<AnimationTable>, clip: &str) -> Result<Self, AnimationError> {
        let mut animation = Self::new(table);
        animation.play(clip)?;
        Ok(animation)
    }

    pub fn table(&self) -> &AnimationTable {
        &self.table
    }

    pub fn clip_name(&self) -> Option<&str> {
        self.state.clip.as_deref()
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.state.clip.as_deref().and_then(|name| self.table.get(name))
    }

    pub fn frame_index(&self) -> usize {
        self.state.frame_index
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Switch to `name`.
    ///
    /// Requesting the clip that is already active changes nothing and returns
    /// `Ok(false)`, so holding a direction does not restart the stride every
    /// tick. Any other known clip restarts at frame 0 and returns `Ok(true)`.
    pub fn play(&mut self, name: &str) -> Result<bool, AnimationError> {
        if !self.table.contains(name) {
            return Err(AnimationError::UnknownClip {
                name: name.to_string(),
            });
        }
        if self.state.clip.as_deref() == Some(name) {
            return Ok(false);
        }
        self.state = PlaybackState {
            clip: Some(name.to_string()),
            ..PlaybackState::default()
        };
        Ok(true)
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Returns `true` only on the call where a one-shot clip completes.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some(clip) = self.state.clip.as_deref().and_then(|n| self.table.get(n)) else {
            return false;
        };
        if self.state.finished || clip.fps <= 0.0 || clip.frame_count == 0 || dt <= 0.0 {
            return false;
        }
        let frame_count = clip.frame_count;
        let looped = clip.looped;
        let fps = clip.fps as f64;

        self.state.push_step(dt);
        let exact = self.state.elapsed() * fps;
        let due = (exact + exact.max(1.0) * FRAME_EPSILON).floor() as u64;

        if looped {
            self.state.frame_index = (due % frame_count as u64) as usize;
        } else if due >= frame_count as u64 {
            self.state.frame_index = frame_count - 1;
            self.state.finished = true;
            return true;
        } else {
            self.state.frame_index = due as usize;
        }
        false
    }

    /// Source rectangle of the current frame.
    pub fn source_rect(&self) -> Option<FrameRect> {
        self.current_clip()
            .map(|clip| clip.frame_rect(self.state.frame_index))
    }

    /// Whether the frame must be mirrored horizontally when drawn.
    pub fn flip_h(&self) -> bool {
        self.facing == Facing::Left
    }
}

// Generic, data-driven conditions over Signals
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    HasFlag { key: String },
    LacksFlag { key: String },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn has_flag(key: impl Into<String>) -> Self {
        Condition::HasFlag { key: key.into() }
    }

    pub fn lacks_flag(key: impl Into<String>) -> Self {
        Condition::LacksFlag { key: key.into() }
    }

    /// Recursively evaluate against an entity's signals.
    pub fn evaluate(&self, signals: &Signals) -> bool {
        match self {
            Condition::HasFlag { key } => signals.has_flag(key),
            Condition::LacksFlag { key } => !signals.has_flag(key),
            Condition::All(conditions) => conditions.iter().all(|c| c.evaluate(signals)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.evaluate(signals)),
            Condition::Not(condition) => !condition.evaluate(signals),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimRule {
    pub when: Condition,
    pub set_key: String,
}

/// Chooses the clip an entity should play.
#[derive(Debug, Clone, Component)]
pub struct AnimationController {
    pub rules: Vec<AnimRule>,
    pub fallback_key: String,
}

impl AnimationController {
    pub fn new(fallback_key: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback_key: fallback_key.into(),
        }
    }

    pub fn with_rule(mut self, when: Condition, set_key: impl Into<String>) -> Self {
        self.rules.push(AnimRule {
            when,
            set_key: set_key.into(),
        });
        self
    }

    /// Clip selected for the given signals.
    pub fn select(&self, signals: &Signals) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.when.evaluate(signals))
            .map(|rule| rule.set_key.as_str())
            .unwrap_or(self.fallback_key.as_str())
    }

    /// Every clip this controller can ever select.
    pub fn clip_keys(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|rule| rule.set_key.as_str())
            .chain(std::iter::once(self.fallback_key.as_str()))
    }

    /// Fail at load time if a selectable clip is missing from `table`.
    pub fn validate_clips(&self, table: &AnimationTable) -> Result<(), LoadError> {
        match self.clip_keys().find(|key| !table.contains(key)) {
            Some(missing) => Err(LoadError::MissingClip {
                name: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}
