//! Designer: owns the live token set, the frame buffer and the record/play state machine.
//!
//! All token mutations go through `move_token`, which clamps, applies the
//! possession rules and, while recording, appends exactly one frame for the
//! whole update (mover plus any forced ball move).
//!
//! State machine:
//! - Idle -> Recording: `start_recording` (clears the buffer, writes frame 0)
//! - Recording -> Idle: `stop`
//! - Idle -> Playing: `play` (needs at least one frame)
//! - Playing -> Idle: `stop`, or `tick` running past the last frame
//!
//! Anything else is refused by returning `false`; refusals are not errors.

use log::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::color::Rgb;
use crate::config::Config;
use crate::data::{validate_frames, Frame, Play};
use crate::drag::DragTracker;
use crate::error::DesignerError;
use crate::geometry::Point;
use crate::outputs::{DesignerEvent, Outputs};
use crate::possession::PossessionRules;
use crate::sampling::{frame_at, is_past_end};
use crate::state::{DesignerState, TickStatus};
use crate::token::{default_layout, find_token, Token};

#[derive(Debug)]
pub struct Designer<C: Clock = SystemClock> {
    cfg: Config,
    rules: PossessionRules,
    clock: C,

    state: DesignerState,
    tokens: Vec<Token>,
    frames: Vec<Frame>,
    carrier: Option<String>,
    drag: DragTracker,

    // Clock readings captured on entering Recording / Playing.
    record_start_ms: u64,
    play_start_ms: u64,

    outputs: Outputs,
}

impl Designer<SystemClock> {
    pub fn new(cfg: Config) -> Self {
        Self::with_clock(cfg, SystemClock)
    }
}

impl Default for Designer<SystemClock> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<C: Clock> Designer<C> {
    /// Validating constructor for configs from outside the program.
    pub fn try_with_clock(cfg: Config, clock: C) -> Result<Self, DesignerError> {
        cfg.validate()?;
        Ok(Self::with_clock(cfg, clock))
    }

    /// `cfg` is used as given; callers holding untrusted config should go
    /// through [`Designer::try_with_clock`] or [`Config::validate`] first.
    pub fn with_clock(cfg: Config, clock: C) -> Self {
        Self {
            rules: PossessionRules::from(&cfg),
            tokens: default_layout(&cfg.court),
            cfg,
            clock,
            state: DesignerState::Idle,
            frames: Vec::new(),
            carrier: None,
            drag: DragTracker::new(),
            record_start_ms: 0,
            play_start_ms: 0,
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn state(&self) -> DesignerState {
        self.state
    }

    /// Live token set (the currently displayed pose while playing).
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: &str) -> Option<&Token> {
        find_token(&self.tokens, id)
    }

    /// Current recording buffer (or the loaded play's frames).
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    #[inline]
    pub fn is_dragging(&self, id: &str) -> bool {
        self.drag.is_dragging(id)
    }

    /// Events queued since the last call.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    // ----- state transitions -----

    /// Idle -> Recording. Clears the buffer and records the current pose at t=0.
    pub fn start_recording(&mut self) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        self.frames.clear();
        self.record_start_ms = self.clock.now_ms();
        self.frames.push(Frame::new(0, &self.tokens));
        self.state = DesignerState::Recording;
        debug!("recording started at {}", self.record_start_ms);
        self.outputs.push_event(DesignerEvent::RecordingStarted);
        true
    }

    /// Return to Idle from either Recording or Playing. No-op when already Idle.
    pub fn stop(&mut self) {
        match self.state {
            DesignerState::Idle => {}
            DesignerState::Recording => {
                self.state = DesignerState::Idle;
                debug!("recording stopped with {} frames", self.frames.len());
                self.outputs.push_event(DesignerEvent::RecordingStopped {
                    frames: self.frames.len(),
                });
            }
            DesignerState::Playing => {
                self.state = DesignerState::Idle;
                debug!("playback stopped");
                self.outputs.push_event(DesignerEvent::PlaybackStopped);
            }
        }
    }

    /// Idle -> Playing. Refused when there is nothing to play.
    pub fn play(&mut self) -> bool {
        if !self.state.is_idle() || self.frames.is_empty() {
            return false;
        }
        self.play_start_ms = self.clock.now_ms();
        self.state = DesignerState::Playing;
        let duration_ms = self.frames.last().map(|f| f.timestamp_ms).unwrap_or(0);
        debug!(
            "playback started: {} frames over {} ms",
            self.frames.len(),
            duration_ms
        );
        self.outputs.push_event(DesignerEvent::PlaybackStarted {
            frames: self.frames.len(),
            duration_ms,
        });
        true
    }

    /// Rendering-loop callback. Shows the last frame not in the future and ends
    /// playback once the clock is past the final frame.
    pub fn tick(&mut self) -> TickStatus {
        if !self.state.is_playing() {
            return TickStatus::Idle;
        }
        let elapsed = self.clock.now_ms().saturating_sub(self.play_start_ms);
        if let Some(frame) = frame_at(&self.frames, elapsed) {
            self.tokens.clone_from(&frame.tokens);
        }
        if is_past_end(&self.frames, elapsed) {
            self.state = DesignerState::Idle;
            debug!("playback ended after {elapsed} ms");
            self.outputs.push_event(DesignerEvent::PlaybackEnded {
                elapsed_ms: elapsed,
            });
            return TickStatus::Finished;
        }
        TickStatus::Continue
    }

    // ----- token updates -----

    /// The single mutation entry point for positions.
    ///
    /// Clamps `requested` to the court for the token's radius, evaluates
    /// possession on the clamped pose, applies any forced ball move, and appends
    /// one frame when recording. Refused while playing and for unknown ids.
    pub fn move_token(&mut self, id: &str, requested: Point) -> bool {
        if !self.state.accepts_moves() || requested.x.is_nan() || requested.y.is_nan() {
            return false;
        }
        let Some(idx) = self.tokens.iter().position(|t| t.id == id) else {
            return false;
        };

        let radius = self.cfg.radius_for(self.tokens[idx].kind);
        let clamped = self.cfg.court.bounds().clamp(requested, radius);

        let mut next = self.tokens.clone();
        next[idx].set_position(clamped);

        let update = self.rules.evaluate(&next, id, self.carrier.as_deref());
        if let Some(ball_pos) = update.ball_position {
            if let Some(ball) = next.iter_mut().find(|t| t.is_ball()) {
                ball.set_position(ball_pos);
            }
        }

        if self.state.is_recording() {
            self.record_frame(&next);
        }
        self.tokens = next;
        self.set_carrier(update.carrier);
        true
    }

    fn record_frame(&mut self, tokens: &[Token]) {
        let since_start = self.clock.now_ms().saturating_sub(self.record_start_ms);
        // A clock stepping backwards must not reorder frames.
        let previous = self.frames.last().map(|f| f.timestamp_ms).unwrap_or(0);
        let timestamp_ms = since_start.max(previous);
        self.frames.push(Frame::new(timestamp_ms, tokens));
        self.outputs
            .push_event(DesignerEvent::FrameRecorded { timestamp_ms });
    }

    fn set_carrier(&mut self, carrier: Option<String>) {
        if carrier != self.carrier {
            debug!("carrier {:?} -> {:?}", self.carrier, carrier);
            let from = std::mem::replace(&mut self.carrier, carrier);
            self.outputs.push_event(DesignerEvent::CarrierChanged {
                from,
                to: self.carrier.clone(),
            });
        }
    }

    /// Anchor a drag gesture on a token. Unknown ids are ignored.
    pub fn begin_drag(&mut self, id: &str, pointer: Point) -> bool {
        if find_token(&self.tokens, id).is_none() {
            return false;
        }
        self.drag.begin(id, pointer);
        true
    }

    /// Feed a pointer sample for an active gesture and submit the resulting move.
    pub fn drag_to(&mut self, id: &str, pointer: Point) -> bool {
        let Some(current) = find_token(&self.tokens, id).map(Token::position) else {
            return false;
        };
        match self.drag.drag_to(id, pointer, current) {
            Some(requested) => self.move_token(id, requested),
            None => false,
        }
    }

    pub fn end_drag(&mut self, id: &str) -> bool {
        self.drag.end(id)
    }

    /// Recolor a token. Not recorded as a frame; refused while playing.
    pub fn set_token_color(&mut self, id: &str, color: Rgb) -> bool {
        if self.state.is_playing() {
            return false;
        }
        match self.tokens.iter_mut().find(|t| t.id == id) {
            Some(token) => {
                token.color = color;
                true
            }
            None => false,
        }
    }

    /// Back to the default layout. Idle only; the frame buffer is kept.
    pub fn reset_positions(&mut self) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        self.tokens = default_layout(&self.cfg.court);
        self.drag.cancel_all();
        self.set_carrier(None);
        self.outputs.push_event(DesignerEvent::PositionsReset);
        true
    }

    /// Replace the frame buffer and show its first pose. Idle only.
    ///
    /// Malformed frame lists (empty, out of order, wrong ball count) are refused
    /// and logged.
    pub fn load_frames(&mut self, frames: Vec<Frame>) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        if let Err(e) = validate_frames(&frames) {
            warn!("refusing to load frames: {e}");
            return false;
        }
        self.tokens.clone_from(&frames[0].tokens);
        self.frames = frames;
        self.drag.cancel_all();
        self.set_carrier(None);
        self.outputs.push_event(DesignerEvent::PlayLoaded {
            frames: self.frames.len(),
        });
        true
    }

    pub fn load_play(&mut self, play: &Play) -> bool {
        debug!("loading play '{}' ({})", play.name, play.id);
        self.load_frames(play.frames.clone())
    }
}
