//! The cooperative driver around the engine: commands in, sink calls out,
//! wakes fired from an injected clock.

use ludo_core::{Command, Config, Engine, Event, GameState, PieceSet, PlayerId, Position};

use crate::timer::TimerQueue;

/// Render boundary. The runtime calls these to reflect state; it never reads
/// state back. All methods default to no-ops.
pub trait RenderSink {
    fn set_piece_position(&mut self, _player: PlayerId, _piece: u8, _pos: Position) {}
    fn highlight_eligible(&mut self, _player: PlayerId, _pieces: PieceSet) {}
    fn clear_highlights(&mut self) {}
    fn show_direction_choice(&mut self, _player: PlayerId, _piece: u8) {}
    fn set_turn_indicator(&mut self, _player: PlayerId) {}
    /// `None` clears the display.
    fn set_dice_display(&mut self, _player: PlayerId, _value: Option<u8>) {}
    fn set_dice_input_enabled(&mut self, _player: PlayerId, _enabled: bool) {}
}

/// Fire-and-forget feedback signals. Delivery is not required for
/// correctness. All methods default to no-ops.
pub trait FeedbackSink {
    fn dice_rolled(&mut self, _player: PlayerId, _value: u8) {}
    fn piece_step(&mut self, _player: PlayerId, _piece: u8) {}
    fn capture(&mut self, _player: PlayerId, _victims: u8) {}
    fn landed_safe(&mut self, _player: PlayerId, _piece: u8) {}
    fn reached_home(&mut self, _player: PlayerId, _piece: u8) {}
    fn game_won(&mut self, _player: PlayerId) {}
}

pub struct NullRender;
impl RenderSink for NullRender {}

pub struct NullFeedback;
impl FeedbackSink for NullFeedback {}

/// Engine + timer queue + sinks, driven by an injected millisecond clock.
pub struct Runtime<R, F> {
    engine: Engine,
    timers: TimerQueue,
    pub render: R,
    pub feedback: F,
    now_ms: u64,
    /// Internal-inconsistency reports seen (diagnosis only).
    pub faults: u64,
}

impl<R: RenderSink, F: FeedbackSink> Runtime<R, F> {
    pub fn new(config: &Config, render: R, feedback: F) -> Self {
        let mut rt = Self {
            engine: Engine::new(config),
            timers: TimerQueue::new(),
            render,
            feedback,
            now_ms: 0,
            faults: 0,
        };
        // Same bootstrap path as an explicit reset.
        let events = rt.engine.handle(Command::ResetRequested);
        rt.dispatch(events);
        rt
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Feed one external command into the engine at the current time.
    pub fn submit(&mut self, cmd: Command) {
        let events = self.engine.handle(cmd);
        self.dispatch(events);
    }

    /// Advance the clock, firing every wake due on the way in deadline
    /// order. Sequences that chain (movement steps) keep their pacing: each
    /// fire moves the clock to its own deadline before the next is
    /// considered.
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some(deadline) = self.timers.next_deadline() {
            if deadline > target_ms {
                break;
            }
            let entry = self
                .timers
                .pop_due(deadline)
                .expect("entry at its own deadline");
            self.now_ms = self.now_ms.max(entry.deadline_ms);
            let events = self.engine.handle(Command::WakeFired {
                token: entry.token,
                wake: entry.wake,
            });
            self.dispatch(events);
        }
        self.now_ms = self.now_ms.max(target_ms);
    }

    pub fn advance_by(&mut self, delta_ms: u64) {
        self.advance_to(self.now_ms + delta_ms);
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        for ev in events {
            match ev {
                Event::PiecePlaced { player, piece, pos } => {
                    self.render.set_piece_position(player, piece, pos)
                }
                Event::EligibleHighlighted { player, pieces } => {
                    self.render.highlight_eligible(player, pieces)
                }
                Event::HighlightsCleared => self.render.clear_highlights(),
                Event::DirectionChoiceShown { player, piece } => {
                    self.render.show_direction_choice(player, piece)
                }
                Event::TurnIndicator { player } => self.render.set_turn_indicator(player),
                Event::DiceShown { player, value } => {
                    self.render.set_dice_display(player, Some(value))
                }
                Event::DiceCleared { player } => self.render.set_dice_display(player, None),
                Event::DiceInputEnabled { player, enabled } => {
                    self.render.set_dice_input_enabled(player, enabled)
                }
                Event::DiceRolled { player, value } => self.feedback.dice_rolled(player, value),
                Event::PieceStepped { player, piece } => self.feedback.piece_step(player, piece),
                Event::CaptureSignal { player, victims } => {
                    self.feedback.capture(player, victims)
                }
                Event::LandedSafe { player, piece } => self.feedback.landed_safe(player, piece),
                Event::ReachedHome { player, piece } => self.feedback.reached_home(player, piece),
                Event::GameWon { player } => self.feedback.game_won(player),
                Event::WakeScheduled {
                    token,
                    wake,
                    delay_ms,
                } => self.timers.schedule(self.now_ms + delay_ms, token, wake),
                Event::PendingCancelled => self.timers.clear(),
                Event::InternalFault { .. } => self.faults += 1,
            }
        }
    }
}
