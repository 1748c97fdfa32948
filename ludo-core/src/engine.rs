//! Turn/state controller: the state machine driving roll, eligibility,
//! selection, movement, capture, extra turns, and the timed handover.
//!
//! This module is the single place that mutates `GameState` via rules. Every
//! externally triggered command is validated against the current state and
//! silently ignored when illegal: no state change, no error to the caller.

use crate::board::{Direction, PlayerId, Position, PIECES_PER_PLAYER};
use crate::config::Config;
use crate::dice::DicePolicy;
use crate::eligible::{auto_move_candidate, backward_eligible, forward_eligible};
use crate::event::{Command, Event, SeqToken, Wake};
use crate::movement;
use crate::state::{GameState, Phase};

#[derive(Debug, Clone, Copy)]
struct PendingWake {
    token: SeqToken,
    wake: Wake,
}

/// The engine: game state, dice policy, pacing, and the pending-wake slot.
///
/// Only one timed sequence is pending at a time; scheduling a new one
/// invalidates the previous token, so a stale wake can never mutate state.
pub struct Engine {
    state: GameState,
    dice: DicePolicy,
    roll_presentation_ms: u64,
    move_step_ms: u64,
    handover_delay_ms: u64,
    next_token: u64,
    pending: Option<PendingWake>,
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        Self {
            state: GameState::initial(),
            dice: DicePolicy::new(config.chance.to_mode()),
            roll_presentation_ms: config.pacing.roll_presentation_ms,
            move_step_ms: config.pacing.move_step_ms,
            handover_delay_ms: config.pacing.handover_delay_ms,
            next_token: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Process one command to completion and return the emitted events.
    pub fn handle(&mut self, cmd: Command) -> Vec<Event> {
        let mut out = Vec::new();
        match cmd {
            Command::RollRequested { player } => self.on_roll_requested(player, &mut out),
            Command::PieceSelected {
                player,
                piece,
                direction,
            } => self.on_piece_selected(player, piece, direction, &mut out),
            Command::ResetRequested => self.on_reset(&mut out),
            Command::WakeFired { token, wake } => self.on_wake(token, wake, &mut out),
        }
        out
    }

    fn schedule(&mut self, wake: Wake, delay_ms: u64, out: &mut Vec<Event>) {
        let token = SeqToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingWake { token, wake });
        out.push(Event::WakeScheduled {
            token,
            wake,
            delay_ms,
        });
    }

    fn on_wake(&mut self, token: SeqToken, wake: Wake, out: &mut Vec<Event>) {
        match self.pending {
            Some(p) if p.token == token && p.wake == wake => self.pending = None,
            // Stale: cancelled or superseded since it was scheduled.
            _ => return,
        }
        match wake {
            Wake::CommitRoll => self.commit_roll(out),
            Wake::MoveStep => self.move_step(out),
            Wake::FinishHandover => self.finish_handover(out),
        }
    }

    fn on_roll_requested(&mut self, player: PlayerId, out: &mut Vec<Event>) {
        if player != self.state.turn {
            return;
        }
        if self.state.phase != Phase::AwaitingRoll {
            return;
        }

        let stuck = self.state.all_in_base(player);
        let streak = &mut self.state.roll_streak[player.index()];
        let value = self.dice.roll(player, streak, stuck);

        self.state.phase = Phase::RollPresentation { value };
        out.push(Event::DiceRolled { player, value });
        out.push(Event::DiceInputEnabled {
            player,
            enabled: false,
        });
        self.schedule(Wake::CommitRoll, self.roll_presentation_ms, out);
    }

    fn commit_roll(&mut self, out: &mut Vec<Event>) {
        let value = match self.state.phase {
            Phase::RollPresentation { value } => value,
            _ => return,
        };
        let player = self.state.turn;
        // Backward eligibility keys on the roll before this one.
        let prev_roll_was_six = self.state.last_roll_was_six;

        self.state.dice_value = Some(value);
        self.state.last_roll_was_six = value == 6;
        out.push(Event::DiceShown { player, value });

        if value == 0 {
            self.begin_handover(out);
            return;
        }

        let forward = forward_eligible(&self.state, player, value);
        let backward = backward_eligible(&self.state, player, value, prev_roll_was_six);

        if forward.is_empty() && backward.is_empty() {
            self.begin_handover(out);
            return;
        }

        out.push(Event::EligibleHighlighted {
            player,
            pieces: forward.union(backward),
        });

        if let Some(piece) = auto_move_candidate(&self.state, player, value, forward, backward) {
            self.begin_move(player, piece, Direction::Forward, out);
            return;
        }

        self.state.phase = Phase::Rolled { forward, backward };
    }

    fn on_piece_selected(
        &mut self,
        player: PlayerId,
        piece: u8,
        direction: Option<Direction>,
        out: &mut Vec<Event>,
    ) {
        if player != self.state.turn || piece >= PIECES_PER_PLAYER {
            return;
        }
        let (forward, backward) = match self.state.phase {
            Phase::Rolled { forward, backward } => (forward, backward),
            _ => return,
        };
        let in_forward = forward.contains(piece);
        let in_backward = backward.contains(piece);
        if !in_forward && !in_backward {
            return;
        }

        let chosen = match direction {
            None if in_forward && in_backward => {
                // Ambiguous: wait for an explicit direction choice.
                out.push(Event::DirectionChoiceShown { player, piece });
                return;
            }
            None => {
                if in_forward {
                    Direction::Forward
                } else {
                    Direction::Backward
                }
            }
            Some(Direction::Forward) if in_forward => Direction::Forward,
            Some(Direction::Backward) if in_backward => Direction::Backward,
            Some(_) => return,
        };

        self.begin_move(player, piece, chosen, out);
    }

    fn begin_move(
        &mut self,
        player: PlayerId,
        piece: u8,
        direction: Direction,
        out: &mut Vec<Event>,
    ) {
        let steps = match self.state.dice_value {
            Some(v) if v > 0 => v,
            _ => return,
        };
        out.push(Event::HighlightsCleared);

        // Base exit is a direct jump to the start cell, no step animation.
        if matches!(self.state.position(player, piece), Position::Base { .. }) {
            let pos = movement::enter_from_base(&mut self.state, player, piece);
            out.push(Event::PiecePlaced { player, piece, pos });
            self.finish_move(player, piece, out);
            return;
        }

        self.state.phase = Phase::Moving {
            piece,
            direction,
            steps_left: steps,
        };
        self.schedule(Wake::MoveStep, self.move_step_ms, out);
    }

    fn move_step(&mut self, out: &mut Vec<Event>) {
        let (piece, direction, steps_left) = match self.state.phase {
            Phase::Moving {
                piece,
                direction,
                steps_left,
            } => (piece, direction, steps_left),
            _ => return,
        };
        let player = self.state.turn;

        let stepped = match direction {
            Direction::Forward => movement::step_forward(&mut self.state, player, piece),
            Direction::Backward => movement::step_backward(&mut self.state, player, piece),
        };
        let pos = match stepped {
            Ok(pos) => pos,
            Err(_) => {
                // Internal inconsistency: abandon the sequence, keep the
                // last valid positions, hand control back to the player.
                out.push(Event::InternalFault {
                    detail: "topology miss during movement",
                });
                self.state.phase = Phase::AwaitingRoll;
                self.state.dice_value = None;
                out.push(Event::DiceInputEnabled {
                    player,
                    enabled: true,
                });
                return;
            }
        };

        out.push(Event::PiecePlaced { player, piece, pos });
        out.push(Event::PieceStepped { player, piece });

        let remaining = steps_left - 1;
        if remaining == 0 {
            self.finish_move(player, piece, out);
        } else {
            self.state.phase = Phase::Moving {
                piece,
                direction,
                steps_left: remaining,
            };
            self.schedule(Wake::MoveStep, self.move_step_ms, out);
        }
    }

    fn finish_move(&mut self, player: PlayerId, piece: u8, out: &mut Vec<Event>) {
        let outcome = movement::resolve_landing(&mut self.state, player, piece);

        for ev in &outcome.evictions {
            out.push(Event::PiecePlaced {
                player: ev.player,
                piece: ev.piece,
                pos: ev.to,
            });
        }
        if outcome.captured {
            out.push(Event::CaptureSignal {
                player,
                victims: outcome.evictions.len() as u8,
            });
        }
        if outcome.reached_home {
            out.push(Event::ReachedHome { player, piece });
        } else if outcome.landed_safe {
            out.push(Event::LandedSafe { player, piece });
        }

        if outcome.won {
            out.push(Event::GameWon { player });
            self.on_reset(out);
            return;
        }

        // A capture or a 6 earns the same player another roll.
        if outcome.captured || self.state.dice_value == Some(6) {
            self.state.phase = Phase::AwaitingRoll;
            self.state.dice_value = None;
            out.push(Event::DiceInputEnabled {
                player,
                enabled: true,
            });
        } else {
            self.begin_handover(out);
        }
    }

    fn begin_handover(&mut self, out: &mut Vec<Event>) {
        let next = self.state.turn.next();
        self.state.phase = Phase::Handover { next };
        self.schedule(Wake::FinishHandover, self.handover_delay_ms, out);
    }

    fn finish_handover(&mut self, out: &mut Vec<Event>) {
        let next = match self.state.phase {
            Phase::Handover { next } => next,
            _ => return,
        };
        self.state.turn = next;
        self.state.phase = Phase::AwaitingRoll;
        self.state.dice_value = None;
        self.state.last_roll_was_six = false;
        out.push(Event::TurnIndicator { player: next });
        out.push(Event::DiceInputEnabled {
            player: next,
            enabled: true,
        });
        out.push(Event::HighlightsCleared);
    }

    fn on_reset(&mut self, out: &mut Vec<Event>) {
        self.pending = None;
        out.push(Event::PendingCancelled);

        self.state = GameState::initial();
        for player in PlayerId::ALL {
            for piece in 0..PIECES_PER_PLAYER {
                out.push(Event::PiecePlaced {
                    player,
                    piece,
                    pos: self.state.position(player, piece),
                });
            }
        }
        for player in PlayerId::ALL {
            out.push(Event::DiceCleared { player });
        }
        out.push(Event::TurnIndicator {
            player: self.state.turn,
        });
        out.push(Event::DiceInputEnabled {
            player: self.state.turn,
            enabled: true,
        });
        out.push(Event::HighlightsCleared);
    }
}
