//! Movement & capture resolver.
//!
//! This module is the only place that mutates piece positions: forward and
//! backward stepping, the base-to-start jump, capture eviction, and win
//! detection. The controller drives stepping one quantum at a time for the
//! animated path; `move_forward`/`move_backward` run a whole move at once.

use thiserror::Error;

use crate::board::{self, PlayerId, Position, PIECES_PER_PLAYER};
use crate::state::GameState;

#[derive(Debug, Error)]
pub enum MoveError {
    /// A position with no topology entry for the attempted step. Treated as
    /// a fatal internal inconsistency by the caller; the state is left as it
    /// was before the step.
    #[error("no {dir} step from {pos:?} for {player:?}")]
    TopologyMiss {
        player: PlayerId,
        pos: Position,
        dir: &'static str,
    },
}

/// One evicted opponent piece, already returned to its base slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub player: PlayerId,
    pub piece: u8,
    pub to: Position,
}

/// What happened when a move's final step landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingOutcome {
    pub landing: Position,
    pub evictions: Vec<Eviction>,
    /// True iff at least one opponent was evicted. A single capture event,
    /// regardless of how many pieces were evicted at once.
    pub captured: bool,
    /// Landing cell is safe and the landing did not capture.
    pub landed_safe: bool,
    pub reached_home: bool,
    pub won: bool,
}

/// Jump a base piece directly to the player's start cell (dice 6 base exit).
pub fn enter_from_base(state: &mut GameState, player: PlayerId, piece: u8) -> Position {
    let pos = Position::Track {
        cell: player.start_cell(),
    };
    state.set_position(player, piece, pos);
    pos
}

/// Advance `piece` one step along the player's topology.
pub fn step_forward(
    state: &mut GameState,
    player: PlayerId,
    piece: u8,
) -> Result<Position, MoveError> {
    let pos = state.position(player, piece);
    let next = board::advance(player, pos).ok_or(MoveError::TopologyMiss {
        player,
        pos,
        dir: "forward",
    })?;
    state.set_position(player, piece, next);
    Ok(next)
}

/// Retreat `piece` one step. Backward movement exists only on the track.
pub fn step_backward(
    state: &mut GameState,
    player: PlayerId,
    piece: u8,
) -> Result<Position, MoveError> {
    let pos = state.position(player, piece);
    let cell = match pos {
        Position::Track { cell } => cell,
        _ => {
            return Err(MoveError::TopologyMiss {
                player,
                pos,
                dir: "backward",
            })
        }
    };
    let next = Position::Track {
        cell: board::retreat_cell(cell),
    };
    state.set_position(player, piece, next);
    Ok(next)
}

/// Run capture detection and win detection for the cell `piece` just landed
/// on, applying evictions. Called exactly once after any completed move.
pub fn resolve_landing(state: &mut GameState, player: PlayerId, piece: u8) -> LandingOutcome {
    let landing = state.position(player, piece);
    let mut evictions = Vec::new();

    if let Position::Track { cell } = landing {
        // Standard capture: every opponent on the exact landing cell, unless
        // the cell is safe.
        if !board::is_safe_cell(cell) {
            for opp in PlayerId::ALL {
                if opp == player {
                    continue;
                }
                for opp_piece in 0..PIECES_PER_PLAYER {
                    if state.position(opp, opp_piece) == (Position::Track { cell }) {
                        evictions.push(evict(state, opp, opp_piece));
                    }
                }
            }
        }

        // Corridor capture exception: only the clockwise-next player after
        // the victim may evict corridor residents, and only by landing on
        // the victim's outer-approach cell.
        let victim = player.prev();
        if cell == board::outer_approach_cell(victim) {
            for opp_piece in 0..PIECES_PER_PLAYER {
                if matches!(
                    state.position(victim, opp_piece),
                    Position::Corridor { .. }
                ) {
                    evictions.push(evict(state, victim, opp_piece));
                }
            }
        }
    }

    let captured = !evictions.is_empty();
    let reached_home = landing == Position::Home;
    let landed_safe =
        matches!(landing, Position::Track { cell } if board::is_safe_cell(cell)) && !captured;
    let won = state.has_won(player);

    LandingOutcome {
        landing,
        evictions,
        captured,
        landed_safe,
        reached_home,
        won,
    }
}

fn evict(state: &mut GameState, player: PlayerId, piece: u8) -> Eviction {
    let to = Position::Base { slot: piece };
    state.set_position(player, piece, to);
    Eviction { player, piece, to }
}

/// Move `piece` forward by `steps` and resolve the landing. Base exit with a
/// 6 is a direct jump to the start cell.
pub fn move_forward(
    state: &mut GameState,
    player: PlayerId,
    piece: u8,
    steps: u8,
) -> Result<LandingOutcome, MoveError> {
    if matches!(state.position(player, piece), Position::Base { .. }) && steps == 6 {
        enter_from_base(state, player, piece);
        return Ok(resolve_landing(state, player, piece));
    }
    for _ in 0..steps {
        step_forward(state, player, piece)?;
    }
    Ok(resolve_landing(state, player, piece))
}

/// Move `piece` backward by `steps` on the track and resolve the landing.
pub fn move_backward(
    state: &mut GameState,
    player: PlayerId,
    piece: u8,
    steps: u8,
) -> Result<LandingOutcome, MoveError> {
    for _ in 0..steps {
        step_backward(state, player, piece)?;
    }
    Ok(resolve_landing(state, player, piece))
}
