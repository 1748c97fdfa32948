//! Eligibility evaluation: which pieces may move, and in which direction.

use crate::board::{self, PlayerId, Position, PIECES_PER_PLAYER};
use crate::state::{GameState, PieceSet};

/// Pieces of `player` that may legally move forward by `dice`.
///
/// A piece is forward-eligible unless it is home, it is in base and the dice
/// is not a 6, or it is in the corridor and the dice would overshoot home.
pub fn forward_eligible(state: &GameState, player: PlayerId, dice: u8) -> PieceSet {
    (0..PIECES_PER_PLAYER)
        .filter(|&piece| match state.position(player, piece) {
            Position::Home => false,
            Position::Base { .. } => dice == 6,
            Position::Corridor { index, .. } => dice <= board::corridor_distance_to_home(index),
            Position::Track { .. } => true,
        })
        .collect()
}

/// Pieces of `player` that may legally move backward by `dice` to capture.
///
/// Backward movement is a capture-only mechanic: the destination must hold at
/// least one opponent piece on a non-safe cell. It is never available the
/// turn immediately following a 6 (`last_roll_was_six`), never for dice 0 or
/// 6, never from base, home, the corridor, or the player's own start cell,
/// and never along a path that would cross behind the player's own start.
pub fn backward_eligible(
    state: &GameState,
    player: PlayerId,
    dice: u8,
    last_roll_was_six: bool,
) -> PieceSet {
    if last_roll_was_six || dice == 0 || dice == 6 {
        return PieceSet::EMPTY;
    }

    let start = player.start_cell();
    (0..PIECES_PER_PLAYER)
        .filter(|&piece| {
            let cell = match state.position(player, piece) {
                Position::Track { cell } => cell,
                _ => return false,
            };
            if cell == start {
                return false;
            }
            let landing = board::retreat_cell_by(cell, dice);
            if crosses_behind_start(cell, landing, start) {
                return false;
            }
            if board::is_safe_cell(landing) {
                return false;
            }
            state.opponent_on_track_cell(player, landing)
        })
        .collect()
}

/// Literal "cannot cross behind start" heuristic over raw track cells:
/// a piece numerically behind its start is stuck, and a piece ahead of it
/// may not retreat to a cell numerically behind it.
fn crosses_behind_start(current: u8, landing: u8, start: u8) -> bool {
    if current > start {
        landing < start
    } else {
        current < start
    }
}

/// The piece to move forward without explicit selection, if the decision is
/// unambiguous: dice in 1..=5, no backward option, exactly one
/// forward-eligible piece, and that piece is the player's only open piece.
pub fn auto_move_candidate(
    state: &GameState,
    player: PlayerId,
    dice: u8,
    forward: PieceSet,
    backward: PieceSet,
) -> Option<u8> {
    if dice == 0 || dice == 6 {
        return None;
    }
    if !backward.is_empty() {
        return None;
    }
    if forward.len() != 1 {
        return None;
    }
    let open = state.open_pieces(player);
    if open.len() != 1 {
        return None;
    }
    let piece = forward.iter().next()?;
    if !open.contains(piece) {
        return None;
    }
    Some(piece)
}
