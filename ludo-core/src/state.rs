//! Game state aggregate and the piece-index bitset.

use crate::board::{Direction, PlayerId, Position, PIECES_PER_PLAYER};

/// Set of piece indices 0..=3, stored as a 4-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PieceSet(u8);

impl PieceSet {
    pub const EMPTY: PieceSet = PieceSet(0);

    pub fn singleton(piece: u8) -> PieceSet {
        let mut s = PieceSet::EMPTY;
        s.insert(piece);
        s
    }

    pub fn insert(&mut self, piece: u8) {
        debug_assert!(piece < PIECES_PER_PLAYER);
        self.0 |= 1 << piece;
    }

    #[inline]
    pub fn contains(self, piece: u8) -> bool {
        piece < PIECES_PER_PLAYER && (self.0 >> piece) & 1 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: PieceSet) -> PieceSet {
        PieceSet(self.0 | other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..PIECES_PER_PLAYER).filter(move |&i| self.contains(i))
    }
}

impl FromIterator<u8> for PieceSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut s = PieceSet::EMPTY;
        for p in iter {
            s.insert(p);
        }
        s
    }
}

/// Controller phase. `AwaitingRoll` and `Rolled` are the two externally
/// meaningful states; the remaining variants are the timed or locked
/// sub-states between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Current player may roll.
    AwaitingRoll,
    /// Roll outcome decided but not yet committed (presentation in flight).
    RollPresentation { value: u8 },
    /// Dice committed; waiting for piece (and possibly direction) selection.
    Rolled { forward: PieceSet, backward: PieceSet },
    /// Step-by-step movement in flight, one step per wake.
    Moving {
        piece: u8,
        direction: Direction,
        steps_left: u8,
    },
    /// Locked handover delay; no roll is accepted until it completes.
    Handover { next: PlayerId },
}

/// The single mutable aggregate owned by the turn/state controller.
///
/// Positions are mutated only by the movement resolver. The per-player roll
/// streaks belong to the dice policy's six-guarantee; the controller passes
/// them in on each roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub positions: [[Position; 4]; 4],
    pub turn: PlayerId,
    pub phase: Phase,
    /// The active dice value, owned by `turn`. At most one exists at a time.
    pub dice_value: Option<u8>,
    /// True iff the most recently committed roll of the continuing turn was a 6.
    /// Cleared when a handover completes.
    pub last_roll_was_six: bool,
    /// Consecutive non-six roll count per player, for the six-guarantee.
    pub roll_streak: [u8; 4],
}

impl GameState {
    /// All sixteen pieces in their base slots, P1 to move.
    pub fn initial() -> GameState {
        let mut positions = [[Position::Home; 4]; 4];
        for row in positions.iter_mut() {
            for (slot, pos) in row.iter_mut().enumerate() {
                *pos = Position::Base { slot: slot as u8 };
            }
        }
        GameState {
            positions,
            turn: PlayerId::P1,
            phase: Phase::AwaitingRoll,
            dice_value: None,
            last_roll_was_six: false,
            roll_streak: [0; 4],
        }
    }

    #[inline]
    pub fn position(&self, player: PlayerId, piece: u8) -> Position {
        self.positions[player.index()][piece as usize]
    }

    #[inline]
    pub fn set_position(&mut self, player: PlayerId, piece: u8, pos: Position) {
        self.positions[player.index()][piece as usize] = pos;
    }

    /// Pieces of `player` outside base and not yet home.
    pub fn open_pieces(&self, player: PlayerId) -> PieceSet {
        (0..PIECES_PER_PLAYER)
            .filter(|&piece| {
                !matches!(
                    self.position(player, piece),
                    Position::Base { .. } | Position::Home
                )
            })
            .collect()
    }

    /// True when all four pieces of `player` are still in base.
    pub fn all_in_base(&self, player: PlayerId) -> bool {
        (0..PIECES_PER_PLAYER)
            .all(|piece| matches!(self.position(player, piece), Position::Base { .. }))
    }

    /// True when all four pieces of `player` are home.
    pub fn has_won(&self, player: PlayerId) -> bool {
        (0..PIECES_PER_PLAYER).all(|piece| self.position(player, piece) == Position::Home)
    }

    /// Whether any opponent of `player` occupies the given track cell.
    pub fn opponent_on_track_cell(&self, player: PlayerId, cell: u8) -> bool {
        PlayerId::ALL.iter().any(|&opp| {
            opp != player
                && (0..PIECES_PER_PLAYER)
                    .any(|piece| self.position(opp, piece) == Position::Track { cell })
        })
    }
}
