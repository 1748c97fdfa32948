//! The typed command/event boundary between the engine and its collaborators.
//!
//! Input arrives as [`Command`]s; the engine answers each with the list of
//! [`Event`]s it emitted. Render and feedback sinks subscribe to events; the
//! runtime turns `WakeScheduled` into timer entries and feeds completions
//! back as `Command::WakeFired`.

use crate::board::{Direction, PlayerId, Position};
use crate::state::PieceSet;

/// Token identifying one pending timed sequence. A wake whose token no
/// longer matches the engine's pending sequence is stale and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqToken(pub u64);

/// What a scheduled wake resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Dice presentation finished; commit the rolled value.
    CommitRoll,
    /// One movement quantum elapsed; take the next step.
    MoveStep,
    /// Handover delay elapsed; pass the turn.
    FinishHandover,
}

impl Wake {
    pub fn as_str(self) -> &'static str {
        match self {
            Wake::CommitRoll => "commit_roll",
            Wake::MoveStep => "move_step",
            Wake::FinishHandover => "finish_handover",
        }
    }
}

/// Externally triggered input, validated against the current state. Illegal
/// commands are silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RollRequested {
        player: PlayerId,
    },
    PieceSelected {
        player: PlayerId,
        piece: u8,
        direction: Option<Direction>,
    },
    ResetRequested,
    /// A previously scheduled wake completed.
    WakeFired { token: SeqToken, wake: Wake },
}

/// Everything the engine tells the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Render sink.
    PiecePlaced {
        player: PlayerId,
        piece: u8,
        pos: Position,
    },
    EligibleHighlighted {
        player: PlayerId,
        pieces: PieceSet,
    },
    HighlightsCleared,
    DirectionChoiceShown {
        player: PlayerId,
        piece: u8,
    },
    TurnIndicator {
        player: PlayerId,
    },
    DiceShown {
        player: PlayerId,
        value: u8,
    },
    DiceCleared {
        player: PlayerId,
    },
    DiceInputEnabled {
        player: PlayerId,
        enabled: bool,
    },

    // Feedback sink (fire-and-forget).
    DiceRolled {
        player: PlayerId,
        value: u8,
    },
    PieceStepped {
        player: PlayerId,
        piece: u8,
    },
    /// At most one per landing, even when several pieces are evicted at once.
    CaptureSignal {
        player: PlayerId,
        victims: u8,
    },
    LandedSafe {
        player: PlayerId,
        piece: u8,
    },
    ReachedHome {
        player: PlayerId,
        piece: u8,
    },
    GameWon {
        player: PlayerId,
    },

    // Timing.
    WakeScheduled {
        token: SeqToken,
        wake: Wake,
        delay_ms: u64,
    },
    /// All pending wakes are void (reset); runtimes should clear their queues.
    PendingCancelled,

    /// Fatal internal inconsistency (topology miss). The engine stays in its
    /// last valid state; this record exists for diagnosis only.
    InternalFault {
        detail: &'static str,
    },
}
