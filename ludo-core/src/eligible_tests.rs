use crate::board::{PlayerId, Position};
use crate::eligible::{auto_move_candidate, backward_eligible, forward_eligible};
use crate::state::{GameState, PieceSet};

fn state() -> GameState {
    GameState::initial()
}

#[test]
fn home_piece_never_forward_eligible() {
    let mut s = state();
    s.set_position(PlayerId::P1, 0, Position::Home);
    for dice in 0..=6 {
        assert!(!forward_eligible(&s, PlayerId::P1, dice).contains(0));
    }
}

#[test]
fn base_piece_forward_eligible_only_with_six() {
    let s = state();
    for dice in 0..=5 {
        assert!(forward_eligible(&s, PlayerId::P1, dice).is_empty());
    }
    let with_six = forward_eligible(&s, PlayerId::P1, 6);
    assert_eq!(with_six.len(), 4);
}

#[test]
fn corridor_piece_eligible_iff_no_overshoot() {
    let mut s = state();
    // Index 3: two steps remain to Home.
    s.set_position(
        PlayerId::P2,
        1,
        Position::Corridor {
            player: PlayerId::P2,
            index: 3,
        },
    );
    assert!(forward_eligible(&s, PlayerId::P2, 1).contains(1));
    assert!(forward_eligible(&s, PlayerId::P2, 2).contains(1));
    assert!(!forward_eligible(&s, PlayerId::P2, 3).contains(1));
}

#[test]
fn backward_empty_after_a_six_and_for_dice_0_and_6() {
    let mut s = state();
    // A capturable layout that would otherwise qualify.
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 5 });
    s.set_position(PlayerId::P2, 0, Position::Track { cell: 2 });

    assert!(backward_eligible(&s, PlayerId::P1, 3, true).is_empty());
    assert!(backward_eligible(&s, PlayerId::P1, 0, false).is_empty());
    assert!(backward_eligible(&s, PlayerId::P1, 6, false).is_empty());
    assert!(backward_eligible(&s, PlayerId::P1, 3, false).contains(0));
}

#[test]
fn backward_is_capture_only() {
    let mut s = state();
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 5 });
    // No opponent at cell 2: bare repositioning is not allowed.
    assert!(backward_eligible(&s, PlayerId::P1, 3, false).is_empty());
}

#[test]
fn backward_never_lands_on_safe_cell() {
    let mut s = state();
    // Cell 8 is safe; an opponent there is not capturable.
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 10 });
    s.set_position(PlayerId::P2, 0, Position::Track { cell: 8 });
    assert!(backward_eligible(&s, PlayerId::P1, 2, false).is_empty());
}

#[test]
fn backward_excluded_from_own_start_cell() {
    let mut s = state();
    let start = PlayerId::P2.start_cell();
    s.set_position(PlayerId::P2, 0, Position::Track { cell: start });
    s.set_position(
        PlayerId::P1,
        0,
        Position::Track {
            cell: start.wrapping_sub(2),
        },
    );
    assert!(backward_eligible(&s, PlayerId::P2, 2, false).is_empty());
}

#[test]
fn backward_cannot_cross_behind_own_start() {
    let mut s = state();
    // P2 starts at 13. A piece at 14 retreating 3 would land on 11, behind
    // the start cell.
    s.set_position(PlayerId::P2, 0, Position::Track { cell: 14 });
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 11 });
    assert!(backward_eligible(&s, PlayerId::P2, 3, false).is_empty());

    // A piece numerically behind its start cell is excluded outright.
    s.set_position(PlayerId::P2, 0, Position::Track { cell: 5 });
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 3 });
    assert!(backward_eligible(&s, PlayerId::P2, 2, false).is_empty());
}

#[test]
fn backward_within_own_quadrant_captures() {
    let mut s = state();
    // P3 starts at 26; a piece at 31 retreating 3 lands on 28 (not safe).
    s.set_position(PlayerId::P3, 2, Position::Track { cell: 31 });
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 28 });
    let set = backward_eligible(&s, PlayerId::P3, 3, false);
    assert_eq!(set, PieceSet::singleton(2));
}

#[test]
fn corridor_pieces_never_backward_eligible() {
    let mut s = state();
    s.set_position(
        PlayerId::P1,
        0,
        Position::Corridor {
            player: PlayerId::P1,
            index: 2,
        },
    );
    for dice in 1..=5 {
        assert!(backward_eligible(&s, PlayerId::P1, dice, false).is_empty());
    }
}

#[test]
fn auto_move_requires_single_open_unambiguous_piece() {
    let mut s = state();
    s.set_position(PlayerId::P1, 0, Position::Track { cell: 4 });
    let fwd = forward_eligible(&s, PlayerId::P1, 3);
    let bwd = PieceSet::EMPTY;
    assert_eq!(auto_move_candidate(&s, PlayerId::P1, 3, fwd, bwd), Some(0));

    // Dice 6 always waits for explicit selection.
    let fwd6 = forward_eligible(&s, PlayerId::P1, 6);
    assert_eq!(auto_move_candidate(&s, PlayerId::P1, 6, fwd6, bwd), None);

    // A backward option makes the decision ambiguous.
    assert_eq!(
        auto_move_candidate(&s, PlayerId::P1, 3, fwd, PieceSet::singleton(0)),
        None
    );

    // A second open piece makes it ambiguous even with one eligible piece.
    let mut s2 = s.clone();
    s2.set_position(
        PlayerId::P1,
        1,
        Position::Corridor {
            player: PlayerId::P1,
            index: 4,
        },
    );
    let fwd2 = forward_eligible(&s2, PlayerId::P1, 3);
    assert_eq!(fwd2.len(), 1, "corridor piece overshoots, track piece moves");
    assert_eq!(auto_move_candidate(&s2, PlayerId::P1, 3, fwd2, bwd), None);
}
