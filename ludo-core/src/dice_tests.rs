use crate::board::PlayerId;
use crate::dice::{draw, ChanceMode, DicePolicy, EventKey, SIX_GUARANTEE_AFTER};

#[test]
fn draw_is_deterministic_per_key() {
    let key = EventKey {
        episode_seed: 123,
        player: 0,
        roll_seq: 7,
    };
    assert_eq!(draw(key), draw(key));
}

#[test]
fn draw_values_in_range() {
    for seed in 0..200u64 {
        let v = draw(EventKey {
            episode_seed: seed,
            player: 2,
            roll_seq: 0,
        });
        assert!(v <= 6, "value out of range: {}", v);
    }
}

#[test]
fn roll_seq_changes_stream() {
    let k0 = EventKey {
        episode_seed: 42,
        player: 1,
        roll_seq: 0,
    };
    // A fixed key pair that must not collide for every seed would be too
    // strong; it suffices that the sequence is not constant.
    let differs = (1..64u32).any(|seq| draw(EventKey { roll_seq: seq, ..k0 }) != draw(k0));
    assert!(differs);
}

#[test]
fn streak_at_threshold_forces_six_when_stuck() {
    let mut policy = DicePolicy::new(ChanceMode::new_event_keyed(9));
    let mut streak = SIX_GUARANTEE_AFTER;
    let v = policy.roll(PlayerId::P1, &mut streak, true);
    assert_eq!(v, 6);
    assert_eq!(streak, 0);
}

#[test]
fn streak_at_threshold_not_forced_when_open() {
    let mut policy = DicePolicy::new(ChanceMode::new_event_keyed(9));
    let mut streak = SIX_GUARANTEE_AFTER;
    let v = policy.roll(PlayerId::P1, &mut streak, false);
    assert!(v <= 6);
    if v == 6 {
        assert_eq!(streak, 0);
    } else {
        assert_eq!(streak, SIX_GUARANTEE_AFTER + 1);
    }
}

#[test]
fn seven_stuck_non_six_rolls_then_guaranteed_six() {
    // Find a seed whose event-keyed stream opens with 7 non-six draws for P1,
    // then drive the policy through them: the 8th roll must be a forced 6.
    let seed = (0..100_000u64)
        .find(|&s| {
            (0..u32::from(SIX_GUARANTEE_AFTER)).all(|seq| {
                draw(EventKey {
                    episode_seed: s,
                    player: 0,
                    roll_seq: seq,
                }) != 6
            })
        })
        .expect("some seed starts with 7 non-six draws");

    let mut policy = DicePolicy::new(ChanceMode::new_event_keyed(seed));
    let mut streak = 0u8;
    for n in 1..=SIX_GUARANTEE_AFTER {
        let v = policy.roll(PlayerId::P1, &mut streak, true);
        assert_ne!(v, 6);
        assert_eq!(streak, n);
    }
    let v = policy.roll(PlayerId::P1, &mut streak, true);
    assert_eq!(v, 6);
    assert_eq!(streak, 0);
}

#[test]
fn natural_six_resets_streak() {
    let mut policy = DicePolicy::new(ChanceMode::new_rng(7));
    let mut streak = 0u8;
    // Not stuck, so no forcing: every 6 seen is natural.
    for _ in 0..500 {
        let v = policy.roll(PlayerId::P4, &mut streak, false);
        assert!(v <= 6);
        if v == 6 {
            assert_eq!(streak, 0);
            return;
        }
    }
    panic!("no natural 6 in 500 rolls");
}

#[test]
fn rng_mode_values_in_range() {
    let mut policy = DicePolicy::new(ChanceMode::new_rng(1234));
    let mut streak = 0u8;
    for _ in 0..100 {
        let v = policy.roll(PlayerId::P2, &mut streak, false);
        assert!(v <= 6);
    }
}
