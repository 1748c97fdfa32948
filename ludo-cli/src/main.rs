//! ludo: CLI binary for the Ludo engine.
//!
//! Subcommands:
//! - sim: headless seeded self-play with a random chooser

use std::env;
use std::process;

use ludo_core::{ChanceConfig, Command, Config, Direction, Phase, PlayerId};
use ludo_logging::{
    now_ms, CaptureRecordV1, HomeRecordV1, NdjsonWriter, RollRecordV1, VersionInfoV1, WinRecordV1,
};
use ludo_runtime::{FeedbackSink, NullRender, Runtime};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

fn print_usage() {
    println!(
        r#"ludo

USAGE:
    ludo <subcommand> [options]

SUBCOMMANDS:
    sim      Headless self-play simulation

Run `ludo sim --help` for subcommand options.
"#
    );
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(|s| s.as_str()) {
        Some("sim") => cmd_sim(&args[1..]),
        Some("--help") | Some("-h") | None => print_usage(),
        Some(other) => {
            eprintln!("Unknown subcommand: {}", other);
            print_usage();
            process::exit(1);
        }
    }
}

/// Per-player tallies plus optional NDJSON record output.
struct SimFeedback {
    writer: Option<NdjsonWriter>,
    game_id: u64,
    rolls: [u64; 4],
    captures: [u64; 4],
    wins: [u64; 4],
    write_errors: u64,
}

impl SimFeedback {
    fn new(writer: Option<NdjsonWriter>) -> Self {
        Self {
            writer,
            game_id: 0,
            rolls: [0; 4],
            captures: [0; 4],
            wins: [0; 4],
            write_errors: 0,
        }
    }

    fn wins_total(&self) -> u64 {
        self.wins.iter().sum()
    }
}

impl FeedbackSink for SimFeedback {
    fn dice_rolled(&mut self, player: PlayerId, value: u8) {
        self.rolls[player.index()] += 1;
        if let Some(w) = self.writer.as_mut() {
            let rec = RollRecordV1 {
                event: "roll",
                ts_ms: now_ms(),
                v: VersionInfoV1::default(),
                game_id: self.game_id,
                player: player.index() as u8,
                value,
            };
            if w.write_event(&rec).is_err() {
                self.write_errors += 1;
            }
        }
    }

    fn capture(&mut self, player: PlayerId, victims: u8) {
        self.captures[player.index()] += 1;
        if let Some(w) = self.writer.as_mut() {
            let rec = CaptureRecordV1 {
                event: "capture",
                ts_ms: now_ms(),
                v: VersionInfoV1::default(),
                game_id: self.game_id,
                player: player.index() as u8,
                victims,
            };
            if w.write_event(&rec).is_err() {
                self.write_errors += 1;
            }
        }
    }

    fn reached_home(&mut self, player: PlayerId, piece: u8) {
        if let Some(w) = self.writer.as_mut() {
            let rec = HomeRecordV1 {
                event: "home",
                ts_ms: now_ms(),
                v: VersionInfoV1::default(),
                game_id: self.game_id,
                player: player.index() as u8,
                piece,
            };
            if w.write_event(&rec).is_err() {
                self.write_errors += 1;
            }
        }
    }

    fn game_won(&mut self, player: PlayerId) {
        self.wins[player.index()] += 1;
        if let Some(w) = self.writer.as_mut() {
            let rec = WinRecordV1 {
                event: "win",
                ts_ms: now_ms(),
                v: VersionInfoV1::default(),
                game_id: self.game_id,
                player: player.index() as u8,
            };
            if w.write_event(&rec).is_err() {
                self.write_errors += 1;
            }
        }
        self.game_id += 1;
    }
}

fn cmd_sim(args: &[String]) {
    let mut games: u64 = 10;
    let mut seed: u64 = 0;
    let mut log_path: Option<String> = None;
    let mut max_events: u64 = 1_000_000;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"ludo sim

USAGE:
    ludo sim [--games N] [--seed S] [--log PATH] [--max-events M]

OPTIONS:
    --games N       Number of games to play (default: 10)
    --seed S        RNG seed for dice and chooser (default: 0)
    --log PATH      Append NDJSON event records to PATH
    --max-events M  Stop after M driver events (default: 1000000)
"#
                );
                return;
            }
            "--games" => {
                games = parse_value(args, i, "--games");
                i += 2;
            }
            "--seed" => {
                seed = parse_value(args, i, "--seed");
                i += 2;
            }
            "--max-events" => {
                max_events = parse_value(args, i, "--max-events");
                i += 2;
            }
            "--log" => {
                if i + 1 >= args.len() {
                    eprintln!("Missing value for --log");
                    process::exit(1);
                }
                log_path = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `ludo sim`: {}", other);
                eprintln!("Run `ludo sim --help` for usage.");
                process::exit(1);
            }
        }
    }

    let writer = match log_path {
        Some(ref p) => match NdjsonWriter::open_append_with_flush(p, 256) {
            Ok(w) => Some(w),
            Err(e) => {
                eprintln!("Failed to open log {}: {:?}", p, e);
                process::exit(1);
            }
        },
        None => None,
    };

    let cfg = Config {
        chance: ChanceConfig::Rng { seed },
        ..Config::default()
    };
    let mut rt = Runtime::new(&cfg, NullRender, SimFeedback::new(writer));
    let mut chooser = ChaCha8Rng::seed_from_u64(seed ^ 0xD1E7_C437_9E37_79B9);

    let mut events = 0u64;
    while rt.feedback.wins_total() < games {
        events += 1;
        if events > max_events {
            eprintln!(
                "Stopped after {} events with {} of {} games finished",
                max_events,
                rt.feedback.wins_total(),
                games
            );
            break;
        }
        match rt.state().phase {
            Phase::AwaitingRoll => {
                let player = rt.state().turn;
                rt.submit(Command::RollRequested { player });
            }
            Phase::Rolled { forward, backward } => {
                let player = rt.state().turn;
                let all: Vec<u8> = forward.union(backward).iter().collect();
                let piece = all[chooser.gen_range(0..all.len())];
                let direction = if forward.contains(piece) && backward.contains(piece) {
                    Some(if chooser.gen_bool(0.5) {
                        Direction::Backward
                    } else {
                        Direction::Forward
                    })
                } else {
                    None
                };
                rt.submit(Command::PieceSelected {
                    player,
                    piece,
                    direction,
                });
            }
            _ => {
                // A timed phase always has a pending wake.
                match rt.next_deadline() {
                    Some(deadline) => rt.advance_to(deadline),
                    None => {
                        eprintln!("Engine stalled: timed phase with no pending wake");
                        process::exit(1);
                    }
                }
            }
        }
    }

    println!(
        "Played {} games in {} driver events ({} ms simulated)",
        rt.feedback.wins_total(),
        events,
        rt.now_ms()
    );
    for player in PlayerId::ALL {
        let idx = player.index();
        println!(
            "  {}: wins {:>4}  captures {:>6}  rolls {:>7}",
            player.as_str(),
            rt.feedback.wins[idx],
            rt.feedback.captures[idx],
            rt.feedback.rolls[idx]
        );
    }
    if rt.faults > 0 {
        eprintln!("Internal faults observed: {}", rt.faults);
    }
    if rt.feedback.write_errors > 0 {
        eprintln!("NDJSON write errors: {}", rt.feedback.write_errors);
    }
}

fn parse_value(args: &[String], i: usize, flag: &str) -> u64 {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {}", flag);
        process::exit(1);
    }
    args[i + 1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", flag, args[i + 1]);
        process::exit(1);
    })
}
