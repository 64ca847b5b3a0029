//! Landing distribution with and without the center drift bias
//!
//! The 200k-drop run is slow in debug builds. Run it with
//! `cargo test --release -- --ignored`.

use plinko_sim::consts::*;
use plinko_sim::sim::Simulation;
use plinko_sim::{MemoryWallet, SessionStats, Settings};

const IN_FLIGHT: usize = 64;
const WAGER: f64 = 10.0;

fn simulate(drift_bias: bool, seed: u64, drops: u64) -> SessionStats {
    let settings = Settings {
        drift_bias,
        ..Settings::default()
    };
    let mut sim = Simulation::with_board(settings, seed, BOARD_WIDTH, BOARD_HEIGHT);
    let mut wallet = MemoryWallet::new(drops as f64 * WAGER);
    let mut stats = SessionStats::new(sim.board().buckets.len());

    let mut dropped = 0;
    while dropped < drops || sim.is_running() {
        while dropped < drops && sim.balls().len() < IN_FLIGHT {
            sim.drop_ball(&mut wallet, WAGER).unwrap();
            dropped += 1;
        }
        for outcome in sim.tick(&mut wallet, SIM_DT) {
            stats.record(&outcome);
        }
    }
    stats
}

fn compare_center_share(seed: u64, drops: u64) {
    let unbiased = simulate(false, seed, drops);
    let biased = simulate(true, seed, drops);

    assert_eq!(unbiased.drops, drops);
    assert_eq!(biased.drops, drops);

    let plain = unbiased.center_share(3);
    let skewed = biased.center_share(3);
    println!("center share: unbiased {plain:.4}, biased {skewed:.4}");
    println!("rtp: unbiased {:.4}, biased {:.4}", unbiased.rtp(), biased.rtp());

    assert!(skewed > plain, "bias did not move landings to the center");
}

#[test]
fn bias_concentrates_landings_in_center() {
    compare_center_share(5, 10_000);
}

#[test]
#[ignore]
fn bias_concentrates_landings_in_center_long_run() {
    compare_center_share(0x5eed, 200_000);
}
