use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use moneyrain_core::{
    evaluate, line_return, spin, Balance, Grid, MachineConfig, Outcome, ProvablyFairRng,
    ReelSampler, Rejection, SlotMachine, Symbol, SymbolTable, Wager,
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Counts spins and always shows `@` on the top row.
#[derive(Default)]
struct TopRowAt {
    spins: AtomicUsize,
}

impl ReelSampler for TopRowAt {
    fn spin<R: Rng + ?Sized>(
        &self,
        rows: usize,
        columns: usize,
        _table: &SymbolTable,
        _rng: &mut R,
    ) -> Grid {
        self.spins.fetch_add(1, Ordering::SeqCst);
        let column: Vec<Symbol> = (0..rows)
            .map(|r| if r == 0 { Symbol::AT } else { Symbol::HASH })
            .collect();
        let mut columns = vec![column; columns];
        // break rows below the top one
        columns[1][1] = Symbol::DOLLAR;
        columns[1][2] = Symbol::BANG;
        Grid::from_columns(columns).unwrap()
    }
}

fn forced_machine() -> SlotMachine<TopRowAt> {
    SlotMachine::with_sampler(MachineConfig::classic(), TopRowAt::default()).unwrap()
}

#[test]
fn rng_repeatable() {
    let mut rng1 = ProvablyFairRng::new("s", "c", 42);
    let mut rng2 = ProvablyFairRng::new("s", "c", 42);
    let a: Vec<u32> = (0..10).map(|_| rng1.next_u32()).collect();
    let b: Vec<u32> = (0..10).map(|_| rng2.next_u32()).collect();
    assert_eq!(a, b);
}

#[test]
fn scenario_top_row_win() {
    let machine = forced_machine();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let s = machine
        .play(Balance::from_credits(100), 10, 1, &mut rng)
        .into_result()
        .unwrap();
    assert_eq!(s.winnings, 60);
    assert_eq!(s.winning_lines, vec![1]);
    assert_eq!(s.net, 50);
    assert_eq!(machine.sampler().spins.load(Ordering::SeqCst), 1);
}

#[test]
fn scenario_zero_bet_rejected() {
    let machine = forced_machine();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let outcome = machine.play(Balance::from_credits(100), 0, 1, &mut rng);
    assert_eq!(outcome.rejection(), Some(Rejection::BetOutOfRange));
    assert_eq!(machine.sampler().spins.load(Ordering::SeqCst), 0);
}

#[test]
fn scenario_too_many_lines_rejected() {
    let machine = forced_machine();
    let max_lines = machine.config().max_lines;
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let outcome = machine.play(Balance::from_credits(100), 1, max_lines + 1, &mut rng);
    assert_eq!(outcome.rejection(), Some(Rejection::LinesOutOfRange));
    assert_eq!(machine.sampler().spins.load(Ordering::SeqCst), 0);
}

#[test]
fn scenario_insufficient_funds_never_spins() {
    let machine = forced_machine();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let outcome = machine.play(Balance::from_credits(5), 10, 1, &mut rng);
    assert_eq!(
        outcome,
        Outcome::Rejected {
            reason: Rejection::InsufficientFunds
        }
    );
    assert_eq!(machine.sampler().spins.load(Ordering::SeqCst), 0);
}

#[test]
fn stake_boundary() {
    let machine = SlotMachine::classic();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let exact = machine.play(Balance::from_credits(30), 10, 3, &mut rng);
    assert!(exact.settlement().is_some());

    let short = machine.play(Balance::from_credits(29), 10, 3, &mut rng);
    assert_eq!(short.rejection(), Some(Rejection::InsufficientFunds));
}

#[test]
fn rejected_round_draws_no_entropy() {
    let machine = SlotMachine::classic();
    let mut used = ChaCha8Rng::seed_from_u64(11);
    let fresh = ChaCha8Rng::seed_from_u64(11);
    machine.play(Balance::from_credits(1), 10, 1, &mut used);
    assert_eq!(used, fresh);
}

#[test]
fn net_matches_winnings_minus_stake() {
    let machine = SlotMachine::classic();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..2_000 {
        let bet = rng.random_range(1..=300);
        let lines = rng.random_range(1..=3);
        let s = machine
            .play(Balance::from_credits(1_000_000), bet, lines, &mut rng)
            .into_result()
            .unwrap();
        assert_eq!(s.net, s.winnings as i64 - s.stake as i64);
        assert_eq!(s.stake, u64::from(bet) * u64::from(lines));
        assert!(s.winning_lines.windows(2).all(|w| w[0] < w[1]));
        assert!(s.winning_lines.iter().all(|l| *l >= 1 && *l <= lines));
        assert_eq!(s, s.clone());
        assert_eq!(
            evaluate(&s.grid, lines as usize, bet, machine.table()).winnings,
            s.winnings
        );
    }
}

#[test]
fn spin_respects_abundance_for_many_seeds() {
    let table = SymbolTable::classic();
    for seed in 0..200u64 {
        let grid = spin(3, 3, &table, &mut ChaCha8Rng::seed_from_u64(seed));
        for column in grid.columns() {
            assert_eq!(column.len(), 3);
            let dollars = column.iter().filter(|s| **s == Symbol::DOLLAR).count();
            assert!(dollars <= 2);
        }
    }
}

#[test]
fn simulated_return_tracks_line_return() {
    let machine = SlotMachine::classic();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let rounds = 20_000u64;
    let mut staked = 0u64;
    let mut paid = 0u64;
    for _ in 0..rounds {
        let s = machine
            .play(Balance::from_credits(3), 1, 3, &mut rng)
            .into_result()
            .unwrap();
        staked += s.stake;
        paid += s.winnings;
    }
    let observed = paid as f64 / staked as f64;
    let expected = line_return(machine.table(), machine.config().columns);
    assert!(
        (observed - expected).abs() < 0.05,
        "observed {observed}, expected {expected}"
    );
}

#[test]
fn machine_is_shared_across_threads() {
    let machine = Arc::new(SlotMachine::classic());
    let handles: Vec<_> = (0..4u64)
        .map(|nonce| {
            let machine = Arc::clone(&machine);
            std::thread::spawn(move || {
                machine.play_with_seeds(
                    "server",
                    "client",
                    nonce,
                    Balance::from_credits(100),
                    Wager::new(2, 3),
                )
            })
        })
        .collect();
    for (nonce, handle) in handles.into_iter().enumerate() {
        let threaded = handle.join().unwrap();
        let serial = machine.play_with_seeds(
            "server",
            "client",
            nonce as u64,
            Balance::from_credits(100),
            Wager::new(2, 3),
        );
        assert_eq!(threaded, serial);
    }
}

#[test]
fn outcome_json_shape() {
    let rejected = Outcome::Rejected {
        reason: Rejection::LinesOutOfRange,
    };
    assert_eq!(
        serde_json::to_value(&rejected).unwrap(),
        serde_json::json!({ "status": "rejected", "reason": "lines-out-of-range" })
    );

    let machine = forced_machine();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let settled = machine.play(Balance::from_credits(100), 10, 1, &mut rng);
    let json = serde_json::to_value(&settled).unwrap();
    assert_eq!(json["status"], "settled");
    assert_eq!(json["winnings"], 60);
    assert_eq!(json["net"], 50);
    assert_eq!(json["grid"][0][0], "@");

    let back: Outcome = serde_json::from_value(json).unwrap();
    assert_eq!(back, settled);
}
