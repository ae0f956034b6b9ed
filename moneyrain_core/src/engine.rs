use rand::Rng;
use tracing::debug;

use crate::{
    config::MachineConfig,
    error::ConfigError,
    money::Balance,
    paylines::evaluate,
    reels::{Grid, PoolSampler, ReelSampler},
    rng::ProvablyFairRng,
    settlement::{Outcome, Settlement},
    symbols::SymbolTable,
    wager::Wager,
};

/// A validated machine ready to play rounds.
///
/// Holds no per-round state: every call to [`SlotMachine::play`] depends only
/// on its arguments and the random source it is handed, so one machine can be
/// shared across threads as long as each caller brings its own RNG.
#[derive(Debug, Clone)]
pub struct SlotMachine<S = PoolSampler> {
    config: MachineConfig,
    table: SymbolTable,
    sampler: S,
}

impl SlotMachine {
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        Self::with_sampler(config, PoolSampler)
    }

    /// The classic machine. Its config is known to pass [`MachineConfig::validate`].
    pub fn classic() -> Self {
        Self {
            config: MachineConfig::classic(),
            table: SymbolTable::classic(),
            sampler: PoolSampler,
        }
    }
}

impl<S: ReelSampler> SlotMachine<S> {
    pub fn with_sampler(config: MachineConfig, sampler: S) -> Result<Self, ConfigError> {
        let table = config.validate()?;
        Ok(Self {
            config,
            table,
            sampler,
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Plays one round. Rejected rounds never touch the sampler or `rng`.
    pub fn play<R: Rng + ?Sized>(
        &self,
        balance: Balance,
        bet_per_line: u32,
        active_lines: u32,
        rng: &mut R,
    ) -> Outcome {
        self.play_wager(balance, Wager::new(bet_per_line, active_lines), rng)
    }

    pub fn play_wager<R: Rng + ?Sized>(
        &self,
        balance: Balance,
        wager: Wager,
        rng: &mut R,
    ) -> Outcome {
        let stake = match wager.validate(balance, &self.config) {
            Ok(stake) => stake,
            Err(reason) => {
                debug!(
                    reason = reason.reason(),
                    bet_per_line = wager.bet_per_line,
                    lines = wager.lines,
                    %balance,
                    "round rejected"
                );
                return Outcome::Rejected { reason };
            }
        };

        let grid = self
            .sampler
            .spin(self.config.rows, self.config.columns, &self.table, rng);
        let eval = evaluate(&grid, wager.lines as usize, wager.bet_per_line, &self.table);
        // validate() keeps max_payout * max_bet * max_lines within i64
        let net = eval.winnings as i64 - stake as i64;
        debug!(
            bet_per_line = wager.bet_per_line,
            lines = wager.lines,
            stake,
            winnings = eval.winnings,
            net,
            "round settled"
        );

        Outcome::Settled(Settlement {
            wager,
            stake,
            winnings: eval.winnings,
            winning_lines: eval.winning_lines,
            net,
            grid,
        })
    }

    /// Convenience: play a round with a provably fair RNG built from the seeds.
    pub fn play_with_seeds(
        &self,
        server_seed: &str,
        client_seed: &str,
        nonce: u64,
        balance: Balance,
        wager: Wager,
    ) -> Outcome {
        let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
        self.play_wager(balance, wager, &mut rng)
    }

    /// Replays the spin for the seeds and compares it with `expected`.
    pub fn verify_grid(
        &self,
        server_seed: &str,
        client_seed: &str,
        nonce: u64,
        expected: &Grid,
    ) -> bool {
        let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
        let grid = self
            .sampler
            .spin(self.config.rows, self.config.columns, &self.table, &mut rng);
        &grid == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Symbol, SymbolSpec};
    use crate::wager::Rejection;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::Cell;

    /// Hands out the same grid every time and counts how often it was asked.
    struct FixedSampler {
        grid: Grid,
        calls: Cell<usize>,
    }

    impl FixedSampler {
        fn new(grid: Grid) -> Self {
            Self {
                grid,
                calls: Cell::new(0),
            }
        }
    }

    impl ReelSampler for FixedSampler {
        fn spin<R: Rng + ?Sized>(
            &self,
            _rows: usize,
            _columns: usize,
            _table: &SymbolTable,
            _rng: &mut R,
        ) -> Grid {
            self.calls.set(self.calls.get() + 1);
            self.grid.clone()
        }
    }

    fn forced(rows: [&str; 3]) -> SlotMachine<FixedSampler> {
        // rows are given top to bottom; the grid is stored by column
        let columns: Vec<Vec<Symbol>> = (0..3)
            .map(|c| rows.iter().map(|r| Symbol(r.as_bytes()[c] as char)).collect())
            .collect();
        let grid = Grid::from_columns(columns).unwrap();
        SlotMachine::with_sampler(MachineConfig::classic(), FixedSampler::new(grid)).unwrap()
    }

    #[test]
    fn settles_single_winning_line() {
        let machine = forced(["@@@", "$!#", "#@!"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = machine.play(Balance::from_credits(100), 10, 1, &mut rng);
        let s = outcome.settlement().unwrap();
        assert_eq!(s.winnings, 60);
        assert_eq!(s.winning_lines, vec![1]);
        assert_eq!(s.net, 50);
        assert_eq!(s.stake, 10);
        assert_eq!(s.message(), "You won 60$!");
        assert_eq!(machine.sampler().calls.get(), 1);
    }

    #[test]
    fn losing_round_reports_negative_net() {
        let machine = forced(["@$@", "$!#", "#@!"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let s = machine
            .play(Balance::from_credits(100), 5, 3, &mut rng)
            .into_result()
            .unwrap();
        assert!(!s.is_win());
        assert!(s.winning_lines.is_empty());
        assert_eq!(s.net, -15);
    }

    #[test]
    fn rejection_skips_sampler() {
        let machine = forced(["@@@", "@@@", "@@@"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let cases = [
            (Balance::from_credits(100), 0, 1, Rejection::BetOutOfRange),
            (Balance::from_credits(100), 1, 4, Rejection::LinesOutOfRange),
            (Balance::from_credits(5), 10, 1, Rejection::InsufficientFunds),
        ];
        for (balance, bet, lines, reason) in cases {
            let outcome = machine.play(balance, bet, lines, &mut rng);
            assert_eq!(outcome, Outcome::Rejected { reason });
        }
        assert_eq!(machine.sampler().calls.get(), 0);
    }

    #[test]
    fn verify_grid_replays_seeded_spin() {
        let machine = SlotMachine::classic();
        let outcome = machine.play_with_seeds(
            "server",
            "client",
            3,
            Balance::from_credits(10),
            Wager::new(1, 1),
        );
        let grid = outcome.settlement().unwrap().grid.clone();
        assert!(machine.verify_grid("server", "client", 3, &grid));

        let mut columns = grid.into_columns();
        columns[0][0] = Symbol('x');
        let tampered = Grid::from_columns(columns).unwrap();
        assert!(!machine.verify_grid("server", "client", 3, &tampered));
    }

    #[test]
    fn classic_matches_validated_construction() {
        let validated = SlotMachine::new(MachineConfig::classic()).unwrap();
        let classic = SlotMachine::classic();
        assert_eq!(classic.config(), validated.config());
        assert_eq!(classic.table(), validated.table());
        assert_eq!(classic.config().validate().unwrap(), *classic.table());
    }

    #[test]
    fn largest_accepted_win_settles_exactly() {
        let config = MachineConfig {
            rows: 1,
            columns: 1,
            max_lines: 1,
            min_bet: 1,
            max_bet: i32::MAX as u32,
            symbols: vec![SymbolSpec::new(Symbol::AT, 1, u32::MAX)],
        };
        let machine = SlotMachine::new(config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let bet = i32::MAX as u32;
        let s = machine
            .play(Balance::from_credits(u64::from(bet)), bet, 1, &mut rng)
            .into_result()
            .unwrap();
        assert_eq!(s.stake, 2_147_483_647);
        assert_eq!(s.winnings, 9_223_372_030_412_324_865);
        assert_eq!(s.net, 9_223_372_028_264_841_218);
        assert_eq!(
            i128::from(s.net),
            i128::from(s.winnings) - i128::from(s.stake)
        );
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = MachineConfig {
            max_lines: 5,
            ..MachineConfig::classic()
        };
        assert!(matches!(
            SlotMachine::new(config),
            Err(ConfigError::MaxLines { .. })
        ));
    }
}
