use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use moneyrain_core::{
    derive_hash_hex, line_return, Balance, Grid, MachineConfig, Outcome, SlotMachine, Symbol,
    Wager,
};

#[derive(Parser)]
#[command(name = "moneyrain", about = "Play, simulate and verify slot rounds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Machine config (TOML). Defaults to the classic 3x3 machine.
    #[arg(long, global = true, env = "MONEYRAIN_CONFIG")]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round with provably fair seeds
    Spin {
        #[arg(long)]
        balance: Balance,
        #[arg(long, default_value_t = 10)]
        bet: u32,
        #[arg(long, default_value_t = 1)]
        lines: u32,
        #[arg(long, default_value = "dev-server-seed")]
        server_seed: String,
        #[arg(long, default_value = "dev-client-seed")]
        client_seed: String,
        #[arg(long, default_value_t = 1)]
        nonce: u64,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play many rounds with a seeded RNG and compare the return with theory
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        rounds: u64,
        #[arg(long, default_value_t = 1)]
        bet: u32,
        #[arg(long, default_value_t = 3)]
        lines: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Write every round to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Check that a grid is what the seeds produce.
    ///
    /// Columns are comma separated, e.g. "@$#,@!#,@##".
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long)]
        grid: String,
    },
    /// Print the SHA-256 commitment for a server seed
    HashSeed { seed: String },
    /// Show the symbol table and the expected return per line
    Table,
}

#[derive(Debug, Serialize)]
struct RoundRecord {
    round: u64,
    stake: u64,
    winnings: u64,
    net: i64,
    winning_lines: String,
    grid: String,
}

#[derive(Debug, Default, PartialEq)]
struct SimulationReport {
    rounds: u64,
    staked: u64,
    paid: u64,
    winning_rounds: u64,
}

impl SimulationReport {
    fn rtp(&self) -> f64 {
        if self.staked == 0 {
            0.0
        } else {
            self.paid as f64 / self.staked as f64
        }
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "moneyrain=debug,moneyrain_core=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_machine(path: Option<&PathBuf>) -> anyhow::Result<SlotMachine> {
    let config = match path {
        Some(path) => MachineConfig::load(path)?,
        None => MachineConfig::classic(),
    };
    Ok(SlotMachine::new(config)?)
}

fn parse_grid(s: &str) -> anyhow::Result<Grid> {
    let columns: Vec<Vec<Symbol>> = s
        .split(',')
        .map(|col| col.trim().chars().map(Symbol).collect())
        .collect();
    Grid::from_columns(columns).context("invalid grid")
}

fn render_grid(grid: &Grid) -> String {
    grid.columns()
        .iter()
        .map(|col| col.iter().map(|s| s.glyph()).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}

fn simulate<W: Write>(
    machine: &SlotMachine,
    wager: Wager,
    rounds: u64,
    seed: u64,
    mut csv: Option<&mut csv::Writer<W>>,
) -> anyhow::Result<SimulationReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let balance = Balance::from_credits(wager.stake());
    let mut report = SimulationReport::default();
    for round in 1..=rounds {
        let settlement = match machine.play_wager(balance, wager, &mut rng) {
            Outcome::Settled(s) => s,
            Outcome::Rejected { reason } => bail!("wager rejected: {reason}"),
        };
        report.rounds += 1;
        report.staked += settlement.stake;
        report.paid += settlement.winnings;
        if settlement.is_win() {
            report.winning_rounds += 1;
        }
        if let Some(wtr) = csv.as_deref_mut() {
            wtr.serialize(RoundRecord {
                round,
                stake: settlement.stake,
                winnings: settlement.winnings,
                net: settlement.net,
                winning_lines: settlement
                    .winning_lines
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
                grid: render_grid(&settlement.grid),
            })?;
        }
    }
    Ok(report)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let machine = load_machine(cli.config.as_ref())?;
    debug!(config = ?machine.config(), "machine ready");

    match cli.command {
        Commands::Spin {
            balance,
            bet,
            lines,
            server_seed,
            client_seed,
            nonce,
            json,
        } => {
            let outcome = machine.play_with_seeds(
                &server_seed,
                &client_seed,
                nonce,
                balance,
                Wager::new(bet, lines),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }
            println!("server seed hash: {}", derive_hash_hex(server_seed.as_bytes()));
            match outcome {
                Outcome::Settled(s) => {
                    print!("{}", s.grid);
                    println!("{}", s.message());
                    println!("winning lines: {:?}", s.winning_lines);
                    println!("stake: {} net: {}", s.stake, s.net);
                }
                Outcome::Rejected { reason } => {
                    println!("rejected ({}): {}", reason.reason(), reason);
                }
            }
        }
        Commands::Simulate {
            rounds,
            bet,
            lines,
            seed,
            csv: csv_path,
        } => {
            let wager = Wager::new(bet, lines);
            let report = match &csv_path {
                Some(path) => {
                    let mut wtr = csv::Writer::from_path(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let report = simulate(&machine, wager, rounds, seed, Some(&mut wtr))?;
                    wtr.flush()?;
                    info!("wrote {} rounds to {}", report.rounds, path.display());
                    report
                }
                None => simulate::<std::io::Sink>(&machine, wager, rounds, seed, None)?,
            };
            let expected = line_return(machine.table(), machine.config().columns);
            println!(
                "rounds={} staked={} paid={} hit_rate={:.4} rtp={:.4} expected_rtp={:.4}",
                report.rounds,
                report.staked,
                report.paid,
                report.winning_rounds as f64 / report.rounds.max(1) as f64,
                report.rtp(),
                expected
            );
        }
        Commands::Verify {
            server_seed,
            client_seed,
            nonce,
            grid,
        } => {
            let grid = parse_grid(&grid)?;
            if machine.verify_grid(&server_seed, &client_seed, nonce, &grid) {
                println!("OK: grid matches seeds");
            } else {
                bail!("grid does not match seeds");
            }
        }
        Commands::HashSeed { seed } => {
            println!("{}", derive_hash_hex(seed.as_bytes()));
        }
        Commands::Table => {
            let table = machine.table();
            let pool = table.pool_size();
            println!("symbol  abundance  payout");
            for spec in table.entries() {
                println!("{:>6}  {:>9}  {:>6}", spec.symbol, spec.abundance, spec.payout);
            }
            println!(
                "pool={} expected return per line={:.4}",
                pool,
                line_return(table, machine.config().columns)
            );
        }
    }

    Ok(())
}
