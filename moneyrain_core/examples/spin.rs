use moneyrain_core::{Balance, Outcome, ProvablyFairRng, SlotMachine};

fn main() {
    // One seeded round on the classic machine
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let nonce = 1u64;
    let machine = SlotMachine::classic();
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    let hash = rng.server_seed_hash_hex();
    match machine.play(Balance::from_credits(100), 10, 3, &mut rng) {
        Outcome::Settled(s) => println!(
            "server_seed_hash={} {} lines={:?} net={}\n{}",
            hash,
            s.message(),
            s.winning_lines,
            s.net,
            s.grid
        ),
        Outcome::Rejected { reason } => println!("rejected: {}", reason.reason()),
    }
}
