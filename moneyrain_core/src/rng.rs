use std::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

// Provably fair byte stream:
// HMAC-SHA256(key = server_seed, msg = "client_seed:nonce:block") for block = 0, 1, 2, ...

pub type HmacSha256 = Hmac<Sha256>;

const BLOCK_LEN: usize = 32;

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Deterministic random source for one round.
///
/// The server publishes `server_seed_hash_hex()` before play and reveals the
/// seed afterwards; anyone can then rebuild the stream and replay the spin.
#[derive(Clone)]
pub struct ProvablyFairRng {
    server_seed: String,
    client_seed: String,
    nonce: u64,
    block: [u8; BLOCK_LEN],
    block_index: u64,
    cursor: usize,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        let mut rng = Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            block: [0u8; BLOCK_LEN],
            block_index: 0,
            cursor: 0,
        };
        rng.block = rng.hmac_block(0);
        rng
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    fn hmac_block(&self, index: u64) -> [u8; BLOCK_LEN] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let msg = format!("{}:{}:{}", self.client_seed, self.nonce, index);
        mac.update(msg.as_bytes());
        let mut out = [0u8; BLOCK_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }
}

impl RngCore for ProvablyFairRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_be_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_be_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut written = 0;
        while written < dest.len() {
            if self.cursor == BLOCK_LEN {
                self.block_index += 1;
                self.block = self.hmac_block(self.block_index);
                self.cursor = 0;
            }
            let n = (BLOCK_LEN - self.cursor).min(dest.len() - written);
            dest[written..written + n].copy_from_slice(&self.block[self.cursor..self.cursor + n]);
            self.cursor += n;
            written += n;
        }
    }
}

impl fmt::Debug for ProvablyFairRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvablyFairRng")
            .field("server_seed_hash", &self.server_seed_hash_hex())
            .field("client_seed", &self.client_seed)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}
