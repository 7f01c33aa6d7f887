use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngCore;
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;

/// Nonce length in bytes; the header carries twice as many hex characters.
pub const NONCE_LEN: usize = 32;

const RANDOM_LEN: usize = NONCE_LEN - 8;

/// Process-wide sequence appended to every nonce. Two nonces issued by one
/// process therefore never collide, whatever the random part produced.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Produces a fresh token for every outbound request.
pub trait NonceSource: Send + Sync {
    /// Lowercase hex, `2 * NONCE_LEN` characters.
    fn next_nonce(&self) -> String;
}

fn compose(random: &[u8; RANDOM_LEN]) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mut nonce = [0u8; NONCE_LEN];
    nonce[..RANDOM_LEN].copy_from_slice(random);
    nonce[RANDOM_LEN..].copy_from_slice(&sequence.to_be_bytes());
    hex::encode(nonce)
}

/// Default source: the thread-local CSPRNG from `rand`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemNonceSource;

impl NonceSource for SystemNonceSource {
    fn next_nonce(&self) -> String {
        let mut random = [0u8; RANDOM_LEN];
        rand::thread_rng().fill_bytes(&mut random);
        compose(&random)
    }
}

/// ChaCha20 stream from a fixed seed, for reproducible fixtures.
///
/// Still unique per process thanks to the shared sequence.
pub struct SeededNonceSource {
    rng: Mutex<ChaCha20Rng>,
}

impl SeededNonceSource {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::from_seed(seed)),
        }
    }
}

impl NonceSource for SeededNonceSource {
    fn next_nonce(&self) -> String {
        let mut random = [0u8; RANDOM_LEN];
        self.rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .fill_bytes(&mut random);
        compose(&random)
    }
}
