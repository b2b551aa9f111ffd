use crate::error::RngError;
use rand::RngCore;

/// Hash primitives the key-masker may be asked to build its MAC around.
/// Matches the range the spec calls out: SHA-256, SHA-384, and SHA-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha1,
}

/// The opaque collaborator the cache borrows from the owning TLS server.
///
/// The cache never seeds or constructs this itself: the RNG and the hash
/// choice are injected per call, never captured as module-level state.
pub trait ServerContext {
    /// Fill `out` with cryptographically strong random bytes.
    fn random_bytes(&self, out: &mut [u8]) -> Result<(), RngError>;

    /// The hash primitive this server prefers for newly-seeded caches.
    fn preferred_hash(&self) -> HashAlgorithm;
}

/// Reference [`ServerContext`] backed by the OS RNG, for tests, examples,
/// and callers with no context of their own to hand the cache.
pub struct OsServerContext {
    hash: HashAlgorithm,
}

impl OsServerContext {
    pub fn new(hash: HashAlgorithm) -> Self {
        Self { hash }
    }
}

impl Default for OsServerContext {
    fn default() -> Self {
        Self::new(HashAlgorithm::Sha256)
    }
}

impl ServerContext for OsServerContext {
    fn random_bytes(&self, out: &mut [u8]) -> Result<(), RngError> {
        rand::thread_rng().try_fill_bytes(out).map_err(|_| RngError::Exhausted)
    }

    fn preferred_hash(&self) -> HashAlgorithm {
        self.hash
    }
}
