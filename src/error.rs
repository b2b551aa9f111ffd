use thiserror::Error;

/// The one failure mode this crate lets escape as a `Result`: the server
/// context's random source refusing to produce the bytes the cache needs to
/// seed its indexing key. Every other condition (too-small store, lookup
/// miss, indexed-key collision) is absorbed silently by [`crate::SessionCache`]
/// per its contract.
#[derive(Debug, Error)]
pub enum RngError {
    #[error("server context random source exhausted or unavailable")]
    Exhausted,

    #[error("server context random source returned a short read")]
    ShortRead,
}
