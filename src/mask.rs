//! Key-masker: turns a 32-byte session_id into a 32-byte indexed key via a
//! keyed MAC, so that tree ordering is pseudorandom to anyone who does not
//! hold the cache's secret `index_key`.

use crate::context::{HashAlgorithm, ServerContext};
use crate::entry::SESSION_ID_LEN;
use crate::error::RngError;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384};
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha1 = Hmac<Sha1>;

/// Holds the per-instance secret and the hash choice fixed at first save.
/// Neither field is ever reassigned after construction; `index_key` is
/// zeroized on drop since it is sensitive material the cache owns.
pub struct KeyMasker {
    index_key: [u8; SESSION_ID_LEN],
    hash: HashAlgorithm,
}

impl Drop for KeyMasker {
    fn drop(&mut self) {
        self.index_key.zeroize();
    }
}

impl KeyMasker {
    /// Draw a fresh secret from the server context and fix the hash choice.
    /// Fails (without side effects) if the RNG cannot produce the bytes.
    pub fn derive(ctx: &dyn ServerContext) -> Result<Self, RngError> {
        let mut index_key = [0u8; SESSION_ID_LEN];
        ctx.random_bytes(&mut index_key)?;
        Ok(Self { index_key, hash: ctx.preferred_hash() })
    }

    /// Transform a session_id into its 32-byte indexed key.
    pub fn mask(&self, session_id: &[u8; SESSION_ID_LEN]) -> [u8; SESSION_ID_LEN] {
        match self.hash {
            HashAlgorithm::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(&self.index_key)
                    .expect("HMAC accepts keys of any length");
                mac.update(session_id);
                let out = mac.finalize().into_bytes();
                out.into()
            }
            HashAlgorithm::Sha384 => {
                let mut mac = HmacSha384::new_from_slice(&self.index_key)
                    .expect("HMAC accepts keys of any length");
                mac.update(session_id);
                let mut out = mac.finalize().into_bytes();
                let mut truncated = [0u8; SESSION_ID_LEN];
                truncated.copy_from_slice(&out[..SESSION_ID_LEN]);
                out.as_mut_slice().zeroize();
                truncated
            }
            HashAlgorithm::Sha1 => self.expand_sha1(session_id),
        }
    }

    /// SHA-1's 20-byte HMAC output is short of the 32 bytes an indexed key
    /// needs. Expand it with one more HMAC evaluation over the prior block
    /// plus a counter byte (an HKDF-expand-style step, the same
    /// counter-based idiom used to stretch a short secret into a
    /// fixed-width key elsewhere in this corpus), concatenating blocks
    /// until 32 bytes are available.
    fn expand_sha1(&self, session_id: &[u8; SESSION_ID_LEN]) -> [u8; SESSION_ID_LEN] {
        let mut mac =
            HmacSha1::new_from_slice(&self.index_key).expect("HMAC accepts keys of any length");
        mac.update(session_id);
        let mut block: Vec<u8> = mac.finalize().into_bytes().to_vec();

        let mut out = block.clone();
        let mut counter: u8 = 0;
        while out.len() < SESSION_ID_LEN {
            counter += 1;
            let mut mac = HmacSha1::new_from_slice(&self.index_key)
                .expect("HMAC accepts keys of any length");
            mac.update(&block);
            mac.update(&[counter]);
            block.zeroize();
            block = mac.finalize().into_bytes().to_vec();
            out.extend_from_slice(&block);
        }

        let mut ret = [0u8; SESSION_ID_LEN];
        ret.copy_from_slice(&out[..SESSION_ID_LEN]);
        out.zeroize();
        block.zeroize();
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OsServerContext;

    fn masker(hash: HashAlgorithm) -> KeyMasker {
        let ctx = OsServerContext::new(hash);
        KeyMasker::derive(&ctx).unwrap()
    }

    #[test]
    fn deterministic_for_fixed_key() {
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha1] {
            let m = masker(hash);
            let id = [7u8; SESSION_ID_LEN];
            assert_eq!(m.mask(&id), m.mask(&id));
        }
    }

    #[test]
    fn distinct_keys_differ_with_overwhelming_probability() {
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha1] {
            let m = masker(hash);
            let a = m.mask(&[1u8; SESSION_ID_LEN]);
            let b = m.mask(&[2u8; SESSION_ID_LEN]);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn differing_secrets_produce_differing_masks() {
        let ctx = OsServerContext::new(HashAlgorithm::Sha256);
        let m1 = KeyMasker::derive(&ctx).unwrap();
        let m2 = KeyMasker::derive(&ctx).unwrap();
        let id = [9u8; SESSION_ID_LEN];
        // Two independently-derived maskers draw independent secrets, so
        // the same session_id should (overwhelmingly likely) mask
        // differently under each.
        assert_ne!(m1.mask(&id), m2.mask(&id));
    }
}
