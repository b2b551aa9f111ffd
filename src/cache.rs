//! Cache façade: save/load, slot allocation/eviction, and keeping the tree
//! and LRU list coherent across every mutation.

use crate::context::ServerContext;
use crate::entry::{self, ENTRY_SIZE, MASTER_SECRET_LEN, NULL_ADDR, SESSION_ID_LEN};
use crate::lru;
use crate::mask::KeyMasker;
use crate::tree;
use log::debug;

/// Session parameters crossing the cache boundary. On `save` every field is
/// populated by the caller; on `load` only `session_id` needs to be
/// populated going in, and the remaining three fields are filled in on a
/// hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub session_id: [u8; SESSION_ID_LEN],
    pub version: u16,
    pub cipher_suite: u16,
    pub master_secret: [u8; MASTER_SECRET_LEN],
}

impl SessionParams {
    pub fn for_lookup(session_id: [u8; SESSION_ID_LEN]) -> Self {
        Self {
            session_id,
            version: 0,
            cipher_suite: 0,
            master_secret: [0u8; MASTER_SECRET_LEN],
        }
    }
}

/// A bounded, fixed-capacity session cache over a caller-owned byte region.
///
/// `SessionCache` borrows its backing store for as long as it lives and
/// never allocates beyond it: every session occupies exactly one 100-byte
/// slot, slots are never moved once written, and eviction recycles the
/// least-recently-used slot rather than growing the store.
pub struct SessionCache<'a> {
    store: &'a mut [u8],
    store_len: u32,
    store_ptr: u32,
    head: u32,
    tail: u32,
    root: u32,
    masker: Option<KeyMasker>,
}

impl<'a> SessionCache<'a> {
    /// Configure a cache over `store`. The cache starts out uninitialized:
    /// its indexing secret and hash choice are not drawn until the first
    /// successful `save`.
    pub fn init(store: &'a mut [u8]) -> Self {
        let store_len = store.len().min(u32::MAX as usize) as u32;
        Self {
            store,
            store_len,
            store_ptr: 0,
            head: NULL_ADDR,
            tail: NULL_ADDR,
            root: NULL_ADDR,
            masker: None,
        }
    }

    /// Number of slots the backing store can hold.
    pub fn capacity_hint(&self) -> u32 {
        self.store_len / ENTRY_SIZE
    }

    fn usable(&self) -> bool {
        self.store_len >= ENTRY_SIZE
    }

    /// Record a completed handshake's parameters so a later matching
    /// session_id can resume without a full handshake. Never fails visibly
    /// to the caller: a too-small store, a duplicate session_id, and RNG
    /// exhaustion on first use are all absorbed here and only observable
    /// through `log`.
    pub fn save(&mut self, ctx: &dyn ServerContext, params: &SessionParams) {
        if !self.usable() {
            debug!("session cache: store smaller than one slot, save is a no-op");
            return;
        }

        if self.masker.is_none() {
            match KeyMasker::derive(ctx) {
                Ok(masker) => self.masker = Some(masker),
                Err(e) => {
                    log::warn!(
                        "session cache: first-save RNG initialization failed ({e}); \
                         cache remains uninitialized and will retry on the next save"
                    );
                    return;
                }
            }
        }
        let masker = self.masker.as_ref().expect("just initialized above");
        let indexed_key = masker.mask(&params.session_id);

        let (existing, _) = tree::find(self.store, self.root, &indexed_key);
        if existing != NULL_ADDR {
            debug!("session cache: save absorbed a duplicate session_id");
            return;
        }

        let slot = if self.store_ptr + ENTRY_SIZE <= self.store_len {
            let slot = self.store_ptr;
            self.store_ptr += ENTRY_SIZE;
            slot
        } else {
            let evicted = lru::evict_tail(self.store, &mut self.head, &mut self.tail);
            // `evicted` may already be absent from the tree: the removal
            // policy below can orphan a live LRU entry, and that entry can
            // later reach the tail. `tree::unlink` treats an address that
            // isn't reachable from `root` as a no-op rather than panicking.
            tree::unlink(self.store, &mut self.root, evicted);
            debug!("session cache: evicted slot at offset {evicted}");
            evicted
        };

        // Re-find: eviction may have restructured the tree since the first
        // lookup above.
        let (_, link_slot) = tree::find(self.store, self.root, &indexed_key);
        tree::attach(self.store, &mut self.root, link_slot, slot);

        lru::push_front(self.store, &mut self.head, &mut self.tail, slot);

        entry::init_slot(
            self.store,
            slot,
            &indexed_key,
            &params.master_secret,
            params.version,
            params.cipher_suite,
        );
    }

    /// Look up `params.session_id`. On a hit, fills in `version`,
    /// `cipher_suite`, and `master_secret` and promotes the entry to the
    /// front of the LRU list, then returns `true`. On a miss (including an
    /// uninitialized cache), returns `false` and leaves `params` untouched
    /// beyond `session_id`.
    ///
    /// `_ctx` is accepted for symmetry with `save`'s signature; lookups need
    /// no fresh randomness and reuse the hash fixed at first save, so it
    /// goes unused.
    pub fn load(&mut self, _ctx: &dyn ServerContext, params: &mut SessionParams) -> bool {
        let Some(masker) = self.masker.as_ref() else {
            return false;
        };
        let indexed_key = masker.mask(&params.session_id);

        let (found, _) = tree::find(self.store, self.root, &indexed_key);
        if found == NULL_ADDR {
            return false;
        }

        params.version = entry::version(self.store, found);
        params.cipher_suite = entry::cipher_suite(self.store, found);
        params.master_secret = entry::master_secret(self.store, found);

        lru::move_to_front(self.store, &mut self.head, &mut self.tail, found);
        true
    }

    /// `true` once the first successful `save` has drawn the indexing
    /// secret and fixed the hash choice.
    pub fn is_initialized(&self) -> bool {
        self.masker.is_some()
    }

    /// `true` once the next `save` would have to evict to make room.
    pub fn is_full(&self) -> bool {
        self.usable() && self.store_ptr + ENTRY_SIZE > self.store_len
    }
}
