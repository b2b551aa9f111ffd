//! Doubly-linked eviction list. Head/tail are owned by the cache façade and
//! passed in by mutable reference; prev/next live inside each entry's slot,
//! addressed the same way the tree's children are.

use crate::entry::{self, NULL_ADDR};

/// Insert `addr` at the front of the list (most-recently-used).
pub fn push_front(store: &mut [u8], head: &mut u32, tail: &mut u32, addr: u32) {
    entry::set_lru_prev(store, addr, NULL_ADDR);
    entry::set_lru_next(store, addr, *head);

    if *head != NULL_ADDR {
        entry::set_lru_prev(store, *head, addr);
    } else {
        *tail = addr;
    }
    *head = addr;
}

/// Move an already-linked entry to the front. No-op if already there.
pub fn move_to_front(store: &mut [u8], head: &mut u32, tail: &mut u32, addr: u32) {
    if addr == *head {
        return;
    }

    let prev = entry::lru_prev(store, addr);
    let next = entry::lru_next(store, addr);

    // splice out
    entry::set_lru_next(store, prev, next);
    if next == NULL_ADDR {
        *tail = prev;
    } else {
        entry::set_lru_prev(store, next, prev);
    }

    push_front(store, head, tail, addr);
}

/// Evict and return the current tail (least-recently-used). The caller is
/// responsible for also unlinking the returned address from the tree.
pub fn evict_tail(store: &mut [u8], head: &mut u32, tail: &mut u32) -> u32 {
    let evicted = *tail;
    debug_assert_ne!(evicted, NULL_ADDR, "evict_tail called on an empty list");

    let new_tail = entry::lru_prev(store, evicted);
    *tail = new_tail;
    if new_tail == NULL_ADDR {
        *head = NULL_ADDR;
    } else {
        entry::set_lru_next(store, new_tail, NULL_ADDR);
    }
    evicted
}

/// Walk the list from `head` to `tail`, for invariant checks and tests.
pub fn forward(store: &[u8], head: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut cur = head;
    while cur != NULL_ADDR {
        out.push(cur);
        cur = entry::lru_next(store, cur);
    }
    out
}
