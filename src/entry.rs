//! The 100-byte stored-entry layout and the named offsets of its fields,
//! relative to a slot's base address.

use crate::store;

pub const SESSION_ID_LEN: usize = 32;
pub const MASTER_SECRET_LEN: usize = 48;
pub const ENTRY_SIZE: u32 = 100;

/// Sentinel marking the absence of a link (LRU prev/next, tree left/right,
/// or the head/tail/root anchors).
pub const NULL_ADDR: u32 = 0xFFFF_FFFF;

const OFF_INDEXED_KEY: u32 = 0;
const OFF_MASTER_SECRET: u32 = 32;
const OFF_VERSION: u32 = 80;
const OFF_CIPHER_SUITE: u32 = 82;
const OFF_LRU_PREV: u32 = 84;
const OFF_LRU_NEXT: u32 = 88;
const OFF_TREE_LEFT: u32 = 92;
const OFF_TREE_RIGHT: u32 = 96;

pub fn indexed_key(store: &[u8], slot: u32) -> [u8; SESSION_ID_LEN] {
    store::read_bytes(store, slot + OFF_INDEXED_KEY)
}

pub fn set_indexed_key(store: &mut [u8], slot: u32, key: &[u8; SESSION_ID_LEN]) {
    store::write_bytes(store, slot + OFF_INDEXED_KEY, key);
}

pub fn master_secret(store: &[u8], slot: u32) -> [u8; MASTER_SECRET_LEN] {
    store::read_bytes(store, slot + OFF_MASTER_SECRET)
}

pub fn set_master_secret(store: &mut [u8], slot: u32, ms: &[u8; MASTER_SECRET_LEN]) {
    store::write_bytes(store, slot + OFF_MASTER_SECRET, ms);
}

pub fn version(store: &[u8], slot: u32) -> u16 {
    store::read_u16(store, slot + OFF_VERSION)
}

pub fn set_version(store: &mut [u8], slot: u32, version: u16) {
    store::write_u16(store, slot + OFF_VERSION, version);
}

pub fn cipher_suite(store: &[u8], slot: u32) -> u16 {
    store::read_u16(store, slot + OFF_CIPHER_SUITE)
}

pub fn set_cipher_suite(store: &mut [u8], slot: u32, suite: u16) {
    store::write_u16(store, slot + OFF_CIPHER_SUITE, suite);
}

pub fn lru_prev(store: &[u8], slot: u32) -> u32 {
    store::read_u32(store, slot + OFF_LRU_PREV)
}

pub fn set_lru_prev(store: &mut [u8], slot: u32, addr: u32) {
    store::write_u32(store, slot + OFF_LRU_PREV, addr);
}

pub fn lru_next(store: &[u8], slot: u32) -> u32 {
    store::read_u32(store, slot + OFF_LRU_NEXT)
}

pub fn set_lru_next(store: &mut [u8], slot: u32, addr: u32) {
    store::write_u32(store, slot + OFF_LRU_NEXT, addr);
}

pub fn tree_left(store: &[u8], slot: u32) -> u32 {
    store::read_u32(store, slot + OFF_TREE_LEFT)
}

pub fn set_tree_left(store: &mut [u8], slot: u32, addr: u32) {
    store::write_u32(store, slot + OFF_TREE_LEFT, addr);
}

pub fn tree_right(store: &[u8], slot: u32) -> u32 {
    store::read_u32(store, slot + OFF_TREE_RIGHT)
}

pub fn set_tree_right(store: &mut [u8], slot: u32, addr: u32) {
    store::write_u32(store, slot + OFF_TREE_RIGHT, addr);
}

/// Write a freshly-allocated slot's full contents; both link families are
/// reset to [`NULL_ADDR`], to be re-linked by the caller (tree attach, LRU
/// push_front).
pub fn init_slot(
    store: &mut [u8],
    slot: u32,
    indexed_key: &[u8; SESSION_ID_LEN],
    master_secret: &[u8; MASTER_SECRET_LEN],
    version: u16,
    cipher_suite: u16,
) {
    set_indexed_key(store, slot, indexed_key);
    set_master_secret(store, slot, master_secret);
    set_version(store, slot, version);
    set_cipher_suite(store, slot, cipher_suite);
    set_lru_prev(store, slot, NULL_ADDR);
    set_lru_next(store, slot, NULL_ADDR);
    set_tree_left(store, slot, NULL_ADDR);
    set_tree_right(store, slot, NULL_ADDR);
}
