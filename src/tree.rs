//! Ordered binary tree over indexed keys. Children and the root anchor are
//! all 32-bit store offsets, never owning references — there is no
//! ownership cycle to break, so no `Rc`/`RefCell` is needed.

use crate::entry::{self, NULL_ADDR, SESSION_ID_LEN};
use std::cmp::Ordering;

/// Which child field of a node a [`LinkSlot::Child`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A rewritable location that holds an address: either a node's child
/// field, or the tree's root anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkSlot {
    Root,
    Child { parent: u32, side: Side },
}

/// Descend from `root` comparing the query against each visited entry's
/// indexed key (lexicographic, unsigned byte comparison — exactly what
/// `<[u8; N]>::cmp` already implements). Returns the matching address (or
/// `NULL_ADDR` on a miss) and the link-slot that pointed to the
/// comparison-stopping node, or to where a new node would attach.
pub fn find(
    store: &[u8],
    root: u32,
    key: &[u8; SESSION_ID_LEN],
) -> (u32, LinkSlot) {
    if root == NULL_ADDR {
        return (NULL_ADDR, LinkSlot::Root);
    }

    let mut cur = root;
    let mut incoming = LinkSlot::Root;
    loop {
        let cur_key = entry::indexed_key(store, cur);
        match key.cmp(&cur_key) {
            Ordering::Equal => return (cur, incoming),
            Ordering::Less => {
                let next = entry::tree_left(store, cur);
                let slot = LinkSlot::Child { parent: cur, side: Side::Left };
                if next == NULL_ADDR {
                    return (NULL_ADDR, slot);
                }
                incoming = slot;
                cur = next;
            }
            Ordering::Greater => {
                let next = entry::tree_right(store, cur);
                let slot = LinkSlot::Child { parent: cur, side: Side::Right };
                if next == NULL_ADDR {
                    return (NULL_ADDR, slot);
                }
                incoming = slot;
                cur = next;
            }
        }
    }
}

/// Overwrite `link_slot` with `addr`, updating the root anchor if it names
/// the root.
pub fn attach(store: &mut [u8], root: &mut u32, link_slot: LinkSlot, addr: u32) {
    match link_slot {
        LinkSlot::Root => *root = addr,
        LinkSlot::Child { parent, side: Side::Left } => entry::set_tree_left(store, parent, addr),
        LinkSlot::Child { parent, side: Side::Right } => {
            entry::set_tree_right(store, parent, addr)
        }
    }
}

/// Remove the node at `addr` from the tree reached by `root`.
///
/// This reproduces the source's literal (non-textbook) removal policy: the
/// chosen replacement inherits the removed node's two subtrees, but if the
/// replacement itself had to be extracted from deeper inside one of them
/// (rather than being that subtree's immediate root), its own remaining
/// child — on the side opposite the direction it was found by — is
/// silently dropped rather than spliced back in.
///
/// That same dropping behavior means an address passed here is not always
/// still reachable from `root`: a slot can have been orphaned by an earlier
/// `unlink` while remaining live in the LRU list, and later surface again at
/// `evict_tail`. When that happens `addr` is already absent from the tree,
/// so this is a no-op rather than an error.
pub fn unlink(store: &mut [u8], root: &mut u32, addr: u32) {
    let key = entry::indexed_key(store, addr);
    let (found, link_slot) = find(store, *root, &key);
    if found != addr {
        return;
    }

    let left = entry::tree_left(store, addr);
    let right = entry::tree_right(store, addr);

    let replacement = if left != NULL_ADDR {
        // Rightmost descendant of the left subtree.
        let mut parent = addr;
        let mut cur = left;
        while entry::tree_right(store, cur) != NULL_ADDR {
            parent = cur;
            cur = entry::tree_right(store, cur);
        }
        if parent == addr {
            // `cur` is `left` itself; it keeps its own left child and
            // simply inherits the removed node's right subtree.
            entry::set_tree_right(store, cur, right);
        } else {
            // Sever `cur` from its parent without promoting `cur`'s own
            // left child up in its place (the flagged bug), then give
            // `cur` full custody of both of the removed node's subtrees.
            entry::set_tree_right(store, parent, NULL_ADDR);
            entry::set_tree_left(store, cur, left);
            entry::set_tree_right(store, cur, right);
        }
        cur
    } else if right != NULL_ADDR {
        // Leftmost descendant of the right subtree — mirror image.
        let mut parent = addr;
        let mut cur = right;
        while entry::tree_left(store, cur) != NULL_ADDR {
            parent = cur;
            cur = entry::tree_left(store, cur);
        }
        if parent == addr {
            entry::set_tree_left(store, cur, left);
        } else {
            entry::set_tree_left(store, parent, NULL_ADDR);
            entry::set_tree_left(store, cur, left);
            entry::set_tree_right(store, cur, right);
        }
        cur
    } else {
        NULL_ADDR
    };

    attach(store, root, link_slot, replacement);
}

/// Longest root-to-leaf path length. Under a DoS adversary the keyed MAC
/// index should keep this within the usual randomized-BST bound rather than
/// the unbounded worst case an unmasked insertion order would allow.
pub fn height(store: &[u8], node: u32) -> usize {
    if node == NULL_ADDR {
        return 0;
    }
    1 + height(store, entry::tree_left(store, node)).max(height(store, entry::tree_right(store, node)))
}

/// In-order traversal, for invariant checks and tests: yields indexed keys
/// in strictly ascending order when the tree is well-formed.
pub fn in_order(store: &[u8], root: u32) -> Vec<u32> {
    let mut out = Vec::new();
    fn walk(store: &[u8], node: u32, out: &mut Vec<u32>) {
        if node == NULL_ADDR {
            return;
        }
        walk(store, entry::tree_left(store, node), out);
        out.push(node);
        walk(store, entry::tree_right(store, node), out);
    }
    walk(store, root, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{init_slot, ENTRY_SIZE};

    fn store_with(n: usize) -> Vec<u8> {
        vec![0u8; n * ENTRY_SIZE as usize]
    }

    fn put(store: &mut [u8], slot: u32, key: u8) {
        let k = [key; SESSION_ID_LEN];
        init_slot(&mut store[..], slot, &k, &[0u8; 48], 0, 0);
    }

    #[test]
    fn find_on_empty_tree_points_at_root() {
        let store = store_with(1);
        let (addr, slot) = find(&store, NULL_ADDR, &[5u8; SESSION_ID_LEN]);
        assert_eq!(addr, NULL_ADDR);
        assert_eq!(slot, LinkSlot::Root);
    }

    #[test]
    fn insert_and_find_several_keys() {
        let mut store = store_with(4);
        let mut root = NULL_ADDR;

        for (i, key) in [30u8, 10, 50, 20].into_iter().enumerate() {
            let slot = (i as u32) * ENTRY_SIZE;
            put(&mut store, slot, key);
            let (_, link) = find(&store, root, &[key; SESSION_ID_LEN]);
            attach(&mut store, &mut root, link, slot);
        }

        let order: Vec<u8> = in_order(&store, root)
            .into_iter()
            .map(|addr| entry::indexed_key(&store, addr)[0])
            .collect();
        assert_eq!(order, vec![10, 20, 30, 50]);

        let (found, _) = find(&store, root, &[20u8; SESSION_ID_LEN]);
        assert_ne!(found, NULL_ADDR);
        let (miss, _) = find(&store, root, &[99u8; SESSION_ID_LEN]);
        assert_eq!(miss, NULL_ADDR);
    }

    #[test]
    fn unlink_leaf_preserves_remaining_order() {
        let mut store = store_with(3);
        let mut root = NULL_ADDR;
        for (i, key) in [20u8, 10, 30].into_iter().enumerate() {
            let slot = (i as u32) * ENTRY_SIZE;
            put(&mut store, slot, key);
            let (_, link) = find(&store, root, &[key; SESSION_ID_LEN]);
            attach(&mut store, &mut root, link, slot);
        }
        // unlink the leaf holding key 10 (slot 1 * ENTRY_SIZE)
        unlink(&mut store, &mut root, ENTRY_SIZE);
        let order: Vec<u8> = in_order(&store, root)
            .into_iter()
            .map(|addr| entry::indexed_key(&store, addr)[0])
            .collect();
        assert_eq!(order, vec![20, 30]);
    }

    #[test]
    fn unlink_deep_replacement_orphans_its_own_child() {
        // Build: root=50, left subtree 10 -> right child 30 -> left child 20.
        // Removing 50 should pick replacement 30 (rightmost of left
        // subtree), and per the flagged bug, 30's own left child (20) is
        // dropped rather than spliced under 10.
        let mut store = store_with(4);
        let mut root = NULL_ADDR;
        for (i, key) in [50u8, 10, 30, 20].into_iter().enumerate() {
            let slot = (i as u32) * ENTRY_SIZE;
            put(&mut store, slot, key);
            let (_, link) = find(&store, root, &[key; SESSION_ID_LEN]);
            attach(&mut store, &mut root, link, slot);
        }

        unlink(&mut store, &mut root, 0); // addr 0 holds key 50

        let reachable: Vec<u8> = in_order(&store, root)
            .into_iter()
            .map(|addr| entry::indexed_key(&store, addr)[0])
            .collect();
        assert_eq!(reachable, vec![10, 30]);
        assert!(!reachable.contains(&20), "orphaned child must not be reachable");
    }

    #[test]
    fn unlink_on_an_already_orphaned_address_is_a_no_op() {
        // Same setup as unlink_deep_replacement_orphans_its_own_child: slot
        // holding key 20 ends up unreachable from root after the first
        // unlink. A later unlink of that same address (as happens when it
        // reaches the LRU tail and is evicted) must not panic or disturb
        // the tree that remains.
        let mut store = store_with(4);
        let mut root = NULL_ADDR;
        for (i, key) in [50u8, 10, 30, 20].into_iter().enumerate() {
            let slot = (i as u32) * ENTRY_SIZE;
            put(&mut store, slot, key);
            let (_, link) = find(&store, root, &[key; SESSION_ID_LEN]);
            attach(&mut store, &mut root, link, slot);
        }
        unlink(&mut store, &mut root, 0); // orphans the slot holding key 20

        let orphan_addr = 3 * ENTRY_SIZE; // slot written with key 20
        unlink(&mut store, &mut root, orphan_addr);

        let reachable: Vec<u8> = in_order(&store, root)
            .into_iter()
            .map(|addr| entry::indexed_key(&store, addr)[0])
            .collect();
        assert_eq!(reachable, vec![10, 30]);
    }
}
