//! Order-statistic tree used by the in-memory backend.
//!
//! A treap whose nodes live in an arena and carry the size of their subtree.
//! Subtree sizes turn "how many keys sort before this one" (rank) and "which
//! key sits at position i" (select) into single root-to-leaf walks, so both
//! run in expected O(log n).

use std::cmp::Ordering;

type Handle = usize;
type Link = Option<Handle>;

#[derive(Clone, Debug)]
struct Node<K> {
    key: K,
    priority: u64,
    size: usize,
    left: Link,
    right: Link,
}

/// An ordered set of unique keys with rank and select queries.
#[derive(Clone, Debug)]
pub(crate) struct OsTree<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<Handle>,
    root: Link,
    seed: u64,
}

impl<K: Ord> OsTree<K> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            seed: 0x853c_49e6_748f_ea9b,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.node(h);
            match key.cmp(&node.key) {
                Ordering::Less => link = node.left,
                Ordering::Greater => link = node.right,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Inserts `key`. Returns `false` if it was already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        let root = self.root.take();
        let (left, right) = self.split(root, &|k: &K| k < &key);
        let h = self.alloc(key);
        let left = self.merge(left, Some(h));
        self.root = self.merge(left, right);
        true
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub(crate) fn remove(&mut self, key: &K) -> bool {
        let root = self.root.take();
        let (left, rest) = self.split(root, &|k: &K| k < key);
        let (found, right) = self.split(rest, &|k: &K| k <= key);
        if let Some(h) = found {
            // Keys are unique, so the middle part is a single node.
            debug_assert_eq!(self.node(h).size, 1);
            self.release(h);
        }
        self.root = self.merge(left, right);
        found.is_some()
    }

    /// Counts the keys for which `before` holds.
    ///
    /// `before` must be monotone over the key order: true for a prefix of the
    /// keys, false for the rest.
    pub(crate) fn count_before(&self, before: impl Fn(&K) -> bool) -> usize {
        let mut count = 0;
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.node(h);
            if before(&node.key) {
                count += self.size(node.left) + 1;
                link = node.right;
            } else {
                link = node.left;
            }
        }
        count
    }

    /// 0-based position of `key` in ascending order.
    pub(crate) fn rank(&self, key: &K) -> Option<usize> {
        if !self.contains(key) {
            return None;
        }
        Some(self.count_before(|k| k < key))
    }

    /// Key at 0-based ascending position `index`.
    pub(crate) fn select(&self, mut index: usize) -> Option<&K> {
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.node(h);
            let left_size = self.size(node.left);
            match index.cmp(&left_size) {
                Ordering::Less => link = node.left,
                Ordering::Equal => return Some(&node.key),
                Ordering::Greater => {
                    index -= left_size + 1;
                    link = node.right;
                }
            }
        }
        None
    }

    /// Splits the subtree at `link` into keys satisfying `goes_left` and the rest.
    fn split(&mut self, link: Link, goes_left: &impl Fn(&K) -> bool) -> (Link, Link) {
        let Some(h) = link else {
            return (None, None);
        };
        if goes_left(&self.node(h).key) {
            let right = self.node(h).right;
            let (mid, right) = self.split(right, goes_left);
            self.node_mut(h).right = mid;
            self.update(h);
            (Some(h), right)
        } else {
            let left = self.node(h).left;
            let (left, mid) = self.split(left, goes_left);
            self.node_mut(h).left = mid;
            self.update(h);
            (left, Some(h))
        }
    }

    /// Joins two subtrees where every key of `left` sorts before every key of `right`.
    fn merge(&mut self, left: Link, right: Link) -> Link {
        match (left, right) {
            (None, link) | (link, None) => link,
            (Some(a), Some(b)) => {
                if self.node(a).priority > self.node(b).priority {
                    let a_right = self.node(a).right;
                    let merged = self.merge(a_right, Some(b));
                    self.node_mut(a).right = merged;
                    self.update(a);
                    Some(a)
                } else {
                    let b_left = self.node(b).left;
                    let merged = self.merge(Some(a), b_left);
                    self.node_mut(b).left = merged;
                    self.update(b);
                    Some(b)
                }
            }
        }
    }

    fn update(&mut self, h: Handle) {
        let node = self.node(h);
        let size = 1 + self.size(node.left) + self.size(node.right);
        self.node_mut(h).size = size;
    }

    fn size(&self, link: Link) -> usize {
        link.map_or(0, |h| self.node(h).size)
    }

    fn node(&self, h: Handle) -> &Node<K> {
        self.slots[h]
            .as_ref()
            .expect("`OsTree::node()` - `handle` is invalid!")
    }

    fn node_mut(&mut self, h: Handle) -> &mut Node<K> {
        self.slots[h]
            .as_mut()
            .expect("`OsTree::node_mut()` - `handle` is invalid!")
    }

    fn alloc(&mut self, key: K) -> Handle {
        let node = Node {
            key,
            priority: self.next_priority(),
            size: 1,
            left: None,
            right: None,
        };
        if let Some(h) = self.free.pop() {
            self.slots[h] = Some(node);
            h
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn release(&mut self, h: Handle) {
        self.slots[h] = None;
        self.free.push(h);
    }

    // splitmix64
    fn next_priority(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl<K: Ord> Default for OsTree<K> {
    fn default() -> Self {
        Self::new()
    }
}
