//! Persistent duplicate-detection trees
//!
//! The search suppresses symmetric duplicates with one balanced search tree
//! per recursion level. Sibling levels trying the same piece size fork their
//! parent's tree in O(1), so the keys already tried above are shared instead
//! of re-inserted. To make forking cheap and safe the nodes live in a
//! growable arena addressed by `u32` indices, carry a reference count, and
//! are copied on write along the insertion path only.
//!
//! A logical tree is just a root index ([`DupTree`]); all operations go
//! through the [`TreeArena`] that owns the storage. Trees related by
//! [`TreeArena::duplicate`] behave as fully independent sets: an insertion
//! into one is never observable through the other.

use std::cmp::Ordering;

/// Sentinel index for the empty subtree.
const NIL: u32 = u32::max_value();

/// Outcome of [`TreeArena::seen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenOutcome {
    /// The key was already present; the tree is unchanged.
    Exists,
    /// The key was inserted.
    Inserted,
}

/// Handle to one logical tree: a root index into a [`TreeArena`].
#[derive(Debug)]
pub struct DupTree {
    root: u32,
}

impl DupTree {
    /// An empty tree.
    pub fn new() -> Self {
        DupTree { root: NIL }
    }
}

impl Default for DupTree {
    fn default() -> Self {
        DupTree::new()
    }
}

#[derive(Debug)]
struct Node<K> {
    key: K,
    left: u32,
    right: u32,
    /// height(right subtree) - height(left subtree), in -1..=1 at rest
    balance: i8,
    /// incoming references: parent pointers plus tree handles
    refs: u32,
}

/// Growable arena of refcounted AVL nodes, shared by many logical trees.
#[derive(Debug)]
pub struct TreeArena<K> {
    nodes: Vec<Node<K>>,
    free_head: u32,
}

enum Ins {
    Exists,
    Placed { node: u32, grew: bool },
}

impl<K: Ord + Clone> TreeArena<K> {
    /// A fresh arena with no nodes.
    pub fn new() -> Self {
        TreeArena {
            nodes: Vec::new(),
            free_head: NIL,
        }
    }

    /// Forks `tree` in O(1). The fork shares every node with the original
    /// until one of the two is written to.
    pub fn duplicate(&mut self, tree: &DupTree) -> DupTree {
        if tree.root != NIL {
            self.nodes[tree.root as usize].refs += 1;
        }
        DupTree { root: tree.root }
    }

    /// Tests for `key` and inserts it if absent.
    ///
    /// Insertion copies every node on the root-to-leaf path that is still
    /// shared with another logical tree; untouched subtrees stay shared.
    pub fn seen(&mut self, tree: &mut DupTree, key: &K) -> SeenOutcome {
        match self.insert_rec(tree.root, key, false) {
            Ins::Exists => SeenOutcome::Exists,
            Ins::Placed { node, .. } => {
                tree.root = node;
                SeenOutcome::Inserted
            }
        }
    }

    /// Read-only membership test.
    pub fn contains(&self, tree: &DupTree, key: &K) -> bool {
        let mut idx = tree.root;
        while idx != NIL {
            let node = &self.nodes[idx as usize];
            idx = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        false
    }

    /// The keys of `tree` in increasing order.
    pub fn in_order(&self, tree: &DupTree) -> Vec<K> {
        let mut keys = Vec::new();
        self.collect(tree.root, &mut keys);
        keys
    }

    /// Releases the tree's reference on its nodes, returning any node whose
    /// count reaches zero to the free list. Children of a freed node are
    /// released in turn; children still referenced elsewhere are not touched.
    pub fn destroy(&mut self, tree: DupTree) {
        self.release(tree.root);
    }

    fn collect(&self, idx: u32, keys: &mut Vec<K>) {
        if idx == NIL {
            return;
        }
        let node = &self.nodes[idx as usize];
        self.collect(node.left, keys);
        keys.push(node.key.clone());
        self.collect(node.right, keys);
    }

    fn release(&mut self, idx: u32) {
        if idx == NIL {
            return;
        }
        let node = &mut self.nodes[idx as usize];
        debug_assert!(node.refs > 0);
        node.refs -= 1;
        if node.refs == 0 {
            let (left, right) = (node.left, node.right);
            node.left = self.free_head;
            self.free_head = idx;
            self.release(left);
            self.release(right);
        }
    }

    fn alloc(&mut self, key: K, left: u32, right: u32, balance: i8) -> u32 {
        let node = Node {
            key,
            left,
            right,
            balance,
            refs: 1,
        };
        if self.free_head != NIL {
            let idx = self.free_head;
            self.free_head = self.nodes[idx as usize].left;
            self.nodes[idx as usize] = node;
            idx
        } else {
            self.nodes.push(node);
            (self.nodes.len() - 1) as u32
        }
    }

    /// Copies a shared path node so it can be written to.
    ///
    /// The copy takes over the caller's reference; the child on the side not
    /// being descended gains the copy as a second parent. `shared_above` is
    /// true when an ancestor was already copied, in which case the original
    /// parent keeps pointing at `idx` and no reference is given up.
    fn copy_for_write(&mut self, idx: u32, to_left: bool, shared_above: bool) -> u32 {
        let (key, left, right, balance) = {
            let node = &self.nodes[idx as usize];
            (node.key.clone(), node.left, node.right, node.balance)
        };
        if !shared_above {
            debug_assert!(self.nodes[idx as usize].refs > 1);
            self.nodes[idx as usize].refs -= 1;
        }
        let untouched = if to_left { right } else { left };
        if untouched != NIL {
            self.nodes[untouched as usize].refs += 1;
        }
        // the stale pointer on the descended side is overwritten by the caller
        self.alloc(key, left, right, balance)
    }

    fn insert_rec(&mut self, idx: u32, key: &K, shared_above: bool) -> Ins {
        if idx == NIL {
            return Ins::Placed {
                node: self.alloc(key.clone(), NIL, NIL, 0),
                grew: true,
            };
        }
        let shared = shared_above || self.nodes[idx as usize].refs > 1;
        let to_left = match key.cmp(&self.nodes[idx as usize].key) {
            Ordering::Equal => return Ins::Exists,
            Ordering::Less => true,
            Ordering::Greater => false,
        };
        let child = {
            let node = &self.nodes[idx as usize];
            if to_left {
                node.left
            } else {
                node.right
            }
        };
        let (new_child, grew) = match self.insert_rec(child, key, shared) {
            Ins::Exists => return Ins::Exists,
            Ins::Placed { node, grew } => (node, grew),
        };

        let me = if shared {
            self.copy_for_write(idx, to_left, shared_above)
        } else {
            idx
        };
        {
            let node = &mut self.nodes[me as usize];
            if to_left {
                node.left = new_child;
            } else {
                node.right = new_child;
            }
        }
        if !grew {
            return Ins::Placed { node: me, grew: false };
        }
        let balance = {
            let node = &mut self.nodes[me as usize];
            node.balance += if to_left { -1 } else { 1 };
            node.balance
        };
        match balance {
            0 => Ins::Placed { node: me, grew: false },
            -1 | 1 => Ins::Placed { node: me, grew: true },
            -2 => Ins::Placed {
                node: self.rebalance_left_heavy(me),
                grew: false,
            },
            _ => Ins::Placed {
                node: self.rebalance_right_heavy(me),
                grew: false,
            },
        }
    }

    // Rotations only ever touch nodes on the (exclusively owned) insertion
    // path; subtrees hanging off them are re-parented without their
    // reference counts changing.

    fn rebalance_left_heavy(&mut self, me: u32) -> u32 {
        let l = self.nodes[me as usize].left;
        if self.nodes[l as usize].balance == -1 {
            // single right rotation
            self.nodes[me as usize].left = self.nodes[l as usize].right;
            self.nodes[l as usize].right = me;
            self.nodes[me as usize].balance = 0;
            self.nodes[l as usize].balance = 0;
            l
        } else {
            // left-right double rotation
            let p = self.nodes[l as usize].right;
            self.nodes[l as usize].right = self.nodes[p as usize].left;
            self.nodes[me as usize].left = self.nodes[p as usize].right;
            self.nodes[p as usize].left = l;
            self.nodes[p as usize].right = me;
            let pivot_balance = self.nodes[p as usize].balance;
            self.nodes[l as usize].balance = if pivot_balance == 1 { -1 } else { 0 };
            self.nodes[me as usize].balance = if pivot_balance == -1 { 1 } else { 0 };
            self.nodes[p as usize].balance = 0;
            p
        }
    }

    fn rebalance_right_heavy(&mut self, me: u32) -> u32 {
        let r = self.nodes[me as usize].right;
        if self.nodes[r as usize].balance == 1 {
            // single left rotation
            self.nodes[me as usize].right = self.nodes[r as usize].left;
            self.nodes[r as usize].left = me;
            self.nodes[me as usize].balance = 0;
            self.nodes[r as usize].balance = 0;
            r
        } else {
            // right-left double rotation
            let p = self.nodes[r as usize].left;
            self.nodes[r as usize].left = self.nodes[p as usize].right;
            self.nodes[me as usize].right = self.nodes[p as usize].left;
            self.nodes[p as usize].right = r;
            self.nodes[p as usize].left = me;
            let pivot_balance = self.nodes[p as usize].balance;
            self.nodes[r as usize].balance = if pivot_balance == -1 { 1 } else { 0 };
            self.nodes[me as usize].balance = if pivot_balance == 1 { -1 } else { 0 };
            self.nodes[p as usize].balance = 0;
            p
        }
    }
}

impl<K: Ord + Clone> Default for TreeArena<K> {
    fn default() -> Self {
        TreeArena::new()
    }
}
