mod iter;
mod node;

pub use iter::{InOrder, LevelOrder, PostOrder, PreOrder};
pub use node::{Color, NodeKey};

use std::cmp::Ordering;

use slotmap::SlotMap;
use thiserror::Error;

use node::Node;

/// Total order used to place values in an [`RbTree`].
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// A violated red-black or search-tree invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeInvariantError {
    #[error("root node is red")]
    RedRoot,

    #[error("red node has a red child")]
    RedRedViolation,

    #[error("black height differs between sibling subtrees")]
    UnbalancedBlackHeight,

    #[error("child does not link back to its parent")]
    BrokenParentLink,

    #[error("in-order sequence is not sorted")]
    Unordered,

    #[error("reachable node count {reachable} does not match len {len}")]
    SizeMismatch { reachable: usize, len: usize },
}

/// Arena-backed red-black tree ordered by a comparator `C`.
///
/// Nodes live in a [`SlotMap`] and link to each other through [`NodeKey`]s.
/// The tree is an ordered multiset: equal elements are inserted to the right
/// of existing ones.
///
/// Besides the value API (`add`, `remove`, `contains`) the tree exposes node
/// handles (`insert_by`, `remove_node`, `predecessor`, `successor`) for
/// callers whose ordering depends on external state, such as a sweep line.
#[derive(Debug, Clone)]
pub struct RbTree<T, C = NaturalOrder> {
    nodes: SlotMap<NodeKey, Node<T>>,
    root: Option<NodeKey>,
    comparator: C,
}

impl<T: Ord> RbTree<T> {
    /// Creates an empty tree ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Creates an empty tree ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            comparator,
        }
    }

    /// Inserts a value after any equal values and returns its node handle.
    pub fn add(&mut self, value: T) -> NodeKey {
        let (parent, go_left) =
            self.insertion_point(&value, |a, b| self.comparator.compare(a, b));
        self.attach(value, parent, go_left)
    }

    /// Removes one value equal to `value`. Returns whether one was found.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.find(value) {
            Some(key) => self.remove_node(key).is_some(),
            None => false,
        }
    }

    /// Returns whether some stored value compares equal to `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Handle of some node whose value compares equal to `value`.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<NodeKey> {
        let mut cursor = self.root;
        while let Some(key) = cursor {
            let node = &self.nodes[key];
            cursor = match self.comparator.compare(value, &node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(key),
            };
        }
        None
    }

    /// Checks every invariant and returns the black height of the tree.
    ///
    /// Absent children count as black leaves, so an empty tree has black
    /// height 1.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant found.
    pub fn validate(&self) -> Result<usize, TreeInvariantError> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(1)
            } else {
                Err(TreeInvariantError::SizeMismatch {
                    reachable: 0,
                    len: self.nodes.len(),
                })
            };
        };
        if self.nodes[root].color == Color::Red {
            return Err(TreeInvariantError::RedRoot);
        }
        if self.nodes[root].parent.is_some() {
            return Err(TreeInvariantError::BrokenParentLink);
        }
        let height = self.validate_subtree(root)?;

        let mut reachable = 0;
        let mut prev: Option<&T> = None;
        for value in self.iter() {
            if let Some(prev) = prev {
                if self.comparator.compare(prev, value) == Ordering::Greater {
                    return Err(TreeInvariantError::Unordered);
                }
            }
            prev = Some(value);
            reachable += 1;
        }
        if reachable != self.nodes.len() {
            return Err(TreeInvariantError::SizeMismatch {
                reachable,
                len: self.nodes.len(),
            });
        }
        Ok(height)
    }

    fn validate_subtree(&self, key: NodeKey) -> Result<usize, TreeInvariantError> {
        let node = &self.nodes[key];
        for child in [node.left, node.right].into_iter().flatten() {
            if self.nodes[child].parent != Some(key) {
                return Err(TreeInvariantError::BrokenParentLink);
            }
            if node.color == Color::Red && self.nodes[child].color == Color::Red {
                return Err(TreeInvariantError::RedRedViolation);
            }
        }
        let left = match node.left {
            Some(l) => self.validate_subtree(l)?,
            None => 1,
        };
        let right = match node.right {
            Some(r) => self.validate_subtree(r)?,
            None => 1,
        };
        if left != right {
            return Err(TreeInvariantError::UnbalancedBlackHeight);
        }
        Ok(left + usize::from(node.color == Color::Black))
    }
}

impl<T, C> RbTree<T, C> {
    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every value. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Handle of the root node.
    #[must_use]
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    #[must_use]
    pub fn root_value(&self) -> Option<&T> {
        self.root.and_then(|key| self.get(key))
    }

    /// Value stored at `key`, if the handle is live.
    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.nodes.get(key).map(|n| &n.value)
    }

    #[must_use]
    pub fn color(&self, key: NodeKey) -> Option<Color> {
        self.nodes.get(key).map(|n| n.color)
    }

    /// Handle of the smallest value.
    #[must_use]
    pub fn first_key(&self) -> Option<NodeKey> {
        self.root.map(|r| self.min_from(r))
    }

    /// Handle of the largest value.
    #[must_use]
    pub fn last_key(&self) -> Option<NodeKey> {
        self.root.map(|r| self.max_from(r))
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.first_key().and_then(|k| self.get(k))
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.last_key().and_then(|k| self.get(k))
    }

    /// In-order successor of `key`.
    #[must_use]
    pub fn successor(&self, key: NodeKey) -> Option<NodeKey> {
        let node = self.nodes.get(key)?;
        if let Some(right) = node.right {
            return Some(self.min_from(right));
        }
        let mut child = key;
        let mut parent = node.parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    /// In-order predecessor of `key`.
    #[must_use]
    pub fn predecessor(&self, key: NodeKey) -> Option<NodeKey> {
        let node = self.nodes.get(key)?;
        if let Some(left) = node.left {
            return Some(self.max_from(left));
        }
        let mut child = key;
        let mut parent = node.parent;
        while let Some(p) = parent {
            if self.nodes[p].right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    /// Inserts `value` using an explicit ordering instead of the tree's
    /// comparator. Equal values go to the right.
    ///
    /// `cmp` must agree with the order of the values already stored.
    pub fn insert_by(&mut self, value: T, cmp: impl FnMut(&T, &T) -> Ordering) -> NodeKey {
        let (parent, go_left) = self.insertion_point(&value, cmp);
        self.attach(value, parent, go_left)
    }

    /// Removes the value stored at `key` and returns it.
    ///
    /// If the node has two children, the in-order predecessor's value is
    /// moved into `key`'s node and the predecessor's node is unlinked
    /// instead: `key` stays live and now holds that value. In every other
    /// case `key` becomes invalid.
    pub fn remove_node(&mut self, key: NodeKey) -> Option<T> {
        let (left, right) = {
            let node = self.nodes.get(key)?;
            (node.left, node.right)
        };
        let mut target = key;
        if let (Some(left), Some(_)) = (left, right) {
            let pred = self.max_from(left);
            if let Some([a, b]) = self.nodes.get_disjoint_mut([key, pred]) {
                std::mem::swap(&mut a.value, &mut b.value);
            }
            target = pred;
        }

        let (color, parent, child) = {
            let node = &self.nodes[target];
            (node.color, node.parent, node.left.or(node.right))
        };
        if let Some(child) = child {
            // A lone child is always red under a black node.
            self.nodes[child].parent = parent;
            self.replace_child(parent, target, Some(child));
            self.nodes[child].color = Color::Black;
        } else {
            if color == Color::Black && parent.is_some() {
                self.remove_fixup(target);
            }
            let parent = self.nodes[target].parent;
            self.replace_child(parent, target, None);
        }
        self.nodes.remove(target).map(|n| n.value)
    }

    /// Removes and returns the value at the root.
    pub fn remove_root(&mut self) -> Option<T> {
        let root = self.root?;
        self.remove_node(root)
    }

    /// Values in ascending order.
    #[must_use]
    pub fn iter(&self) -> InOrder<'_, T, C> {
        self.iter_in_order()
    }

    #[must_use]
    pub fn iter_in_order(&self) -> InOrder<'_, T, C> {
        InOrder::new(self)
    }

    #[must_use]
    pub fn iter_pre_order(&self) -> PreOrder<'_, T, C> {
        PreOrder::new(self)
    }

    #[must_use]
    pub fn iter_post_order(&self) -> PostOrder<'_, T, C> {
        PostOrder::new(self)
    }

    #[must_use]
    pub fn iter_level_order(&self) -> LevelOrder<'_, T, C> {
        LevelOrder::new(self)
    }

    fn min_from(&self, mut key: NodeKey) -> NodeKey {
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        key
    }

    fn max_from(&self, mut key: NodeKey) -> NodeKey {
        while let Some(right) = self.nodes[key].right {
            key = right;
        }
        key
    }

    fn parent_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes[key].parent
    }

    fn is_red(&self, key: Option<NodeKey>) -> bool {
        key.is_some_and(|k| self.nodes[k].color == Color::Red)
    }

    fn set_color(&mut self, key: NodeKey, color: Color) {
        self.nodes[key].color = color;
    }

    fn insertion_point(
        &self,
        value: &T,
        mut cmp: impl FnMut(&T, &T) -> Ordering,
    ) -> (Option<NodeKey>, bool) {
        let mut parent = None;
        let mut go_left = false;
        let mut cursor = self.root;
        while let Some(key) = cursor {
            let node = &self.nodes[key];
            parent = Some(key);
            go_left = cmp(value, &node.value) == Ordering::Less;
            cursor = if go_left { node.left } else { node.right };
        }
        (parent, go_left)
    }

    fn attach(&mut self, value: T, parent: Option<NodeKey>, go_left: bool) -> NodeKey {
        let key = self.nodes.insert(Node::leaf(value, parent));
        match parent {
            None => self.root = Some(key),
            Some(p) if go_left => self.nodes[p].left = Some(key),
            Some(p) => self.nodes[p].right = Some(key),
        }
        self.insert_fixup(key);
        key
    }

    /// Points `parent`'s link (or the root) at `new` instead of `old`.
    fn replace_child(&mut self, parent: Option<NodeKey>, old: NodeKey, new: Option<NodeKey>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, x: NodeKey) {
        let Some(y) = self.nodes[x].right else {
            return;
        };
        let inner = self.nodes[y].left;
        self.nodes[x].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeKey) {
        let Some(y) = self.nodes[x].left else {
            return;
        };
        let inner = self.nodes[y].right;
        self.nodes[x].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn insert_fixup(&mut self, mut node: NodeKey) {
        while let Some(mut parent) = self.parent_of(node) {
            if self.nodes[parent].color == Color::Black {
                break;
            }
            let Some(grand) = self.parent_of(parent) else {
                break;
            };
            let parent_is_left = self.nodes[grand].left == Some(parent);
            let uncle = if parent_is_left {
                self.nodes[grand].right
            } else {
                self.nodes[grand].left
            };

            if let Some(uncle) = uncle.filter(|&u| self.nodes[u].color == Color::Red) {
                // Red uncle: push the blackness down from the grandparent.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                node = grand;
                continue;
            }

            if parent_is_left {
                if self.nodes[parent].right == Some(node) {
                    self.rotate_left(parent);
                    std::mem::swap(&mut node, &mut parent);
                }
                self.set_color(parent, Color::Black);
                self.set_color(grand, Color::Red);
                self.rotate_right(grand);
            } else {
                if self.nodes[parent].left == Some(node) {
                    self.rotate_right(parent);
                    std::mem::swap(&mut node, &mut parent);
                }
                self.set_color(parent, Color::Black);
                self.set_color(grand, Color::Red);
                self.rotate_left(grand);
            }
            break;
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Resolves the missing black of `node`, a black leaf about to be unlinked.
    fn remove_fixup(&mut self, mut node: NodeKey) {
        while Some(node) != self.root && self.nodes[node].color == Color::Black {
            let Some(parent) = self.parent_of(node) else {
                break;
            };
            let node_is_left = self.nodes[parent].left == Some(node);
            let sibling_of = |tree: &Self| {
                if node_is_left {
                    tree.nodes[parent].right
                } else {
                    tree.nodes[parent].left
                }
            };
            let Some(mut sibling) = sibling_of(self) else {
                node = parent;
                continue;
            };

            if self.nodes[sibling].color == Color::Red {
                // Red sibling: rotate so the new sibling is black.
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                if node_is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                let Some(next) = sibling_of(self) else {
                    node = parent;
                    continue;
                };
                sibling = next;
            }

            let (near, far) = if node_is_left {
                (self.nodes[sibling].left, self.nodes[sibling].right)
            } else {
                (self.nodes[sibling].right, self.nodes[sibling].left)
            };

            if !self.is_red(near) && !self.is_red(far) {
                // Black sibling with black children: move the deficit up.
                self.set_color(sibling, Color::Red);
                node = parent;
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                if node_is_left {
                    self.rotate_right(sibling);
                } else {
                    self.rotate_left(sibling);
                }
                let Some(next) = sibling_of(self) else {
                    break;
                };
                sibling = next;
            }

            let parent_color = self.nodes[parent].color;
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far = if node_is_left {
                self.nodes[sibling].right
            } else {
                self.nodes[sibling].left
            };
            if let Some(far) = far {
                self.set_color(far, Color::Black);
            }
            if node_is_left {
                self.rotate_left(parent);
            } else {
                self.rotate_right(parent);
            }
            break;
        }
        self.set_color(node, Color::Black);
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = InOrder<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    use super::*;

    fn values<T: Clone, C>(tree: &RbTree<T, C>) -> Vec<T> {
        tree.iter().cloned().collect()
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RbTree::new();
        for i in 0..1000 {
            tree.add(i);
            assert!(tree.validate().is_ok(), "invalid after inserting {i}");
        }
        assert_eq!(tree.len(), 1000);
        assert_eq!(values(&tree), (0..1000).collect::<Vec<_>>());
        // Height bound: black height of a 1000-node tree stays small.
        assert!(tree.validate().unwrap() <= 11);
    }

    #[test]
    fn known_shape_traversals() {
        let mut tree = RbTree::new();
        for i in 1..=7 {
            tree.add(i);
        }
        assert_eq!(tree.root_value(), Some(&2));
        assert_eq!(values(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            tree.iter_pre_order().copied().collect::<Vec<_>>(),
            vec![2, 1, 4, 3, 6, 5, 7]
        );
        assert_eq!(
            tree.iter_post_order().copied().collect::<Vec<_>>(),
            vec![1, 3, 5, 7, 6, 4, 2]
        );
        assert_eq!(
            tree.iter_level_order().copied().collect::<Vec<_>>(),
            vec![2, 1, 4, 3, 6, 5, 7]
        );
        let four = tree.find(&4).unwrap();
        assert_eq!(tree.color(four), Some(Color::Red));
    }

    #[test]
    fn random_interleaving_matches_sorted_model() {
        let mut rng = Pcg64::seed_from_u64(42);
        let mut tree = RbTree::new();
        let mut model: Vec<i32> = Vec::new();
        for step in 0..4000 {
            let v = rng.random_range(0..200);
            if rng.random_bool(0.6) {
                tree.add(v);
                let pos = model.partition_point(|&x| x <= v);
                model.insert(pos, v);
            } else {
                let removed = tree.remove(&v);
                let pos = model.iter().position(|&x| x == v);
                assert_eq!(removed, pos.is_some(), "step {step}");
                if let Some(pos) = pos {
                    model.remove(pos);
                }
            }
            assert!(tree.validate().is_ok(), "invalid at step {step}");
            assert_eq!(tree.len(), model.len());
        }
        assert_eq!(values(&tree), model);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut tree = RbTree::new();
        for v in [5, 3, 5, 8, 5] {
            tree.add(v);
        }
        assert_eq!(values(&tree), vec![3, 5, 5, 5, 8]);
        assert!(tree.remove(&5));
        assert_eq!(values(&tree), vec![3, 5, 5, 8]);
        assert!(tree.contains(&5));
        assert!(!tree.remove(&4));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn duplicates_go_right_of_equals() {
        let mut tree = RbTree::with_comparator(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        tree.add((1, 'a'));
        tree.add((0, 'z'));
        tree.add((1, 'b'));
        tree.add((1, 'c'));
        let tags: Vec<char> = tree.iter().map(|v| v.1).collect();
        assert_eq!(tags, vec!['z', 'a', 'b', 'c']);
    }

    #[test]
    fn remove_root_drains_tree() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mut tree = RbTree::new();
        for _ in 0..500 {
            tree.add(rng.random_range(-1000..1000));
        }
        let mut removed = 0;
        while tree.remove_root().is_some() {
            removed += 1;
            assert!(tree.validate().is_ok());
        }
        assert_eq!(removed, 500);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.remove_root().is_none());
    }

    #[test]
    fn reverse_comparator() {
        let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for v in [3, 1, 4, 1, 5, 9, 2, 6] {
            tree.add(v);
        }
        assert_eq!(values(&tree), vec![9, 6, 5, 4, 3, 2, 1, 1]);
        assert_eq!(tree.first(), Some(&9));
        assert_eq!(tree.last(), Some(&1));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn neighbour_handles() {
        let mut tree = RbTree::new();
        let keys: Vec<NodeKey> = (0..10).map(|i| tree.add(i * 10)).collect();
        assert_eq!(tree.successor(keys[3]).and_then(|k| tree.get(k)), Some(&40));
        assert_eq!(tree.predecessor(keys[3]).and_then(|k| tree.get(k)), Some(&20));
        assert!(tree.predecessor(keys[0]).is_none());
        assert!(tree.successor(keys[9]).is_none());
        assert_eq!(tree.first_key(), Some(keys[0]));
        assert_eq!(tree.last_key(), Some(keys[9]));
    }

    #[test]
    fn removing_inner_node_relocates_predecessor() {
        let mut tree = RbTree::new();
        tree.add(1);
        let two = tree.add(2);
        tree.add(3);
        assert_eq!(tree.root(), Some(two));
        assert_eq!(tree.remove_node(two), Some(2));
        assert_eq!(tree.get(two), Some(&1));
        assert_eq!(values(&tree), vec![1, 3]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn removing_leaf_invalidates_handle() {
        let mut tree = RbTree::new();
        tree.add(1);
        tree.add(2);
        let three = tree.add(3);
        assert_eq!(tree.remove_node(three), Some(3));
        assert!(tree.get(three).is_none());
        assert!(tree.remove_node(three).is_none());
    }

    #[test]
    fn insert_by_with_external_order() {
        let weights = [5.0_f64, 1.0, 3.0, 2.0];
        let mut tree: RbTree<usize> = RbTree::new();
        for i in 0..weights.len() {
            tree.insert_by(i, |a, b| weights[*a].total_cmp(&weights[*b]));
        }
        assert_eq!(values(&tree), vec![1, 3, 2, 0]);
    }

    #[test]
    fn clear_resets() {
        let mut tree: RbTree<i32> = (0..5).fold(RbTree::new(), |mut t, v| {
            t.add(v);
            t
        });
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.validate(), Ok(1));
        assert!(tree.iter().next().is_none());
    }
}
