use std::collections::VecDeque;

use super::{NodeKey, RbTree};

/// Ascending traversal following successor links.
#[derive(Debug)]
pub struct InOrder<'a, T, C> {
    tree: &'a RbTree<T, C>,
    next: Option<NodeKey>,
    remaining: usize,
}

impl<'a, T, C> InOrder<'a, T, C> {
    pub(super) fn new(tree: &'a RbTree<T, C>) -> Self {
        Self {
            tree,
            next: tree.first_key(),
            remaining: tree.len(),
        }
    }
}

impl<'a, T, C> Iterator for InOrder<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        self.next = self.tree.successor(key);
        self.remaining = self.remaining.saturating_sub(1);
        self.tree.get(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Node, then left subtree, then right subtree.
#[derive(Debug)]
pub struct PreOrder<'a, T, C> {
    tree: &'a RbTree<T, C>,
    stack: Vec<NodeKey>,
}

impl<'a, T, C> PreOrder<'a, T, C> {
    pub(super) fn new(tree: &'a RbTree<T, C>) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T, C> Iterator for PreOrder<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.stack.pop()?;
        let node = &self.tree.nodes[key];
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(&node.value)
    }
}

/// Left subtree, then right subtree, then node.
///
/// Walks parent links, so no auxiliary stack is kept.
#[derive(Debug)]
pub struct PostOrder<'a, T, C> {
    tree: &'a RbTree<T, C>,
    next: Option<NodeKey>,
}

impl<'a, T, C> PostOrder<'a, T, C> {
    pub(super) fn new(tree: &'a RbTree<T, C>) -> Self {
        Self {
            tree,
            next: tree.root.map(|r| Self::first_leaf(tree, r)),
        }
    }

    /// Descends preferring left children until a leaf is reached.
    fn first_leaf(tree: &RbTree<T, C>, mut key: NodeKey) -> NodeKey {
        loop {
            let node = &tree.nodes[key];
            match (node.left, node.right) {
                (Some(l), _) => key = l,
                (None, Some(r)) => key = r,
                (None, None) => return key,
            }
        }
    }
}

impl<'a, T, C> Iterator for PostOrder<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        let node = &self.tree.nodes[key];
        self.next = node.parent.map(|p| {
            let parent = &self.tree.nodes[p];
            match parent.right {
                Some(r) if parent.left == Some(key) => Self::first_leaf(self.tree, r),
                _ => p,
            }
        });
        Some(&node.value)
    }
}

/// Breadth-first traversal, left to right within each level.
#[derive(Debug)]
pub struct LevelOrder<'a, T, C> {
    tree: &'a RbTree<T, C>,
    queue: VecDeque<NodeKey>,
}

impl<'a, T, C> LevelOrder<'a, T, C> {
    pub(super) fn new(tree: &'a RbTree<T, C>) -> Self {
        Self {
            tree,
            queue: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T, C> Iterator for LevelOrder<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.queue.pop_front()?;
        let node = &self.tree.nodes[key];
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some(&node.value)
    }
}
