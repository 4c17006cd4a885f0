use tracing::trace;

use crate::geometry::{Aabb, Quadrant};

use super::Collidable;

/// Construction parameters for a [`Quadtree`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadtreeConfig {
    /// Region covered by the root node.
    pub region: Aabb,
    /// Deepest level at which nodes are created; the root is depth 0.
    pub max_depth: usize,
}

impl QuadtreeConfig {
    /// Depth used when none is given.
    pub const DEFAULT_MAX_DEPTH: usize = 8;

    /// Creates a config covering `region` with the default depth.
    #[must_use]
    pub fn new(region: Aabb) -> Self {
        Self {
            region,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the maximum depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Broad-phase spatial index over [`Collidable`] entities.
///
/// Every entry lives at the shallowest node whose region fully contains its
/// bounding box, or at `max_depth` once recursion is exhausted. Entries that
/// straddle a quadrant boundary stay at the ancestor. Children are created
/// lazily.
///
/// The tree has no incremental update; rebuild it whenever the entities move.
#[derive(Debug)]
pub struct Quadtree<T> {
    root: Node<T>,
    max_depth: usize,
    len: usize,
}

#[derive(Debug)]
struct Node<T> {
    bounds: Aabb,
    depth: usize,
    children: [Option<Box<Node<T>>>; 4],
    entries: Vec<T>,
}

impl<T: Collidable> Quadtree<T> {
    /// Creates an empty tree covering `region`.
    #[must_use]
    pub fn new(region: Aabb, max_depth: usize) -> Self {
        Self::with_config(QuadtreeConfig { region, max_depth })
    }

    /// Creates an empty tree from a config.
    #[must_use]
    pub fn with_config(config: QuadtreeConfig) -> Self {
        Self {
            root: Node::new(config.region, 0),
            max_depth: config.max_depth,
            len: 0,
        }
    }

    /// Creates a tree and inserts every entity, dropping rejected ones.
    pub fn build(config: QuadtreeConfig, entities: impl IntoIterator<Item = T>) -> Self {
        let mut tree = Self::with_config(config);
        for entity in entities {
            tree.insert(entity);
        }
        tree
    }

    /// Inserts an entity.
    ///
    /// Returns `false` without storing anything if the entity is destroyed
    /// or its box lies completely outside the root region.
    pub fn insert(&mut self, entity: T) -> bool {
        if entity.is_destroyed() {
            trace!("quadtree insert skipped: entity destroyed");
            return false;
        }
        let aabb = entity.bounding_box();
        if !self.root.bounds.intersects(&aabb) {
            trace!(?aabb, "quadtree insert skipped: outside region");
            return false;
        }
        self.root.insert(entity, &aabb, self.max_depth);
        self.len += 1;
        true
    }

    /// Returns candidate neighbours for `target`.
    ///
    /// Collects the entries of each visited node, descending only into the
    /// first existing child (NW, NE, SW, SE order) whose region intersects the
    /// target box. Entries in other intersecting siblings are not reported;
    /// use [`Quadtree::query_all`] for a complete candidate set.
    ///
    /// The result may contain `target` itself if it was inserted.
    #[must_use]
    pub fn query<Q: Collidable + ?Sized>(&self, target: &Q) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(aabb) = self.target_box(target) {
            self.root.query_first(&aabb, &mut out);
        }
        out
    }

    /// Like [`Quadtree::query`] but descends into every intersecting child.
    #[must_use]
    pub fn query_all<Q: Collidable + ?Sized>(&self, target: &Q) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(aabb) = self.target_box(target) {
            self.root.query_every(&aabb, &mut out);
        }
        out
    }

    fn target_box<Q: Collidable + ?Sized>(&self, target: &Q) -> Option<Aabb> {
        if target.is_destroyed() {
            return None;
        }
        let aabb = target.bounding_box();
        self.root.bounds.intersects(&aabb).then_some(aabb)
    }
}

impl<T> Quadtree<T> {
    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Region covered by the root node.
    #[must_use]
    pub fn region(&self) -> &Aabb {
        &self.root.bounds
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Removes every entry and child node, keeping the region.
    pub fn clear(&mut self) {
        self.root = Node::new(self.root.bounds, 0);
        self.len = 0;
    }

    /// Number of allocated nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Depth of the node holding the first entry matching `pred`.
    #[must_use]
    pub fn depth_of(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.entries.iter().any(&mut pred) {
                return Some(node.depth);
            }
            stack.extend(node.children.iter().flatten().map(|c| &**c));
        }
        None
    }

    /// Iterates over every stored entry, in no particular order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        let empty: &[T] = &[];
        Iter {
            stack: vec![&self.root],
            current: empty.iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Quadtree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over all entries of a [`Quadtree`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    current: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(entry);
            }
            let node = self.stack.pop()?;
            self.stack
                .extend(node.children.iter().flatten().map(|c| &**c));
            self.current = node.entries.iter();
        }
    }
}

impl<T> Node<T> {
    fn new(bounds: Aabb, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            children: Default::default(),
            entries: Vec::new(),
        }
    }

    fn insert(&mut self, entity: T, aabb: &Aabb, max_depth: usize) {
        if self.depth < max_depth {
            let child_depth = self.depth + 1;
            for quadrant in Quadrant::ALL {
                let region = self.bounds.quadrant(quadrant);
                if region.contains(aabb) {
                    let child = self.children[quadrant.index()]
                        .get_or_insert_with(|| Box::new(Node::new(region, child_depth)));
                    child.insert(entity, aabb, max_depth);
                    return;
                }
            }
        }
        self.entries.push(entity);
    }

    fn query_first<'a>(&'a self, aabb: &Aabb, out: &mut Vec<&'a T>) {
        out.extend(self.entries.iter());
        if let Some(child) = self
            .children
            .iter()
            .flatten()
            .find(|c| c.bounds.intersects(aabb))
        {
            child.query_first(aabb, out);
        }
    }

    fn query_every<'a>(&'a self, aabb: &Aabb, out: &mut Vec<&'a T>) {
        out.extend(self.entries.iter());
        for child in self.children.iter().flatten() {
            if child.bounds.intersects(aabb) {
                child.query_every(aabb, out);
            }
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.node_count())
            .sum::<usize>()
    }
}
