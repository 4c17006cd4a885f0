slotmap::new_key_type! {
    /// Stable handle to a node in an [`RbTree`](super::RbTree).
    pub struct NodeKey;
}

/// Node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A tree node; links are keys into the owning tree's arena.
#[derive(Debug, Clone)]
pub(super) struct Node<T> {
    pub(super) value: T,
    pub(super) color: Color,
    pub(super) parent: Option<NodeKey>,
    pub(super) left: Option<NodeKey>,
    pub(super) right: Option<NodeKey>,
}

impl<T> Node<T> {
    pub(super) fn leaf(value: T, parent: Option<NodeKey>) -> Self {
        Self {
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }
}
