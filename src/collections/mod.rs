pub mod rbtree;

pub use rbtree::{Color, Comparator, NaturalOrder, NodeKey, RbTree, TreeInvariantError};
