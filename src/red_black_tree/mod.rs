//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes are stored in a `TypedArena` and linked to their parents and children with handles.
//! Every value is kept, so equal values accumulate in a single node and count separately.

mod fixup;
mod multiset;
mod node;
mod tree;

pub use self::multiset::{RedBlackTree, RedBlackTreeIntoIter, RedBlackTreeIter, DEFAULT_CHUNK_SIZE};

use std::error;
use std::fmt;
use std::result;

/// An enum representing the ways an operation on a `RedBlackTree<T>` can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The operation needs at least one value, but the tree is empty.
    EmptyTree,
    /// The requested value is not in the tree.
    NotFound,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTree => write!(f, "the tree is empty"),
            Error::NotFound => write!(f, "the value does not exist in the tree"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// An enum representing a broken invariant found by `RedBlackTree::verify`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    /// A value is on the wrong side of an ancestor, or a node holds unequal values.
    Unordered,
    /// The root is red.
    RedRoot,
    /// A red node has a red child.
    RedRed,
    /// Two paths from the same node reach absent children through different numbers of black
    /// nodes.
    BlackHeight,
    /// A child's parent link does not point back at the node that links to it.
    AsymmetricLink,
    /// A link refers to a freed node.
    DanglingLink,
    /// A node holds no values.
    EmptyNode,
    /// The number of stored values differs from the tree's count.
    CountMismatch,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            Violation::Unordered => "values are out of order",
            Violation::RedRoot => "the root is red",
            Violation::RedRed => "a red node has a red child",
            Violation::BlackHeight => "black heights differ between paths",
            Violation::AsymmetricLink => "parent and child links disagree",
            Violation::DanglingLink => "a link refers to a freed node",
            Violation::EmptyNode => "a node holds no values",
            Violation::CountMismatch => "the count differs from the number of stored values",
        };
        write!(f, "{}", description)
    }
}

impl error::Error for Violation {}
