use crate::arena::Handle;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// An enum representing which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a red black tree.
///
/// Equal values share a node. `values` is never empty and its first element is the value used
/// for comparisons.
pub struct Node<T> {
    pub values: Vec<T>,
    pub color: Color,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T> Node<T> {
    pub fn new(value: T, color: Color, parent: Option<Handle>) -> Self {
        Node {
            values: vec![value],
            color,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.values[0]
    }

    pub fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Returns which side `handle` hangs off this node, or `None` if it is not a child.
    pub fn side_of(&self, handle: Handle) -> Option<Side> {
        if self.left == Some(handle) {
            Some(Side::Left)
        } else if self.right == Some(handle) {
            Some(Side::Right)
        } else {
            None
        }
    }
}
