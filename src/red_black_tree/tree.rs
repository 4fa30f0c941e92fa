use crate::arena::{Handle, TypedArena};
use crate::red_black_tree::node::{Color, Node, Side};
use crate::red_black_tree::Violation;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;
use std::result;

/// The node graph of a red black tree.
///
/// Nodes live in an arena and refer to each other through handles, so parent links need no
/// ownership. This layer owns topology and coloring; element counting is left to the caller.
pub struct Tree<T> {
    pub arena: TypedArena<Node<T>>,
    pub root: Option<Handle>,
}

impl<T> Tree<T> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
        }
    }

    pub fn is_red(&self, handle: Option<Handle>) -> bool {
        self.color(handle) == Color::Red
    }

    /// Absent children count as black.
    pub fn color(&self, handle: Option<Handle>) -> Color {
        match handle {
            None => Color::Black,
            Some(handle) => self.arena[handle].color,
        }
    }

    pub fn set_color(&mut self, handle: Handle, color: Color) {
        self.arena[handle].color = color;
    }

    pub fn swap_colors(&mut self, a: Handle, b: Handle) {
        let color = self.arena[a].color;
        self.arena[a].color = self.arena[b].color;
        self.arena[b].color = color;
    }

    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        self.arena[handle].parent
    }

    /// Returns the side of its parent that `handle` hangs off, or `None` for the root.
    pub fn side(&self, handle: Handle) -> Option<Side> {
        self.parent(handle).map(|parent| {
            self.arena[parent]
                .side_of(handle)
                .expect("Expected node to be a child of its parent.")
        })
    }

    pub fn sibling(&self, handle: Handle) -> Option<Handle> {
        let parent = self.parent(handle)?;
        let side = self.side(handle)?;
        self.arena[parent].child(side.opposite())
    }

    /// Points the slot that held `old` at `new`, updating both directions of the link. A `None`
    /// parent means `old` was the root.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.arena[parent]
                    .side_of(old)
                    .expect("Expected node to be a child of its parent.");
                *self.arena[parent].child_mut(side) = new;
            },
        }
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    /// Rotates the subtree rooted at `handle` towards `side`. The child on the opposite side
    /// takes the place of `handle`, which becomes that child's `side` child. Colors are left
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if `handle` has no child on the opposite side.
    pub fn rotate(&mut self, handle: Handle, side: Side) {
        let child = self.arena[handle]
            .child(side.opposite())
            .expect("Expected a child to rotate into place.");
        trace!("rotating {:?} towards {:?}", handle, side);

        let inner = self.arena[child].child(side);
        *self.arena[handle].child_mut(side.opposite()) = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }

        let parent = self.arena[handle].parent;
        self.replace_child(parent, handle, Some(child));

        *self.arena[child].child_mut(side) = Some(handle);
        self.arena[handle].parent = Some(child);
    }

    /// Follows `side` links from `handle` until there are none left.
    pub fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.arena[handle].child(side) {
            handle = child;
        }
        handle
    }

    pub fn min(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    pub fn max(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    pub fn find<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.value().borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns the number of edges on the longest root to leaf path, or `-1` for an empty tree.
    pub fn height(&self) -> isize {
        let mut height = -1;
        let mut stack: Vec<(Handle, isize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[handle];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Inserts `value` and returns the handle of the node that holds it.
    pub fn insert(&mut self, value: T) -> Handle
    where
        T: Ord,
    {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                let root = self.arena.allocate(Node::new(value, Color::Black, None));
                self.root = Some(root);
                return root;
            },
        };

        loop {
            let side = match value.cmp(self.arena[curr].value()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    self.arena[curr].values.push(value);
                    return curr;
                },
            };

            match self.arena[curr].child(side) {
                Some(child) => curr = child,
                None => {
                    let new_node = self.arena.allocate(Node::new(value, Color::Red, Some(curr)));
                    *self.arena[curr].child_mut(side) = Some(new_node);
                    self.balance_insertion(new_node);
                    return new_node;
                },
            }
        }
    }

    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find(key).map(|handle| self.remove_at(handle))
    }

    /// Removes one value from the node at `handle`, destroying the node when it held the last
    /// copy.
    pub fn remove_at(&mut self, handle: Handle) -> T {
        if self.arena[handle].values.len() > 1 {
            return self.arena[handle]
                .values
                .pop()
                .expect("Expected node to hold a value.");
        }

        let node = &self.arena[handle];
        let target = match (node.left, node.right) {
            (Some(left), Some(_)) => {
                // Move the in-order predecessor's values up, then unlink the predecessor, which
                // has no right child.
                let predecessor = self.extreme(left, Side::Right);
                let values = mem::replace(&mut self.arena[predecessor].values, Vec::new());
                let values = mem::replace(&mut self.arena[handle].values, values);
                self.arena[predecessor].values = values;
                predecessor
            },
            _ => handle,
        };

        self.unlink(target);
        self.arena
            .free(&target)
            .values
            .pop()
            .expect("Expected node to hold a value.")
    }

    /// Detaches a node with at most one child from the tree and restores the coloring
    /// invariants. The node stays allocated.
    fn unlink(&mut self, handle: Handle) {
        let node = &self.arena[handle];
        let color = node.color;
        let parent = node.parent;

        match node.left.or(node.right) {
            Some(child) => {
                debug!("splicing {:?} out in favor of its child {:?}", handle, child);
                self.replace_child(parent, handle, Some(child));
                if color == Color::Black {
                    if self.is_red(Some(child)) {
                        self.set_color(child, Color::Black);
                    } else {
                        self.fix_double_black(child);
                    }
                }
            },
            None => {
                debug!("detaching leaf {:?}", handle);
                // A black leaf is rebalanced while it still occupies its slot, so the fixup can
                // see its parent and sibling.
                if color == Color::Black {
                    self.fix_double_black(handle);
                }
                let parent = self.parent(handle);
                self.replace_child(parent, handle, None);
            },
        }
    }

    /// Drops every node and returns all values in order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut ret = Vec::with_capacity(self.arena.len());
        let mut stack = Vec::new();
        let mut curr = self.root.take();
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = self.arena[handle].left;
            }
            match stack.pop() {
                None => break,
                Some(handle) => {
                    let node = self.arena.free(&handle);
                    curr = node.right;
                    ret.extend(node.values);
                },
            }
        }
        ret
    }

    /// Checks every structural and coloring invariant. Returns the number of black nodes on each
    /// root to leaf path and the number of stored values.
    pub fn verify(&self) -> result::Result<(usize, usize), Violation>
    where
        T: Ord,
    {
        let root = match self.root {
            None => return Ok((0, 0)),
            Some(root) => root,
        };
        let root_node = self.arena.get(&root).ok_or(Violation::DanglingLink)?;
        if root_node.color == Color::Red {
            return Err(Violation::RedRoot);
        }

        let mut values = 0;
        let black_height = self.verify_subtree(Some(root), None, None, None, &mut values)?;
        Ok((black_height, values))
    }

    fn verify_subtree(
        &self,
        handle: Option<Handle>,
        parent: Option<Handle>,
        lower: Option<&T>,
        upper: Option<&T>,
        values: &mut usize,
    ) -> result::Result<usize, Violation>
    where
        T: Ord,
    {
        let handle = match handle {
            None => return Ok(0),
            Some(handle) => handle,
        };
        let node = self.arena.get(&handle).ok_or(Violation::DanglingLink)?;
        if node.parent != parent {
            return Err(Violation::AsymmetricLink);
        }
        if node.values.is_empty() {
            return Err(Violation::EmptyNode);
        }

        let value = node.value();
        if node.values.iter().any(|other| other.cmp(value) != Ordering::Equal)
            || lower.map_or(false, |lower| value <= lower)
            || upper.map_or(false, |upper| value >= upper)
        {
            return Err(Violation::Unordered);
        }

        let red_child = |child: Option<Handle>| {
            child
                .and_then(|child| self.arena.get(&child))
                .map_or(false, |child| child.color == Color::Red)
        };
        if node.color == Color::Red && (red_child(node.left) || red_child(node.right)) {
            return Err(Violation::RedRed);
        }

        *values += node.values.len();
        let left = self.verify_subtree(node.left, Some(handle), lower, Some(value), values)?;
        let right = self.verify_subtree(node.right, Some(handle), Some(value), upper, values)?;
        if left != right {
            return Err(Violation::BlackHeight);
        }

        match node.color {
            Color::Black => Ok(left + 1),
            Color::Red => Ok(left),
        }
    }
}
