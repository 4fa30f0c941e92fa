use crate::arena::Handle;
use crate::red_black_tree::node::{Color, Side};
use crate::red_black_tree::tree::Tree;

/// The nodes surrounding a double black node that decide how it is resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Family {
    pub node: Handle,
    pub parent: Handle,
    pub sibling: Handle,
    /// Side of `parent` that `node` hangs off.
    pub side: Side,
}

/// Classification of a double black node. Exactly one variant applies to any node, and the
/// variants are tested in declaration order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DoubleBlack {
    /// The deficiency reached the root, where it disappears.
    Root,
    /// Red sibling. Rotating it above the parent gives the node a black sibling.
    RedSibling(Family),
    /// Black parent, black sibling and black nephews. The deficiency moves to the parent.
    BlackParent(Family),
    /// Red parent, black sibling and black nephews. Swapping the two colors resolves it.
    RedParent(Family),
    /// Black sibling whose only red child is the near nephew.
    RedNearNephew(Family),
    /// Black sibling with a red far nephew.
    RedFarNephew(Family),
}

/// What the double black loop does after resolving one case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    Done,
    Continue(Handle),
}

impl<T> Tree<T> {
    /// Restores the coloring invariants after `node` was attached as a red leaf.
    pub fn balance_insertion(&mut self, mut node: Handle) {
        while let Some(parent) = self.parent(node) {
            if !self.is_red(Some(node)) || !self.is_red(Some(parent)) {
                break;
            }

            let grandparent = self
                .parent(parent)
                .expect("Expected a red node to have a parent.");
            let parent_side = self
                .side(parent)
                .expect("Expected a red node to have a parent.");
            let uncle = self.arena[grandparent].child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|uncle| self.is_red(Some(*uncle))) {
                trace!("insertion: recoloring below {:?}", grandparent);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let node_side = self.side(node).expect("Expected node to have a parent.");
            node = if node_side == parent_side {
                trace!("insertion: straight rotation at {:?}", grandparent);
                self.swap_colors(parent, grandparent);
                self.rotate(grandparent, parent_side.opposite());
                parent
            } else {
                trace!("insertion: zig-zag rotation at {:?}", grandparent);
                self.rotate(parent, parent_side);
                self.swap_colors(node, grandparent);
                self.rotate(grandparent, parent_side.opposite());
                node
            };
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    pub fn classify_double_black(&self, node: Handle) -> DoubleBlack {
        let parent = match self.parent(node) {
            None => return DoubleBlack::Root,
            Some(parent) => parent,
        };
        let side = self.side(node).expect("Expected node to have a parent.");
        // A node that lost a black has a black height of at least one on its sibling's side.
        let sibling = self
            .sibling(node)
            .expect("Expected a double black node to have a sibling.");
        let family = Family {
            node,
            parent,
            sibling,
            side,
        };

        let near = self.arena[sibling].child(side);
        let far = self.arena[sibling].child(side.opposite());
        let black_nephews = !self.is_red(near) && !self.is_red(far);

        if self.is_red(Some(sibling)) {
            debug_assert!(!self.is_red(Some(parent)) && black_nephews);
            DoubleBlack::RedSibling(family)
        } else if black_nephews && !self.is_red(Some(parent)) {
            DoubleBlack::BlackParent(family)
        } else if black_nephews {
            DoubleBlack::RedParent(family)
        } else if !self.is_red(far) {
            DoubleBlack::RedNearNephew(family)
        } else {
            DoubleBlack::RedFarNephew(family)
        }
    }

    /// Resolves one case for the double black `node`.
    pub fn handle_double_black(&mut self, node: Handle) -> Step {
        let case = self.classify_double_black(node);
        trace!("double black at {:?}: {:?}", node, case);

        match case {
            DoubleBlack::Root => {
                self.set_color(node, Color::Black);
                Step::Done
            },
            DoubleBlack::RedSibling(Family {
                node,
                parent,
                sibling,
                side,
            }) => {
                self.swap_colors(parent, sibling);
                self.rotate(parent, side);
                Step::Continue(node)
            },
            DoubleBlack::BlackParent(Family { parent, sibling, .. }) => {
                self.set_color(sibling, Color::Red);
                Step::Continue(parent)
            },
            DoubleBlack::RedParent(Family { parent, sibling, .. }) => {
                self.swap_colors(parent, sibling);
                Step::Done
            },
            DoubleBlack::RedNearNephew(Family {
                node,
                sibling,
                side,
                ..
            }) => {
                let near = self.arena[sibling]
                    .child(side)
                    .expect("Expected a red near nephew.");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                Step::Continue(node)
            },
            DoubleBlack::RedFarNephew(Family {
                parent,
                sibling,
                side,
                ..
            }) => {
                let far = self.arena[sibling]
                    .child(side.opposite())
                    .expect("Expected a red far nephew.");
                self.set_color(far, Color::Black);
                self.swap_colors(parent, sibling);
                self.rotate(parent, side);
                Step::Done
            },
        }
    }

    /// Runs the double black cases from `node` upwards until one of them terminates.
    pub fn fix_double_black(&mut self, node: Handle) {
        let mut step = Step::Continue(node);
        while let Step::Continue(node) = step {
            step = self.handle_double_black(node);
        }
    }
}
