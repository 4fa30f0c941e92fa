//! An ordered multiset backed by an arena allocated red black tree.

#[macro_use]
extern crate log;

pub mod arena;
pub mod red_black_tree;
pub mod sort;
