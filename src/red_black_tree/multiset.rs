use crate::arena::{Handle, TypedArena};
use crate::red_black_tree::node::Node;
use crate::red_black_tree::tree::Tree;
use crate::red_black_tree::{Error, Result, Violation};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;
use std::slice;
use std::vec;

/// Number of nodes allocated per arena chunk by `RedBlackTree::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered multiset implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black.
/// The root is black, no red node has a red child, and every path from a node to an absent child
/// passes through the same number of black nodes, which keeps the height within twice the
/// logarithm of the number of nodes. Equal values share a node, and each one is counted.
///
/// # Examples
///
/// ```
/// use rb_multiset::red_black_tree::{Error, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(5);
/// tree.insert(3);
/// tree.insert(3);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.min(), Ok(&3));
/// assert_eq!(tree.max(), Ok(&5));
///
/// assert_eq!(tree.remove(&3), Ok(3));
/// assert!(tree.contains(&3));
/// assert_eq!(tree.remove(&4), Err(Error::NotFound));
/// ```
pub struct RedBlackTree<T> {
    tree: Tree<T>,
    len: usize,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackTree<T>` whose arena allocates `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::with_chunk_size(64);
    /// assert_eq!(tree.chunk_size(), 64);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackTree {
            tree: Tree::new(chunk_size),
            len: 0,
        }
    }

    /// Returns the number of nodes allocated per arena chunk.
    pub fn chunk_size(&self) -> usize {
        self.tree.arena.chunk_size()
    }

    /// Inserts a value into the tree. Values equal to one already in the tree are kept alongside
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.count_of(&1), 2);
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        self.tree.insert(value);
        self.len += 1;
    }

    /// Removes one copy of a value from the tree and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyTree` if the tree is empty and `Error::NotFound` if the value is not
    /// in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::{Error, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.remove(&1), Err(Error::EmptyTree));
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&2), Err(Error::NotFound));
    /// assert_eq!(tree.remove(&1), Ok(1));
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Result<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        let ret = self.tree.remove(key).ok_or(Error::NotFound)?;
        self.len -= 1;
        Ok(ret)
    }

    /// Checks if a value exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key).is_some()
    }

    /// Returns the number of copies of a value in the tree.
    pub fn count_of<V>(&self, key: &V) -> usize
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .find(key)
            .map_or(0, |handle| self.tree.arena[handle].values.len())
    }

    /// Returns the minimum value of the tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyTree` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&T> {
        self.tree
            .min()
            .map(|handle| self.tree.arena[handle].value())
            .ok_or(Error::EmptyTree)
    }

    /// Returns the maximum value of the tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyTree` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.max(), Ok(&3));
    /// ```
    pub fn max(&self) -> Result<&T> {
        self.tree
            .max()
            .map(|handle| self.tree.arena[handle].value())
            .ok_or(Error::EmptyTree)
    }

    /// Removes one copy of the minimum value and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyTree` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    /// assert_eq!(tree.pop_min(), Ok(1));
    /// assert_eq!(tree.pop_min(), Ok(3));
    /// assert!(tree.pop_min().is_err());
    /// ```
    pub fn pop_min(&mut self) -> Result<T> {
        let handle = self.tree.min().ok_or(Error::EmptyTree)?;
        let ret = self.tree.remove_at(handle);
        self.len -= 1;
        Ok(ret)
    }

    /// Removes one copy of the maximum value and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyTree` if the tree is empty.
    pub fn pop_max(&mut self) -> Result<T> {
        let handle = self.tree.max().ok_or(Error::EmptyTree)?;
        let ret = self.tree.remove_at(handle);
        self.len -= 1;
        Ok(ret)
    }

    /// Returns the number of values in the tree, counting every copy.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of edges on the longest path from the root to a leaf. An empty tree
    /// has a height of `-1` and a single node a height of `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.height(), -1);
    ///
    /// for value in 0..1000 {
    ///     tree.insert(value);
    /// }
    /// assert!(tree.height() <= 20);
    /// ```
    pub fn height(&self) -> isize {
        self.tree.height()
    }

    /// Clears the tree, removing all values.
    pub fn clear(&mut self) {
        self.tree = Tree::new(self.chunk_size());
        self.len = 0;
    }

    /// Checks the ordering, coloring, linking and counting invariants of the tree. Returns the
    /// number of black nodes on every path from the root to an absent child.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = (0..100).collect();
    /// assert!(tree.verify().is_ok());
    /// ```
    pub fn verify(&self) -> result::Result<usize, Violation>
    where
        T: Ord,
    {
        let (black_height, values) = self.tree.verify()?;
        if values != self.len {
            return Err(Violation::CountMismatch);
        }
        Ok(black_height)
    }

    /// Returns an iterator over the tree. The iterator yields every value, copies included,
    /// using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackTreeIter<'_, T> {
        let empty: &[T] = &[];
        let mut ret = RedBlackTreeIter {
            arena: &self.tree.arena,
            stack: Vec::new(),
            values: empty.iter(),
            remaining: self.len,
        };
        ret.push_left(self.tree.root);
        ret
    }
}

impl<T> IntoIterator for RedBlackTree<T> {
    type IntoIter = RedBlackTreeIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            values: self.tree.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = RedBlackTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the values of the tree in-order and yields owned values.
pub struct RedBlackTreeIntoIter<T> {
    values: vec::IntoIter<T>,
}

impl<T> Iterator for RedBlackTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> DoubleEndedIterator for RedBlackTreeIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.values.next_back()
    }
}

impl<T> ExactSizeIterator for RedBlackTreeIntoIter<T> {}

/// An iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the values of the tree in-order and yields immutable references.
pub struct RedBlackTreeIter<'a, T> {
    arena: &'a TypedArena<Node<T>>,
    stack: Vec<Handle>,
    values: slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> RedBlackTreeIter<'a, T> {
    fn push_left(&mut self, mut curr: Option<Handle>) {
        while let Some(handle) = curr {
            self.stack.push(handle);
            curr = self.arena[handle].left;
        }
    }
}

impl<'a, T> Iterator for RedBlackTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.values.next() {
                self.remaining -= 1;
                return Some(value);
            }

            let handle = self.stack.pop()?;
            let arena = self.arena;
            let node = &arena[handle];
            self.values = node.values.iter();
            self.push_left(node.right);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for RedBlackTreeIter<'a, T> where T: 'a {}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut ret = Self::new();
        ret.extend(iter);
        ret
    }
}

impl<T> Extend<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> Clone for RedBlackTree<T>
where
    T: Clone + Ord,
{
    fn clone(&self) -> Self {
        let mut ret = Self::with_chunk_size(self.chunk_size());
        ret.extend(self.iter().cloned());
        ret
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for RedBlackTree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackTree<T> where T: Eq {}

impl<T> Serialize for RedBlackTree<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct RedBlackTreeVisitor<T> {
    marker: PhantomData<fn() -> RedBlackTree<T>>,
}

impl<'de, T> Visitor<'de> for RedBlackTreeVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = RedBlackTree<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a sequence of values")
    }

    fn visit_seq<A>(self, mut access: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut ret = RedBlackTree::new();
        while let Some(value) = access.next_element()? {
            ret.insert(value);
        }
        Ok(ret)
    }
}

impl<'de, T> Deserialize<'de> for RedBlackTree<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackTreeVisitor {
            marker: PhantomData,
        })
    }
}
