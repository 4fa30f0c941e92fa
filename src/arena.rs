//! Chunked slab allocator that hands out copyable handles instead of references.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A stable, non-owning reference to an object stored in a `TypedArena<T>`.
///
/// Handles stay valid until the object they refer to is freed. Copying a handle never copies the
/// object, so handles can be stored freely in cyclic structures such as parent links.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator for a single type of object.
///
/// Objects are stored in fixed size chunks, so growing the arena never moves existing objects.
/// Freed blocks are threaded onto a free list and reused by later allocations. Every object is
/// dropped when the arena is dropped.
///
/// # Examples
///
/// ```
/// use rb_multiset::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, handle: &Handle) -> Option<&Block<T>> {
        self.chunks
            .get(handle.chunk_index)
            .and_then(|chunk| chunk.get(handle.block_index))
    }

    fn block_mut(&mut self, handle: &Handle) -> Option<&mut Block<T>> {
        self.chunks
            .get_mut(handle.chunk_index)
            .and_then(|chunk| chunk.get_mut(handle.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` that stores `chunk_size` objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert_eq!(arena.chunk_size(), 1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Moves `value` into the arena and returns the handle that refers to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;

        if let Some(handle) = self.head.take() {
            let block = self
                .block_mut(&handle)
                .expect("Expected free list to point inside the arena.");
            match mem::replace(block, Block::Occupied(value)) {
                Block::Vacant(next) => self.head = next,
                Block::Occupied(_) => panic!("Expected free list to point at a vacant block."),
            }
            return handle;
        }

        if self.len > self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Block::Occupied(value));
        Handle {
            chunk_index,
            block_index: chunk.len() - 1,
        }
    }

    /// Removes the object referred to by `handle` from the arena and returns it. The block is
    /// reused by a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is out of bounds or refers to a block that was already freed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// assert_eq!(arena.get(&x), None);
    /// ```
    pub fn free(&mut self, handle: &Handle) -> T {
        let head = self.head;
        let block = self
            .block_mut(handle)
            .expect("Error: attempting to free invalid block.");
        match mem::replace(block, Block::Vacant(head)) {
            Block::Vacant(next) => {
                // Undo the write so the free list stays intact before failing.
                *block = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(*handle);
                value
            },
        }
    }

    /// Returns an immutable reference to the object referred to by `handle`, or `None` if the
    /// handle is out of bounds or its block was freed.
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self.block(handle) {
            Some(Block::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object referred to by `handle`, or `None` if the
    /// handle is out of bounds or its block was freed.
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        match self.block_mut(handle) {
            Some(Block::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects stored per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle refers to a vacant or invalid block.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle)
            .expect("Error: handle refers to a vacant or invalid block.")
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;
    use super::TypedArena;

    #[test]
    #[should_panic]
    fn test_zero_chunk_size() {
        let _arena: TypedArena<u32> = TypedArena::new(0);
    }

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(16);
        arena.free(&Handle {
            chunk_index: 0,
            block_index: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(16);
        let handle = arena.allocate(0);
        arena.free(&handle);
        arena.free(&handle);
    }

    #[test]
    fn test_allocate_fills_chunks_in_order() {
        let mut arena = TypedArena::new(2);
        let handles: Vec<Handle> = (0..3).map(|i| arena.allocate(i)).collect();
        assert_eq!(
            handles,
            vec![
                Handle { chunk_index: 0, block_index: 0 },
                Handle { chunk_index: 0, block_index: 1 },
                Handle { chunk_index: 1, block_index: 0 },
            ],
        );
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_block() {
        let mut arena = TypedArena::new(2);
        let a = arena.allocate('a');
        let b = arena.allocate('b');
        let c = arena.allocate('c');

        assert_eq!(arena.free(&b), 'b');
        assert_eq!(arena.free(&a), 'a');
        assert_eq!(arena.len(), 1);

        // Most recently freed block is handed out first.
        assert_eq!(arena.allocate('d'), a);
        assert_eq!(arena.allocate('e'), b);
        assert_eq!(arena[c], 'c');
        assert_eq!(arena.len(), 3);

        // Free list exhausted and the arena is at capacity, so a new chunk is opened.
        assert_eq!(arena.allocate('f'), Handle { chunk_index: 1, block_index: 1 });
        assert_eq!(
            arena.allocate('g'),
            Handle { chunk_index: 2, block_index: 0 },
        );
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = TypedArena::new(16);
        let handle = arena.allocate(0);
        arena.free(&handle);
        assert_eq!(arena.get(&handle), None);
        assert_eq!(arena.get_mut(&handle), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(16);
        let handle = arena.allocate(0);
        *arena.get_mut(&handle).unwrap() = 1;
        assert_eq!(arena.get(&handle), Some(&1));
    }
}
