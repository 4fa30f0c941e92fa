//! Sorting by repeatedly extracting the minimum of a red black tree.

use crate::red_black_tree::RedBlackTree;

/// Sorts `values` in ascending order, keeping every duplicate.
///
/// Runs in `O(n log n)` time by inserting every value into a `RedBlackTree<T>` and then removing
/// the minimum until the tree is empty.
///
/// # Examples
///
/// ```
/// use rb_multiset::sort::tree_sort;
///
/// assert_eq!(tree_sort(vec![3, 1, 2, 1]), vec![1, 1, 2, 3]);
/// ```
pub fn tree_sort<T>(values: Vec<T>) -> Vec<T>
where
    T: Ord,
{
    let mut ret = Vec::with_capacity(values.len());
    let mut tree: RedBlackTree<T> = values.into_iter().collect();
    while let Ok(value) = tree.pop_min() {
        ret.push(value);
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::tree_sort;
    use rand::Rng;

    #[test]
    fn test_sort_empty() {
        assert_eq!(tree_sort(Vec::<u32>::new()), Vec::<u32>::new());
    }

    #[test]
    fn test_sort_shuffled_range() {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
        let mut values: Vec<u32> = (0..100).collect();
        rng.shuffle(&mut values);
        assert_eq!(tree_sort(values), (0..100).collect::<Vec<u32>>());
    }

    #[test]
    fn test_sort_matches_std() {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([2, 2, 2, 2]);
        let values: Vec<u8> = (0..1000).map(|_| rng.gen::<u8>()).collect();
        let mut expected = values.clone();
        expected.sort();
        assert_eq!(tree_sort(values), expected);
    }
}
