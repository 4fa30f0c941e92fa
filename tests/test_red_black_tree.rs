use rand::Rng;
use rb_multiset::red_black_tree::{Error, RedBlackTree};
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 10_000;

fn new_rng(seed: u32) -> rand::XorShiftRng {
    rand::SeedableRng::from_seed([seed, seed, seed, seed])
}

fn within_height_bound<T>(tree: &RedBlackTree<T>) -> bool {
    tree.height() as f64 <= 2.0 * ((tree.len() + 1) as f64).log2()
}

fn expand(expected: &BTreeMap<u32, usize>) -> Vec<u32> {
    expected
        .iter()
        .flat_map(|(key, count)| (0..*count).map(move |_| *key))
        .collect()
}

#[test]
fn int_test_matches_btreemap_multiset() {
    let mut rng = new_rng(1);
    let mut tree = RedBlackTree::new();
    let mut expected: BTreeMap<u32, usize> = BTreeMap::new();
    let mut len = 0;

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 512);

        if rng.gen::<bool>() {
            tree.insert(key);
            *expected.entry(key).or_insert(0) += 1;
            len += 1;
        } else {
            let ret = tree.remove(&key);
            let expected_ret = match expected.get_mut(&key) {
                _ if len == 0 => Err(Error::EmptyTree),
                None => Err(Error::NotFound),
                Some(count) => {
                    *count -= 1;
                    if *count == 0 {
                        expected.remove(&key);
                    }
                    len -= 1;
                    Ok(key)
                },
            };
            assert_eq!(ret, expected_ret);
        }

        assert_eq!(tree.verify().map(|_| ()), Ok(()));
        assert_eq!(tree.len(), len);
        assert_eq!(tree.contains(&key), expected.contains_key(&key));
        assert_eq!(tree.count_of(&key), expected.get(&key).cloned().unwrap_or(0));
        assert_eq!(tree.min().ok(), expected.keys().next());
        assert_eq!(tree.max().ok(), expected.keys().next_back());
        assert!(within_height_bound(&tree));
    }

    assert_eq!(tree.into_iter().collect::<Vec<u32>>(), expand(&expected));
}

#[test]
fn int_test_internal_deletions_with_duplicates() {
    // Values are drawn from a small range so that nodes with two children usually carry several
    // copies, exercising the predecessor path of deletion.
    let mut rng = new_rng(2);
    let mut tree = RedBlackTree::with_chunk_size(8);
    let mut expected: BTreeMap<u32, usize> = BTreeMap::new();

    for _ in 0..2_000 {
        let key = rng.gen_range(0, 64);
        tree.insert(key);
        *expected.entry(key).or_insert(0) += 1;
    }

    while !expected.is_empty() {
        let root_like = *expected
            .keys()
            .nth(expected.len() / 2)
            .expect("Expected a key in the middle.");
        assert_eq!(tree.remove(&root_like), Ok(root_like));

        let count = expected.get_mut(&root_like).unwrap();
        *count -= 1;
        if *count == 0 {
            expected.remove(&root_like);
        }

        assert_eq!(tree.verify().map(|_| ()), Ok(()));
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), expand(&expected));
    }
    assert!(tree.is_empty());
}

#[test]
fn int_test_extract_min_sequence() {
    let mut rng = new_rng(3);
    let mut values: Vec<u32> = (0..100).collect();
    rng.shuffle(&mut values);

    let mut tree = RedBlackTree::new();
    for value in values {
        tree.insert(value);
    }

    let mut actual = Vec::new();
    while !tree.is_empty() {
        let min = *tree.min().unwrap();
        assert_eq!(tree.remove(&min), Ok(min));
        assert!(tree.verify().is_ok());
        actual.push(min);
    }
    assert_eq!(actual, (0..100).collect::<Vec<u32>>());
}

#[test]
fn int_test_increasing_insertions_stay_balanced() {
    let mut tree = RedBlackTree::new();
    for value in 1..=1000 {
        tree.insert(value);
    }
    assert!(tree.height() <= 20);
    assert!(within_height_bound(&tree));
    assert!(tree.verify().is_ok());

    let mut tree = RedBlackTree::new();
    for value in (1..=1000).rev() {
        tree.insert(value);
    }
    assert!(tree.height() <= 20);
    assert!(tree.verify().is_ok());
}

#[test]
fn int_test_round_trip_leaves_empty_tree() {
    let mut rng = new_rng(4);
    let mut values: Vec<u32> = (0..1_000).map(|_| rng.gen::<u32>()).collect();
    values.sort();
    values.dedup();
    rng.shuffle(&mut values);

    let mut tree = RedBlackTree::new();
    for value in &values {
        tree.insert(*value);
    }
    assert_eq!(tree.len(), values.len());

    rng.shuffle(&mut values);
    for value in &values {
        assert_eq!(tree.remove(value), Ok(*value));
        assert!(tree.verify().is_ok());
    }

    assert_eq!(tree, RedBlackTree::new());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), -1);
    assert!(!tree.contains(&values[0]));
    assert_eq!(tree.min(), Err(Error::EmptyTree));
    assert_eq!(tree.max(), Err(Error::EmptyTree));
    assert_eq!(tree.remove(&values[0]), Err(Error::EmptyTree));
}

#[test]
fn int_test_reuse_after_clear() {
    let mut rng = new_rng(5);
    let mut tree = RedBlackTree::with_chunk_size(16);

    for round in 0..3 {
        for _ in 0..500 {
            tree.insert(rng.gen_range(0, 100));
        }
        for _ in 0..250 {
            let _ = tree.pop_max();
        }
        assert_eq!(tree.len(), 250, "round {}", round);
        assert!(tree.verify().is_ok());
        tree.clear();
    }
}
