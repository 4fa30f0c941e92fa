use rand::Rng;
use rb_multiset::red_black_tree::RedBlackTree;
use rb_multiset::sort::tree_sort;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::process;

const DEFAULT_COUNT: usize = 100;

fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Expected no other logger to be installed.");

    let count = match env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        None => DEFAULT_COUNT,
        Some(Ok(count)) => count,
        Some(Err(error)) => {
            log::error!("invalid element count: {}", error);
            process::exit(2);
        },
    };

    let mut rng = rand::thread_rng();
    let values: Vec<u32> = (0..count).map(|_| rng.gen_range(0, count as u32 + 1)).collect();

    let tree: RedBlackTree<u32> = values.iter().cloned().collect();
    match tree.verify() {
        Ok(black_height) => log::info!(
            "{} values, height {}, black height {}",
            tree.len(),
            tree.height(),
            black_height,
        ),
        Err(violation) => {
            log::error!("invariant violated: {}", violation);
            process::exit(1);
        },
    }

    let sorted = tree_sort(values);
    log::info!("sorted: {:?}", sorted);
}
