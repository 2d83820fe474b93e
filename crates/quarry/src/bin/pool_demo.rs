//! # Pool Demo
//!
//! Allocates a few mixed-size regions, prints what they hold and the pool
//! statistics, then tears the pool down.
//!
//! Run with: `cargo run --bin pool_demo [config.toml]`

use std::process::ExitCode;

use quarry::{Pool, PoolConfig, PoolError};

fn run() -> Result<(), PoolError> {
    let config = match std::env::args().nth(1) {
        Some(path) => PoolConfig::from_file(path)?,
        None => PoolConfig::default(),
    };
    let mut pool = Pool::from_config(&config)?;

    // Allocate various sizes
    let nums = pool.allocate_slice::<i32>(100)?;
    let text = pool.duplicate_string("Hello, World!")?;
    let data = pool.allocate_slice::<f64>(50)?;

    if let Some(nums) = pool.cast_mut::<i32>(nums) {
        for (i, n) in (0i32..).zip(nums.iter_mut()) {
            *n = i * i;
        }
    }

    println!("String: {}", pool.get_str(text).unwrap_or_default());
    if let Some(nums) = pool.cast::<i32>(nums) {
        println!("nums[10] = {}", nums[10]);
    }
    if let Some(data) = pool.cast::<f64>(data) {
        println!("data[0] = {:.1}", data[0]);
    }

    println!("{}", pool.stats());

    pool.destroy();
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pool_demo: {e}");
            ExitCode::FAILURE
        }
    }
}
