use std::{hint::black_box, time::Duration};

use criterion::{Criterion, criterion_group, criterion_main};
use lazyseq::{Callback, Settings, eager, wrap, wrap_with};
use rand::{RngExt, SeedableRng, rngs::StdRng};
use serde_json::{Value, json};

fn find(criterion: &mut Criterion) {
    let seed = 0;
    let mut rng = StdRng::seed_from_u64(seed);

    macro_rules! bench_fn {
        ($group:ident.$fn_name:ident($nums:expr)) => {
            $group.bench_function(stringify!($fn_name), |bencher| {
                bencher.iter(|| $fn_name(black_box($nums)));
            });
        };
    }

    let mut nums: Vec<i64> = std::iter::repeat_with(|| rng.random_range(1..=i64::from(i32::MAX)))
        .take(100_000)
        .collect();
    println!("Seed: {seed}");
    println!("First 10 elements: {:?}", &nums[..10]);
    nums[80_000] = 0;
    let nums = json!(nums);
    let mut group = criterion.benchmark_group("find_found_late");
    bench_fn!(group.eager_find_0(&nums));
    bench_fn!(group.lazy_find_0(&nums));
    bench_fn!(group.lazy_find_last_0(&nums));
    group.finish();

    let nums: Vec<i64> = std::iter::repeat_with(|| rng.random_range(1..=i64::from(i32::MAX)))
        .take(100_000)
        .collect();
    println!("Seed: {seed}");
    println!("First 10 elements: {:?}", &nums[..10]);
    let nums = json!(nums);
    let mut group = criterion.benchmark_group("find_not_found");
    bench_fn!(group.eager_find_0(&nums));
    bench_fn!(group.lazy_find_0(&nums));
    bench_fn!(group.eager_settings_find_0(&nums));
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(5))
        .measurement_time(Duration::from_secs(30))
        .sample_size(100);
    targets = find
}
criterion_main!(benches);

fn is_zero() -> Callback {
    Callback::predicate(|v| v.as_i64() == Some(0))
}

fn eager_find_0(nums: &Value) -> Option<Value> {
    eager::find(nums, is_zero())
}

// Wrapping clones the source, same as a caller handing over an owned value.
fn lazy_find_0(nums: &Value) -> Option<Value> {
    wrap(nums.clone()).find(is_zero())
}

fn lazy_find_last_0(nums: &Value) -> Option<Value> {
    wrap(nums.clone()).find_last(is_zero())
}

fn eager_settings_find_0(nums: &Value) -> Option<Value> {
    wrap_with(nums.clone(), Settings::eager()).find(is_zero())
}
