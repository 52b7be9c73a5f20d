use std::hint::black_box;
use std::time::Instant;
use vexo::{Isa, Xoshiro, XoshiroSimd};

const NUM_RANDOM: usize = 10_000;
const NUM_ITER: usize = 1_000;
const SEED: u64 = 0x9e3779b97f4a7c15;

/// Median throughput in bits per microsecond.
fn bench_bits<F>(mut rng_func: F, bits_per_call: usize) -> f64
where
    F: FnMut(),
{
    let mut results = Vec::with_capacity(NUM_ITER);

    // warmup
    for _ in 0..10_000 {
        rng_func();
    }

    for _ in 0..NUM_ITER {
        let start = Instant::now();

        for _ in 0..NUM_RANDOM {
            rng_func();
        }

        let elapsed_us = start.elapsed().as_secs_f64() * 1e6;
        results.push((NUM_RANDOM * bits_per_call) as f64 / elapsed_us);
    }

    results.sort_by(f64::total_cmp);
    results[NUM_ITER / 2]
}

fn print_row(api: &str, bits_per_us: f64, bits_per_number: f64) {
    println!("| {api:<22} | {bits_per_us:>20.2} | {:>23.2} |", bits_per_us / bits_per_number);
}

fn bench_throughput() {
    const FILL_WORDS: usize = 256;

    println!("\n");
    println!("| API                    | Throughput (bits/µs) | Throughput (numbers/µs) |");
    println!("|:----------------------:|:--------------------:|:-----------------------:|");

    let mut scalar = Xoshiro::new(SEED);
    print_row("scalar next_u64", bench_bits(|| { black_box(scalar.next_u64()); }, 64), 64.0);

    for isa in Isa::supported() {
        let Ok(mut rng) = XoshiroSimd::builder(SEED).isa(isa).build() else {
            continue;
        };

        let u64s = bench_bits(|| { black_box(rng.next_u64()); }, 64);
        print_row(&format!("{isa} next_u64"), u64s, 64.0);

        let u32s = bench_bits(|| { black_box(rng.next_u32()); }, 32);
        print_row(&format!("{isa} next_u32"), u32s, 32.0);

        let mut buf = [0u64; FILL_WORDS];
        let fills = bench_bits(
            || {
                rng.fill_u64(&mut buf);
                black_box(&buf);
            },
            64 * FILL_WORDS,
        );
        print_row(&format!("{isa} fill_u64 ({FILL_WORDS})"), fills, 64.0);
    }
}

fn bench_randomness() {
    const NUM_BINS: usize = 256;
    const NUM_ITER: usize = 10;

    let mut chi2_results = Vec::with_capacity(NUM_ITER);
    let mut autocorr_results = Vec::with_capacity(NUM_ITER);

    for iter in 0..NUM_ITER {
        let mut rng = XoshiroSimd::with_stream(SEED, iter as u64);
        let mut numbers = vec![0u64; NUM_RANDOM];
        rng.fill_u64(&mut numbers);

        // uniformity of the low byte (chi-squared)
        let mut bins = vec![0usize; NUM_BINS];

        for &num in &numbers {
            bins[(num % NUM_BINS as u64) as usize] += 1;
        }

        let expected = numbers.len() as f64 / NUM_BINS as f64;
        let chi2: f64 = bins
            .iter()
            .map(|&count| {
                let diff = count as f64 - expected;
                diff * diff / expected
            })
            .sum();

        chi2_results.push(chi2);

        // lag-1 autocorrelation, which also crosses lane boundaries
        let mean = numbers.iter().map(|&x| x as f64).sum::<f64>() / numbers.len() as f64;

        let (num_acc, den_acc) = numbers.windows(2).fold((0.0, 0.0), |(num, den), w| {
            let x = w[0] as f64 - mean;
            let y = w[1] as f64 - mean;
            (num + x * y, den + x * x)
        });

        autocorr_results.push(num_acc / den_acc);
    }

    chi2_results.sort_by(f64::total_cmp);
    autocorr_results.sort_by(f64::total_cmp);

    println!("\n");
    println!("| Metric          | Value       |");
    println!("|:---------------:|:-----------:|");
    println!("| Chi-squared     | {:>10.2}  |", chi2_results[NUM_ITER / 2]);
    println!("| Autocorrelation | {:>10.5}  |", autocorr_results[NUM_ITER / 2]);
}

fn fetch_system_info() {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    let cpu = std::fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|info| {
            info.lines()
                .find(|line| line.starts_with("model name"))
                .and_then(|line| line.split_once(':'))
                .map(|(_, name)| name.trim().to_string())
        })
        .unwrap_or_else(|| "Unknown CPU".to_string());

    let detected = match Isa::detect() {
        Ok(isa) => format!("{isa} ({} lanes)", isa.lanes()),
        Err(err) => err.to_string(),
    };

    let supported: Vec<String> = Isa::supported().iter().map(Isa::to_string).collect();

    println!("\n");
    println!("| System Info     | Value                          |");
    println!("|:---------------:|:------------------------------:|");
    println!("| OS              | {os:<30} |");
    println!("| Arch            | {arch:<30} |");
    println!("| CPU             | {cpu:<30} |");
    println!("| Detected tier   | {detected:<30} |");
    println!("| Runnable tiers  | {:<30} |", supported.join(", "));
}

fn main() {
    env_logger::init();

    println!("## Benchmarks");

    fetch_system_info();
    bench_throughput();
    bench_randomness();
}
