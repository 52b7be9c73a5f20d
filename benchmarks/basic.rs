use std::hint::black_box;
use std::time::Instant;
use vexo::{Xoshiro, XoshiroSimd};

const ITERS: usize = 10_000_000;
const SEED: u64 = 0xDEADBEEF;

fn time<F: FnMut() -> u64>(label: &str, mut next: F) {
    // warmup
    for _ in 0..1_000 {
        black_box(next());
    }

    let mut acc: u64 = 0;
    let start = Instant::now();

    for _ in 0..ITERS {
        acc = acc.wrapping_add(black_box(next()));
    }

    let elapsed = start.elapsed();
    let ns_per_call = elapsed.as_nanos() as f64 / ITERS as f64;

    println!("{label:<14} iters={ITERS}, ns/call={ns_per_call:.3}, time_ns={}, acc={acc:x}", elapsed.as_nanos());
}

fn main() {
    env_logger::init();

    let mut scalar = Xoshiro::new(SEED);
    time("scalar", || scalar.next_u64());

    let mut simd = XoshiroSimd::new(SEED);
    println!("tier: {} ({} lanes)", simd.isa(), simd.lanes());
    time("simd", || simd.next_u64());

    let mut bulk = XoshiroSimd::new(SEED);
    let mut buf = vec![0u64; 1024];
    let start = Instant::now();

    for _ in 0..(ITERS / buf.len()) {
        bulk.fill_u64(&mut buf);
        black_box(&buf);
    }

    let elapsed = start.elapsed();
    println!("{:<14} ns/word={:.3}", "simd fill_u64", elapsed.as_nanos() as f64 / ITERS as f64);
}
