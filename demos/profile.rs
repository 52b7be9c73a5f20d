use std::hint::black_box;
use vexo::{Isa, XoshiroSimd};

const WORDS: usize = 1 << 12;
const ROUNDS: usize = 5_000;

fn main() {
    // one bulk-fill loop per runnable tier, so each kernel shows up separately in a profile
    for isa in Isa::supported() {
        let mut rng = match XoshiroSimd::builder(42).isa(isa).build() {
            Ok(rng) => rng,
            Err(err) => {
                eprintln!("skipping {isa}: {err}");
                continue;
            }
        };

        let mut words = vec![0u64; WORDS];
        let mut doubles = vec![0.0f64; WORDS];

        for _ in 0..ROUNDS {
            rng.fill_u64(&mut words);
            rng.fill_uniform(&mut doubles);

            black_box((&words, &doubles));
        }

        println!("{isa}: {} words", 2 * WORDS * ROUNDS);
    }
}
