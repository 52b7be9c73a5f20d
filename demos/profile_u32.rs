use std::hint::black_box;
use vexo::{Isa, XoshiroSimd};

const ITERS: usize = 100_000_000;

fn main() {
    // profile the narrowest x86 tier when it is around, otherwise whatever is detected
    let builder = XoshiroSimd::builder(0xDEADBEEF);
    let mut rng = match builder.isa(Isa::Sse2).build() {
        Ok(rng) => rng,
        Err(_) => builder.build().unwrap_or_else(|err| panic!("no usable tier: {err}")),
    };

    for _ in 0..1_000 {
        black_box(rng.next_u32());
    }

    for _ in 0..ITERS {
        black_box(rng.next_u32());
    }
}
