use statrs::statistics::{Data, Distribution, Max, Min};
use vexo::{Isa, XoshiroSimd};

const N: usize = 1_000_000;
const SEED: u64 = 0x1234;

struct Report {
    mean: f64,
    var: f64,
    min: f64,
    max: f64,
    entropy: f64,
}

fn report(samples: Vec<f64>) -> Report {
    let total = samples.len() as f64;
    let mut hist = [0usize; 256];

    for &v in &samples {
        hist[(v * 256.0) as usize] += 1;
    }

    let entropy = hist
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();

    let data = Data::new(samples);

    Report {
        mean: data.mean().unwrap_or(f64::NAN),
        var: data.variance().unwrap_or(f64::NAN),
        min: data.min(),
        max: data.max(),
        entropy,
    }
}

fn main() {
    env_logger::init();

    println!("Stats over {N} uniform() draws per tier:");

    for isa in Isa::supported() {
        let mut rng = match XoshiroSimd::builder(SEED).isa(isa).build() {
            Ok(rng) => rng,
            Err(err) => {
                log::warn!("skipping {isa}: {err}");
                continue;
            }
        };

        let mut samples = vec![0.0f64; N];
        rng.fill_uniform(&mut samples);

        let r = report(samples);

        println!();
        println!("  [{isa}, {} lanes]", rng.lanes());
        println!("  mean     : {:.6}", r.mean);
        println!("  variance : {:.6}", r.var);
        println!("  range    : [{:.6}, {:.6}]", r.min, r.max);
        println!("  entropy  : {:.3} bits", r.entropy);

        if (r.mean - 0.5).abs() > 0.005 || (r.var - 1.0 / 12.0).abs() > 0.005 {
            log::warn!("{isa}: moments look off (mean {:.6}, variance {:.6})", r.mean, r.var);
        }
    }

    println!();
    println!("(expected mean=0.5, var=0.0833, entropy close to 8 bits)");
}
