use std::fs::File;
use std::io::{BufWriter, Write};
use vexo::XoshiroSimd;

const NUM_RANDOM: usize = 1_000;
const SEED: u64 = 0x9e3779b97f4a7c15;

fn save_numbers_to_file(numbers: &[u64], filepath: &str) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(filepath)?);

    for &num in numbers {
        writeln!(file, "{num}")?;
    }

    file.flush()?;
    println!("Random numbers written to: {filepath}");

    Ok(())
}

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut rng = XoshiroSimd::new(SEED);
    let mut numbers = vec![0u64; NUM_RANDOM];

    rng.fill_u64(&mut numbers);

    save_numbers_to_file(&numbers, "./target/prngs.txt")?;
    println!("Done ({} tier)", rng.isa());

    Ok(())
}
