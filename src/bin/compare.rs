//! Times `slice::reverse` against `qreverse` and prints a markdown table

use std::hint::black_box;
use std::time::Instant;

use anyhow::bail;
use bytemuck::Pod;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qreverse::options::{Options, SimdLevel};

const COUNTS: &[usize] = &[
    8, 16, 32, 64, 128, 256, 512, 1024, 100, 1000, 10_000, 100_000, 1_000_000,
    // irregular sizes, so every tier down to single elements runs
    59, 79, 173, 6133, 10177, 25253, 31391, 50432,
];

/// Compares qreverse with `slice::reverse` over a fixed list of array sizes
#[derive(Parser, Debug)]
#[command(name = "compare", version, about, long_about = None)]
struct Args {
    /// Bytes per element: 1, 2, 4 or 8
    #[arg(default_value_t = 1, value_parser = parse_element_size)]
    element_size: usize,

    /// Reversals timed per size
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Instruction set to use (portable, ssse3, avx2, avx512, neon); detected when omitted
    #[arg(long)]
    simd: Option<SimdLevel>,
}

fn parse_element_size(s: &str) -> Result<usize, String> {
    match s.parse() {
        Ok(size @ (1 | 2 | 4 | 8)) => Ok(size),
        _ => Err(format!("`{s}` is not one of 1, 2, 4 or 8")),
    }
}

fn average_ns(iterations: u32, mut f: impl FnMut()) -> f64 {
    let now = Instant::now();
    for _ in 0..iterations {
        f();
    }
    now.elapsed().as_nanos() as f64 / f64::from(iterations)
}

fn compare<T: Pod>(iterations: u32, options: &Options) {
    println!("| count | std ns | qreverse ns | speedup |");
    println!("|------:|-------:|------------:|--------:|");

    for &count in COUNTS {
        let mut buf = vec![T::zeroed(); count];
        let std_ns = average_ns(iterations, || black_box(buf.as_mut_slice()).reverse());
        let ours_ns = average_ns(iterations, || {
            qreverse::reverse_with_options(black_box(buf.as_mut_slice()), options)
        });

        let speedup = std_ns / ours_ns;
        let speedup = if speedup > 1.0 {
            format!("**{speedup:.2}**")
        } else {
            format!("{speedup:.2}")
        };
        println!("| {count} | {std_ns:.1} | {ours_ns:.1} | {speedup} |");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match args.simd {
        Some(level) => Options::with_simd(level),
        None => Options::default(),
    };
    tracing::info!(
        element_size = args.element_size,
        iterations = args.iterations,
        level = %options.simd_level(),
        "comparing against slice::reverse"
    );

    match args.element_size {
        1 => compare::<u8>(args.iterations, &options),
        2 => compare::<u16>(args.iterations, &options),
        4 => compare::<u32>(args.iterations, &options),
        8 => compare::<u64>(args.iterations, &options),
        other => bail!("element size must be one of 1, 2, 4 or 8, got {other}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("compare").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.element_size, 1);
        assert_eq!(args.iterations, 10_000);
        assert_eq!(args.simd, None);
    }

    #[test]
    fn all_options() {
        let args = parse(&["--iterations", "5", "8", "--simd", "portable"]).unwrap();
        assert_eq!(args.element_size, 8);
        assert_eq!(args.iterations, 5);
        assert_eq!(args.simd, Some(SimdLevel::Portable));
    }

    #[test]
    fn rejects_misspelled_flags_and_extra_sizes() {
        assert!(parse(&["--iteration", "5"]).is_err());
        assert!(parse(&["2", "4"]).is_err());
        assert!(parse(&["--iterations", "0"]).is_err());
        assert!(parse(&["--iterations"]).is_err());
        assert!(parse(&["0"]).is_err());
        assert!(parse(&["3"]).is_err());
        assert!(parse(&["16"]).is_err());
        assert!(parse(&["--simd", "mmx"]).is_err());
    }
}
