use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qreverse::options::{Options, SimdLevel};
use qreverse::verify::{first_mismatch, seed_pattern};

/// Reverses a seeded array and checks every element landed at its mirrored index
#[derive(Parser, Debug)]
#[command(name = "qreverse", version, about, long_about = None)]
struct Args {
    /// Number of elements to reverse
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Bytes per element
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    element_size: u64,

    /// Instruction set to use (portable, ssse3, avx2, avx512, neon); detected when omitted
    #[arg(long)]
    simd: Option<SimdLevel>,

    /// Only print the verdict
    #[arg(short, long)]
    quiet: bool,
}

fn print_bytes(label: &str, bytes: &[u8]) {
    println!("{label}:");
    let line: Vec<String> = bytes.iter().map(|b| format!("{b:3}")).collect();
    println!("{}", line.join(" "));
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let count = usize::try_from(args.count)?;
    let element_size = usize::try_from(args.element_size)?;
    anyhow::ensure!(
        count.checked_mul(element_size).is_some(),
        "{count} elements of {element_size} bytes do not fit in memory"
    );

    let original = seed_pattern(count, element_size);
    let mut reversed = original.clone();

    let options = match args.simd {
        Some(level) => Options::with_simd(level),
        None => Options::default(),
    };
    tracing::info!(
        count,
        element_size,
        level = %options.simd_level(),
        "reversing"
    );
    qreverse::try_reverse_bytes_with_options(&mut reversed, element_size, &options)?;

    if !args.quiet {
        print_bytes("Original", &original);
        print_bytes("Reversed", &reversed);
    }

    match first_mismatch(&original, &reversed, element_size) {
        None => {
            println!("[PASS] Array Reversed");
            Ok(true)
        }
        Some(index) => {
            tracing::error!(index, "element out of place");
            println!("[FAIL] Array Not Reversed");
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here too, and are not failures
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
