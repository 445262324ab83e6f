use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgGroup, Parser};
use slz77::io::{compress_file, decompress_file, verify_roundtrip};
use slz77::{CodecConfig, CodecStats, MatcherKind};

#[derive(Parser, Debug)]
#[command(name = "slz77")]
#[command(about = "Compress and decompress files with a simplified LZ77 codec")]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Args {
    /// Compress INPUT into OUTPUT
    #[arg(short, long)]
    compress: bool,

    /// Decompress INPUT into OUTPUT
    #[arg(short, long)]
    decompress: bool,

    /// File to read
    input: PathBuf,

    /// File to write
    output: PathBuf,

    /// Match index backend (trie or hash)
    #[arg(long, default_value = "trie")]
    matcher: MatcherKind,

    /// Compression window in bytes (15-4096)
    #[arg(long, default_value = "4096")]
    window_size: usize,

    /// After compressing, decompress the output and compare CRC32s
    #[arg(long)]
    verify: bool,

    /// Show statistics and debug logging
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_ERROR: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = CodecConfig {
        window_size: args.window_size,
        matcher: args.matcher,
        ..Default::default()
    };

    let start = Instant::now();
    let stats = if args.compress {
        let stats = compress_file(&args.input, &args.output, &config)?;
        if args.verify {
            let crc = verify_roundtrip(&fs::read(&args.input)?, &fs::read(&args.output)?)?;
            if args.verbose {
                eprintln!("Verified round trip (crc32 {:08x})", crc);
            }
        }
        stats
    } else {
        if args.verify {
            eprintln!("Warning: --verify only applies to compression, ignoring");
        }
        decompress_file(&args.input, &args.output, &config)?
    };
    let elapsed = start.elapsed();

    if args.verbose {
        print_stats(if args.compress { "Compression" } else { "Decompression" }, &stats, elapsed);
    }
    Ok(())
}

fn print_stats(label: &str, stats: &CodecStats, elapsed: std::time::Duration) {
    eprintln!("{} complete:", label);
    eprintln!("  Input bytes:      {}", stats.input_bytes);
    eprintln!("  Output bytes:     {}", stats.output_bytes);
    eprintln!("  Literals:         {}", stats.literals);
    eprintln!("  Matches:          {}", stats.matches);
    eprintln!("  Ratio:            {:.3}", stats.ratio());
    eprintln!("  Time:             {:.2?}", elapsed);
    eprintln!(
        "  Throughput:       {:.1} MB/s",
        stats.input_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
