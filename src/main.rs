//! # listpack CLI
//!
//! Command-line driver for the listpack pipeline.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use listpack::cli::Args;
use listpack::config::RunConfig;
use listpack::core::Pipeline;
use listpack::input::RecordReader;
use listpack::logging::{LogConfig, init_logging};
use listpack::ListpackError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ListpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let log_config =
        LogConfig::from_verbosity(args.verbose, args.quiet).with_log_file(args.log_file.clone());
    init_logging(&log_config)?;

    let config = args.apply_overrides(RunConfig::from_json_file(&args.config)?);

    println!("📦 listpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Run:     {} ({})", config.name, config.source_id);
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", config.output_dir.display());
    if !config.export_bodies {
        println!("⏭️  Skipping XML bodies (--no-bodies)");
    }
    println!();

    let reader = RecordReader::open(&args.input)?;
    let mut pipeline = Pipeline::open(config)?;

    println!("⏳ Processing records...");
    // Any error drops the pipeline, which finishes the exports written so far.
    for raw in reader {
        pipeline.process_or_skip(raw?)?;
    }
    let stats = pipeline.close()?;

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! CSV saved to {}", stats.exports.tabular_path.display());
    for partition in &stats.exports.partitions {
        println!(
            "   {} → {} records",
            partition.path.display(),
            partition.records
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   Records:     {}", stats.records);
    println!("   Skipped:     {}", stats.skipped);
    println!("   Collisions:  {}", stats.collisions);
    println!("   Labelled:    {}", stats.labelled);
    println!("   Sent dates:  {:.1}% parsed", stats.sent_coverage());

    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let per_sec = stats.records as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} records/sec", per_sec);

    Ok(())
}
