use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

mod catalog;
mod config;
mod extract;
mod ops;

#[derive(Parser)]
#[command(name = "bookgen")]
#[command(version = "1.0")]
#[command(about = "Book catalog generator for static genre pages", long_about = None)]
struct Cli {
    /// Directory holding the genre_*.html pages
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Catalog output path (relative paths resolve against --dir)
    #[arg(long, default_value = config::OUTPUT_FILE)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays a single summary line.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
                ),
        )
        .init();

    let config = config::Config::new(cli.dir, cli.out);
    let count = ops::run_generate(&config)?;
    println!("Wrote {} books to {}", count, config.output_path.display());

    Ok(())
}
