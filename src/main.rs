mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use std::io;

use matreport::{
    category_quantities, chart, city_participation, select_chart, ChartKind, Dataset,
    ReportWriter,
};

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    debug!("arguments: {args:?}");

    let inputs = args.inputs();
    let data = Dataset::load(&inputs).context("loading input files")?;

    let writer = ReportWriter::new(&args.report_dir);
    let written = writer
        .write_all(&data)
        .context("writing material reports")?;
    println!(
        "Wrote {} material reports to {}",
        written.len(),
        writer.root().display()
    );

    let stdin = io::stdin();
    let choice = select_chart(stdin.lock(), io::stdout()).context("reading menu choice")?;
    if let Some(kind) = choice {
        let series = match kind {
            ChartKind::Bar => category_quantities(&data),
            ChartKind::Pie => city_participation(&data),
        }
        .with_context(|| format!("totalling {}", kind.title()))?;
        chart::save(kind, &series, &args.graph_dir)
            .with_context(|| format!("saving {}", kind.title()))?;
        match kind {
            ChartKind::Bar => println!("Bar chart saved successfully."),
            ChartKind::Pie => println!("Pie chart saved successfully."),
        }
    }
    Ok(())
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
