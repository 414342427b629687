//! Offline training for the sales forecast models.
//!
//! Aggregates a retail orders CSV to monthly sales, fits one or both model
//! families on lag windows, reports holdout error against a weighted naive
//! baseline and writes one artifact per family into `--model-dir`.

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use sales_forecast::application::ml::artifact::HoldoutMetrics;
use sales_forecast::application::ml::gradient_boosting::GradientBoostingParameters;
use sales_forecast::application::ml::training::{
    ForestParameters, TrainingOutcome, TrainingParameters, monthly_aggregate, summarize_series,
    train_family,
};
use sales_forecast::domain::ml::ModelFamily;
use sales_forecast::infrastructure::data::read_sales_csv;
use sales_forecast::infrastructure::ml::write_artifact;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the sales CSV
    #[arg(long, default_value = "data/superstore.csv")]
    input: PathBuf,

    /// Directory the artifacts are written to
    #[arg(long, default_value = "reports/models")]
    model_dir: PathBuf,

    /// Model family to train: rf, xgb or all
    #[arg(long, default_value = "all")]
    model: String,

    /// Number of trailing months held out for evaluation
    #[arg(long, default_value_t = 3)]
    horizon: usize,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 300)]
    n_trees: usize,

    /// Maximum depth of random forest trees (unlimited when omitted)
    #[arg(long)]
    max_depth: Option<u16>,

    /// Random forest seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of boosting rounds
    #[arg(long, default_value_t = 400)]
    n_rounds: usize,

    /// Boosting learning rate
    #[arg(long, default_value_t = 0.08)]
    learning_rate: f64,

    /// Maximum depth of boosted trees
    #[arg(long, default_value_t = 4)]
    boost_depth: u16,
}

fn selected_families(raw: &str) -> Result<Vec<ModelFamily>> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(ModelFamily::ALL.to_vec());
    }
    Ok(vec![raw.parse::<ModelFamily>()?])
}

fn format_metrics(metrics: Option<&HoldoutMetrics>) -> String {
    match metrics {
        Some(m) => format!(
            "RMSE {:>12.2} | MAE {:>12.2} | MAPE {}",
            m.rmse,
            m.mae,
            m.mape
                .map(|v| format!("{:.2}%", v))
                .unwrap_or_else(|| "n/a".to_string())
        ),
        None => "no holdout rows".to_string(),
    }
}

fn print_report(outcome: &TrainingOutcome) {
    let family = outcome.artifact.family();
    let training = &outcome.artifact.training;
    println!("\n=== {} ({}) ===", family.display_name(), family);
    println!(
        "  Train samples: {} | Holdout samples: {}",
        training.train_samples, training.test_samples
    );
    println!("  Model:    {}", format_metrics(training.holdout.as_ref()));
    println!("  Baseline: {}", format_metrics(outcome.baseline.as_ref()));

    if !outcome.holdout.is_empty() {
        println!("\n  {:<10} {:>12} {:>12} {:>12}", "Month", "Actual", "Forecast", "Baseline");
        for point in &outcome.holdout {
            println!(
                "  {:<10} {:>12.2} {:>12.2} {:>12.2}",
                point.month.format("%Y-%m"),
                point.actual,
                point.forecast,
                point.baseline
            );
        }
    }

    if let (Some(model), Some(baseline)) = (&training.holdout, &outcome.baseline)
        && model.rmse > baseline.rmse
    {
        println!("  WARNING: model does not beat the naive baseline on the holdout");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let families = selected_families(&args.model)?;

    println!("Loading sales from {:?}...", args.input);
    let csv = read_sales_csv(&args.input)?;
    println!(
        "Loaded {} orders ({} rows dropped).",
        csv.records.len(),
        csv.dropped_rows
    );

    let series = monthly_aggregate(&csv.records);
    let Some(summary) = summarize_series(&series) else {
        bail!("No usable sales rows in {:?}", args.input);
    };
    println!(
        "Monthly series: {} months ({} .. {}), mean {:.2}, std {}",
        summary.months,
        summary.first.format("%Y-%m"),
        summary.last.format("%Y-%m"),
        summary.mean,
        summary
            .std_dev
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "n/a".to_string())
    );

    let params = TrainingParameters {
        horizon: args.horizon,
        forest: ForestParameters {
            n_trees: args.n_trees,
            max_depth: args.max_depth,
            seed: args.seed,
            ..ForestParameters::default()
        },
        boosting: GradientBoostingParameters::default()
            .with_n_rounds(args.n_rounds)
            .with_learning_rate(args.learning_rate)
            .with_max_depth(args.boost_depth),
    };

    let outcomes: Vec<(ModelFamily, Result<TrainingOutcome, _>)> = families
        .par_iter()
        .map(|&family| (family, train_family(family, &series, &params)))
        .collect();

    let mut failed = 0;
    for (family, outcome) in outcomes {
        match outcome {
            Ok(outcome) => {
                print_report(&outcome);
                let path = write_artifact(&args.model_dir, &outcome.artifact)
                    .with_context(|| format!("Failed to save '{}' artifact", family))?;
                println!("  Saved to {:?}", path);
            }
            Err(e) => {
                eprintln!("Training '{}' failed: {}", family, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} model(s) failed to train", failed);
    }
    Ok(())
}
