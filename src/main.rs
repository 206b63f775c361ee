//! apr-topn CLI
//!
//! Trains a random forest on benchmark measurements and reports which
//! top-N selection algorithm is fastest per configuration.

use aprender_topn::{
    cli::{Cli, Commands, CurvesArgs, EvaluateArgs, OutputFormat, PredictArgs},
    pipeline,
    prelude::*,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli);

    let result = match &cli.command {
        Commands::Evaluate(args) => cmd_evaluate(args),
        Commands::Predict(args) => cmd_predict(args),
        Commands::Curves(args) => cmd_curves(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = match cli.log_level() {
        Some(level) => {
            let mut b = env_logger::Builder::new();
            b.filter_level(level);
            b
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")),
    };
    builder.init();
}

fn cmd_evaluate(args: &EvaluateArgs) -> Result<()> {
    let config = args.resolve()?;
    let report = pipeline::run(&config)?;

    match args.format {
        OutputFormat::Table => {
            println!("{}", report.evaluation.summary_line());
            println!("{}", report.evaluation.report);
            println!(
                "Groups: {} train / {} test",
                report.train_groups, report.test_groups
            );
            for (name, importance) in &report.feature_importances {
                println!("  importance {name:<10} {importance:.3}");
            }
            for path in &report.plots {
                println!("Wrote {}", path.display());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn cmd_predict(args: &PredictArgs) -> Result<()> {
    let config = args.train.resolve()?;
    let row = args.feature_row()?;
    let method = pipeline::predict_config(&config, &row)?;

    println!(
        "{} dimension={} topN={} -> {} ({})",
        row.matrix_type.name(),
        row.dimension,
        row.top_n,
        config.method_names.name(method),
        method
    );
    Ok(())
}

fn cmd_curves(args: &CurvesArgs) -> Result<()> {
    let drawn = pipeline::plot_curves(
        &args.data,
        &args.out,
        args.samples,
        &args.method_names()?,
    )?;
    println!("Wrote {} curves to {}", drawn, args.out.display());
    Ok(())
}
