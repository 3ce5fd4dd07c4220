use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use appraise_cli::predict::inference::run_inference;
use appraise_cli::predict::input::PredictConfig;
use appraise_cli::project::format_projection;
use appraise_cli::train::input;
use appraise_cli::train::trainer::run_training_session;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("APPRAISE_LOG", "error,appraise=info"))
        .init();

    let matches = Command::new("appraise")
        .version(clap::crate_version!())
        .about("Real-estate price models: train, predict and project")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train a price model and save the fitted pipeline")
                .arg(
                    Arg::new("config")
                        .help("Path to a JSON training configuration. Defaults are used when omitted.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to the listing CSV/TSV. Overrides the input path \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "File the fitted pipeline will be written to. Its directory must \
                             exist. Overrides the output path specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the train/evaluation split.")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict prices for a listing table with a trained pipeline")
                .arg(
                    Arg::new("model_path")
                        .help("Path to the trained pipeline (*.json)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("inference_data")
                        .short('d')
                        .long("data")
                        .help("Path to the listing CSV/TSV to predict")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path for predictions (*.tsv or *.csv). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("years")
                        .long("years")
                        .help("Also project each predicted price this many years ahead.")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .help("Annual growth rate used with --years (default 0.04).")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("project")
                .about("Project a price forward with compound annual growth")
                .allow_negative_numbers(true)
                .arg(
                    Arg::new("price")
                        .help("Current price")
                        .required(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("years")
                        .help("Number of years to project")
                        .required(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .help("Annual growth rate (default 0.04)")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("project", sub_m)) => handle_project(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    if let Some(path) = config_path {
        log::info!("[appraise::train] Training from config: {:?}", path);
    }

    let params = input::from_arguments(config_path, matches)?;

    match run_training_session(&params) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let params = PredictConfig::from_arguments(matches)?;
    log::info!(
        "[appraise::predict] Predicting {:?} with {:?}",
        params.inference_data,
        params.model_path
    );

    match run_inference(&params) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Inference failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_project(matches: &ArgMatches) -> Result<()> {
    let price = *matches
        .get_one::<f64>("price")
        .ok_or_else(|| anyhow::anyhow!("price is required"))?;
    let years = *matches
        .get_one::<f64>("years")
        .ok_or_else(|| anyhow::anyhow!("years is required"))?;
    let rate = matches.get_one::<f64>("rate").copied();

    println!("{}", format_projection(price, years, rate));
    Ok(())
}
