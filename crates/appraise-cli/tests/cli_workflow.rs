use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use appraise_cli::predict::inference::run_inference;
use appraise_cli::predict::input::PredictConfig;
use appraise_cli::predict::output::write_prediction_table;
use appraise_cli::project::format_projection;
use appraise_cli::train::input::{from_arguments, load_train_config};
use appraise_cli::util::{delimiter_for, validate_listing_table};
use appraise_model::config::PipelineConfig;
use appraise_model::data_handling::{Column, Dataset};
use appraise_model::pipeline::run_training;
use clap::{Arg, Command};

const HEADER: &str = "BROKERTITLE,TYPE,PRICE,BEDS,BATH,PROPERTYSQFT,ADMINISTRATIVE_AREA_LEVEL_2,\
LOCALITY,SUBLOCALITY,STREET_NAME,LATITUDE,LONGITUDE";

fn write_listings(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for i in 0..rows {
        let sqft = 700 + (i * 53) % 1500;
        let kind = if i % 2 == 0 { "Condo for sale" } else { "House for sale" };
        let price = 200_000 + sqft * 400 + (i % 2) * 100_000;
        writeln!(
            csv,
            "Broker {},{},{},{},{},{},Kings County,New York,Brooklyn,Street {},{:.4},{:.4}",
            i,
            kind,
            price,
            1 + i % 3,
            1 + i % 2,
            sqft,
            i % 4,
            40.65 + (i as f64) * 0.002,
            -73.95 + (i as f64) * 0.001,
        )
        .unwrap();
    }
    let path = dir.join(name);
    std::fs::write(&path, csv).unwrap();
    path
}

fn train_command() -> Command {
    Command::new("train")
        .arg(Arg::new("data").long("data"))
        .arg(Arg::new("output_file").long("output"))
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[test]
fn only_csv_and_tsv_files_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("listings.csv");
    let txt = dir.path().join("listings.txt");
    std::fs::write(&csv, "PRICE\n1\n").unwrap();
    std::fs::write(&txt, "PRICE\n1\n").unwrap();

    assert!(validate_listing_table(csv.to_str().unwrap()).is_ok());
    let err = validate_listing_table(txt.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains(".csv or .tsv"), "{}", err);

    let missing = dir.path().join("absent.tsv");
    let err = validate_listing_table(missing.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("not found"), "{}", err);

    // A directory with a table-like name is not a table.
    let folder = dir.path().join("folder.csv");
    std::fs::create_dir(&folder).unwrap();
    assert!(validate_listing_table(folder.to_str().unwrap()).is_err());
}

#[test]
fn output_delimiter_follows_extension() {
    assert_eq!(delimiter_for(Path::new("out.tsv")), b'\t');
    assert_eq!(delimiter_for(Path::new("out.TSV")), b'\t');
    assert_eq!(delimiter_for(Path::new("out.csv")), b',');
    assert_eq!(delimiter_for(Path::new("out")), b',');
}

#[test]
fn partial_config_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    std::fs::write(&path, r#"{ "seed": 7, "test_fraction": 0.25 }"#).unwrap();

    let config = load_train_config(&path).unwrap();
    let defaults = PipelineConfig::default();
    assert_eq!(config.seed, 7);
    assert_eq!(config.test_fraction, 0.25);
    assert_eq!(config.input_path, defaults.input_path);
    assert_eq!(config.model, defaults.model);
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_train_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn command_line_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_listings(dir.path(), "listings.csv", 10);
    let config_path = dir.path().join("train.json");
    std::fs::write(&config_path, r#"{ "seed": 1 }"#).unwrap();
    let output = dir.path().join("model.json");

    let matches = train_command().get_matches_from([
        "train",
        "--data",
        data.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--seed",
        "99",
    ]);
    let config = from_arguments(Some(&config_path), &matches).unwrap();

    assert_eq!(config.input_path, data);
    assert_eq!(config.output_path, output);
    assert_eq!(config.seed, 99);
}

#[test]
fn invalid_test_fraction_in_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("train.json");
    std::fs::write(&config_path, r#"{ "test_fraction": 1.5 }"#).unwrap();

    let matches = train_command().get_matches_from(["train"]);
    assert!(from_arguments(Some(&config_path), &matches).is_err());
}

#[test]
fn predictions_with_projection_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        input_path: write_listings(dir.path(), "train.csv", 40),
        output_path: dir.path().join("model.json"),
        ..PipelineConfig::default()
    };
    run_training(&config).unwrap();

    let inference_data = write_listings(dir.path(), "new.csv", 5);
    let output_file = dir.path().join("predictions.tsv");
    let predict = PredictConfig {
        model_path: config.output_path.clone(),
        inference_data,
        output_file: Some(output_file.clone()),
        years: Some(5.0),
        annual_rate: None,
    };

    let result = run_inference(&predict).unwrap();
    assert_eq!(result.predicted.len(), 5);
    let projected = result.projected.unwrap();
    for (p, f) in result.predicted.iter().zip(&projected) {
        assert!((f - p * 1.04f64.powi(5)).abs() < 1e-6 * p.abs().max(1.0));
    }

    let written = std::fs::read_to_string(&output_file).unwrap();
    let mut lines = written.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("BROKERTITLE\tTYPE"));
    assert!(header.ends_with("predicted_price\tprojected_price"));
    assert_eq!(lines.count(), 5);
}

#[test]
fn projection_is_printed_with_two_decimals() {
    assert_eq!(format_projection(1_000_000.0, 5.0, None), "1216652.90");
    assert_eq!(format_projection(500_000.0, 0.0, Some(0.1)), "500000.00");
    assert_eq!(format_projection(100.0, 2.0, Some(0.5)), "225.00");
    assert_eq!(format_projection(100.0, 1.0, Some(-0.25)), "75.00");
}

#[test]
fn stdout_table_is_comma_separated() {
    let mut data = Dataset::with_rows(2);
    data.push_column(
        "TYPE",
        Column::Text(vec![Some("Condo for sale".into()), None]),
    );
    data.push_column("BEDS", Column::Numeric(vec![Some(2.0), Some(3.5)]));

    let mut buf: Vec<u8> = Vec::new();
    write_prediction_table(&mut buf, b',', &data, &[512_000.0, 734_999.996], None).unwrap();

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "TYPE,BEDS,predicted_price",
            "Condo for sale,2,512000.00",
            ",3.5,735000.00",
        ]
    );
}
