use anyhow::{Context, Result};
use appraise_model::data_handling::Dataset;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::util::delimiter_for;

/// Write the input table with `predicted_price` (and `projected_price` when
/// given) appended, to `output_path` or, comma separated, to stdout.
pub fn write_predictions(
    data: &Dataset,
    predicted: &[f64],
    projected: Option<&[f64]>,
    output_path: Option<&Path>,
) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_prediction_table(
                BufWriter::new(file),
                delimiter_for(path),
                data,
                predicted,
                projected,
            )
        }
        None => write_prediction_table(io::stdout().lock(), b',', data, predicted, projected),
    }
}

/// Render the prediction table into any writer.
pub fn write_prediction_table<W: Write>(
    sink: W,
    delimiter: u8,
    data: &Dataset,
    predicted: &[f64],
    projected: Option<&[f64]>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(sink);

    let mut header: Vec<&str> = data.column_names().iter().map(String::as_str).collect();
    header.push("predicted_price");
    if projected.is_some() {
        header.push("projected_price");
    }
    writer.write_record(&header)?;

    let columns = data
        .column_names()
        .iter()
        .map(|name| data.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    for (row, price) in predicted.iter().enumerate() {
        let mut record: Vec<String> = columns
            .iter()
            .map(|c| c.category_at(row).map(|v| v.into_owned()).unwrap_or_default())
            .collect();
        record.push(format!("{:.2}", price));
        if let Some(projected) = projected {
            record.push(format!("{:.2}", projected[row]));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
