use anyhow::Result;
use std::path::Path;

fn has_table_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false)
}

/// Check that `path` names an existing `.csv` or `.tsv` listing table.
pub fn validate_listing_table(path: &str) -> Result<()> {
    let table = Path::new(path);
    anyhow::ensure!(
        has_table_extension(table),
        "Listing table must be a .csv or .tsv file: {}",
        table.display()
    );
    anyhow::ensure!(table.is_file(), "Listing table not found: {}", table.display());
    Ok(())
}

/// Field delimiter for an output path: tab for `.tsv`, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}
