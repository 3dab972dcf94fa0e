use anyhow::{Context, Result};
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};
use tracing::info;

use crate::{error::SurveyError, tally::FrequencyTable};

/// Write `table` to `path`; the format follows the extension
/// (`csv`, `json` or `parquet`).
pub fn write_table<P: AsRef<Path>>(table: &FrequencyTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {:?}", parent))?;
    }

    match ext.as_str() {
        "csv" => write_csv(table, path),
        "json" => write_json(table, path),
        "parquet" => write_parquet(table, path),
        _ => Err(SurveyError::UnsupportedFormat(path.display().to_string()).into()),
    }?;

    info!(path = %path.display(), rows = table.len(), "frequency table written");
    Ok(())
}

pub fn write_csv(table: &FrequencyTable, path: &Path) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating {:?}", path))?;
    let mut header = vec!["labels", "counts"];
    if table.aliases().is_some() {
        header.push("alias");
    }
    wtr.write_record(&header)?;
    for row in table.rows() {
        let count = row.count.to_string();
        let mut record = vec![row.label, count.as_str()];
        if let Some(alias) = row.alias {
            record.push(alias);
        }
        wtr.write_record(&record)
            .with_context(|| format!("writing row {:?} to {:?}", row.label, path))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json(table: &FrequencyTable, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), table)
        .with_context(|| format!("writing {:?}", path))?;
    Ok(())
}

pub fn write_parquet(table: &FrequencyTable, path: &Path) -> Result<()> {
    let batch = table
        .to_record_batch()
        .context("building frequency record batch")?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for frequency table")?;
    writer.write(&batch).context("writing frequency batch")?;
    writer.close().context("closing frequency writer")?;
    Ok(())
}
