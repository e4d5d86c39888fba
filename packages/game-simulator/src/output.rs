//! Output writers for simulation results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::metrics::{CsvSummaryRow, GameMetrics};
use crate::types::OutputFormat;

pub struct OutputWriter {
    format: OutputFormat,
    detail_writer: Box<dyn Write + Send>,
    /// Games held back for `--output-format json`, written as one array on finish.
    buffered: Vec<GameMetrics>,
    csv_writer: csv::Writer<BufWriter<File>>,
    detail_path: PathBuf,
    csv_path: PathBuf,
}

impl OutputWriter {
    pub fn new(
        output_dir: &Path,
        format: &OutputFormat,
        compress: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(output_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let extension = match format {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
        };
        let mut detail_path = output_dir.join(format!("simulation_{timestamp}.{extension}"));
        if compress {
            detail_path.set_extension(format!("{extension}.gz"));
        }
        let file = create(&detail_path)?;
        let detail_writer: Box<dyn Write + Send> = if compress {
            Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
        } else {
            Box::new(BufWriter::new(file))
        };

        let csv_path = output_dir.join(format!("simulation_{timestamp}_summary.csv"));
        let csv_writer = csv::Writer::from_writer(BufWriter::new(create(&csv_path)?));

        Ok(Self {
            format: format.clone(),
            detail_writer,
            buffered: Vec::new(),
            csv_writer,
            detail_path,
            csv_path,
        })
    }

    pub fn write_game(&mut self, metrics: &GameMetrics) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Jsonl => {
                let json = serde_json::to_string(metrics)?;
                writeln!(self.detail_writer, "{json}")?;
            }
            OutputFormat::Json => self.buffered.push(metrics.clone()),
        }

        for row in CsvSummaryRow::rows(metrics) {
            self.csv_writer.serialize(&row)?;
        }
        self.csv_writer.flush()?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        if matches!(self.format, OutputFormat::Json) {
            serde_json::to_writer_pretty(&mut self.detail_writer, &self.buffered)?;
            writeln!(self.detail_writer)?;
        }
        self.detail_writer.flush()?;
        self.csv_writer.flush()?;
        Ok(())
    }

    pub fn output_paths(&self) -> (&Path, &Path) {
        (&self.detail_path, &self.csv_path)
    }
}

fn create(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}
