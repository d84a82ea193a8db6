// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! CSV export of a recording.
//!
//! Produces a sparse table with one column per control label and one row
//! per recorded event:
//!
//! ```text
//! ticks,position,Kick (0x90 0x24),Cutoff (0xb0 0x4a)
//! 0,0.0.0.0,,127
//! 12,0.0.0.12,,,64
//! ```
//!
//! Each row carries exactly one value, placed after `column + 1` commas.
//! Names are written verbatim; a comma inside a name shifts the columns.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::capture::RecordedEvent;
use super::registry::{label_in, ControlNameMap};
use crate::error::ExportError;

const HEADER_PREFIX: &str = "ticks,position,";

/// Serialize events to CSV.
///
/// `events` are taken in storage order (newest first) and written oldest
/// first.
pub fn to_csv<'a, I>(events: I, names: &ControlNameMap) -> String
where
    I: IntoIterator<Item = &'a RecordedEvent>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();

    for event in events.into_iter().rev() {
        let label = label_in(names, &event.address());
        let column = match columns.iter().position(|c| *c == label) {
            Some(index) => index,
            None => {
                columns.push(label);
                columns.len() - 1
            }
        };

        let value = event.value().map(|v| v.to_string()).unwrap_or_default();
        rows.push(format!(
            "{},{}{}{}",
            event.ticks(),
            event.position_label(),
            ",".repeat(column + 1),
            value
        ));
    }

    format!("{}{}\n{}", HEADER_PREFIX, columns.join(","), rows.join("\n"))
}

/// Writes recordings as `{download_name}.csv` files
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Create an exporter writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the export for `download_name` will be written to
    pub fn path_for(&self, download_name: &str) -> Result<PathBuf, ExportError> {
        let stem = download_name.trim();
        if stem.is_empty() {
            return Err(ExportError::EmptyName);
        }
        Ok(self.output_dir.join(format!("{}.csv", stem)))
    }

    /// Write already serialized CSV text
    pub fn export(&self, download_name: &str, csv: &str) -> Result<PathBuf, ExportError> {
        let path = self.path_for(download_name)?;
        fs::create_dir_all(&self.output_dir)?;
        fs::write(&path, csv)?;
        info!(path = %path.display(), bytes = csv.len(), "Exported recording");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::MidiMessage;
    use crate::recording::registry::ControlAddress;
    use crate::recording::RecordingBuffer;
    use crate::timing::Position;

    fn record(buffer: &mut RecordingBuffer, ticks: u64, bytes: &[u8]) {
        let position = Position {
            ticks,
            ..Position::ZERO
        };
        buffer.append(RecordedEvent::new(MidiMessage::new(0.0, bytes), &position));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let buffer = RecordingBuffer::new();
        assert_eq!(to_csv(buffer.iter(), &ControlNameMap::new()), "ticks,position,\n");
    }

    #[test]
    fn test_sparse_columns_oldest_first() {
        let mut buffer = RecordingBuffer::new();
        record(&mut buffer, 0, &[0xB0, 0x01, 10]);
        record(&mut buffer, 1, &[0xB0, 0x02, 20]);
        record(&mut buffer, 2, &[0xB0, 0x01, 30]);

        let mut names = ControlNameMap::new();
        names.insert(ControlAddress::from("0xb0 0x1"), "Mod".to_string());

        let csv = to_csv(buffer.iter(), &names);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ticks,position,Mod (0xb0 0x1),unnamed (0xb0 0x2)");
        assert_eq!(lines[1], "0,0.0.0.0,10");
        assert_eq!(lines[2], "1,0.0.0.0,,20");
        assert_eq!(lines[3], "2,0.0.0.0,30");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_missing_value_byte_leaves_cell_empty() {
        let mut buffer = RecordingBuffer::new();
        record(&mut buffer, 7, &[0xC0, 0x05]);
        let csv = to_csv(buffer.iter(), &ControlNameMap::new());
        assert_eq!(csv, "ticks,position,unnamed (0xc0 0x5)\n7,0.0.0.0,");
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let path = exporter.export("take-1", "ticks,position,\n").unwrap();
        assert_eq!(path, dir.path().join("take-1.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "ticks,position,\n");
    }

    #[test]
    fn test_export_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());
        assert!(matches!(exporter.export("  ", ""), Err(ExportError::EmptyName)));
    }
}
