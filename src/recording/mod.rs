// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recording and export system.
//!
//! This module provides:
//! - The newest-first recording buffer
//! - Control address derivation and naming
//! - Sparse CSV export
//! - Per-control chart series

pub mod capture;
pub mod export;
pub mod registry;
pub mod summary;

pub use capture::{RecordedEvent, RecordingBuffer, DEFAULT_TRIM_GAP_TICKS};
pub use export::{to_csv, CsvExporter};
pub use registry::{ControlAddress, ControlNameMap, ControlRegistry, UNNAMED_CONTROL};
pub use summary::{chart_series, ChartSeries};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = RecordingBuffer::new();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_registry_creation() {
        let registry = ControlRegistry::new();
        assert!(registry.known().is_empty());
        assert!(registry.device_id().is_none());
    }

    #[test]
    fn test_exporter_creation() {
        let exporter = CsvExporter::new("exports");
        assert_eq!(exporter.output_dir(), std::path::Path::new("exports"));
    }
}
