//! JSON output for decoded records.
//!
//! Used by the CLI to print records as NDJSON (one object per line) or as a
//! single JSON array.

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Error type for writing decoded records
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output layout for decoded records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Ndjson,
    JsonArray,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ndjson" | "jsonl" => Ok(OutputFormat::Ndjson),
            "json" | "array" => Ok(OutputFormat::JsonArray),
            other => Err(format!("unknown output format '{}' (expected ndjson or json)", other)),
        }
    }
}

/// Writes records one at a time in the chosen [`OutputFormat`].
pub struct RecordWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer; JSON arrays get their opening bracket immediately.
    pub fn new(mut writer: W, format: OutputFormat) -> Result<Self, SerializationError> {
        if format == OutputFormat::JsonArray {
            write!(writer, "[")?;
        }
        Ok(Self {
            writer,
            format,
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), SerializationError> {
        let json = serde_json::to_string(record)?;
        match self.format {
            OutputFormat::Ndjson => writeln!(self.writer, "{}", json)?,
            OutputFormat::JsonArray => {
                if self.written > 0 {
                    write!(self.writer, ",")?;
                }
                write!(self.writer, "{}", json)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the array (if any) and flush.
    pub fn finish(mut self) -> Result<W, SerializationError> {
        if self.format == OutputFormat::JsonArray {
            writeln!(self.writer, "]")?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
