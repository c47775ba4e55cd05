//! Construction-time reader options.
//!
//! Options can be built in code or loaded from YAML:
//!
//! ```yaml
//! delimiter: "\t"
//! comment: "#"
//! reuse_record: true
//! flexible: false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CsvError, Result};

pub const DEFAULT_DELIMITER: char = ',';

/// Options controlling how rows are tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Cell delimiter. NUL, `\n`, `\r`, `"` and non-ASCII characters are rejected.
    pub delimiter: char,
    /// Lines starting with this character are skipped.
    pub comment: Option<char>,
    /// Reuse one row buffer across reads.
    pub reuse_record: bool,
    /// Allow rows with differing numbers of cells.
    pub flexible: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            comment: None,
            reuse_record: false,
            flexible: false,
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_comment(mut self, comment: char) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn with_reuse_record(mut self, reuse_record: bool) -> Self {
        self.reuse_record = reuse_record;
        self
    }

    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Load options from a YAML file. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't valid YAML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        serde_yaml::from_str(&contents).map_err(|e| {
            CsvError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// The delimiter byte handed to the tokenizer.
    ///
    /// # Errors
    /// Returns [`CsvError::Config`] if the delimiter isn't a usable single byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        tokenizer_byte(self.delimiter)
            .ok_or_else(|| CsvError::Config(format!("invalid delimiter {:?}", self.delimiter)))
    }

    /// The comment byte handed to the tokenizer, if any.
    ///
    /// # Errors
    /// Returns [`CsvError::Config`] if the comment character isn't a usable
    /// single byte or equals the delimiter
    pub fn comment_byte(&self) -> Result<Option<u8>> {
        let Some(comment) = self.comment else {
            return Ok(None);
        };

        let byte = tokenizer_byte(comment)
            .ok_or_else(|| CsvError::Config(format!("invalid comment character {:?}", comment)))?;
        if comment == self.delimiter {
            return Err(CsvError::Config(format!(
                "comment character {:?} is also the delimiter",
                comment
            )));
        }
        Ok(Some(byte))
    }

    /// Check that the tokenizer can use these options.
    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        self.comment_byte()?;
        Ok(())
    }
}

/// NUL, line breaks and the quote character are reserved; the tokenizer
/// only splits on single ASCII bytes.
fn tokenizer_byte(c: char) -> Option<u8> {
    match c {
        '\0' | '\n' | '\r' | '"' => None,
        c if c.is_ascii() => Some(c as u8),
        _ => None,
    }
}
