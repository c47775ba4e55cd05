//! Row sources: the tokenizers that split input into raw cells.
//!
//! A [`RowSource`] hands over one row of already-split cells per call.
//! Quoting, escaping and delimiter handling all live behind this trait.

use std::io;

use csv::StringRecord;

use crate::error::Result;
use crate::options::ReaderOptions;

/// Supplies rows of raw cells, strictly in order.
pub trait RowSource {
    /// Read the next row into `row`.
    ///
    /// Returns `Ok(false)` at end-of-input, leaving `row` unspecified.
    fn read_row(&mut self, row: &mut StringRecord) -> Result<bool>;
}

/// Row source backed by the `csv` crate.
pub struct CsvRowSource<R> {
    reader: csv::Reader<R>,
}

impl<R: io::Read> CsvRowSource<R> {
    /// Build a tokenizer over `input`.
    ///
    /// # Errors
    /// Returns [`CsvError::Config`](crate::CsvError::Config) if the delimiter
    /// or comment character can't be used
    pub fn new(input: R, options: &ReaderOptions) -> Result<Self> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(options.delimiter_byte()?)
            .comment(options.comment_byte()?)
            .flexible(options.flexible)
            // Header rows are consumed explicitly by the record reader
            .has_headers(false);

        Ok(Self {
            reader: builder.from_reader(input),
        })
    }

    /// Position of the last row read from the underlying tokenizer.
    pub fn position(&self) -> &csv::Position {
        self.reader.position()
    }
}

impl<R: io::Read> RowSource for CsvRowSource<R> {
    fn read_row(&mut self, row: &mut StringRecord) -> Result<bool> {
        Ok(self.reader.read_record(row)?)
    }
}

/// Row source over rows that were split elsewhere.
pub struct IterRowSource<I> {
    rows: I,
}

impl<I, Row, Cell> IterRowSource<I>
where
    I: Iterator<Item = Row>,
    Row: IntoIterator<Item = Cell>,
    Cell: AsRef<str>,
{
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<I, Row, Cell> RowSource for IterRowSource<I>
where
    I: Iterator<Item = Row>,
    Row: IntoIterator<Item = Cell>,
    Cell: AsRef<str>,
{
    fn read_row(&mut self, row: &mut StringRecord) -> Result<bool> {
        let Some(cells) = self.rows.next() else {
            return Ok(false);
        };

        row.clear();
        for cell in cells {
            row.push_field(cell.as_ref());
        }
        Ok(true)
    }
}
