//! Record reader: decodes rows from a [`RowSource`] into a record type.
//!
//! A reader is bound to one record type and one source. Its binding table is
//! built lazily, on the first call to [`parse_header`](RecordReader::parse_header)
//! or [`read_record`](RecordReader::read_record), and reused for every row
//! after that.
//!
//! # Example
//!
//! ```ignore
//! use csvtag::{csv_record, ReaderOptions, RecordReader};
//!
//! csv_record! {
//!     #[derive(Debug, Default)]
//!     pub struct Person {
//!         pub name: String => "header:Name",
//!         pub age: u32 => "header:Age",
//!     }
//! }
//!
//! let data = "Age,Name\n42,Ada\n";
//! let mut reader = RecordReader::from_reader(data.as_bytes(), &ReaderOptions::default())?;
//! let mut person = Person::default();
//!
//! reader.parse_header(&mut person)?;
//! while reader.read_record(&mut person)? {
//!     println!("{:?}", person);
//! }
//! ```

use std::io;
use std::marker::PhantomData;

use csv::StringRecord;
use tracing::{debug, trace};

use crate::binding::{extract_bindings, resolve_columns, BindingTable, FieldBinding};
use crate::coerce;
use crate::error::{CsvError, Result, ValueError};
use crate::options::ReaderOptions;
use crate::record::Record;
use crate::source::{CsvRowSource, RowSource};

/// Lifecycle of a [`RecordReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No binding table yet.
    Uninitialized,
    /// Bindings built, no data row consumed yet.
    Ready,
    /// At least one data row consumed.
    Reading,
    /// The source reported end-of-input.
    Exhausted,
}

/// Decodes rows into records of type `R`.
pub struct RecordReader<R, S> {
    source: S,
    bindings: Option<BindingTable>,
    row: StringRecord,
    reuse_record: bool,
    rows_read: u64,
    state: ReaderState,
    _record: PhantomData<fn(&mut R)>,
}

impl<R: Record, T: io::Read> RecordReader<R, CsvRowSource<T>> {
    /// Create a reader tokenizing `input` with the `csv` crate.
    ///
    /// # Errors
    /// Returns [`CsvError::Config`] if `options` name a delimiter or comment
    /// character the tokenizer can't use
    pub fn from_reader(input: T, options: &ReaderOptions) -> Result<Self> {
        let mut reader = Self::new(CsvRowSource::new(input, options)?);
        reader.reuse_record = options.reuse_record;
        Ok(reader)
    }
}

impl<R: Record, S: RowSource> RecordReader<R, S> {
    /// Create a reader over an arbitrary row source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            bindings: None,
            row: StringRecord::new(),
            reuse_record: false,
            rows_read: 0,
            state: ReaderState::Uninitialized,
            _record: PhantomData,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// The binding table, once it has been built.
    pub fn bindings(&self) -> Option<&BindingTable> {
        self.bindings.as_ref()
    }

    /// Number of data rows consumed by [`read_record`](Self::read_record).
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Consume one row as header labels and resolve header-addressed fields.
    ///
    /// Call at most once per input; every call consumes another row.
    /// Returns `Ok(false)` if the source had no row left.
    ///
    /// # Errors
    ///
    /// * [`CsvError::TagDefinition`] if `R`'s tags are invalid (no row is consumed)
    /// * [`CsvError::FieldNotFound`] if a label is missing from the header
    /// * [`CsvError::Source`] if the source fails
    pub fn parse_header(&mut self, record: &mut R) -> Result<bool> {
        self.ensure_bindings(record)?;

        if !self.next_row()? {
            return Ok(false);
        }

        if let Some(bindings) = self.bindings.as_mut() {
            resolve_columns(bindings, self.row.iter())?;
        }
        Ok(true)
    }

    /// Decode the next row into `record`.
    ///
    /// Returns `Ok(true)` when `record` was populated and `Ok(false)` at
    /// end-of-input. On a decode error the fields set before the failing one
    /// keep their new values and the reader stays usable for the next row.
    ///
    /// # Errors
    ///
    /// * [`CsvError::TagDefinition`] if `R`'s tags are invalid (no row is consumed)
    /// * [`CsvError::SetValue`] if a cell can't be stored on its field
    /// * [`CsvError::Source`] if the source fails
    pub fn read_record(&mut self, record: &mut R) -> Result<bool> {
        self.ensure_bindings(record)?;

        if !self.next_row()? {
            return Ok(false);
        }

        self.rows_read += 1;
        self.state = ReaderState::Reading;

        let bindings = self.bindings.iter().flat_map(BindingTable::iter);
        for binding in bindings {
            let value = self.row.get(binding.column_index);
            let outcome = match value {
                Some(value) => set_field(record, binding, value),
                None => Err(ValueError::MissingColumn {
                    index: binding.column_index,
                    len: self.row.len(),
                }),
            };

            outcome.map_err(|cause| CsvError::SetValue {
                row: self.rows_read,
                value: value.unwrap_or_default().to_string(),
                field: binding.field_name.clone(),
                cause,
            })?;
        }

        trace!("Decoded record {}", self.rows_read);
        Ok(true)
    }

    fn ensure_bindings(&mut self, record: &mut R) -> Result<()> {
        if self.bindings.is_none() {
            self.bindings = Some(extract_bindings(record)?);
            self.state = ReaderState::Ready;
        }
        Ok(())
    }

    /// Pull the next row into the buffer; `false` once the source is exhausted.
    fn next_row(&mut self) -> Result<bool> {
        if self.state == ReaderState::Exhausted {
            return Ok(false);
        }

        if !self.reuse_record {
            self.row = StringRecord::new();
        }

        if self.source.read_row(&mut self.row)? {
            return Ok(true);
        }

        debug!("Row source exhausted after {} records", self.rows_read);
        self.state = ReaderState::Exhausted;
        Ok(false)
    }
}

impl<R: Record + Default, S: RowSource> RecordReader<R, S> {
    /// Iterate over the remaining rows, decoding each into a fresh record.
    pub fn records(&mut self) -> Records<'_, R, S> {
        Records {
            reader: self,
            finished: false,
        }
    }
}

/// Iterator returned by [`RecordReader::records`].
///
/// Yields row-level decode errors and keeps going; stops after end-of-input
/// or any other error.
pub struct Records<'r, R, S> {
    reader: &'r mut RecordReader<R, S>,
    finished: bool,
}

impl<R: Record + Default, S: RowSource> Iterator for Records<'_, R, S> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut record = R::default();
        match self.reader.read_record(&mut record) {
            Ok(true) => Some(Ok(record)),
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                if !matches!(e, CsvError::SetValue { .. }) {
                    self.finished = true;
                }
                Some(Err(e))
            }
        }
    }
}

fn set_field<R: Record>(record: &mut R, binding: &FieldBinding, value: &str) -> std::result::Result<(), ValueError> {
    if binding.use_custom_setter {
        let setter = record
            .custom_setter()
            .ok_or_else(|| ValueError::Custom("record no longer provides a CustomSetter".to_string()))?;
        return setter
            .set_field(&binding.field_name, value)
            .map_err(ValueError::Custom);
    }

    let kind = binding.kind.ok_or(ValueError::UnsupportedDataType)?;
    let slot = record
        .field_mut(&binding.field_name)
        .ok_or(ValueError::TypeMismatch(kind.type_name()))?;
    coerce::assign(kind, slot, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TagError;
    use crate::record::CustomSetter;
    use crate::source::IterRowSource;

    const HEADER_DATA: &str = "field1,fieldTwo,uselessGarbage,Field3
String,12,asdf65434,123456
OtherString,14, f8jf8j,48484848";

    csv_record! {
        #[derive(Debug, Default, PartialEq)]
        pub struct HeaderRecord {
            pub ignored: i32,
            pub field1: String => "header:field1",
            pub field2: i32 => "header:fieldTwo",
            pub field3: i32 => "header:Field3",
        }
    }

    csv_record! {
        #[derive(Debug, Default, PartialEq)]
        pub struct IndexRecord {
            pub field1: String => "index:1",
            pub field2: i32 => "index:3",
        }
    }

    csv_record! {
        #[derive(Debug, Default)]
        pub struct Shouting: CustomSetter {
            pub id: u32 => "index:0",
            pub word: String => "index:1;useCustomSetter",
            pub tail: String => "index:2",
        }
    }

    impl CustomSetter for Shouting {
        fn set_field(&mut self, field: &str, value: &str) -> std::result::Result<(), String> {
            if value.is_empty() {
                return Err(format!("{} may not be empty", field));
            }
            self.word = format!("{}!!", value.to_uppercase());
            Ok(())
        }
    }

    csv_record! {
        #[derive(Debug, Default)]
        pub struct Waived: CustomSetter {
            pub list: Vec<u8> => "index:0",
        }
    }

    impl CustomSetter for Waived {
        fn set_field(&mut self, _field: &str, _value: &str) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    csv_record! {
        #[derive(Debug, Default)]
        pub struct Malformed {
            pub bad: String => "Header:field1",
        }
    }

    fn rows(data: &[&[&str]]) -> IterRowSource<std::vec::IntoIter<Vec<String>>> {
        IterRowSource::new(
            data.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_header_addressing() {
        let mut reader = RecordReader::from_reader(HEADER_DATA.as_bytes(), &ReaderOptions::default()).unwrap();
        let mut record = HeaderRecord::default();

        assert!(reader.parse_header(&mut HeaderRecord::default()).unwrap());
        assert_eq!(reader.state(), ReaderState::Ready);

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(
            record,
            HeaderRecord {
                ignored: 0,
                field1: "String".to_string(),
                field2: 12,
                field3: 123456,
            }
        );

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(record.field1, "OtherString");
        assert_eq!(record.field2, 14);
        assert_eq!(record.field3, 48484848);

        assert!(!reader.read_record(&mut record).unwrap());
        assert_eq!(reader.state(), ReaderState::Exhausted);
        assert_eq!(reader.rows_read(), 2);
    }

    #[test]
    fn test_index_addressing_without_header() {
        let data = "asdlkeim\tfirstData\tasdon\t46\tafd&&svdsaf\t4g5245g254
asd5g4lkeim\t\"second\tData\"\ta5g5on\t47\tafd&&5h67af\t4g5sbg254
asdlk654eim\tthirdData\ta$&*^on\t48\ta$%&*af\t4g5254654";
        let options = ReaderOptions::new().with_delimiter('\t');
        let mut reader = RecordReader::from_reader(data.as_bytes(), &options).unwrap();
        let mut record = IndexRecord::default();

        let mut decoded = Vec::new();
        while reader.read_record(&mut record).unwrap() {
            decoded.push((record.field1.clone(), record.field2));
        }

        assert_eq!(
            decoded,
            vec![
                ("firstData".to_string(), 46),
                ("second\tData".to_string(), 47),
                ("thirdData".to_string(), 48),
            ]
        );
    }

    #[test]
    fn test_index_scenario() {
        let mut reader = RecordReader::new(rows(&[&["a", "b", "c", "46", "d"]]));
        let mut record = IndexRecord::default();

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(
            record,
            IndexRecord {
                field1: "b".to_string(),
                field2: 46,
            }
        );
    }

    #[test]
    fn test_extraction_fails_before_reading() {
        let mut reader = RecordReader::new(rows(&[&["field1"], &["value"]]));

        let err = reader.parse_header(&mut Malformed::default()).unwrap_err();
        assert_eq!(err.tag_error(), Some(&TagError::MalformedTag));
        assert_eq!(reader.state(), ReaderState::Uninitialized);
        assert!(reader.bindings().is_none());

        let mut remaining = StringRecord::new();
        let mut source = reader.into_source();
        assert!(source.read_row(&mut remaining).unwrap());
        assert_eq!(&remaining[0], "field1");
    }

    #[test]
    fn test_field_not_found() {
        csv_record! {
            #[derive(Default)]
            pub struct Missing {
                pub field1: String => "header:thiswontbefound",
            }
        }

        let mut reader = RecordReader::from_reader(HEADER_DATA.as_bytes(), &ReaderOptions::default()).unwrap();
        let err = reader.parse_header(&mut Missing::default()).unwrap_err();

        match err {
            CsvError::FieldNotFound { field, header } => {
                assert_eq!(field, "field1");
                assert_eq!(header, "thiswontbefound");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_setter_error_keeps_reader_usable() {
        let mut reader = RecordReader::new(rows(&[
            &["1", "hi", "x"],
            &["2", "", "y"],
            &["3", "yo", "z"],
        ]));
        let mut record = Shouting::default();

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(record.word, "HI!!");

        let err = reader.read_record(&mut record).unwrap_err();
        match &err {
            CsvError::SetValue { row, value, field, cause } => {
                assert_eq!(*row, 2);
                assert_eq!(value, "");
                assert_eq!(field, "word");
                assert_eq!(cause, &ValueError::Custom("word may not be empty".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Fields before the failing one keep their new values.
        assert_eq!(record.id, 2);
        assert_eq!(record.tail, "x");

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(record.id, 3);
        assert_eq!(record.word, "YO!!");
        assert_eq!(record.tail, "z");
    }

    #[test]
    fn test_short_row_is_missing_column() {
        let mut reader = RecordReader::new(rows(&[&["a", "b"], &["a", "b", "c", "4"]]));
        let mut record = IndexRecord::default();

        let err = reader.read_record(&mut record).unwrap_err();
        assert_eq!(
            err.value_error(),
            Some(&ValueError::MissingColumn { index: 3, len: 2 })
        );
        assert_eq!(record.field1, "b");

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(record.field2, 4);
    }

    #[test]
    fn test_parse_failure_names_value_and_field() {
        let mut reader = RecordReader::new(rows(&[&["a", "b", "c", "forty"]]));
        let err = reader.read_record(&mut IndexRecord::default()).unwrap_err();

        match err {
            CsvError::SetValue { value, field, cause, .. } => {
                assert_eq!(value, "forty");
                assert_eq!(field, "field2");
                assert!(matches!(cause, ValueError::Int(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_waived_type_fails_at_row_time() {
        let mut reader = RecordReader::new(rows(&[&["1"]]));
        let err = reader.read_record(&mut Waived::default()).unwrap_err();
        assert_eq!(err.value_error(), Some(&ValueError::UnsupportedDataType));
    }

    #[test]
    fn test_end_of_input_is_sticky() {
        let mut reader = RecordReader::new(rows(&[]));
        let mut record = IndexRecord::default();

        assert!(!reader.read_record(&mut record).unwrap());
        assert!(!reader.read_record(&mut record).unwrap());
        assert_eq!(reader.state(), ReaderState::Exhausted);
        assert!(reader.bindings().is_some());
    }

    #[test]
    fn test_parse_header_on_empty_input() {
        let mut reader = RecordReader::from_reader("".as_bytes(), &ReaderOptions::default()).unwrap();
        assert!(!reader.parse_header(&mut HeaderRecord::default()).unwrap());
        assert_eq!(reader.state(), ReaderState::Exhausted);
    }

    #[test]
    fn test_second_parse_header_consumes_a_row() {
        let mut reader = RecordReader::new(rows(&[
            &["h0", "h1", "h2", "h3"],
            &["a", "x", "c", "1"],
            &["a", "y", "c", "2"],
        ]));
        let mut record = IndexRecord::default();

        assert!(reader.parse_header(&mut record).unwrap());
        assert!(reader.parse_header(&mut record).unwrap());
        assert_eq!(reader.rows_read(), 0);

        assert!(reader.read_record(&mut record).unwrap());
        assert_eq!(record.field1, "y");
        assert_eq!(record.field2, 2);
        assert!(!reader.read_record(&mut record).unwrap());
    }

    #[test]
    fn test_second_parse_header_resolves_against_data_row() {
        let mut reader = RecordReader::from_reader(HEADER_DATA.as_bytes(), &ReaderOptions::default()).unwrap();
        let mut record = HeaderRecord::default();

        assert!(reader.parse_header(&mut record).unwrap());
        let err = reader.parse_header(&mut record).unwrap_err();
        assert!(matches!(err, CsvError::FieldNotFound { .. }));
    }

    #[test]
    fn test_unusable_delimiter_fails_before_reading() {
        let options = ReaderOptions::new().with_delimiter('§');
        let result = RecordReader::<IndexRecord, _>::from_reader("x§y,z\n".as_bytes(), &options);
        assert!(matches!(result, Err(CsvError::Config(_))));

        let options = ReaderOptions::new().with_delimiter('"');
        let result = RecordReader::<IndexRecord, _>::from_reader("\"x\",y\n".as_bytes(), &options);
        assert!(matches!(result, Err(CsvError::Config(_))));
    }

    #[test]
    fn test_header_binding_without_header_reads_first_column() {
        let mut reader = RecordReader::new(rows(&[&["first", "7", "x", "8"]]));
        let mut record = HeaderRecord::default();

        let err = reader.read_record(&mut record).unwrap_err();
        // field1 reads column 0, field2 also reads column 0 and fails to parse
        assert_eq!(record.field1, "first");
        assert!(matches!(err.value_error(), Some(ValueError::Int(_))));
    }

    #[test]
    fn test_bindings_built_once() {
        let mut reader = RecordReader::new(rows(&[&["a", "b", "c", "1"], &["a", "b", "c", "2"]]));
        let mut record = IndexRecord::default();

        assert_eq!(reader.state(), ReaderState::Uninitialized);
        reader.read_record(&mut record).unwrap();
        assert_eq!(reader.state(), ReaderState::Reading);

        let before = reader.bindings().cloned();
        reader.read_record(&mut record).unwrap();
        assert_eq!(reader.bindings().cloned(), before);
    }

    #[test]
    fn test_reuse_record_is_not_observable() {
        let options = ReaderOptions::new().with_reuse_record(true);
        let mut reader = RecordReader::from_reader(HEADER_DATA.as_bytes(), &options).unwrap();
        let mut record = HeaderRecord::default();

        reader.parse_header(&mut record).unwrap();
        let decoded: Vec<String> = std::iter::from_fn(|| {
            match reader.read_record(&mut record) {
                Ok(true) => Some(record.field1.clone()),
                _ => None,
            }
        })
        .collect();

        assert_eq!(decoded, vec!["String", "OtherString"]);
    }

    #[test]
    fn test_records_iterator() {
        let mut reader = RecordReader::new(rows(&[
            &["a", "x", "c", "1"],
            &["a", "y", "c", "oops"],
            &["a", "z", "c", "3"],
        ]));

        let results: Vec<Result<IndexRecord>> = reader.records().collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().field1, "x");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().field2, 3);
    }

    #[test]
    fn test_records_iterator_stops_on_definition_error() {
        let mut reader: RecordReader<Malformed, _> = RecordReader::new(rows(&[&["a"], &["b"]]));
        let results: Vec<Result<Malformed>> = reader.records().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
