use crate::domain::student::Student;
use crate::error::{BillingError, Result};
use std::io::Read;

/// Reads student registrations from a CSV source.
///
/// Wraps `csv::Reader` and yields `Result<Student>` per row, trimming
/// whitespace and tolerating short records so optional columns can be
/// left off entirely.
pub struct StudentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> StudentReader<R> {
    /// Creates a new `StudentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows, so a
    /// large import streams instead of loading everything up front.
    pub fn students(self) -> impl Iterator<Item = Result<Student>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BillingError::from))
    }
}
