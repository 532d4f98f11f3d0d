//! Building an index from external sources

use std::io::Read;

use derivative::Derivative;
use log::{info, warn};

use crate::base::{Key, Len, Member};
use crate::error::{Error, Result};
use crate::index::Index;

/// A source an index can be built from
pub trait Indexer {
    /// Consumes the source and returns the index
    fn to_index(&mut self) -> Result<Index>;
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct CsvOptions {
    /// If true, the first line is skipped
    #[derivative(Default(value = "false"))]
    pub header: bool,

    /// Column holding the keys
    #[derivative(Default(value = "0"))]
    pub key_column: usize,

    /// Column holding the domain members
    #[derivative(Default(value = "1"))]
    pub member_column: usize,

    #[derivative(Default(value = "b','"))]
    pub delimiter: u8,
}

/// Turns a CSV row into a (key, member) pair
pub type RowParser = Box<dyn FnMut(&csv::StringRecord, u64) -> Result<(Key, Member)>>;

/// Builds an index from CSV rows
pub struct CsvIndexer<R: Read> {
    reader: csv::Reader<R>,
    parse: RowParser,
}

fn parse_column(record: &csv::StringRecord, line: u64, column: usize) -> Result<u32> {
    let value = record
        .get(column)
        .ok_or(Error::MissingColumn { line, column })?;

    value.trim().parse::<u32>().map_err(|_| Error::InvalidField {
        line,
        column,
        value: value.to_string(),
    })
}

impl<R: Read> CsvIndexer<R> {
    /// Reads keys and members from the columns given in the options
    pub fn new(reader: R, options: &CsvOptions) -> Self {
        let key_column = options.key_column;
        let member_column = options.member_column;

        Self::with_parser(
            reader,
            options,
            Box::new(move |record: &csv::StringRecord, line: u64| {
                Ok((
                    parse_column(record, line, key_column)?,
                    parse_column(record, line, member_column)?,
                ))
            }),
        )
    }

    /// Uses a custom parser (the column options are ignored)
    pub fn with_parser(reader: R, options: &CsvOptions, parse: RowParser) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(options.header)
            .delimiter(options.delimiter)
            .flexible(true)
            .from_reader(reader);

        Self { reader, parse }
    }
}

impl<R: Read> Indexer for CsvIndexer<R> {
    fn to_index(&mut self) -> Result<Index> {
        let mut index = Index::new();
        let mut record = csv::StringRecord::new();
        let mut rows = 0u64;

        while self.reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            let (key, member) = (self.parse)(&record, line)?;
            index.add(key, member);
            rows += 1;
        }

        if rows == 0 {
            warn!("No row found in the CSV input");
        }
        info!(
            "Indexed {} rows: {} keys over {} members",
            rows,
            index.table().len(),
            index.domain().len()
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns() {
        let data = "name,person,fruit\nbob,100,1\nbob,100,3\nsue,101,4\n";
        let options = CsvOptions {
            header: true,
            key_column: 1,
            member_column: 2,
            ..Default::default()
        };

        let index = CsvIndexer::new(data.as_bytes(), &options)
            .to_index()
            .unwrap();

        assert_eq!(index.table().len(), 2);
        assert_eq!(index.domain().members(), &[1, 3, 4]);
        assert!(index.has(100, 3).unwrap());
        assert!(!index.has(101, 3).unwrap());
    }

    #[test]
    fn test_invalid_field() {
        let data = "100,1\n100,x\n";
        match CsvIndexer::new(data.as_bytes(), &CsvOptions::default()).to_index() {
            Err(Error::InvalidField { line, column, value }) => {
                assert_eq!((line, column, value.as_str()), (2, 1, "x"));
            }
            other => panic!("expected an invalid field, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_column() {
        let data = "100,1\n101\n";
        match CsvIndexer::new(data.as_bytes(), &CsvOptions::default()).to_index() {
            Err(Error::MissingColumn { line, column }) => assert_eq!((line, column), (2, 1)),
            other => panic!("expected a missing column, got {:?}", other.map(|_| ())),
        }
    }
}
