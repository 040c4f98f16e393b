//! Utilities for reading CSV files.

use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

pub struct CsvReader<R> {
    lines: Lines<R>,
    line: usize,
}
impl CsvReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// The 1-based number of the most recently read line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the next non-blank record.
    pub fn read(&mut self) -> Option<Result<Vec<String>, io::Error>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            self.line += 1;
            let line = if self.line == 1 {
                line.trim_start_matches(BYTE_ORDER_MARK)
            } else {
                &line
            };
            let line = line.trim_end_matches('\r');
            if !line.trim().is_empty() {
                return Some(Ok(line.split(',').map(ToString::to_string).collect()));
            }
        }
    }
}

impl<R: BufRead> Iterator for CsvReader<R> {
    type Item = Result<Vec<String>, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// Column names of a CSV file, taken from its first record.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    columns: Vec<String>,
}
impl Header {
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name.trim() == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl From<Vec<String>> for Header {
    fn from(columns: Vec<String>) -> Self {
        Self { columns }
    }
}
