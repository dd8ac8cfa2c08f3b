//! Input sources: fully-materialized CSV and row-group-chunked Parquet.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use ven_core::SimTime;

use crate::error::{IngestError, IngestResult};
use crate::row::Row;

// ── Format sniffing ───────────────────────────────────────────────────────────

/// The two supported input formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Parquet,
}

impl SourceFormat {
    /// Detect the format from the file extension; anything else aborts the
    /// run with `UnsupportedFormat`.
    pub fn detect(path: &Path) -> IngestResult<SourceFormat> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv")     => Ok(SourceFormat::Csv),
            Some("parquet") => Ok(SourceFormat::Parquet),
            _ => Err(IngestError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

// ── CsvSource ─────────────────────────────────────────────────────────────────

/// A fully-materialized source: all rows are parsed at open time (failing
/// fast on malformed data) and served in one shot by the first `read_until`.
pub struct CsvSource<R: Row> {
    rows: Option<Vec<R>>,
}

impl<R: Row> CsvSource<R> {
    pub fn open(path: &Path) -> IngestResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`open`](Self::open) but for any `Read` source — handy for
    /// tests with in-memory cursors.
    pub fn from_reader<T: Read>(reader: T) -> IngestResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<R>()
            .collect::<Result<Vec<R>, csv::Error>>()?;
        Ok(Self { rows: Some(rows) })
    }

    pub fn read_until(&mut self, _bound: SimTime) -> Vec<R> {
        self.rows.take().unwrap_or_default()
    }
}

// ── ParquetSource ─────────────────────────────────────────────────────────────

/// A row-group-chunked source.
///
/// Each `read_until(bound)` serves whole row groups whose maximum timestamp
/// is ≤ `bound`.  The first group that would cross the bound is decoded once
/// and stashed as a lookahead; the next call serves it first (once the bound
/// has moved past it), so no file bytes are read twice and no row is ever
/// dropped or reordered.
pub struct ParquetSource<R: Row> {
    path:       PathBuf,
    num_groups: usize,
    next_group: usize,
    lookahead:  Option<Vec<R>>,
}

impl<R: Row> ParquetSource<R> {
    pub fn open(path: &Path) -> IngestResult<Self> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let num_groups = builder.metadata().num_row_groups();
        Ok(Self {
            path: path.to_path_buf(),
            num_groups,
            next_group: 0,
            lookahead: None,
        })
    }

    /// Decode one row group into typed rows.
    fn read_group(&self, group: usize) -> IngestResult<Vec<R>> {
        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_row_groups(vec![group])
            .build()?;

        let mut rows = Vec::new();
        for batch in reader {
            rows.extend(R::decode_batch(&batch?)?);
        }
        Ok(rows)
    }

    pub fn read_until(&mut self, bound: SimTime) -> IngestResult<Vec<R>> {
        let mut out = Vec::new();

        // Serve the stashed boundary group first, if it now fits.
        if let Some(pending) = self.lookahead.take() {
            if max_time(&pending) <= bound {
                out.extend(pending);
            } else {
                self.lookahead = Some(pending);
                return Ok(out);
            }
        }

        while self.next_group < self.num_groups {
            let rows = self.read_group(self.next_group)?;
            self.next_group += 1;
            if max_time(&rows) <= bound {
                out.extend(rows);
            } else {
                self.lookahead = Some(rows);
                break;
            }
        }
        Ok(out)
    }

    /// `true` once every row group (and any lookahead) has been served.
    pub fn exhausted(&self) -> bool {
        self.next_group >= self.num_groups && self.lookahead.is_none()
    }
}

fn max_time<R: Row>(rows: &[R]) -> SimTime {
    rows.iter().map(Row::time).max().unwrap_or(SimTime::ZERO)
}

// ── InputSource ───────────────────────────────────────────────────────────────

/// Either supported source behind one `read_until` surface.
pub enum InputSource<R: Row> {
    Csv(CsvSource<R>),
    Parquet(ParquetSource<R>),
}

impl<R: Row> InputSource<R> {
    /// Open `path`, sniffing the format from its extension.
    pub fn open(path: &Path) -> IngestResult<Self> {
        match SourceFormat::detect(path)? {
            SourceFormat::Csv     => Ok(InputSource::Csv(CsvSource::open(path)?)),
            SourceFormat::Parquet => Ok(InputSource::Parquet(ParquetSource::open(path)?)),
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            InputSource::Csv(_)     => SourceFormat::Csv,
            InputSource::Parquet(_) => SourceFormat::Parquet,
        }
    }

    /// Rows newly available up to `bound` (see the crate docs for the
    /// per-format contract).
    pub fn read_until(&mut self, bound: SimTime) -> IngestResult<Vec<R>> {
        match self {
            InputSource::Csv(s)     => Ok(s.read_until(bound)),
            InputSource::Parquet(s) => s.read_until(bound),
        }
    }
}
