use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// One memory instruction of the trace, preceded by `precursor` non-memory instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceRecord {
    pub precursor: u64,
    pub addr: u64,
    pub is_write: bool,
}

impl TraceRecord {
    pub fn read(precursor: u64, addr: u64) -> Self {
        Self {
            precursor,
            addr,
            is_write: false,
        }
    }

    pub fn write(precursor: u64, addr: u64) -> Self {
        Self {
            precursor,
            addr,
            is_write: true,
        }
    }
}

/// Terminal trace failures.  A core cannot make progress past a record it cannot read, so every
/// variant aborts the run.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("invalid trace format at line {line}: expected 3 or 4 fields, found {fields}: {text:?}")]
    InvalidTraceFormat {
        line: usize,
        fields: usize,
        text: String,
    },
    #[error("unknown request type {kind:?} at line {line}: {text:?}")]
    UnknownRequestKind {
        line: usize,
        kind: String,
        text: String,
    },
    #[error("cannot parse {field} at line {line}: {text:?}")]
    InvalidTraceField {
        line: usize,
        field: &'static str,
        text: String,
    },
    #[error("error reading trace at line {line}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// Sequential producer of trace records.
pub trait TraceSource {
    /// Next record in program order, or `Ok(None)` once the trace is exhausted.
    fn next_record(&mut self) -> Result<Option<TraceRecord>, TraceError>;
}

impl<T: TraceSource + ?Sized> TraceSource for Box<T> {
    fn next_record(&mut self) -> Result<Option<TraceRecord>, TraceError> {
        (**self).next_record()
    }
}

/// Replays an in-memory list of records.
#[derive(Debug, Default, Clone)]
pub struct ReplayTrace {
    records: VecDeque<TraceRecord>,
}

impl ReplayTrace {
    pub fn new(records: impl IntoIterator<Item = TraceRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl TraceSource for ReplayTrace {
    fn next_record(&mut self) -> Result<Option<TraceRecord>, TraceError> {
        Ok(self.records.pop_front())
    }
}

/// Reader for USIMM-style text traces, one record per line:
///
/// ```text
/// <precursor> <R|W> 0x<address> [0x<pc>]
/// ```
///
/// The optional fourth field is accepted and ignored.
#[derive(Debug)]
pub struct UsimmTraceReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl UsimmTraceReader<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> UsimmTraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// 1-based number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> TraceSource for UsimmTraceReader<R> {
    fn next_record(&mut self) -> Result<Option<TraceRecord>, TraceError> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf);
            match read {
                Ok(0) => return Ok(None),
                Ok(_) => self.line += 1,
                Err(source) => {
                    self.line += 1;
                    return Err(TraceError::Io {
                        line: self.line,
                        source,
                    });
                }
            }
            let text = self.buf.trim_end_matches(&['\n', '\r'][..]);
            if text.trim().is_empty() {
                continue;
            }
            return parse_line(self.line, text).map(Some);
        }
    }
}

pub fn parse_line(line: usize, text: &str) -> Result<TraceRecord, TraceError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() != 3 && words.len() != 4 {
        return Err(TraceError::InvalidTraceFormat {
            line,
            fields: words.len(),
            text: text.to_string(),
        });
    }
    let is_write = match words[1] {
        "R" => false,
        "W" => true,
        other => {
            return Err(TraceError::UnknownRequestKind {
                line,
                kind: other.to_string(),
                text: text.to_string(),
            })
        }
    };
    let precursor = words[0]
        .parse::<u64>()
        .map_err(|_| TraceError::InvalidTraceField {
            line,
            field: "precursor count",
            text: text.to_string(),
        })?;
    let addr = words[2]
        .strip_prefix("0x")
        .filter(|hex| !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|hex| u64::from_str_radix(hex, 16).ok())
        .ok_or_else(|| TraceError::InvalidTraceField {
            line,
            field: "address",
            text: text.to_string(),
        })?;
    Ok(TraceRecord {
        precursor,
        addr,
        is_write,
    })
}
