/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;
use thiserror::Error;

/// Specialized `Result` type for this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// The cassette record a checksum failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    /// The 4-byte length record preceding the program.
    Length,
    /// The tokenized program record.
    Program,
    /// The optional fast-mode data record.
    Data,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Block::Length => "length",
            Block::Program => "program",
            Block::Data => "data",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The first atom of a source line is missing, not a number,
    /// or outside `0..63999`.
    #[error("invalid BASIC line number: {0:?}")]
    InvalidLineNumber(String),
    /// A byte read past the end of a buffer.
    #[error("read at index {index} out of range for a {len} byte buffer")]
    OutOfRange { index: usize, len: usize },
    /// A value does not fit its fixed-width field.
    #[error("value does not fit: field holds {needed}, got {got}")]
    Overflow { needed: usize, got: usize },
    /// The trailing checksum byte of a record disagrees with the
    /// checksum recomputed over the record's payload.
    #[error("{block} record checksum mismatch: computed {expected:#04x}, recorded {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8, block: Block },
    /// The demodulator saw a tone outside the valid set in the middle
    /// of a record.
    #[error("unexpected {hz} Hz tone at sample {sample}")]
    UnexpectedFrequency { hz: u32, sample: usize },
    /// The k-th 770 Hz leader, or its sync bit, is missing.
    #[error("leader tone {which} not found")]
    NoHeaderFound { which: usize },
    /// The signal ended in the middle of a record.
    #[error("bit stream ended after {bits_read} bits")]
    TruncatedBitStream { bits_read: usize },
    /// A tokenized program image ended in the middle of a line.
    #[error("tokenized program truncated at offset {0}")]
    TruncatedInput(usize),
}
