/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
//! Recovers source lines from a tokenized program image.
use log::warn;

use crate::bytes;
use crate::error::{Error, Result};
use super::token;
use super::PROGRAM_START;

/// One source line recovered from a tokenized image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// The BASIC line number.
    pub number: u16,
    /// The decoded text after the line number.
    pub body: String,
    /// The full `"<number> <body>"` line.
    pub text: String,
}

/// Walks the tokenized line chain and decodes each line body.
///
/// The walk stops at the zero next-line address, at the end of the
/// buffer, or — with a warning — at a next-line address pointing
/// backwards. Token bytes without a mnemonic pass through as characters.
pub fn disassemble(image: &[u8]) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut current = usize::from(PROGRAM_START);
    loop {
        let idx = current - usize::from(PROGRAM_START);
        if idx >= image.len() {
            break;
        }
        let next = bytes::read_u16_le(image, idx).map_err(|_| Error::TruncatedInput(idx))?;
        let next = usize::from(next);
        if next == 0 {
            break;
        }
        if next < current {
            warn!(
                "next line address {:#06x} precedes {:#06x}, stopping",
                next, current
            );
            break;
        }
        let record = image
            .get(idx..idx + (next - current))
            .ok_or(Error::TruncatedInput(idx))?;
        lines.push(decode_line(record, idx)?);
        // the encoder chains one byte past the true next line
        current = next - 1;
    }
    Ok(lines)
}

fn decode_line(record: &[u8], idx: usize) -> Result<Line> {
    let number = bytes::read_u16_le(record, 2).map_err(|_| Error::TruncatedInput(idx + 2))?;
    // drop the trailing null and the chain's extra byte
    let body = decode_body(record.get(4..record.len().saturating_sub(2)).unwrap_or(&[]));
    let text = if body.is_empty() {
        number.to_string()
    } else {
        format!("{} {}", number, body)
    };
    Ok(Line { number, body, text })
}

fn decode_body(body: &[u8]) -> String {
    let mut out = String::with_capacity(body.len());
    for &byte in body {
        match token::mnemonic(byte) {
            Some(name) => {
                out.push(' ');
                out.push_str(name);
                out.push(' ');
            }
            None => out.push(char::from(byte)),
        }
    }
    collapse_spaces(out.trim())
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_space = false;
    for c in text.chars() {
        if c == ' ' && previous_space {
            continue;
        }
        previous_space = c == ' ';
        out.push(c);
    }
    out
}
