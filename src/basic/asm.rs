/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
//! Tokenizes AppleSoft source lines into the in-memory program image.
use crate::bytes;
use crate::error::{Error, Result};
use super::token::{self, TOKEN_REM};
use super::{Atom, LINE_NUMBER_LIMIT, PROGRAM_START};

/// Tokenizes source lines into one flat program image, terminated with
/// the `0x00 0x00` end-of-program marker.
pub fn assemble<I, S>(lines: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut image: Vec<u8> = assemble_per_line(lines)?.concat();
    image.extend_from_slice(&[0, 0]);
    Ok(image)
}

/// Tokenizes source lines, keeping the bytes of each line separate.
///
/// Concatenating the returned records and appending `0x00 0x00` yields
/// the same image [assemble] produces; front ends use the per-line form
/// to attribute bytes back to source lines.
pub fn assemble_per_line<I, S>(lines: I) -> Result<Vec<Vec<u8>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut current = PROGRAM_START;
    let mut records = Vec::new();
    for line in lines {
        let record = encode_line(line.as_ref(), current)?;
        current += record.len() as u16;
        records.push(record);
    }
    Ok(records)
}

/// Splits a line at whitespace, keeping any double-quoted substring
/// (quotes included) inside a single atom. Returns each atom with its
/// byte offset into the line.
fn atomize(line: &str) -> Vec<(usize, &str)> {
    let raw = line.as_bytes();
    let mut atoms = Vec::new();
    let mut i = 0;
    while i < raw.len() {
        if raw[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        while i < raw.len() && !raw[i].is_ascii_whitespace() {
            if raw[i] == b'"' {
                i += 1;
                while i < raw.len() && raw[i] != b'"' {
                    i += 1;
                }
            }
            i += 1;
        }
        let i = i.min(raw.len());
        atoms.push((start, &line[start..i]));
    }
    atoms
}

fn classify(atom: &str) -> Atom<'_> {
    if atom.starts_with('"') {
        Atom::Quoted(atom)
    } else if let Some(code) = token::opcode(atom) {
        Atom::Keyword(code)
    } else {
        Atom::Literal(atom)
    }
}

fn parse_line_number(atom: &str) -> Result<u16> {
    let invalid = || Error::InvalidLineNumber(atom.to_string());
    let value: i64 = atom.parse().map_err(|_| invalid())?;
    if (0..i64::from(LINE_NUMBER_LIMIT)).contains(&value) {
        Ok(value as u16)
    } else {
        Err(invalid())
    }
}

fn encode_line(line: &str, current: u16) -> Result<Vec<u8>> {
    let atoms = atomize(line);
    let &(_, first) = atoms
        .first()
        .ok_or_else(|| Error::InvalidLineNumber(line.to_string()))?;
    let number = parse_line_number(first)?;
    let body = line_body(line, &atoms);

    let n = 2 + 2 + body.len() + 1;
    let next = u32::from(current) + n as u32 + 1;
    if next > u32::from(u16::MAX) {
        return Err(Error::Overflow { needed: u16::MAX as usize, got: next as usize });
    }
    let mut record = vec![0u8; n];
    bytes::write_u16_le(&mut record, 0, next as u16);
    bytes::write_u16_le(&mut record, 2, number);
    record[4..4 + body.len()].copy_from_slice(&body);
    Ok(record)
}

fn line_body(line: &str, atoms: &[(usize, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(&(start, word)) = atoms.get(1) {
        if word.eq_ignore_ascii_case("REM") {
            // comments keep their raw tail, one space after the token
            body.push(TOKEN_REM);
            body.push(b' ');
            body.extend_from_slice(line[start + word.len()..].trim_start().as_bytes());
            return body;
        }
    }
    for &(_, atom) in atoms.iter().skip(1) {
        match classify(atom) {
            Atom::Keyword(code) => body.push(code),
            Atom::Literal(text) | Atom::Quoted(text) => {
                body.extend_from_slice(text.as_bytes())
            }
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::read_u16_le;

    #[test]
    fn line_number_boundaries() {
        assert!(assemble(["0 END"]).is_ok());
        assert!(assemble(["63998 END"]).is_ok());
        for bad in ["-1 END", "63999 END", "PRINT", ""] {
            match assemble([bad]) {
                Err(Error::InvalidLineNumber(_)) => {}
                other => panic!("{:?}: expected invalid line number, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn rem_line_keeps_raw_tail() {
        let records = assemble_per_line(["1 REM Eat \"your\" = vegetables"]).unwrap();
        let record = &records[0];
        assert_eq!(1, read_u16_le(record, 2).unwrap());
        assert_eq!(TOKEN_REM, record[4]);
        assert_eq!(b' ', record[5]);
        assert_eq!(b"Eat \"your\" = vegetables", &record[6..record.len() - 1]);
        assert_eq!(0, record[record.len() - 1]);
    }

    #[test]
    fn keywords_tokenize_and_quotes_stay_whole() {
        let records = assemble_per_line(["1 LET X$ = \"some value\""]).unwrap();
        let record = &records[0];
        let body = &record[4..record.len() - 1];
        let mut expected = vec![0xAA];
        expected.extend_from_slice(b"X$");
        expected.push(0xD0);
        expected.extend_from_slice(b"\"some value\"");
        assert_eq!(expected, body);
    }

    #[test]
    fn next_addresses_chain_with_historical_offset() {
        let records = assemble_per_line(["10 PRINT X$", "20 GOTO 10"]).unwrap();
        let mut current = PROGRAM_START;
        for record in &records {
            let next = read_u16_le(record, 0).unwrap();
            assert_eq!(u32::from(current) + record.len() as u32 + 1, u32::from(next));
            current += record.len() as u16;
        }
    }

    #[test]
    fn image_is_per_line_records_plus_terminator() {
        let lines = ["10 PRINT X$", "20 GOTO 10"];
        let mut expected = assemble_per_line(lines).unwrap().concat();
        expected.extend_from_slice(&[0, 0]);
        assert_eq!(expected, assemble(lines).unwrap());
        assert_eq!(vec![0, 0], assemble::<_, &str>([]).unwrap());
    }
}
