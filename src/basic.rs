/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
/*! AppleSoft BASIC tokenizer and lister.

# Tokenized program format

The Apple II ROM keeps a BASIC program in memory as a chain of tokenized
lines starting at the fixed load address `0x0800`:

| offset | size | description                                       |
|--------|------|---------------------------------------------------|
|    0   |   2  | absolute address of the next line (LSB first)     |
|    2   |   2  | line number (LSB first)                           |
|    4   |  n-5 | body: token bytes `0x80..` and plain ASCII        |
|   n-1  |   1  | `0x00` line terminator                            |

The program ends with a zero next-line address, i.e. two `0x00` bytes
after the last line.

One quirk is preserved on purpose: [assemble] chains lines with a
next-line address one byte past the true start of the following line,
and [disassemble] walks the chain with the matching one-byte
compensation. Archives produced by this toolchain depend on it.
*/
mod asm;
mod list;
pub mod token;

pub use asm::{assemble, assemble_per_line};
pub use list::{disassemble, Line};

/// Address at which a tokenized program is loaded.
pub const PROGRAM_START: u16 = 0x0800;

/// Line numbers must be below this limit.
pub const LINE_NUMBER_LIMIT: u16 = 63999;

/// One element of a tokenized line body: a reserved-word byte, a run of
/// plain characters, or a quoted string kept intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Atom<'a> {
    Keyword(u8),
    Literal(&'a str),
    Quoted(&'a str),
}
