/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
//! The AppleSoft reserved-word table.
//!
//! Reserved words tokenize to single bytes in `0x80..=0xEA`; the bytes
//! above `0xEA` are unassigned. The mapping is fixed ROM data and
//! bijective, so both lookups go through the one static table below.

/// First token byte; `MNEMONICS[0]` is the reserved word for `0x80`.
pub const TOKEN_BASE: u8 = 0x80;

/// The `REM` token byte.
pub const TOKEN_REM: u8 = 0xB2;

static MNEMONICS: [&str; 107] = [
    "END",     "FOR",     "NEXT",    "DATA",    // 0x80
    "INPUT",   "DEL",     "DIM",     "READ",    // 0x84
    "GR",      "TEXT",    "PR#",     "IN#",     // 0x88
    "CALL",    "PLOT",    "HLIN",    "VLIN",    // 0x8C
    "HGR2",    "HGR",     "HCOLOR=", "HPLOT",   // 0x90
    "DRAW",    "XDRAW",   "HTAB",    "HOME",    // 0x94
    "ROT=",    "SCALE=",  "SHLOAD",  "TRACE",   // 0x98
    "NOTRACE", "NORMAL",  "INVERSE", "FLASH",   // 0x9C
    "COLOR=",  "POP",     "VTAB",    "HIMEM:",  // 0xA0
    "LOMEM:",  "ONERR",   "RESUME",  "RECALL",  // 0xA4
    "STORE",   "SPEED=",  "LET",     "GOTO",    // 0xA8
    "RUN",     "IF",      "RESTORE", "&",       // 0xAC
    "GOSUB",   "RETURN",  "REM",     "STOP",    // 0xB0
    "ON",      "WAIT",    "LOAD",    "SAVE",    // 0xB4
    "DEF",     "POKE",    "PRINT",   "CONT",    // 0xB8
    "LIST",    "CLEAR",   "GET",     "NEW",     // 0xBC
    "TAB(",    "TO",      "FN",      "SPC(",    // 0xC0
    "THEN",    "AT",      "NOT",     "STEP",    // 0xC4
    "+",       "-",       "*",       "/",       // 0xC8
    "^",       "AND",     "OR",      ">",       // 0xCC
    "=",       "<",       "SGN",     "INT",     // 0xD0
    "ABS",     "USR",     "FRE",     "SCRN(",   // 0xD4
    "PDL",     "POS",     "SQR",     "RND",     // 0xD8
    "LOG",     "EXP",     "COS",     "SIN",     // 0xDC
    "TAN",     "ATN",     "PEEK",    "LEN",     // 0xE0
    "STR$",    "VAL",     "ASC",     "CHR$",    // 0xE4
    "LEFT$",   "RIGHT$",  "MID$",               // 0xE8
];

/// Returns the reserved word for a token byte, or `None` for bytes
/// outside the assigned range.
pub fn mnemonic(code: u8) -> Option<&'static str> {
    let index = (code as usize).checked_sub(TOKEN_BASE as usize)?;
    MNEMONICS.get(index).copied()
}

/// Returns the token byte for a reserved word. The match is exact;
/// AppleSoft reserved words are upper-case.
pub fn opcode(word: &str) -> Option<u8> {
    MNEMONICS
        .iter()
        .position(|&name| name == word)
        .map(|index| TOKEN_BASE + index as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_tokens() {
        assert_eq!(Some(TOKEN_REM), opcode("REM"));
        assert_eq!(Some(0xAA), opcode("LET"));
        assert_eq!(Some(0xAB), opcode("GOTO"));
        assert_eq!(Some(0xBA), opcode("PRINT"));
        assert_eq!(Some(0xD0), opcode("="));
        assert_eq!(Some(0xC8), opcode("+"));
        assert_eq!(Some(0xEA), opcode("MID$"));
        assert_eq!(None, opcode("rem"));
        assert_eq!(None, opcode("X$"));
    }

    #[test]
    fn table_is_bijective() {
        for code in TOKEN_BASE..=0xEA {
            let name = mnemonic(code).expect("assigned token byte");
            assert_eq!(Some(code), opcode(name), "{}", name);
        }
        assert_eq!(None, mnemonic(0x7F));
        assert_eq!(None, mnemonic(0xEB));
        assert_eq!(None, mnemonic(0xFF));
    }
}
