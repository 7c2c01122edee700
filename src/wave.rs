/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
//! Minimal RIFF/WAVE container for the cassette signal: one channel of
//! unsigned 8-bit PCM behind the canonical 44-byte header.
use core::convert::TryFrom;

use crate::bytes;
use crate::error::{Error, Result};

/*
   Offset   Size   Description
   ------------------------------------------------------------------
   0        4      "RIFF"
   4        4      total file size - 8
   8        4      "WAVE"
   12       4      "fmt "
   16       4      16, the fmt chunk size
   20       2      1, PCM
   22       2      1, mono
   24       4      sample rate
   28       4      byte rate: sample rate * 8 bits * 1 channel / 8
   32       2      1, block align
   34       2      8, bits per sample
   36       4      "data"
   40       4      sample data size in bytes
   ------------------------------------------------------------------
   Size: 44 bytes, samples follow
*/

/// Size of the canonical PCM header.
pub const HEADER_SIZE: usize = 44;

/// Sample rate the encoder writes by default.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Midline of the unsigned 8-bit samples.
pub const SAMPLE_MIDLINE: u8 = 128;

/// The two header fields the cassette codec cares about. Everything
/// else in the header is fixed by the format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveHeader {
    pub sample_rate: u32,
    pub data_size: u32,
}

impl WaveHeader {
    pub fn new(sample_rate: u32, data_size: u32) -> Self {
        WaveHeader { sample_rate, data_size }
    }

    /// Writes the 44-byte header into the beginning of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        bytes::write_str_fixed(buf, 0, 4, "RIFF")?;
        bytes::write_u32_le(buf, 4, self.data_size + HEADER_SIZE as u32 - 8);
        bytes::write_str_fixed(buf, 8, 4, "WAVE")?;
        bytes::write_str_fixed(buf, 12, 4, "fmt ")?;
        bytes::write_u32_le(buf, 16, 16);
        bytes::write_u16_le(buf, 20, 1);
        bytes::write_u16_le(buf, 22, 1);
        bytes::write_u32_le(buf, 24, self.sample_rate);
        // byte rate equals the sample rate: one channel, 8 bits
        bytes::write_u32_le(buf, 28, self.sample_rate);
        bytes::write_u16_le(buf, 32, 1);
        bytes::write_u16_le(buf, 34, 8);
        bytes::write_str_fixed(buf, 36, 4, "data")?;
        bytes::write_u32_le(buf, 40, self.data_size);
        Ok(())
    }
}

impl TryFrom<&'_ [u8]> for WaveHeader {
    type Error = Error;

    /// Reads the declared sample rate and data size; the fields the
    /// format fixes are not checked.
    fn try_from(header: &[u8]) -> Result<Self> {
        let sample_rate = bytes::read_u32_le(header, 24)?;
        let data_size = bytes::read_u32_le(header, 40)?;
        Ok(WaveHeader { sample_rate, data_size })
    }
}

/// Wraps raw samples into a complete WAVE file.
pub fn write_wave(samples: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
    let header = WaveHeader::new(sample_rate, samples.len() as u32);
    let mut file = vec![0u8; HEADER_SIZE + samples.len()];
    header.write_to(&mut file)?;
    file[HEADER_SIZE..].copy_from_slice(samples);
    Ok(file)
}

/// Splits a WAVE file into its header and its samples, honouring the
/// declared data size but never reading past the end of the buffer.
pub fn read_wave(file: &[u8]) -> Result<(WaveHeader, &[u8])> {
    let header = WaveHeader::try_from(file)?;
    let end = (HEADER_SIZE + header.data_size as usize).min(file.len());
    let samples = file.get(HEADER_SIZE..end).unwrap_or(&[]);
    Ok((header, samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_canonical() {
        let file = write_wave(&[128; 10], DEFAULT_SAMPLE_RATE).unwrap();
        assert_eq!(54, file.len());
        assert_eq!(b"RIFF", &file[0..4]);
        assert_eq!(46, u32::from_le_bytes(file[4..8].try_into().unwrap()));
        assert_eq!(b"WAVE", &file[8..12]);
        assert_eq!(b"fmt ", &file[12..16]);
        assert_eq!(16, u32::from_le_bytes(file[16..20].try_into().unwrap()));
        assert_eq!([1, 0, 1, 0], &file[20..24]);
        assert_eq!(48_000, u32::from_le_bytes(file[24..28].try_into().unwrap()));
        assert_eq!(48_000, u32::from_le_bytes(file[28..32].try_into().unwrap()));
        assert_eq!([1, 0, 8, 0], &file[32..36]);
        assert_eq!(b"data", &file[36..40]);
        assert_eq!(10, u32::from_le_bytes(file[40..44].try_into().unwrap()));
    }

    #[test]
    fn read_honours_declared_rate_and_size() {
        let samples: Vec<u8> = (0..32).map(|i| 128 + i).collect();
        let file = write_wave(&samples, 22_050).unwrap();
        let (header, read_back) = read_wave(&file).unwrap();
        assert_eq!(22_050, header.sample_rate);
        assert_eq!(32, header.data_size);
        assert_eq!(&samples[..], read_back);
    }

    #[test]
    fn read_clamps_overlong_declared_size() {
        let mut file = write_wave(&[128; 8], DEFAULT_SAMPLE_RATE).unwrap();
        bytes::write_u32_le(&mut file, 40, 1000);
        let (header, samples) = read_wave(&file).unwrap();
        assert_eq!(1000, header.data_size);
        assert_eq!(8, samples.len());
    }

    #[test]
    fn short_buffer_is_out_of_range() {
        match read_wave(&[0u8; 43]) {
            Err(Error::OutOfRange { index: 40, len: 43 }) => {}
            other => panic!("expected out of range, got {:?}", other),
        }
    }
}
