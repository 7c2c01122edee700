/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
//! Renders cassette records into unsigned 8-bit PCM samples.
use core::f64::consts::TAU;

use crate::bytes;
use crate::wave::SAMPLE_MIDLINE;
use super::consts::*;

/// A tone: `cycles` full periods of `frequency`, optionally inverted
/// by starting half a cycle into the waveform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency: u32,
    pub cycles: f64,
    pub invert: bool,
}

impl Tone {
    pub fn new(frequency: u32, cycles: f64) -> Self {
        Tone { frequency, cycles, invert: false }
    }

    pub fn inverted(frequency: u32, cycles: f64) -> Self {
        Tone { frequency, cycles, invert: true }
    }

    /// Number of samples the tone spans at `sample_rate`.
    pub fn len(&self, sample_rate: u32) -> usize {
        (f64::from(sample_rate) * self.cycles / f64::from(self.frequency)).ceil() as usize
    }

    /// Appends the rendered sine samples to `out`.
    pub fn render(&self, out: &mut Vec<u8>, sample_rate: u32) {
        let rate = f64::from(sample_rate);
        let phase = if self.invert {
            (rate * 0.5 / f64::from(self.frequency)).ceil()
        } else {
            0.0
        };
        let step = TAU * f64::from(self.frequency) / rate;
        for i in 0..self.len(sample_rate) {
            let level = (step * (i as f64 + phase)).sin() * AMPLITUDE;
            out.push((level.round() as i32 + i32::from(SAMPLE_MIDLINE)) as u8);
        }
    }
}

/// Renders the 770 Hz leader followed by the sync bit: one 2500 Hz
/// half-cycle and one inverted 2000 Hz half-cycle.
pub fn render_leader_sync(out: &mut Vec<u8>, sample_rate: u32) {
    Tone::new(LEAD_TONE_HZ, f64::from(LEAD_TONE_CYCLES)).render(out, sample_rate);
    Tone::new(SYNC_HIGH_HZ, 0.5).render(out, sample_rate);
    Tone::inverted(SYNC_LOW_HZ, 0.5).render(out, sample_rate);
}

/// Renders each byte MSB first, one full cycle per bit.
pub fn render_bits(out: &mut Vec<u8>, payload: &[u8], fast: bool, sample_rate: u32) {
    let (one, zero) = if fast {
        (FAST_BIT_ONE_HZ, FAST_BIT_ZERO_HZ)
    } else {
        (BIT_ONE_HZ, BIT_ZERO_HZ)
    };
    for &byte in payload {
        for bit in bytes::byte_to_bits(byte) {
            let frequency = if bit == 1 { one } else { zero };
            Tone::new(frequency, 1.0).render(out, sample_rate);
        }
    }
}

/// Builds the 4-byte length record: program length, auto-run flag and
/// the checksum of those three bytes.
pub fn length_record(program_length: u16, auto_run: bool) -> [u8; 4] {
    let mut record = [0u8; 4];
    bytes::write_u16_le(&mut record, 0, program_length);
    bytes::write_u8(&mut record, 2, if auto_run { AUTO_RUN_FLAG } else { 0x00 });
    let checksum = bytes::xor_checksum(&record[..3]);
    bytes::write_u8(&mut record, 3, checksum);
    record
}

/// Appends the payload's checksum byte; an empty payload stays empty.
fn checksummed(payload: &[u8]) -> Vec<u8> {
    if payload.is_empty() {
        return Vec::new();
    }
    let mut record = payload.to_vec();
    record.push(bytes::xor_checksum(payload));
    record
}

/// Renders a complete archive: length record, program record, optional
/// fast-mode data record and the closing tones.
///
/// Total over its inputs — any combination of buffers yields a signal.
pub fn render_archive(program: &[u8], data: &[u8], auto_run: bool, sample_rate: u32) -> Vec<u8> {
    let length = length_record(program.len() as u16, auto_run);
    let program = checksummed(program);
    let data = checksummed(data);

    let leader = Tone::new(LEAD_TONE_HZ, f64::from(LEAD_TONE_CYCLES)).len(sample_rate);
    let per_byte = 8 * Tone::new(BIT_ONE_HZ, 1.0).len(sample_rate);
    let mut out = Vec::with_capacity(
        2 * leader + per_byte * (length.len() + program.len() + data.len() + 4),
    );

    render_leader_sync(&mut out, sample_rate);
    render_bits(&mut out, &length, false, sample_rate);

    render_leader_sync(&mut out, sample_rate);
    render_bits(&mut out, &program, false, sample_rate);
    if !data.is_empty() {
        // spacer the decoder skips before the data record
        for _ in 0..DATA_GAP_BITS {
            Tone::new(BIT_ZERO_HZ, 1.0).render(&mut out, sample_rate);
        }
    }
    render_bits(&mut out, &data, true, sample_rate);

    Tone::new(SYNC_LOW_HZ, f64::from(TRAIL_ZERO_CYCLES)).render(&mut out, sample_rate);
    Tone::new(LEAD_TONE_HZ, f64::from(TRAIL_LEAD_CYCLES)).render(&mut out, sample_rate);
    out
}
