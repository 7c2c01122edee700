/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
//! End-to-end round trips over the tokenizer and the cassette codec.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cidertap::cassette::{consts, demod, synth};
use cidertap::wave::{self, DEFAULT_SAMPLE_RATE};
use cidertap::{assemble, decode_wave, disassemble, encode_wave, Block, Error};

const PROGRAM: [&str; 5] = [
    "1 LET X$ = \"some value\"",
    "2 PRINT X$",
    "3 LET Y$ = X$ + \"some other test\"",
    "4 PRINT Y$",
    "5 GOTO 1",
];

fn listing(image: &[u8]) -> Vec<String> {
    disassemble(image)
        .unwrap()
        .into_iter()
        .map(|line| line.text)
        .collect()
}

#[test]
fn rem_line_round_trips() {
    let lines = ["1 REM Eat \"your\" = vegetables"];
    assert_eq!(lines.to_vec(), listing(&assemble(lines).unwrap()));
}

#[test]
fn string_assignment_round_trips() {
    let lines = ["1 LET X$ = \"some value\""];
    assert_eq!(lines.to_vec(), listing(&assemble(lines).unwrap()));
}

#[test]
fn multi_line_program_round_trips() {
    assert_eq!(PROGRAM.to_vec(), listing(&assemble(PROGRAM).unwrap()));
}

#[test]
fn audio_round_trip_is_bit_exact() {
    let image = assemble(PROGRAM).unwrap();
    for auto_run in [true, false] {
        let file = encode_wave(PROGRAM, auto_run).unwrap();
        let tape = decode_wave(&file).unwrap();
        assert_eq!(image, tape.program);
        assert_eq!(auto_run, tape.auto_run);
        assert!(tape.data.is_empty());
    }
}

#[test]
fn rem_survives_the_audio_path() {
    let lines = ["1 REM Eat \"your\" = vegetables"];
    let file = encode_wave(lines, false).unwrap();
    let tape = decode_wave(&file).unwrap();
    assert_eq!(lines.to_vec(), listing(&tape.program));
}

#[test]
fn corrupted_program_block_fails_checksum() {
    let program = assemble(PROGRAM).unwrap();
    let mut record = program.clone();
    record.push(cidertap::bytes::xor_checksum(&program));
    // flip one program byte underneath the now-stale checksum
    record[0] ^= 0x40;

    let rate = DEFAULT_SAMPLE_RATE;
    let mut samples = Vec::new();
    synth::render_leader_sync(&mut samples, rate);
    synth::render_bits(
        &mut samples,
        &synth::length_record(program.len() as u16, false),
        false,
        rate,
    );
    synth::render_leader_sync(&mut samples, rate);
    synth::render_bits(&mut samples, &record, false, rate);
    synth::Tone::new(consts::SYNC_LOW_HZ, f64::from(consts::TRAIL_ZERO_CYCLES)).render(&mut samples, rate);
    synth::Tone::new(consts::LEAD_TONE_HZ, f64::from(consts::TRAIL_LEAD_CYCLES)).render(&mut samples, rate);

    match demod::decode_archive(&samples, rate) {
        Err(Error::ChecksumMismatch { block: Block::Program, .. }) => {}
        other => panic!("expected program checksum mismatch, got {:?}", other),
    }
}

#[test]
fn fast_mode_data_block_round_trips_at_96_khz() {
    let rate = 96_000;
    let program = assemble(PROGRAM).unwrap();
    let data: Vec<u8> = (0..48u8).map(|i| i.wrapping_mul(7) ^ 0x5A).collect();
    let samples = synth::render_archive(&program, &data, true, rate);
    let file = wave::write_wave(&samples, rate).unwrap();
    let tape = decode_wave(&file).unwrap();
    assert_eq!(program, tape.program);
    assert_eq!(data, tape.data);
    assert!(tape.auto_run);
}

#[test]
fn invalid_header_disassembles_to_nothing() {
    assert!(disassemble(&[0x00, 0x01, 0x12, 0x01, 0x00]).unwrap().is_empty());
}

#[test]
fn amplitude_jitter_still_decodes() {
    let file = encode_wave(PROGRAM, false).unwrap();
    let (header, samples) = wave::read_wave(&file).unwrap();
    let mut rng = StdRng::seed_from_u64(0x0800);
    let jittered: Vec<u8> = samples
        .iter()
        .map(|&s| (i32::from(s) + rng.gen_range(-2..=2)).clamp(0, 255) as u8)
        .collect();
    let tape = demod::decode_archive(&jittered, header.sample_rate).unwrap();
    assert_eq!(assemble(PROGRAM).unwrap(), tape.program);
}

#[test]
fn amplitude_drift_still_decodes() {
    let file = encode_wave(PROGRAM, true).unwrap();
    let (header, samples) = wave::read_wave(&file).unwrap();
    // a quieter capture: three quarters of the written level
    let drifted: Vec<u8> = samples
        .iter()
        .map(|&s| ((i32::from(s) - 128) * 3 / 4 + 128) as u8)
        .collect();
    let tape = demod::decode_archive(&drifted, header.sample_rate).unwrap();
    assert_eq!(assemble(PROGRAM).unwrap(), tape.program);
    assert!(tape.auto_run);
}
