/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
/*! Apple II cassette archive encoding and decoding.

# Archive format

A cassette archive carries two records, each framed the same way:

| part     | signal                                                    |
|----------|-----------------------------------------------------------|
| leader   | 3080 cycles of a 770 Hz tone, about four seconds          |
| sync bit | a 2500 Hz half-cycle, then an inverted 2000 Hz half-cycle |
| body     | one full cycle per bit: `1` = 1000 Hz, `0` = 2000 Hz      |
| checksum | the XOR checksum byte closing the body                    |

The first record is the 4-byte **length record**: the program length as
a little-endian `u16`, the auto-run flag (`0xD5` to run on load), and
the checksum of those three bytes. The second record carries the
tokenized program bytes plus checksum and, optionally, a **data record**
in fast mode (`1` = 6000 Hz, `0` = 12000 Hz) with its own checksum.
The archive closes with ten cycles at 2000 Hz and ten at 770 Hz.

[synth] renders an archive into unsigned 8-bit PCM samples; [demod]
recovers the records from such samples by counting zero crossings, the
way the Apple II cassette input circuit does.

# Example

```
use cidertap::{assemble, decode_wave, encode_wave};

let lines = ["10 PRINT \"HELLO\"", "20 GOTO 10"];
let wave = encode_wave(&lines, false)?;
let tape = decode_wave(&wave)?;
assert_eq!(tape.program, assemble(&lines)?);
# Ok::<(), cidertap::Error>(())
```
*/
use crate::basic;
use crate::error::Result;
use crate::wave;

pub mod demod;
pub mod synth;

pub mod consts {
    //! Signal-level constants of the cassette format.

    /// Leader tone frequency.
    pub const LEAD_TONE_HZ: u32 = 770;
    /// Full leader cycles before each record, four seconds worth.
    pub const LEAD_TONE_CYCLES: u32 = 3080;
    /// First half of the sync bit.
    pub const SYNC_HIGH_HZ: u32 = 2500;
    /// Second half of the sync bit, phase-inverted on tape.
    pub const SYNC_LOW_HZ: u32 = 2000;
    /// Midpoint rate of the two sync half-cycles; one cycle at this
    /// frequency spans the whole sync bit.
    pub const SYNC_MEAN_HZ: u32 = 2250;
    /// A `1` bit.
    pub const BIT_ONE_HZ: u32 = 1000;
    /// A `0` bit.
    pub const BIT_ZERO_HZ: u32 = 2000;
    /// A `1` bit in fast mode.
    pub const FAST_BIT_ONE_HZ: u32 = 6000;
    /// A `0` bit in fast mode.
    pub const FAST_BIT_ZERO_HZ: u32 = 12000;
    /// Auto-run marker in the length record.
    pub const AUTO_RUN_FLAG: u8 = 0xD5;
    /// Sine amplitude about the unsigned-PCM midline.
    pub const AMPLITUDE: f64 = 93.0;
    /// Bit cycles separating the program record from the data record.
    /// Measured from existing archives; see DESIGN.md.
    pub const DATA_GAP_BITS: usize = 5;
    /// Cycles of the closing 2000 Hz tone.
    pub const TRAIL_ZERO_CYCLES: u32 = 10;
    /// Cycles of the closing 770 Hz tone.
    pub const TRAIL_LEAD_CYCLES: u32 = 10;
    /// Frequencies the demodulator snaps measurements to.
    pub const KNOWN_FREQUENCIES: [u32; 8] =
        [770, 1000, 1500, 2000, 2250, 2500, 6000, 12000];
    /// Maximum distance from a known frequency for snapping.
    pub const FREQUENCY_TOLERANCE: f64 = 250.0;
}

/// The contents recovered from a cassette archive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tape {
    /// The tokenized program image; empty when the archive carried a
    /// zero-length program record.
    pub program: Vec<u8>,
    /// The fast-mode data record; empty when absent.
    pub data: Vec<u8>,
    /// Whether the archive asks the machine to run the program on load.
    pub auto_run: bool,
}

/// Tokenizes source lines and renders them into a complete WAVE file
/// at the default sample rate.
pub fn encode_wave<I, S>(lines: I, auto_run: bool) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let program = basic::assemble(lines)?;
    let samples = synth::render_archive(&program, &[], auto_run, wave::DEFAULT_SAMPLE_RATE);
    wave::write_wave(&samples, wave::DEFAULT_SAMPLE_RATE)
}

/// Demodulates a WAVE file back into the archived records, honouring
/// the sample rate its header declares.
pub fn decode_wave(file: &[u8]) -> Result<Tape> {
    let (header, samples) = wave::read_wave(file)?;
    demod::decode_archive(samples, header.sample_rate)
}
