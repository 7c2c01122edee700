/*
    Copyright (C) 2026  Cidertap Contributors

    This file is part of CIDERTAP, an AppleSoft BASIC cassette toolkit.

    For the full copyright notice, see the lib.rs file.
*/
/*! Recovers cassette records from PCM samples with a zero-crossing
frequency counter.

The Apple II cassette input is a comparator: the ROM measures the time
between sign changes of the signal, never its spectrum. The decoder does
the same. A first pass walks every sample, interpolates the fractional
time of each zero crossing and converts the spacing of consecutive
crossings into a frequency, snapping it onto the small set of tones the
format uses. Each tone change is recorded in a sparse frequency map,
back-dated by a half-cycle so the map keys mark where the tone actually
began. A second, linear pass turns the map into a per-sample index for
O(1) lookups.

Record parsing then drives a cursor over the mapped tones:

| at          | tone observed               | effect                  |
|-------------|-----------------------------|-------------------------|
| anywhere    | 770 Hz                      | leader; ends any record |
| in a leader | 2500 Hz                     | sync bit starts         |
| past sync   | 1000/6000 Hz                | data bit `1`            |
| past sync   | 2000/12000 Hz               | data bit `0`            |
| past sync   | anything else               | hard error              |

The cursor advances one full cycle per bit, so a record is read at
exactly the pace it was written.
*/
use std::collections::BTreeMap;

use log::debug;

use crate::bytes;
use crate::error::{Block, Error, Result};
use crate::wave::SAMPLE_MIDLINE;
use super::consts::*;
use super::Tape;

/// Which side of the midline the signal is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarity {
    High,
    Low,
}

/// Accumulates zero crossings into a sparse tone map. Fed strictly in
/// sample order; feeding out of order invalidates the crossing state.
#[derive(Debug)]
struct ZeroCrossing {
    sample_rate: u32,
    polarity: Polarity,
    /// Interpolated time of the previous crossing, in fractional samples.
    last_crossing: f64,
    last_amplitude: i32,
    last_frequency: u32,
    map: BTreeMap<usize, u32>,
}

impl ZeroCrossing {
    fn new(sample_rate: u32) -> Self {
        ZeroCrossing {
            sample_rate,
            polarity: Polarity::High,
            last_crossing: 0.0,
            last_amplitude: 0,
            last_frequency: 0,
            map: BTreeMap::new(),
        }
    }

    fn feed(&mut self, index: usize, value: i32) {
        let polarity = if value >= 0 { Polarity::High } else { Polarity::Low };
        if polarity == self.polarity {
            self.last_amplitude = value;
            return;
        }
        // interpolate where between the two samples the signal crossed
        let total = f64::from(value - self.last_amplitude);
        let fraction = if total == 0.0 {
            0.0
        } else {
            (f64::from(value) / total).abs()
        };
        let crossing = index as f64 - fraction;
        let delta = crossing - self.last_crossing;
        let frequency = f64::from(self.sample_rate) / (2.0 * delta);
        if !frequency.is_finite() {
            self.last_crossing = crossing;
            self.last_amplitude = value;
            return;
        }
        let snapped = snap_frequency(frequency);
        if snapped != 0 && snapped != self.last_frequency {
            // date the entry back to where this tone's first half-cycle began
            let start = index.saturating_sub(half_cycle_len(self.sample_rate, snapped) - 1);
            self.map.insert(start, snapped);
            self.last_frequency = snapped;
        }
        self.polarity = polarity;
        self.last_crossing = crossing;
        self.last_amplitude = value;
    }

    /// Converts the sparse map into a trace with a per-sample index.
    fn finish(self, num_samples: usize) -> FrequencyTrace {
        let mut index = vec![usize::MAX; num_samples];
        let mut keys = self.map.keys().copied().peekable();
        let mut current = usize::MAX;
        for (j, slot) in index.iter_mut().enumerate() {
            while let Some(&key) = keys.peek() {
                if key > j {
                    break;
                }
                current = key;
                keys.next();
            }
            *slot = current;
        }
        FrequencyTrace { sample_rate: self.sample_rate, map: self.map, index }
    }
}

/// Rounds a measured frequency to the nearest tone of the format, or
/// passes it through when no tone is close enough.
fn snap_frequency(frequency: f64) -> u32 {
    let mut best = frequency.round() as u32;
    let mut distance = f64::INFINITY;
    for &known in KNOWN_FREQUENCIES.iter() {
        let d = (frequency - f64::from(known)).abs();
        if d < distance {
            distance = d;
            if d <= FREQUENCY_TOLERANCE {
                best = known;
            }
        }
    }
    best
}

/// Samples of one full cycle, rounded up.
fn cycle_len(sample_rate: u32, frequency: u32) -> usize {
    let f = u64::from(frequency);
    ((u64::from(sample_rate) + f - 1) / f) as usize
}

/// Samples of one half-cycle, rounded up.
fn half_cycle_len(sample_rate: u32, frequency: u32) -> usize {
    let f2 = 2 * u64::from(frequency);
    ((u64::from(sample_rate) + f2 - 1) / f2) as usize
}

/// The demodulated view of a signal: which tone is sounding at every
/// sample.
#[derive(Debug)]
struct FrequencyTrace {
    sample_rate: u32,
    map: BTreeMap<usize, u32>,
    index: Vec<usize>,
}

impl FrequencyTrace {
    fn from_samples(samples: &[u8], sample_rate: u32) -> Self {
        let mut crossings = ZeroCrossing::new(sample_rate);
        for (i, &sample) in samples.iter().enumerate() {
            crossings.feed(i, i32::from(sample) - i32::from(SAMPLE_MIDLINE));
        }
        crossings.finish(samples.len())
    }

    /// The tone sounding at sample `i`, if any tone has begun by then.
    fn frequency_at(&self, i: usize) -> Option<u32> {
        let key = *self.index.get(i)?;
        self.map.get(&key).copied()
    }

    /// Sample indices where each 770 Hz leader tone begins.
    fn leaders(&self) -> Vec<usize> {
        self.map
            .iter()
            .filter(|&(_, &frequency)| frequency == LEAD_TONE_HZ)
            .map(|(&start, _)| start)
            .collect()
    }

    /// The first sync tone at or after `from`. The sync measurement
    /// straddles the 2500/2000 Hz boundary, so under jitter it can snap
    /// to the 2250 Hz midpoint instead; both count.
    fn sync_after(&self, from: usize) -> Option<usize> {
        self.map
            .range(from..)
            .find(|&(_, &frequency)| frequency == SYNC_HIGH_HZ || frequency == SYNC_MEAN_HZ)
            .map(|(&start, _)| start)
    }

    /// Positions a bit cursor on the body of the `which`-th record:
    /// just past that record's sync bit, with a little safety margin.
    fn record_reader(&self, leaders: &[usize], which: usize) -> Result<BitReader<'_>> {
        let &leader = leaders.get(which).ok_or(Error::NoHeaderFound { which })?;
        let sync = self.sync_after(leader).ok_or(Error::NoHeaderFound { which })?;
        let pos = sync + cycle_len(self.sample_rate, SYNC_MEAN_HZ) + 2;
        debug!("record {}: leader at {}, sync at {}, body at {}", which, leader, sync, pos);
        Ok(BitReader { trace: self, pos })
    }
}

/// Reads data bits off a [FrequencyTrace], one full cycle at a time.
#[derive(Debug)]
struct BitReader<'a> {
    trace: &'a FrequencyTrace,
    pos: usize,
}

impl BitReader<'_> {
    /// Classifies the tone under the cursor. `Ok(None)` means the
    /// record is over: a leader or sync tone, or the end of the signal.
    fn next_bit(&mut self) -> Result<Option<u8>> {
        let frequency = match self.trace.frequency_at(self.pos) {
            None => return Ok(None),
            Some(frequency) => frequency,
        };
        let bit = match frequency {
            LEAD_TONE_HZ | SYNC_HIGH_HZ => return Ok(None),
            BIT_ONE_HZ | FAST_BIT_ONE_HZ => 1,
            BIT_ZERO_HZ | FAST_BIT_ZERO_HZ => 0,
            hz => return Err(Error::UnexpectedFrequency { hz, sample: self.pos }),
        };
        self.pos += cycle_len(self.trace.sample_rate, frequency);
        Ok(Some(bit))
    }

    /// Reads exactly `count` bits or fails with the number read.
    fn read_exact(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bits = Vec::with_capacity(count);
        while bits.len() < count {
            match self.next_bit()? {
                Some(bit) => bits.push(bit),
                None => return Err(Error::TruncatedBitStream { bits_read: bits.len() }),
            }
        }
        Ok(bits)
    }

    /// Reads bits until the record ends.
    fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut bits = Vec::new();
        while let Some(bit) = self.next_bit()? {
            bits.push(bit);
        }
        Ok(bits)
    }

    /// Discards up to `count` bits.
    fn skip(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            if self.next_bit()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

/// Demodulates an archive and validates its records.
///
/// The trailing checksum of every record must hold; there is no
/// recovery across records.
pub fn decode_archive(samples: &[u8], sample_rate: u32) -> Result<Tape> {
    if sample_rate == 0 || samples.is_empty() {
        return Err(Error::NoHeaderFound { which: 0 });
    }
    let trace = FrequencyTrace::from_samples(samples, sample_rate);
    let leaders = trace.leaders();
    debug!("{} leader tones in {} samples", leaders.len(), samples.len());

    let mut reader = trace.record_reader(&leaders, 0)?;
    let bits = reader.read_to_end()?;
    let header = bytes::bits_to_bytes_checked(&bits, Block::Length)?;
    if header.len() != 3 {
        return Err(Error::TruncatedBitStream { bits_read: bits.len() });
    }
    let program_length = usize::from(bytes::read_u16_le(&header, 0)?);
    let auto_run = header[2] == AUTO_RUN_FLAG;
    debug!("length record: {} program bytes, auto-run: {}", program_length, auto_run);

    let mut reader = trace.record_reader(&leaders, 1)?;
    let program = if program_length > 0 {
        let bits = reader.read_exact((program_length + 1) * 8)?;
        bytes::bits_to_bytes_checked(&bits, Block::Program)?
    } else {
        Vec::new()
    };

    // whatever sounds before the closing leader is the data record,
    // behind the fixed gap; the closing 2000 Hz cycles demodulate as
    // ten trailing zero bits and are stripped before packing
    reader.skip(DATA_GAP_BITS)?;
    let mut bits = reader.read_to_end()?;
    bits.truncate(bits.len().saturating_sub(TRAIL_ZERO_CYCLES as usize));
    let data = bytes::bits_to_bytes_checked(&bits, Block::Data)?;

    Ok(Tape { program, data, auto_run })
}
