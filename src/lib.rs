/*
    cidertap: AppleSoft BASIC tokenizer and Apple II cassette audio codec.
    Copyright (C) 2026  Cidertap Contributors

    This library is free software: you can redistribute it and/or modify
    it under the terms of the GNU Lesser General Public License as
    published by the Free Software Foundation, either version 3 of the
    License, or (at your option) any later version.

    This library is distributed in the hope that it will be useful, but
    WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
    Lesser General Public License for more details.
*/
/*! Round-trips AppleSoft BASIC programs between source lines, the
Apple II tokenized memory image, and the cassette-interface audio
signal.

Four operations cover the whole path:

* [assemble] / [assemble_per_line] tokenize source lines into the
  in-memory program format the Apple II ROM interprets;
* [disassemble] recovers the source lines from such an image;
* [encode_wave] renders an image into the cassette signal as a mono
  8-bit WAVE file, with leader tones, sync bits and XOR checksums;
* [decode_wave] demodulates such a file back into the archived bytes
  with a zero-crossing frequency counter, the way the machine's own
  cassette input works.

```
use cidertap::{assemble, decode_wave, disassemble, encode_wave};

let lines = [
    "1 LET X$ = \"some value\"",
    "2 PRINT X$",
    "5 GOTO 1",
];

// source -> image -> source
let image = assemble(&lines)?;
let listing = disassemble(&image)?;
assert_eq!(lines[0], listing[0].text);

// source -> signal -> image, bit-exact
let wave = encode_wave(&lines, true)?;
let tape = decode_wave(&wave)?;
assert_eq!(image, tape.program);
assert!(tape.auto_run);
# Ok::<(), cidertap::Error>(())
```

The crate performs no I/O and keeps no state between calls; callers
hand it in-memory buffers. Lower-level building blocks live in
[bytes], [wave], [cassette::synth] and [cassette::demod].
*/
pub mod basic;
pub mod bytes;
pub mod cassette;
mod error;
pub mod wave;

pub use basic::{assemble, assemble_per_line, disassemble, Line};
pub use cassette::{decode_wave, encode_wave, Tape};
pub use error::{Block, Error, Result};
