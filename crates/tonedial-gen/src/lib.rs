//! DTMF tone synthesis: dual-tone windows in the detector's unsigned 8-bit
//! sample format, for tests and demos.

pub mod keymap;
pub mod synth;

pub use keymap::key_freqs;
pub use synth::{SynthError, ToneSynth};
