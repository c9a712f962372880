//! DTMF tone detection for fixed-length sample windows.
//!
//! The decoder consumes windows of unsigned 8-bit amplitude samples, runs a
//! bank of eight Goertzel filters over each one, and debounces the resulting
//! best-match tone pairs so that a sustained key-press yields exactly one
//! symbol. Windows arrive through a single-slot producer/consumer handoff
//! suited to a real-time acquisition source.

pub mod detect;
pub mod window;

pub use detect::dsp::Observation;
pub use detect::{DecoderConfig, DtmfDecoder, DtmfPipeline, ValidationHooks};
pub use window::{window_slot, Window, WindowConsumer, WindowProducer};

/// Zero-signal level of the unsigned 8-bit sample scale.
pub const DEFAULT_MIDPOINT: f32 = 128.0;
