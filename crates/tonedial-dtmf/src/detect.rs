pub mod dsp;

use crate::window::WindowConsumer;
use dsp::{FilterBank, Observation, COL_FREQS_HZ, KEYPAD, ROW_FREQS_HZ};

const DEFAULT_WINDOW_LEN: usize = 64;
const DEFAULT_SAMPLE_RATE_HZ: f32 = 9600.0;
const DEFAULT_THRESHOLD: f32 = 500.0;
const DEFAULT_VALIDATION_DEPTH: u8 = 1;

/// Callbacks invoked on validation transitions. Every method defaults to a
/// no-op; implement only what you want to observe.
pub trait ValidationHooks {
    /// A candidate reached the validation depth and its symbol was emitted.
    fn on_confirmed(&mut self, _symbol: char, _row: usize, _col: usize) {}
    /// An above-threshold candidate was seen but has not yet accumulated
    /// enough consecutive matches.
    fn on_rejected(&mut self, _row: usize, _col: usize, _repeats: u8) {}
}

/// Debounces scan observations so that a sustained key-press emits exactly
/// one symbol.
struct Validator {
    threshold: f32,
    depth: u8,
    keypad: [[char; 4]; 4],
    tracked: Option<(usize, usize)>,
    repeats: u8,
    failed_matches: u8,
    hooks: Option<Box<dyn ValidationHooks>>,
}

impl Validator {
    fn advance(&mut self, obs: &Observation) -> Option<char> {
        let (row, col) = match (obs.row, obs.col) {
            (Some(row), Some(col))
                if obs.row_magnitude > self.threshold && obs.col_magnitude > self.threshold =>
            {
                (row, col)
            }
            _ => {
                // Silence or noise: drop the candidate and go idle.
                self.tracked = None;
                self.repeats = 0;
                return None;
            }
        };

        if self.tracked == Some((row, col)) {
            self.repeats = self.repeats.saturating_add(1);
        } else {
            self.tracked = Some((row, col));
            self.repeats = 0;
        }

        // Exact equality: the confirming frame is the only one that emits,
        // however long the tone is held afterwards.
        if self.repeats == self.depth {
            self.failed_matches = 0;
            let symbol = self.keypad[row][col];
            if let Some(hooks) = self.hooks.as_mut() {
                hooks.on_confirmed(symbol, row, col);
            }
            return Some(symbol);
        }

        if self.repeats < self.depth {
            // Quality statistic only; nothing upstream treats this as an error.
            self.failed_matches = self.failed_matches.saturating_add(1);
            if let Some(hooks) = self.hooks.as_mut() {
                hooks.on_rejected(row, col, self.repeats);
            }
        }

        None
    }

    fn reset(&mut self) {
        self.tracked = None;
        self.repeats = 0;
        self.failed_matches = 0;
    }
}

/// Builder for a [`DtmfDecoder`]. Everything here is fixed once built.
pub struct DecoderConfig {
    window_len: usize,
    sample_rate_hz: f32,
    threshold: f32,
    validation_depth: u8,
    midpoint: f32,
    row_freqs_hz: [f32; 4],
    col_freqs_hz: [f32; 4],
    keypad: [[char; 4]; 4],
    hooks: Option<Box<dyn ValidationHooks>>,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            threshold: DEFAULT_THRESHOLD,
            validation_depth: DEFAULT_VALIDATION_DEPTH,
            midpoint: crate::DEFAULT_MIDPOINT,
            row_freqs_hz: ROW_FREQS_HZ,
            col_freqs_hz: COL_FREQS_HZ,
            keypad: KEYPAD,
            hooks: None,
        }
    }

    /// Samples per detection window. Couples with the sampling rate to set
    /// frequency resolution.
    pub fn window_len(mut self, len: usize) -> Self {
        self.window_len = len.max(1);
        self
    }

    /// Sampling rate in Hz. Must exceed twice the highest tone frequency.
    pub fn sample_rate_hz(mut self, rate: f32) -> Self {
        self.sample_rate_hz = rate;
        self
    }

    /// Minimum magnitude both tone groups must exceed for a window to count
    /// as a detection.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Consecutive matching windows required beyond the first before a
    /// symbol is emitted. Zero emits on the first valid window. Clamped to
    /// 254 so the saturating repeat counter can always reach it exactly.
    pub fn validation_depth(mut self, depth: u8) -> Self {
        self.validation_depth = depth.min(u8::MAX - 1);
        self
    }

    /// Zero-signal level of the sample scale.
    pub fn midpoint(mut self, midpoint: f32) -> Self {
        self.midpoint = midpoint;
        self
    }

    pub fn row_freqs_hz(mut self, freqs: [f32; 4]) -> Self {
        self.row_freqs_hz = freqs;
        self
    }

    pub fn col_freqs_hz(mut self, freqs: [f32; 4]) -> Self {
        self.col_freqs_hz = freqs;
        self
    }

    /// Symbol table indexed as `keypad[row][col]`.
    pub fn keypad(mut self, keypad: [[char; 4]; 4]) -> Self {
        self.keypad = keypad;
        self
    }

    /// Observer for validation transitions.
    pub fn hooks(mut self, hooks: Box<dyn ValidationHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn build(self) -> DtmfDecoder {
        let bank = FilterBank::new(
            self.row_freqs_hz,
            self.col_freqs_hz,
            self.sample_rate_hz,
            self.midpoint,
        );
        DtmfDecoder {
            window_len: self.window_len,
            bank,
            validator: Validator {
                threshold: self.threshold,
                depth: self.validation_depth,
                keypad: self.keypad,
                tracked: None,
                repeats: 0,
                failed_matches: 0,
                hooks: self.hooks,
            },
        }
    }

    /// Build a decoder together with a matching window slot, returning the
    /// producer half for the acquisition side.
    pub fn build_pipeline(self) -> (crate::window::WindowProducer, DtmfPipeline) {
        let len = self.window_len;
        let decoder = self.build();
        let (producer, consumer) = crate::window::window_slot(len);
        (producer, DtmfPipeline { decoder, consumer })
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful DTMF decoder for sequential fixed-length windows.
pub struct DtmfDecoder {
    window_len: usize,
    bank: FilterBank,
    validator: Validator,
}

impl DtmfDecoder {
    /// Create a builder with default settings.
    pub fn config() -> DecoderConfig {
        DecoderConfig::new()
    }

    /// Scan one window and step the validator. Returns the symbol exactly
    /// on its confirming frame; windows of the wrong length are ignored.
    pub fn process_window(&mut self, window: &[u8]) -> Option<char> {
        if window.len() != self.window_len {
            return None;
        }
        let obs = self.bank.scan(window);
        self.validator.advance(&obs)
    }

    /// Windows above threshold that were seen while a candidate was still
    /// accumulating. Diagnostic only; resets on each confirmed symbol.
    pub fn failed_matches(&self) -> u8 {
        self.validator.failed_matches
    }

    /// Expected window length in samples.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Drop any tracked candidate and clear the counters.
    pub fn reset(&mut self) {
        self.validator.reset();
    }
}

/// A decoder bound to the consumer half of a window slot.
pub struct DtmfPipeline {
    decoder: DtmfDecoder,
    consumer: WindowConsumer,
}

impl DtmfPipeline {
    pub fn new(decoder: DtmfDecoder, consumer: WindowConsumer) -> Self {
        Self { decoder, consumer }
    }

    /// Non-blocking poll: scans at most one completed window, releases it,
    /// and returns the symbol if that window was the confirming one.
    pub fn next_symbol(&mut self) -> Option<char> {
        let window = self.consumer.try_acquire()?;
        self.decoder.process_window(&window)
    }

    pub fn decoder(&self) -> &DtmfDecoder {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut DtmfDecoder {
        &mut self.decoder
    }
}
