use crate::keymap::key_freqs;
use std::f32::consts::TAU;

const DEFAULT_MIDPOINT: f32 = 128.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    UnknownKey(char),
}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::UnknownKey(key) => write!(f, "not a DTMF key: {}", key),
        }
    }
}

impl std::error::Error for SynthError {}

/// Generates midpoint-centered 8-bit dual-tone samples. Phase is carried
/// across calls so consecutive windows form one continuous tone.
pub struct ToneSynth {
    sample_rate_hz: f32,
    amplitude: f32,
    midpoint: f32,
    phase_row: f32,
    phase_col: f32,
}

impl ToneSynth {
    /// `amplitude` is counts per tone component; the caller must keep
    /// `midpoint ± 2·amplitude` inside the 8-bit range.
    pub fn new(sample_rate_hz: f32, amplitude: f32) -> Self {
        Self {
            sample_rate_hz,
            amplitude,
            midpoint: DEFAULT_MIDPOINT,
            phase_row: 0.0,
            phase_col: 0.0,
        }
    }

    /// Override the zero-signal level.
    pub fn midpoint(mut self, midpoint: f32) -> Self {
        self.midpoint = midpoint;
        self
    }

    /// Fill `out` with the key's dual tone.
    pub fn key_window(&mut self, key: char, out: &mut [u8]) -> Result<(), SynthError> {
        let (row_hz, col_hz) = key_freqs(key).ok_or(SynthError::UnknownKey(key))?;
        let row_inc = TAU * row_hz / self.sample_rate_hz;
        let col_inc = TAU * col_hz / self.sample_rate_hz;
        for sample in out.iter_mut() {
            let value =
                self.midpoint + self.amplitude * (self.phase_row.sin() + self.phase_col.sin());
            *sample = quantize(value);
            self.phase_row = wrap(self.phase_row + row_inc);
            self.phase_col = wrap(self.phase_col + col_inc);
        }
        Ok(())
    }

    /// Fill `out` with a single sinusoid, for exercising one filter at a
    /// time.
    pub fn single_tone(&mut self, freq_hz: f32, out: &mut [u8]) {
        let inc = TAU * freq_hz / self.sample_rate_hz;
        for sample in out.iter_mut() {
            *sample = quantize(self.midpoint + self.amplitude * self.phase_row.sin());
            self.phase_row = wrap(self.phase_row + inc);
        }
    }

    /// Fill `out` with the midpoint level.
    pub fn silence(&self, out: &mut [u8]) {
        out.fill(quantize(self.midpoint));
    }

    pub fn reset_phase(&mut self) {
        self.phase_row = 0.0;
        self.phase_col = 0.0;
    }
}

fn quantize(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn wrap(phase: f32) -> f32 {
    if phase >= TAU {
        phase - TAU
    } else {
        phase
    }
}
