use std::f32::consts::TAU;

/// Row tone frequencies in keypad order.
pub const ROW_FREQS_HZ: [f32; 4] = [1209.0, 1336.0, 1477.0, 1633.0];
/// Column tone frequencies in keypad order.
pub const COL_FREQS_HZ: [f32; 4] = [697.0, 770.0, 852.0, 941.0];

/// Standard 16-key layout, indexed as `KEYPAD[row][col]`.
pub const KEYPAD: [[char; 4]; 4] = [
    ['1', '4', '7', '*'],
    ['2', '5', '8', '0'],
    ['3', '6', '9', '#'],
    ['A', 'B', 'C', 'D'],
];

/// Single-frequency energy estimator using the Goertzel recursion.
///
/// The coefficient is derived once from the target frequency and sampling
/// rate; `detect` is stateless per call. Magnitudes are uncalibrated and
/// only meaningful relative to a threshold or to other filters run over
/// the same window.
#[derive(Debug, Clone, Copy)]
pub struct Goertzel {
    target_freq_hz: f32,
    coeff: f32,
}

impl Goertzel {
    pub fn new(target_freq_hz: f32, sample_rate_hz: f32) -> Self {
        let omega = TAU * target_freq_hz / sample_rate_hz;
        Self {
            target_freq_hz,
            coeff: 2.0 * omega.cos(),
        }
    }

    pub fn target_freq_hz(&self) -> f32 {
        self.target_freq_hz
    }

    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Magnitude of the window's energy at the target frequency. The two
    /// filter state values live on the stack, so calls are independent.
    pub fn detect(&self, window: &[u8], midpoint: f32) -> f32 {
        let mut s1 = 0.0f32;
        let mut s2 = 0.0f32;
        for &sample in window {
            let s0 = self.coeff * s1 - s2 + (f32::from(sample) - midpoint);
            s2 = s1;
            s1 = s0;
        }
        (s1 * s1 + s2 * s2 - self.coeff * s1 * s2).sqrt()
    }
}

/// Result of scanning one window through the full bank: the strongest row
/// and column candidates (if any) with their magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub row: Option<usize>,
    pub col: Option<usize>,
    pub row_magnitude: f32,
    pub col_magnitude: f32,
}

/// Eight configured Goertzel filters, four per tone group.
pub struct FilterBank {
    rows: [Goertzel; 4],
    cols: [Goertzel; 4],
    midpoint: f32,
}

impl FilterBank {
    pub fn new(
        row_freqs_hz: [f32; 4],
        col_freqs_hz: [f32; 4],
        sample_rate_hz: f32,
        midpoint: f32,
    ) -> Self {
        Self {
            rows: row_freqs_hz.map(|freq| Goertzel::new(freq, sample_rate_hz)),
            cols: col_freqs_hz.map(|freq| Goertzel::new(freq, sample_rate_hz)),
            midpoint,
        }
    }

    /// Run every filter over the same window and keep the strongest row and
    /// the strongest column independently.
    pub fn scan(&self, window: &[u8]) -> Observation {
        let (row, row_magnitude) = best_match(&self.rows, window, self.midpoint);
        let (col, col_magnitude) = best_match(&self.cols, window, self.midpoint);
        Observation {
            row,
            col,
            row_magnitude,
            col_magnitude,
        }
    }
}

// Strict comparison: ties keep the earlier index, and an all-zero window
// leaves the tracker at "no match".
fn best_match(filters: &[Goertzel; 4], window: &[u8], midpoint: f32) -> (Option<usize>, f32) {
    let mut best = None;
    let mut best_magnitude = 0.0f32;
    for (i, filter) in filters.iter().enumerate() {
        let magnitude = filter.detect(window, midpoint);
        if magnitude > best_magnitude {
            best_magnitude = magnitude;
            best = Some(i);
        }
    }
    (best, best_magnitude)
}
