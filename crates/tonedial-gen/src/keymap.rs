use phf::phf_map;

/// Canonical (row tone, column tone) frequencies in Hz for each key of the
/// 16-key pad. Row tones are the 1209-1633 Hz group, column tones the
/// 697-941 Hz group.
static KEY_FREQS: phf::Map<char, (f32, f32)> = phf_map! {
    '1' => (1209.0, 697.0),
    '2' => (1336.0, 697.0),
    '3' => (1477.0, 697.0),
    'A' => (1633.0, 697.0),
    '4' => (1209.0, 770.0),
    '5' => (1336.0, 770.0),
    '6' => (1477.0, 770.0),
    'B' => (1633.0, 770.0),
    '7' => (1209.0, 852.0),
    '8' => (1336.0, 852.0),
    '9' => (1477.0, 852.0),
    'C' => (1633.0, 852.0),
    '*' => (1209.0, 941.0),
    '0' => (1336.0, 941.0),
    '#' => (1477.0, 941.0),
    'D' => (1633.0, 941.0),
};

/// Look up the tone pair for a keypad character, or `None` if the
/// character is not on the pad.
pub fn key_freqs(key: char) -> Option<(f32, f32)> {
    KEY_FREQS.get(&key).copied()
}
