//! Full-pipeline tests driving the window handoff and decoder with
//! synthesized tone windows.

use tonedial_dtmf::DecoderConfig;
use tonedial_gen::ToneSynth;

const SAMPLE_RATE_HZ: f32 = 9600.0;
const WINDOW_LEN: usize = 64;

fn pipeline(
    depth: u8,
) -> (
    tonedial_dtmf::WindowProducer,
    tonedial_dtmf::DtmfPipeline,
) {
    DecoderConfig::new()
        .window_len(WINDOW_LEN)
        .sample_rate_hz(SAMPLE_RATE_HZ)
        .threshold(500.0)
        .validation_depth(depth)
        .build_pipeline()
}

#[test]
fn two_tone_windows_then_silence_emit_exactly_one_symbol() {
    let (mut producer, mut pipeline) = pipeline(1);
    let mut synth = ToneSynth::new(SAMPLE_RATE_HZ, 55.0);
    let mut window = [0u8; WINDOW_LEN];

    // First window of '1' (1209 Hz + 697 Hz): candidate starts accumulating.
    synth.key_window('1', &mut window).unwrap();
    assert_eq!(producer.extend(&window), WINDOW_LEN);
    assert_eq!(pipeline.next_symbol(), None);
    assert_eq!(pipeline.decoder().failed_matches(), 1);

    // Second matching window reaches the validation depth.
    synth.key_window('1', &mut window).unwrap();
    assert_eq!(producer.extend(&window), WINDOW_LEN);
    assert_eq!(pipeline.next_symbol(), Some('1'));

    // Silence returns the validator to idle.
    synth.silence(&mut window);
    assert_eq!(producer.extend(&window), WINDOW_LEN);
    assert_eq!(pipeline.next_symbol(), None);
    assert_eq!(pipeline.decoder().failed_matches(), 0);
}

#[test]
fn reset_forgets_the_tracked_candidate() {
    let (mut producer, mut pipeline) = pipeline(1);
    let mut synth = ToneSynth::new(SAMPLE_RATE_HZ, 55.0);
    let mut window = [0u8; WINDOW_LEN];

    synth.key_window('9', &mut window).unwrap();
    producer.extend(&window);
    assert_eq!(pipeline.next_symbol(), None);

    // After a reset the same tone must re-run the full validation depth.
    pipeline.decoder_mut().reset();
    synth.key_window('9', &mut window).unwrap();
    producer.extend(&window);
    assert_eq!(pipeline.next_symbol(), None);
    synth.key_window('9', &mut window).unwrap();
    producer.extend(&window);
    assert_eq!(pipeline.next_symbol(), Some('9'));
}

#[test]
fn held_key_is_not_repeated() {
    let (mut producer, mut pipeline) = pipeline(1);
    let mut synth = ToneSynth::new(SAMPLE_RATE_HZ, 55.0);
    let mut window = [0u8; WINDOW_LEN];

    let mut emitted = Vec::new();
    for _ in 0..10 {
        synth.key_window('8', &mut window).unwrap();
        producer.extend(&window);
        if let Some(symbol) = pipeline.next_symbol() {
            emitted.push(symbol);
        }
    }
    assert_eq!(emitted, vec!['8']);
}

#[test]
fn separate_presses_emit_separate_symbols() {
    let (mut producer, mut pipeline) = pipeline(0);
    let mut synth = ToneSynth::new(SAMPLE_RATE_HZ, 55.0);
    let mut window = [0u8; WINDOW_LEN];
    let mut emitted = String::new();

    for key in ['4', '2', '#'] {
        synth.key_window(key, &mut window).unwrap();
        producer.extend(&window);
        if let Some(symbol) = pipeline.next_symbol() {
            emitted.push(symbol);
        }

        synth.silence(&mut window);
        producer.extend(&window);
        assert_eq!(pipeline.next_symbol(), None);
    }

    assert_eq!(emitted, "42#");
}

#[test]
fn poll_without_a_ready_window_returns_nothing() {
    let (mut producer, mut pipeline) = pipeline(1);
    assert_eq!(pipeline.next_symbol(), None);

    // A partial window is not visible to the consumer.
    producer.push(200);
    assert_eq!(pipeline.next_symbol(), None);
}

#[test]
fn overrun_samples_are_dropped_not_queued() {
    let (mut producer, pipeline) = pipeline(1);
    let synth = ToneSynth::new(SAMPLE_RATE_HZ, 55.0);
    let mut window = [0u8; WINDOW_LEN];
    synth.silence(&mut window);

    assert_eq!(producer.extend(&window), WINDOW_LEN);
    // The slot is published and unconsumed; this whole window is lost.
    assert_eq!(producer.extend(&window), 0);
    drop(pipeline);
}
