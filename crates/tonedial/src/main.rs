use clap::Parser;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tonedial_dtmf::{DecoderConfig, DEFAULT_MIDPOINT};

const POLL_INTERVAL_MS: u64 = 2;

#[derive(Parser, Debug)]
#[command(name = "tonedial", about = "DTMF keypad decoder for live audio input")]
struct Args {
    /// Regex selecting the capture device; defaults to the system default.
    #[arg(long)]
    device: Option<String>,
    /// Samples per detection window.
    #[arg(long, default_value_t = 64)]
    window: usize,
    /// Detector sampling rate in Hz. The device rate must be an integer
    /// multiple of this.
    #[arg(long, default_value_t = 9600)]
    rate: u32,
    /// Minimum tone magnitude accepted by the validator.
    #[arg(long, default_value_t = 500.0)]
    threshold: f32,
    /// Consecutive matching windows required beyond the first.
    #[arg(long, default_value_t = 1)]
    repeats: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (producer, mut pipeline) = DecoderConfig::new()
        .window_len(args.window)
        .sample_rate_hz(args.rate as f32)
        .threshold(args.threshold)
        .validation_depth(args.repeats)
        .build_pipeline();

    let _stream = tonedial_audio::start_default_input(
        producer,
        args.rate,
        DEFAULT_MIDPOINT,
        args.device.as_deref(),
    )?;

    loop {
        match pipeline.next_symbol() {
            Some(symbol) => println!("{}  {}", timestamp(), symbol),
            None => std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS)),
        }
    }
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "-".to_string())
}
