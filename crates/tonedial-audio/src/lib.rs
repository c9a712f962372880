//! Audio capture feeding the detector's window slot.
//!
//! Opens a cpal input stream, takes the first channel, decimates the device
//! rate down to the detector's sampling rate, converts to the unsigned
//! 8-bit sample scale, and pushes into a [`WindowProducer`]. Overrun while
//! the detector holds the window is absorbed by the slot's drop policy.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use regex::Regex;
use tonedial_dtmf::WindowProducer;

/// Start capturing from the default (or regex-matched) input device into
/// `producer`. The returned stream must be kept alive for capture to
/// continue. The device rate must be an integer multiple of
/// `target_rate_hz`.
pub fn start_default_input(
    mut producer: WindowProducer,
    target_rate_hz: u32,
    midpoint: f32,
    device_regex: Option<&str>,
) -> Result<cpal::Stream, Box<dyn std::error::Error>> {
    let host = cpal::default_host();
    let device = select_input_device(&host, device_regex)?;
    let default_config = device.default_input_config()?;
    if default_config.sample_format() != cpal::SampleFormat::F32 {
        return Err("unsupported sample format (expected f32)".into());
    }
    let config: cpal::StreamConfig = default_config.into();
    let device_rate = config.sample_rate.0;
    if target_rate_hz == 0 || device_rate % target_rate_hz != 0 {
        return Err(format!(
            "device rate {} Hz is not an integer multiple of {} Hz",
            device_rate, target_rate_hz
        )
        .into());
    }
    let channels = config.channels as usize;
    let mut decimator = Decimator::new((device_rate / target_rate_hz) as usize);

    let err_fn = |err| eprintln!("audio stream error: {}", err);

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _info| {
            for frame in data.chunks(channels) {
                if decimator.keep() {
                    let _ = producer.push(to_u8(frame[0], midpoint));
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

fn select_input_device(
    host: &cpal::Host,
    device_regex: Option<&str>,
) -> Result<cpal::Device, Box<dyn std::error::Error>> {
    if let Some(pattern) = device_regex {
        let re = Regex::new(pattern)?;
        for dev in host.input_devices()? {
            let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
            if re.is_match(&name) {
                return Ok(dev);
            }
        }
        return Err("no input device matched regex".into());
    }

    host.default_input_device()
        .ok_or_else(|| "no default input device available".into())
}

/// Keeps one sample in every `factor`.
struct Decimator {
    factor: usize,
    phase: usize,
}

impl Decimator {
    fn new(factor: usize) -> Self {
        Self {
            factor: factor.max(1),
            phase: 0,
        }
    }

    fn keep(&mut self) -> bool {
        let keep = self.phase == 0;
        self.phase += 1;
        if self.phase == self.factor {
            self.phase = 0;
        }
        keep
    }
}

/// Map a [-1, 1] float sample onto the detector's unsigned 8-bit scale.
fn to_u8(sample: f32, midpoint: f32) -> u8 {
    let value = midpoint + sample.clamp(-1.0, 1.0) * 127.0;
    value.round().clamp(0.0, 255.0) as u8
}
