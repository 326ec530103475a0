//! Audio capture module using cpal

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc::{self, Receiver};
use tracing::{info, warn};

/// Capture rate expected by the recognizer
pub const SAMPLE_RATE: u32 = 16000;
const CHUNK_SIZE: u32 = 1024;

/// Energy floor so a silent room doesn't make every click count as speech
pub const MIN_SPEECH_THRESHOLD: f32 = 300.0;

/// Names of the available input devices, in index order
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    Ok(host
        .input_devices()?
        .map(|d| d.name().unwrap_or_else(|_| "Unknown".to_string()))
        .collect())
}

/// Start microphone capture (mono, 16 kHz) and return a receiver of sample chunks.
///
/// The stream stays open for the rest of the process.
pub fn start_capture(device_index: Option<usize>) -> Result<Receiver<Vec<i16>>> {
    let host = cpal::default_host();

    let device = match device_index {
        Some(idx) => host
            .input_devices()?
            .nth(idx)
            .with_context(|| format!("No input device with index {}", idx))?,
        None => host
            .default_input_device()
            .context("No default input device")?,
    };

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    info!("🎙️ Using audio device: {}", device_name);

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Fixed(CHUNK_SIZE),
    };

    let (tx, rx) = mpsc::channel();
    let stream = device.build_input_stream(
        &config,
        move |data: &[i16], _: &cpal::InputCallbackInfo| {
            // Receiver gone means capture is over; nothing to report
            let _ = tx.send(data.to_vec());
        },
        |err| warn!("⚠️ Audio stream error: {}", err),
        None,
    )?;
    stream.play()?;

    // cpal streams are not Send; keep it alive for the process lifetime
    std::mem::forget(stream);

    Ok(rx)
}

/// Root-mean-square energy of a chunk
pub fn calculate_energy(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: i64 = samples.iter().map(|&s| (s as i64).pow(2)).sum();
    (sum as f32 / samples.len() as f32).sqrt()
}

/// Speech threshold for a room whose background chunks measured `ambient`
pub fn speech_threshold(ambient: &[f32]) -> f32 {
    if ambient.is_empty() {
        return MIN_SPEECH_THRESHOLD;
    }
    let mean = ambient.iter().sum::<f32>() / ambient.len() as f32;
    (mean * 1.5).max(MIN_SPEECH_THRESHOLD)
}
