//! Microphone frame capture using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleRate, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::AudioConfig;
use crate::error::{AudioError, Result};

/// One device read: a fixed-size run of signed 16-bit mono samples
pub type AudioFrame = Vec<i16>;

/// Blocking source of fixed-size audio frames.
///
/// `Ok(None)` signals that the source has ended (cancelled or exhausted);
/// errors are device failures and fatal to the session.
pub trait FrameRead {
    fn read_frame(&mut self) -> Result<Option<AudioFrame>>;
}

/// Microphone frame source backed by a cpal input stream.
///
/// The stream callback downmixes to mono and re-frames the device's
/// variable-size buffers into exact `frame_size` frames, pushed into a
/// bounded channel. A full channel drops the frame with a warning so the
/// audio thread never blocks.
pub struct FrameSource {
    _stream: Stream,
    frames: Receiver<AudioFrame>,
    running: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
}

impl FrameSource {
    /// Open the configured input device and start capturing.
    ///
    /// Clearing `running` makes subsequent reads return `Ok(None)`; the
    /// device is released when the source is dropped.
    pub fn open(config: &AudioConfig, running: Arc<AtomicBool>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match config.device {
            Some(ref name) => find_device_by_name(&host, name)?,
            None => host
                .default_input_device()
                .ok_or(AudioError::NoInputDevice)?,
        };

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("Using audio input device: {}", device_name);

        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        // Prefer a matching channel count; the capture rate must be supported
        // exactly because the pipeline does not resample.
        let target_rate = SampleRate(config.sample_rate);
        let mut best_config = None;
        for cfg in supported_configs {
            debug!(
                "Supported config: channels={}, sample_rate={:?}-{:?}",
                cfg.channels(),
                cfg.min_sample_rate(),
                cfg.max_sample_rate()
            );

            if cfg.min_sample_rate() <= target_rate && target_rate <= cfg.max_sample_rate() {
                if cfg.channels() == config.channels {
                    best_config = Some(cfg.with_sample_rate(target_rate));
                    break;
                }
                if best_config.is_none() {
                    best_config = Some(cfg.with_sample_rate(target_rate));
                }
            }
        }

        let supported_config = best_config.ok_or_else(|| {
            AudioError::DeviceConfig(format!(
                "device does not support capture at {} Hz",
                config.sample_rate
            ))
        })?;

        let channels = supported_config.channels();
        info!(
            "Audio config: {} channels @ {} Hz",
            channels, config.sample_rate
        );

        let stream_config = StreamConfig {
            channels,
            sample_rate: target_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let (sender, receiver) = bounded::<AudioFrame>(64);
        let failed = Arc::new(AtomicBool::new(false));
        let frame_size = config.frame_size as usize;
        let channel_count = channels as usize;
        let running_cb = running.clone();
        let failed_cb = failed.clone();
        let mut pending: Vec<i16> = Vec::with_capacity(frame_size * 2);

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !running_cb.load(Ordering::Relaxed) {
                        return;
                    }
                    for frame in split_frames(&mut pending, data, channel_count, frame_size) {
                        match sender.try_send(frame) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                warn!("Frame queue full - dropping captured audio");
                            }
                            Err(TrySendError::Disconnected(_)) => return,
                        }
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                    failed_cb.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        info!("Audio capture started");

        Ok(Self {
            _stream: stream,
            frames: receiver,
            running,
            failed,
        })
    }
}

impl FrameRead for FrameSource {
    fn read_frame(&mut self) -> Result<Option<AudioFrame>> {
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return Ok(None);
            }
            if self.failed.load(Ordering::Relaxed) {
                return Err(
                    AudioError::Disconnected("input stream reported an error".to_string()).into(),
                );
            }
            match self.frames.recv_timeout(Duration::from_millis(100)) {
                Ok(frame) => return Ok(Some(frame)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(
                        AudioError::Disconnected("capture stream closed".to_string()).into(),
                    )
                }
            }
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        debug!("Audio capture stopped");
    }
}

/// Fold an interleaved device buffer into `pending` as mono i16 and split off
/// every complete frame. Leftover samples stay in `pending` for the next call.
fn split_frames(
    pending: &mut Vec<i16>,
    data: &[f32],
    channels: usize,
    frame_size: usize,
) -> Vec<AudioFrame> {
    for slot in data.chunks(channels) {
        let mono = slot.iter().sum::<f32>() / channels as f32;
        pending.push((mono.clamp(-1.0, 1.0) * 32767.0) as i16);
    }

    let mut frames = Vec::new();
    while pending.len() >= frame_size {
        frames.push(pending.drain(..frame_size).collect());
    }
    frames
}

/// List available audio input devices
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

    let mut names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            names.push(name);
        }
    }
    Ok(names)
}

fn find_device_by_name(host: &Host, name: &str) -> Result<Device> {
    let devices = host
        .input_devices()
        .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

    for device in devices {
        if let Ok(device_name) = device.name() {
            if device_name.contains(name) {
                return Ok(device);
            }
        }
    }

    Err(AudioError::DeviceNotFound(name.to_string()).into())
}
