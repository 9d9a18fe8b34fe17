use super::queue::FrameQueue;
use super::source::{AudioFrame, AudioSource, SourceConfig};
use crate::error::DeviceError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};

/// Microphone capture source backed by cpal.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated worker
/// thread for the lifetime of the capture. The cpal callback copies each
/// driver buffer into owned frames (the driver reuses its buffer) and pushes
/// them into the session's queue. `stop()` joins the worker, which drops the
/// stream first, so no frame is delivered after `stop()` returns.
pub struct MicSource {
    config: SourceConfig,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl MicSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// List available input device names, default device first.
    pub fn list_input_devices() -> Result<Vec<String>, DeviceError> {
        let host = cpal::default_host();
        let default_name = host
            .default_input_device()
            .and_then(|d| d.name().ok());

        let mut names: Vec<String> = Vec::new();
        if let Some(name) = &default_name {
            names.push(name.clone());
        }

        let devices = host
            .input_devices()
            .map_err(|e| DeviceError::Backend(e.to_string()))?;
        for device in devices {
            if let Ok(name) = device.name() {
                if Some(&name) != default_name.as_ref() {
                    names.push(name);
                }
            }
        }

        Ok(names)
    }

    fn find_device(host: &cpal::Host, wanted: Option<&str>) -> Result<cpal::Device, DeviceError> {
        match wanted {
            Some(wanted) => {
                let devices = host
                    .input_devices()
                    .map_err(|e| DeviceError::Backend(e.to_string()))?;
                for device in devices {
                    if device.name().map(|n| n == wanted).unwrap_or(false) {
                        return Ok(device);
                    }
                }
                Err(DeviceError::NotFound(wanted.to_string()))
            }
            None => host
                .default_input_device()
                .ok_or(DeviceError::NoDefaultDevice),
        }
    }

    fn build_stream(
        device: &cpal::Device,
        config: &SourceConfig,
        queue: Arc<FrameQueue>,
    ) -> Result<cpal::Stream, DeviceError> {
        let sample_format = device
            .default_input_config()
            .map_err(|e| DeviceError::Backend(e.to_string()))?
            .sample_format();

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let chunker = FrameChunker::new(config, queue);
        let err_fn = |e: cpal::StreamError| error!("Audio stream error: {}", e);

        let unsupported = |reason: String| DeviceError::UnsupportedFormat {
            sample_rate: config.sample_rate,
            channels: config.channels,
            reason,
        };

        let stream = match sample_format {
            SampleFormat::I16 => {
                let mut chunker = chunker;
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            chunker.extend(data.iter().copied());
                        },
                        err_fn,
                        None,
                    )
                    .map_err(|e| unsupported(e.to_string()))?
            }
            SampleFormat::F32 => {
                let mut chunker = chunker;
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            chunker.extend(data.iter().map(|&s| {
                                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
                            }));
                        },
                        err_fn,
                        None,
                    )
                    .map_err(|e| unsupported(e.to_string()))?
            }
            other => {
                return Err(unsupported(format!("unhandled sample format {:?}", other)));
            }
        };

        Ok(stream)
    }
}

impl AudioSource for MicSource {
    fn start(&mut self, queue: Arc<FrameQueue>) -> Result<(), DeviceError> {
        let config = self.config.clone();
        let shutdown = Arc::clone(&self.shutdown);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<String, DeviceError>>();

        let worker = std::thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || {
                let host = cpal::default_host();
                let opened = Self::find_device(&host, config.device.as_deref()).and_then(
                    |device| {
                        let stream = Self::build_stream(&device, &config, queue)?;
                        stream
                            .play()
                            .map_err(|e| DeviceError::Backend(e.to_string()))?;
                        let name = device.name().unwrap_or_else(|_| "unknown".to_string());
                        Ok((stream, name))
                    },
                );

                let (stream, device_name) = match opened {
                    Ok(opened) => opened,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(device_name));

                while !shutdown.load(Ordering::SeqCst) {
                    std::thread::park_timeout(Duration::from_millis(50));
                }

                // Dropping the stream stops callback delivery before the
                // worker exits, which is what makes stop() a quiesce barrier.
                drop(stream);
            })
            .map_err(|e| DeviceError::Backend(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(device_name)) => {
                info!(
                    "Microphone capture started: '{}' at {} Hz, {}ch",
                    device_name, self.config.sample_rate, self.config.channels
                );
                self.worker = Some(worker);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(DeviceError::Backend("capture thread exited early".to_string()))
            }
        }
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        if let Some(worker) = self.worker.take() {
            self.shutdown.store(true, Ordering::SeqCst);
            worker.thread().unpark();
            if worker.join().is_err() {
                return Err(DeviceError::Backend("capture thread panicked".to_string()));
            }
            info!("Microphone capture stopped");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

impl Drop for MicSource {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Accumulates raw callback samples into fixed-duration frames.
struct FrameChunker {
    queue: Arc<FrameQueue>,
    buffer: Vec<i16>,
    samples_per_frame: usize,
    sample_rate: u32,
    channels: u16,
    frame_duration_ms: u64,
    frames_delivered: u64,
}

impl FrameChunker {
    fn new(config: &SourceConfig, queue: Arc<FrameQueue>) -> Self {
        Self {
            queue,
            buffer: Vec::with_capacity(config.samples_per_frame()),
            samples_per_frame: config.samples_per_frame(),
            sample_rate: config.sample_rate,
            channels: config.channels,
            frame_duration_ms: config.frame_duration_ms,
            frames_delivered: 0,
        }
    }

    fn extend(&mut self, samples: impl Iterator<Item = i16>) {
        for sample in samples {
            self.buffer.push(sample);
            if self.buffer.len() == self.samples_per_frame {
                let samples = std::mem::replace(
                    &mut self.buffer,
                    Vec::with_capacity(self.samples_per_frame),
                );
                self.queue.push(AudioFrame {
                    samples,
                    sample_rate: self.sample_rate,
                    channels: self.channels,
                    timestamp_ms: self.frames_delivered * self.frame_duration_ms,
                });
                self.frames_delivered += 1;
            }
        }
    }
}
