use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_duration_ms: u64,
    pub silence_timeout_secs: u64,
    pub queue_capacity: usize,
    pub device: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl CaptureConfig {
    /// Session-level view of the file configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
            frame_duration_ms: self.frame_duration_ms,
            silence_timeout: Duration::from_secs(self.silence_timeout_secs),
            queue_capacity: self.queue_capacity,
            device: self.device.clone(),
            ..SessionConfig::default()
        }
    }
}
