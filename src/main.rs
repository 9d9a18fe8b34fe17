use anyhow::Result;
use clap::Parser;
use escucha::{Config, MicSource};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "escucha", about = "Streaming speech-capture toolkit")]
struct Args {
    /// Config file path (without extension)
    #[arg(long, default_value = "config/escucha")]
    config: String,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_devices {
        for name in MicSource::list_input_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let cfg = Config::load(&args.config)?;

    info!("Escucha v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Capture format: {} Hz, {}ch, {}ms frames",
        cfg.capture.sample_rate, cfg.capture.channels, cfg.capture.frame_duration_ms
    );
    info!(
        "Silence timeout: {}s, queue capacity: {} frames",
        cfg.capture.silence_timeout_secs, cfg.capture.queue_capacity
    );
    match &cfg.capture.device {
        Some(device) => info!("Input device: {}", device),
        None => info!("Input device: system default"),
    }

    Ok(())
}
