//! Run the conditioning pipeline live.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use gazelens_common::config::AppConfig;
use gazelens_model::gaze::StableGazeUpdate;
use gazelens_model::overlay::OverlayLayout;
use gazelens_model::status::TrackerStatus;
use gazelens_session::{SessionConfig, StatusMonitor, TrackingSession};
use gazelens_source::{ConnectivityProbe, FileChannel};

pub async fn run(config: &AppConfig, layout: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    config.validate()?;
    let layout = layout.map(|path| load_layout(&path, config)).transpose()?;

    let channel = FileChannel::new(&config.channel.path);
    let mut session = TrackingSession::new(
        Box::new(channel),
        SessionConfig::from_app(&config.channel, &config.conditioning),
    )?;
    let mut monitor = StatusMonitor::new(
        ConnectivityProbe::new(
            &config.channel.path,
            Duration::from_secs_f64(config.channel.freshness_secs),
        ),
        Duration::from_millis(config.channel.status_interval_ms),
    );

    let mut updates = session.subscribe();
    let mut status = monitor.subscribe();
    print_status(&status.borrow_and_update());

    if !monitor.start(Some(session.warnings())) || !session.start() {
        anyhow::bail!("Failed to start eye tracking");
    }
    eprintln!("Tracking {} (Press Ctrl+C to stop)", config.channel.path.display());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = *updates.borrow_and_update();
                if let Some(update) = update {
                    print_update(&update, layout.as_ref(), json)?;
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                print_status(&current);
            }
        }
    }

    session.stop();
    monitor.stop();
    eprintln!("\nEye tracking stopped.");
    Ok(())
}

fn load_layout(path: &Path, config: &AppConfig) -> anyhow::Result<OverlayLayout> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout {}", path.display()))?;
    let mut value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid layout JSON in {}", path.display()))?;
    if let Some(object) = value.as_object_mut() {
        object
            .entry("focus_size")
            .or_insert_with(|| serde_json::json!(config.overlay.focus_size));
    }
    Ok(serde_json::from_value(value)?)
}

fn print_update(
    update: &StableGazeUpdate,
    layout: Option<&OverlayLayout>,
    json: bool,
) -> anyhow::Result<()> {
    let placement = layout.map(|layout| layout.place(update));

    if json {
        let line = serde_json::json!({
            "update": update,
            "placement": placement,
        });
        println!("{line}");
        return Ok(());
    }

    let (x, y) = update.rounded();
    match placement {
        Some(placement) => {
            let focus = placement
                .focus
                .map(|f| format!("focus @ ({:.0}, {:.0})", f.x, f.y))
                .unwrap_or_else(|| "off image".to_string());
            println!(
                "Screen X: {x}, Y: {y}  pointer ({:.0}, {:.0})  {focus}",
                placement.pointer.x, placement.pointer.y
            );
        }
        None => println!("Screen X: {x}, Y: {y}"),
    }
    Ok(())
}

fn print_status(status: &TrackerStatus) {
    let connection = if status.connected() {
        "connected"
    } else {
        "not connected"
    };
    match status.warning {
        Some(warning) => eprintln!("Producer: {connection} | Warning: {}", warning.message()),
        None => eprintln!("Producer: {connection}"),
    }
}
