//! Print raw coordinates continuously.

use std::io::Write;
use std::time::Duration;

use gazelens_common::config::AppConfig;
use gazelens_source::{FileChannel, SampleSource};
use tokio::time::MissedTickBehavior;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    config.channel.validate()?;

    let mut channel = FileChannel::new(&config.channel.path);
    let mut ticks = tokio::time::interval(Duration::from_millis(config.channel.poll_interval_ms));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    println!("Monitoring gaze coordinates... (Press Ctrl+C to exit)");
    println!();

    let mut last_output = String::new();
    let mut stdout = std::io::stdout();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticks.tick() => {
                let output = match super::describe_reading(&channel.poll()) {
                    Ok(line) => line,
                    Err(message) => format!("Error: {message}"),
                };
                // Only redraw when the text changes to avoid flicker.
                if output != last_output {
                    write!(stdout, "\r\x1b[K{output}")?;
                    stdout.flush()?;
                    last_output = output;
                }
            }
        }
    }

    println!("\n\nMonitoring stopped.");
    Ok(())
}
