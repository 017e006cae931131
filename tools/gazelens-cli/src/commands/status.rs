//! Check channel connectivity.

use std::time::Duration;

use gazelens_common::config::AppConfig;
use gazelens_source::ConnectivityProbe;

pub fn run(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    config.channel.validate()?;

    let probe = ConnectivityProbe::new(
        &config.channel.path,
        Duration::from_secs_f64(config.channel.freshness_secs),
    );
    let status = probe.check_status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("GazeLens Channel Status");
    println!("{}", "=".repeat(50));
    println!("Channel: {}", status.path.display());
    let last = status
        .last_update
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    if status.connected {
        println!("[OK] Producer connected (last update {last})");
    } else {
        println!("[WARN] Producer not connected (last update {last})");
        println!("     Make sure the eye tracker and its producer script are running.");
    }
    Ok(())
}
