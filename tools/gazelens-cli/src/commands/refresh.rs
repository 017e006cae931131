//! Touch the channel to nudge the producer.

use gazelens_common::config::AppConfig;
use gazelens_source::refresh_channel;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let path = &config.channel.path;
    if refresh_channel(path)? {
        println!("[OK] Refreshed {}", path.display());
    } else {
        println!(
            "[WARN] {} does not exist; start the tracker producer first",
            path.display()
        );
    }
    Ok(())
}
