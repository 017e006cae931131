//! Read the current gaze sample once.

use gazelens_common::config::AppConfig;
use gazelens_source::{FileChannel, SampleSource};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let mut channel = FileChannel::new(&config.channel.path);
    match super::describe_reading(&channel.poll()) {
        Ok(line) => {
            println!("{line}");
            Ok(())
        }
        Err(message) => anyhow::bail!(message),
    }
}
