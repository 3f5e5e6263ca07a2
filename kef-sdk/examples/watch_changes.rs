//! Watch a speaker's state changes from the command line
//!
//! Usage: cargo run --example watch_changes -- <speaker-ip>

use kef_sdk::logging::{self, LoggingMode};
use kef_sdk::KefConnector;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(LoggingMode::Development)?;

    let host = std::env::args()
        .nth(1)
        .ok_or("usage: watch_changes <speaker-ip>")?;

    let speaker = KefConnector::new(host);
    println!(
        "watching {} ({})",
        speaker.speaker_name()?,
        speaker.host()
    );

    loop {
        let changes = speaker.poll()?;
        for (key, value) in changes.iter() {
            println!("{key} -> {value}");
        }
    }
}
