// SPDX-License-Identifier: MPL-2.0

//! Demo program: load a platform configuration, run discovery and print
//! every accessory event until Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=accessory_bridge=debug cargo run --example bridge -- <config.json>
//! ```
//!
//! The file holds the platform section of the host configuration, e.g.
//!
//! ```json
//! {
//!   "neoSensors": [{ "uuid": "a1b2c3", "name": "Kitchen" }],
//!   "solarSources": [{ "name": "Sun" }]
//! }
//! ```

use std::env;
use std::sync::Arc;

use accessory_bridge::host::MemoryRegistry;
use accessory_bridge::{AccessoryEvent, Platform, PlatformConfig};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        std::process::exit(1);
    }

    let config = PlatformConfig::load(&args[1])?;
    let registry = Arc::new(MemoryRegistry::new());
    let mut platform = Platform::new(config, registry.clone())?;
    let mut events = platform.subscribe();

    let summary = platform.discover_devices().await;
    println!(
        "Discovery: {} created, {} restored, {} removed, {} skipped",
        summary.created, summary.restored, summary.removed, summary.skipped
    );

    for id in platform.accessory_ids() {
        if let (Some(record), Some(info)) = (platform.accessory(id), platform.info(id)) {
            println!("  {id}  {:<20} {} {}", record.display_name, info.manufacturer, info.model);
        }
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(AccessoryEvent::CharacteristicChanged { accessory, characteristic, value }) => {
                    println!("{accessory}  {characteristic} = {value:?}");
                }
                Ok(other) => println!("{other:?}"),
                Err(RecvError::Lagged(skipped)) => eprintln!("Skipped {skipped} events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    platform.shutdown();
    println!("Registered accessories: {}", registry.accessories().len());
    Ok(())
}
