//! Basic logger usage example
//!
//! Demonstrates the console and file transports, labelled messages and the
//! logging macros. Error lines also land in `logs/errors.log`.
//!
//! Run with: cargo run --example basic_usage

use logger_preset::info;
use logger_preset::prelude::*;

fn main() -> Result<()> {
    println!("=== Logger Preset - Basic Usage Example ===\n");

    let logger = create_logger(
        &[TransportKind::Console, TransportKind::File],
        &TransportContext::default(),
    )?;

    println!("1. Logging at different levels:");
    logger.silly("This is a silly message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("Warning!!!");
    logger.error("This is an error message (also written to logs/errors.log)");

    println!("\n2. Labelled messages:");
    logger.info("LABEL::Helloworld");
    logger.warn("CACHE::hit ratio below 50%");

    println!("\n3. Macros:");
    let port = 8080;
    info!(logger, "SERVER::listening on port {}", port);

    println!("\n4. From a configuration document:");
    let config = LoggerConfig::from_json(r#"{ "transports": ["CONSOLE"] }"#)?;
    let configured = config.build()?;
    configured.info("CONFIG::built from JSON");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
