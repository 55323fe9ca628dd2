//! Crash reporting example
//!
//! Installs the crash handlers with force-quit enabled, then reports a failed
//! background job. The process exits with status 1 seven seconds later.
//!
//! Set `SENTRY_DSN` to also forward errors to Sentry.
//!
//! Run with: cargo run --example crash_reporting

use logger_preset::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Logger Preset - Crash Reporting Example ===\n");

    let (kinds, context) = match std::env::var("SENTRY_DSN") {
        Ok(dsn) => (
            vec![TransportKind::Console, TransportKind::File, TransportKind::Sentry],
            TransportContext::with_sentry(LogLevel::Error, dsn),
        ),
        Err(_) => (
            vec![TransportKind::Console, TransportKind::File],
            TransportContext::default(),
        ),
    };

    let logger = Arc::new(create_logger(&kinds, &context)?);
    let supervisor = Arc::new(CrashSupervisor::new());

    install_crash_handlers(&supervisor, Arc::clone(&logger), true);
    supervisor.install_panic_hook();

    logger.info("APP::starting import job");

    supervisor.spawn("import-job", || -> std::result::Result<(), String> {
        thread::sleep(Duration::from_millis(200));
        Err("upstream feed returned 503".to_string())
    })?;

    // Keep running until the forced exit fires
    loop {
        thread::sleep(Duration::from_secs(1));
        if supervisor.is_shutting_down() {
            println!("waiting for forced exit...");
        }
    }
}
