//! Crash reporting through a logger
//!
//! [`install_crash_handlers`] attaches two listeners to a
//! [`CrashSupervisor`]: one for unhandled failures of background work and
//! one for uncaught panics. Each crash becomes a single error-level line
//! naming the crash class, the message and the `file:line:column` it came
//! from. With force-quit enabled the process then exits with status 1 after
//! the supervisor's delay (7 seconds by default).
//!
//! ```no_run
//! use logger_preset::prelude::*;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(create_logger(&[TransportKind::Console], &TransportContext::default())?);
//! let supervisor = Arc::new(CrashSupervisor::new());
//!
//! install_crash_handlers(&supervisor, Arc::clone(&logger), true);
//! supervisor.install_panic_hook();
//! # Ok::<(), LoggerError>(())
//! ```

pub mod report;
pub mod shutdown;
pub mod supervisor;

pub use report::{parse_stack, CrashEvent, CrashKind, CrashReport, StackFrame, UNKNOWN_LOCATION};
pub use shutdown::{ProcessExit, ShutdownTimer, StdExit, FORCE_QUIT_DELAY, FORCE_QUIT_EXIT_CODE};
pub use supervisor::{CrashListener, CrashSupervisor, CrashSupervisorBuilder};

use crate::core::Logger;
use shutdown::describe_delay;
use std::sync::Arc;

/// Register the unhandled and uncaught crash listeners for `logger`.
///
/// Also turns off the logger's `exit_on_error`, so a panicking sink cannot
/// take the process down on its own. Calling this twice registers a second,
/// independent pair of listeners.
pub fn install_crash_handlers(
    supervisor: &CrashSupervisor,
    logger: Arc<Logger>,
    force_quit_on_error: bool,
) {
    logger.set_exit_on_error(false);

    for kind in [CrashKind::Unhandled, CrashKind::Uncaught] {
        let logger = Arc::clone(&logger);
        let timer = supervisor.shutdown_timer();
        supervisor.on(kind, move |event| {
            handle_crash(&logger, &timer, force_quit_on_error, event);
        });
    }
}

fn handle_crash(
    logger: &Arc<Logger>,
    timer: &Arc<ShutdownTimer>,
    force_quit_on_error: bool,
    event: &CrashEvent,
) {
    let report = CrashReport::from_event(event);
    logger.error(report.log_line());
    if let Err(e) = logger.flush() {
        eprintln!("[LOGGER ERROR] Failed to flush crash report: {}", e);
    }

    if !force_quit_on_error {
        // The process keeps running after the crash
        return;
    }

    println!(
        "error detected ! graceful exit in {}",
        describe_delay(timer.delay())
    );
    let logger = Arc::clone(logger);
    timer.schedule(move || {
        let _ = logger.flush();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Appender, LogEntry, LogLevel, Result};
    use parking_lot::Mutex;
    use std::thread;
    use std::time::Duration;

    struct MemoryAppender {
        entries: Arc<Mutex<Vec<LogEntry>>>,
    }

    impl Appender for MemoryAppender {
        fn append(&mut self, entry: &LogEntry) -> Result<()> {
            self.entries.lock().push(entry.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }

        fn min_level(&self) -> LogLevel {
            LogLevel::Silly
        }
    }

    struct Harness {
        logger: Arc<Logger>,
        entries: Arc<Mutex<Vec<LogEntry>>>,
        exits: Arc<Mutex<Vec<i32>>>,
        supervisor: CrashSupervisor,
    }

    fn harness(delay: Duration) -> Harness {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let logger = Arc::new(
            Logger::builder()
                .appender(MemoryAppender {
                    entries: Arc::clone(&entries),
                })
                .build()
                .unwrap(),
        );
        let exits = Arc::new(Mutex::new(Vec::new()));
        let exit_sink = Arc::clone(&exits);
        let supervisor = CrashSupervisor::builder()
            .exit_delay(delay)
            .process_exit(move |code: i32| exit_sink.lock().push(code))
            .build();

        Harness {
            logger,
            entries,
            exits,
            supervisor,
        }
    }

    fn file_a_event() -> CrashEvent {
        CrashEvent::unhandled("rejected", vec![StackFrame::new("fileA.ts", 10, 5)])
    }

    #[test]
    fn test_install_disables_exit_on_error() {
        let h = harness(Duration::from_millis(50));
        assert!(h.logger.exit_on_error());

        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), false);

        assert!(!h.logger.exit_on_error());
        assert_eq!(h.supervisor.listener_count(CrashKind::Unhandled), 1);
        assert_eq!(h.supervisor.listener_count(CrashKind::Uncaught), 1);
    }

    #[test]
    fn test_unhandled_without_force_quit_keeps_running() {
        let h = harness(Duration::from_millis(50));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), false);

        h.supervisor.notify(&file_a_event());
        thread::sleep(Duration::from_millis(200));

        let entries = h.entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(
            entries[0].message,
            "UN_HANDLED_ERROR: message: rejected, Error At: fileA.ts:10:5"
        );
        assert!(h.exits.lock().is_empty());
        assert!(!h.supervisor.is_shutting_down());
    }

    #[test]
    fn test_force_quit_exits_with_status_one_after_delay() {
        let h = harness(Duration::from_millis(100));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), true);

        h.supervisor.notify(&file_a_event());
        assert!(h.supervisor.is_shutting_down());
        assert!(h.exits.lock().is_empty());

        thread::sleep(Duration::from_millis(400));
        assert_eq!(*h.exits.lock(), vec![1]);
    }

    #[test]
    fn test_uncaught_uses_distinct_tag() {
        let h = harness(Duration::from_millis(50));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), false);

        h.supervisor.notify(&CrashEvent::uncaught(
            "index out of bounds",
            vec![StackFrame::new("src/main.rs", 3, 9)],
        ));

        assert_eq!(
            h.entries.lock()[0].message,
            "UN_CAUGHT_ERROR: message: index out of bounds, Error At: src/main.rs:3:9"
        );
    }

    #[test]
    fn test_installing_twice_logs_twice() {
        let h = harness(Duration::from_millis(50));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), false);
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), false);

        assert_eq!(h.supervisor.notify(&file_a_event()), 2);
        assert_eq!(h.entries.lock().len(), 2);
    }

    #[test]
    fn test_overlapping_crashes_schedule_one_exit() {
        let h = harness(Duration::from_millis(100));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), true);

        h.supervisor.notify(&file_a_event());
        h.supervisor.notify(&CrashEvent::uncaught("second", vec![]));

        thread::sleep(Duration::from_millis(400));
        assert_eq!(h.entries.lock().len(), 2);
        assert_eq!(h.exits.lock().len(), 1);
    }

    #[test]
    fn test_cancelled_shutdown_does_not_exit() {
        let h = harness(Duration::from_millis(100));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), true);

        h.supervisor.notify(&file_a_event());
        assert!(h.supervisor.cancel_shutdown());

        thread::sleep(Duration::from_millis(300));
        assert!(h.exits.lock().is_empty());
    }

    #[test]
    fn test_missing_frame_is_reported_as_unknown() {
        let h = harness(Duration::from_millis(50));
        install_crash_handlers(&h.supervisor, Arc::clone(&h.logger), false);

        h.supervisor.notify(&CrashEvent::unhandled("no stack", vec![]));

        assert!(h.entries.lock()[0].message.ends_with("Error At: <unknown>"));
    }
}
