//! Crash notification registry

use super::report::{CrashEvent, CrashKind, StackFrame};
use super::shutdown::{ProcessExit, ShutdownTimer, StdExit, FORCE_QUIT_DELAY};
use crate::core::logger::{is_dispatching, panic_message};
use crate::core::{LoggerError, Result};
use parking_lot::RwLock;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub type CrashListener = Arc<dyn Fn(&CrashEvent) + Send + Sync>;

/// Owns crash listeners and the forced-exit timer for a process.
///
/// Crash sources feed events in explicitly: the panic hook installed by
/// [`install_panic_hook`](Self::install_panic_hook), failed background work
/// via [`spawn`](Self::spawn) and [`report_unhandled`](Self::report_unhandled),
/// or [`notify`](Self::notify) directly.
pub struct CrashSupervisor {
    listeners: RwLock<Vec<(CrashKind, CrashListener)>>,
    shutdown: Arc<ShutdownTimer>,
    events_seen: AtomicU64,
    panic_hook_installed: AtomicBool,
}

impl CrashSupervisor {
    /// Supervisor with the standard 7 second delay and `std::process::exit`
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CrashSupervisorBuilder {
        CrashSupervisorBuilder::new()
    }

    /// Register a listener for one kind of crash. Listeners are never
    /// deduplicated or removed.
    pub fn on<F>(&self, kind: CrashKind, listener: F)
    where
        F: Fn(&CrashEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push((kind, Arc::new(listener)));
    }

    pub fn listener_count(&self, kind: CrashKind) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Deliver an event to every listener of its kind, in registration order.
    ///
    /// Returns the number of listeners invoked.
    pub fn notify(&self, event: &CrashEvent) -> usize {
        self.events_seen.fetch_add(1, Ordering::Relaxed);

        // Snapshot so listeners run without the registry lock held
        let listeners: Vec<CrashListener> = self
            .listeners
            .read()
            .iter()
            .filter(|(kind, _)| *kind == event.kind)
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen.load(Ordering::Relaxed)
    }

    /// Report a failure nobody else will handle. The caller's location
    /// becomes the top frame.
    #[track_caller]
    pub fn report_unhandled<E>(&self, error: &E) -> usize
    where
        E: fmt::Display + ?Sized,
    {
        let frame = StackFrame::from_location(Location::caller());
        self.notify(&CrashEvent::unhandled(error.to_string(), vec![frame]))
    }

    /// Run fallible work on a named thread; an `Err` result is reported as
    /// an unhandled crash located at this call.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the thread cannot be spawned.
    #[track_caller]
    pub fn spawn<F, E>(self: &Arc<Self>, name: &str, work: F) -> Result<thread::JoinHandle<()>>
    where
        F: FnOnce() -> std::result::Result<(), E> + Send + 'static,
        E: fmt::Display,
    {
        let frame = StackFrame::from_location(Location::caller());
        let supervisor = Arc::clone(self);

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                if let Err(e) = work() {
                    supervisor.notify(&CrashEvent::unhandled(e.to_string(), vec![frame]));
                }
            })
            .map_err(|e| LoggerError::io_operation("spawning supervised thread", name.to_string(), e))
    }

    /// Route panics in the process to the uncaught listeners.
    ///
    /// Replaces the current panic hook. Returns `false` if this supervisor
    /// already installed it.
    ///
    /// Panics raised by a sink while a logger dispatches are skipped: the
    /// logger isolates and reports those itself. A panic on the `main`
    /// thread blocks in the hook while a forced exit is pending, so the
    /// process ends through that exit rather than by unwinding `main`.
    pub fn install_panic_hook(self: &Arc<Self>) -> bool {
        if self.panic_hook_installed.swap(true, Ordering::SeqCst) {
            return false;
        }

        let supervisor = Arc::clone(self);
        std::panic::set_hook(Box::new(move |info| {
            if is_dispatching() {
                return;
            }

            let message = panic_message(info.payload());
            let frames = info
                .location()
                .map(StackFrame::from_location)
                .into_iter()
                .collect();
            supervisor.notify(&CrashEvent::uncaught(message, frames));

            if thread::current().name() == Some("main") {
                supervisor.shutdown.wait();
            }
        }));
        true
    }

    /// Timer shared with listeners that request a forced exit
    pub fn shutdown_timer(&self) -> Arc<ShutdownTimer> {
        Arc::clone(&self.shutdown)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_pending()
    }

    /// Cancel a pending forced exit
    pub fn cancel_shutdown(&self) -> bool {
        self.shutdown.cancel()
    }

    pub fn exit_delay(&self) -> Duration {
        self.shutdown.delay()
    }
}

impl Default for CrashSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CrashSupervisorBuilder {
    exit_delay: Duration,
    process_exit: Arc<dyn ProcessExit>,
}

impl CrashSupervisorBuilder {
    pub fn new() -> Self {
        Self {
            exit_delay: FORCE_QUIT_DELAY,
            process_exit: Arc::new(StdExit),
        }
    }

    /// Grace period before a forced exit
    #[must_use = "builder methods return a new value"]
    pub fn exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }

    /// Replace the action that terminates the process
    #[must_use = "builder methods return a new value"]
    pub fn process_exit<P: ProcessExit + 'static>(mut self, exit: P) -> Self {
        self.process_exit = Arc::new(exit);
        self
    }

    pub fn build(self) -> CrashSupervisor {
        CrashSupervisor {
            listeners: RwLock::new(Vec::new()),
            shutdown: Arc::new(ShutdownTimer::new(self.exit_delay, self.process_exit)),
            events_seen: AtomicU64::new(0),
            panic_hook_installed: AtomicBool::new(false),
        }
    }
}

impl Default for CrashSupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn collecting(supervisor: &CrashSupervisor, kind: CrashKind) -> Arc<Mutex<Vec<CrashEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        supervisor.on(kind, move |event| sink.lock().push(event.clone()));
        seen
    }

    #[test]
    fn test_notify_filters_by_kind() {
        let supervisor = CrashSupervisor::new();
        let unhandled = collecting(&supervisor, CrashKind::Unhandled);
        let uncaught = collecting(&supervisor, CrashKind::Uncaught);

        assert_eq!(supervisor.notify(&CrashEvent::uncaught("boom", vec![])), 1);

        assert!(unhandled.lock().is_empty());
        assert_eq!(uncaught.lock().len(), 1);
        assert_eq!(supervisor.events_seen(), 1);
    }

    #[test]
    fn test_listeners_are_not_deduplicated() {
        let supervisor = CrashSupervisor::new();
        let first = collecting(&supervisor, CrashKind::Unhandled);
        let second = collecting(&supervisor, CrashKind::Unhandled);

        assert_eq!(supervisor.listener_count(CrashKind::Unhandled), 2);
        assert_eq!(supervisor.notify(&CrashEvent::unhandled("x", vec![])), 2);
        assert_eq!(first.lock().len(), 1);
        assert_eq!(second.lock().len(), 1);
    }

    #[test]
    fn test_report_unhandled_uses_caller_location() {
        let supervisor = CrashSupervisor::new();
        let seen = collecting(&supervisor, CrashKind::Unhandled);

        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let line = line!() + 1;
        supervisor.report_unhandled(&err);

        let events = seen.lock();
        assert_eq!(events[0].message, "disk gone");
        assert_eq!(events[0].frames[0].file, file!());
        assert_eq!(events[0].frames[0].line, line);
    }

    #[test]
    fn test_spawn_reports_errors_only() {
        let supervisor = Arc::new(CrashSupervisor::new());
        let seen = collecting(&supervisor, CrashKind::Unhandled);

        supervisor
            .spawn("ok-worker", || Ok::<(), String>(()))
            .unwrap()
            .join()
            .unwrap();
        supervisor
            .spawn("failing-worker", || Err::<(), _>("queue closed".to_string()))
            .unwrap()
            .join()
            .unwrap();

        let events = seen.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "queue closed");
        assert_eq!(events[0].frames[0].file, file!());
    }

    #[test]
    fn test_builder_defaults() {
        let supervisor = CrashSupervisor::default();
        assert_eq!(supervisor.exit_delay(), FORCE_QUIT_DELAY);
        assert!(!supervisor.is_shutting_down());
        assert!(!supervisor.cancel_shutdown());
    }
}
