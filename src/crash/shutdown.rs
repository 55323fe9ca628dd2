//! Delayed forced exit after a crash
//!
//! At most one exit timer runs at a time. Crashes arriving while a timer is
//! pending do not schedule another; the pending one terminates the process.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Grace period between a crash and the forced exit
pub const FORCE_QUIT_DELAY: Duration = Duration::from_secs(7);

/// Status the process exits with after a crash
pub const FORCE_QUIT_EXIT_CODE: i32 = 1;

/// Terminates the process. Swapped out in tests.
pub trait ProcessExit: Send + Sync {
    fn exit(&self, code: i32);
}

/// Calls [`std::process::exit`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdExit;

impl ProcessExit for StdExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

impl<F> ProcessExit for F
where
    F: Fn(i32) + Send + Sync,
{
    fn exit(&self, code: i32) {
        self(code)
    }
}

pub struct ShutdownTimer {
    delay: Duration,
    exit: Arc<dyn ProcessExit>,
    in_progress: AtomicBool,
    fired: AtomicBool,
    cancel: Mutex<Option<Sender<()>>>,
}

impl ShutdownTimer {
    pub fn new(delay: Duration, exit: Arc<dyn ProcessExit>) -> Self {
        Self {
            delay,
            exit,
            in_progress: AtomicBool::new(false),
            fired: AtomicBool::new(false),
            cancel: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether an exit has been scheduled and not cancelled
    pub fn is_pending(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Start the exit timer unless one is already running.
    ///
    /// `before_exit` runs on the timer thread right before the exit call.
    /// Returns `false` when a timer was already pending.
    pub fn schedule<F>(self: &Arc<Self>, before_exit: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        *self.cancel.lock() = Some(cancel_tx);

        let timer = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("forced-exit".to_string())
            .spawn(move || match cancel_rx.recv_timeout(timer.delay) {
                Err(RecvTimeoutError::Timeout) => {
                    before_exit();
                    timer.exit.exit(FORCE_QUIT_EXIT_CODE);
                    timer.fired.store(true, Ordering::SeqCst);
                }
                // Cancelled
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            });

        if let Err(e) = spawned {
            eprintln!("[LOGGER ERROR] Failed to start forced-exit timer: {}", e);
            self.cancel.lock().take();
            self.in_progress.store(false, Ordering::SeqCst);
            return false;
        }

        true
    }

    /// Block until a pending exit has run or been cancelled.
    ///
    /// Returns `true` if the exit action ran. Returns at once when nothing
    /// is pending.
    pub fn wait(&self) -> bool {
        while self.is_pending() {
            if self.fired.load(Ordering::SeqCst) {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        self.fired.load(Ordering::SeqCst)
    }

    /// Cancel a pending exit. Returns `false` if none was pending.
    pub fn cancel(&self) -> bool {
        match self.cancel.lock().take() {
            Some(cancel_tx) => {
                let _ = cancel_tx.send(());
                self.in_progress.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }
}

/// Human-readable delay for the exit notice
pub(crate) fn describe_delay(delay: Duration) -> String {
    if delay.subsec_nanos() == 0 {
        format!("{} seconds", delay.as_secs())
    } else {
        format!("{:?}", delay)
    }
}
