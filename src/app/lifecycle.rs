//! Application lifecycle: startup, the cooperative run loop, shutdown.
//!
//! ```text
//!   Created ──startup()──▶ Running ──shutdown()──▶ Stopped
//!      │                                              ▲
//!      └──────────────────shutdown()──────────────────┘
//! ```
//!
//! `Lifecycle` owns everything: the [`Peripherals`] context, the
//! [`MonitorLoop`], the job [`Scheduler`] and the [`ShutdownSignal`].
//! One thread drives it, either through [`run`](Lifecycle::run) or by
//! calling [`poll`](Lifecycle::poll) directly (tests, custom loops).
//!
//! A button press only raises the signal.  The loop notices it between
//! jobs, never in the middle of a tick.

use core::fmt;

use log::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::scheduler::Scheduler;
use crate::signal::ShutdownSignal;

use super::events::AppEvent;
use super::monitor::MonitorLoop;
use super::peripherals::{OpenSummary, Peripherals};
use super::ports::{Board, Clock, EventSink};

/// Upper bound on the sleep between two button samples.
pub const BUTTON_POLL_MS: u64 = 20;

/// Scheduled work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Tick,
    SilenceBuzzer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Running,
    Stopped,
}

/// `startup` was called outside the `Created` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotCreated(pub LifecycleState);

impl fmt::Display for NotCreated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "startup requires a fresh lifecycle (state: {:?})", self.0)
    }
}

impl std::error::Error for NotCreated {}

pub struct Lifecycle<B: Board> {
    config: MonitorConfig,
    state: LifecycleState,
    hw: Peripherals<B>,
    monitor: MonitorLoop,
    scheduler: Scheduler<Job>,
    signal: ShutdownSignal,
    /// `ShutdownRequested` has been emitted.
    announced: bool,
}

impl<B: Board> Lifecycle<B> {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            monitor: MonitorLoop::from_config(&config),
            config,
            state: LifecycleState::Created,
            hw: Peripherals::empty(),
            scheduler: Scheduler::new(),
            signal: ShutdownSignal::new(),
            announced: false,
        }
    }

    // ── Startup ───────────────────────────────────────────────

    /// Open every peripheral, arm the button, and schedule the first tick
    /// at `now_ms`.  Open failures are absorbed; only calling this twice
    /// is an error.
    pub fn startup(
        &mut self,
        board: &mut B,
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> Result<OpenSummary, NotCreated> {
        if self.state != LifecycleState::Created {
            return Err(NotCreated(self.state));
        }

        let (mut hw, summary) = Peripherals::open(board, &self.config, sink);
        if let Some(button) = hw.button_mut() {
            let signal = self.signal.clone();
            button.set_on_press(move || {
                if signal.request() {
                    info!("button: shutdown requested");
                }
            });
        } else {
            warn!("button unavailable; shutdown only via signal");
        }
        self.hw = hw;

        self.scheduler.post_delayed(Job::Tick, now_ms, 0);
        self.state = LifecycleState::Running;
        info!(
            "monitor started: thresholds {:.2}/{:.2} °C, period {} ms",
            self.config.low_threshold_c, self.config.high_threshold_c, self.config.tick_period_ms
        );
        sink.emit(&AppEvent::Started {
            opened: summary.opened,
            failed: summary.failed,
        });
        Ok(summary)
    }

    // ── Loop ──────────────────────────────────────────────────

    /// Sample the button, then run every job due at `now_ms`.  Returns
    /// `false` once the loop should stop.
    pub fn poll(&mut self, now_ms: u64, sink: &mut impl EventSink) -> bool {
        if self.state != LifecycleState::Running {
            return false;
        }
        if let Some(button) = self.hw.button_mut() {
            button.poll(now_ms);
        }
        if self.stop_requested(sink) {
            return false;
        }
        while let Some(job) = self.scheduler.pop_due(now_ms) {
            match job {
                Job::Tick => self.run_tick(now_ms, sink),
                Job::SilenceBuzzer => {
                    self.monitor.silence_buzzer(&mut self.hw, sink);
                }
            }
            if self.stop_requested(sink) {
                return false;
            }
        }
        true
    }

    /// Drive [`poll`](Self::poll) until shutdown is requested, then shut
    /// down.  Sleeps on `clock` between jobs, waking at least every
    /// [`BUTTON_POLL_MS`] to sample the button.
    pub fn run(&mut self, clock: &mut impl Clock, sink: &mut impl EventSink) {
        while self.poll(clock.now_ms(), sink) {
            let now = clock.now_ms();
            let wait = self
                .scheduler
                .next_due_ms()
                .map_or(BUTTON_POLL_MS, |due| due.saturating_sub(now))
                .min(BUTTON_POLL_MS);
            if wait > 0 {
                clock.sleep_ms(wait);
            }
        }
        self.shutdown(sink);
    }

    fn run_tick(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let report = self.monitor.tick(&mut self.hw, sink);
        if self.signal.is_requested() {
            return;
        }

        let period = u64::from(self.config.tick_period_ms);
        self.scheduler.post_delayed(Job::Tick, now_ms, period);

        let tone = u64::from(self.config.buzzer_tone_ms);
        if report.buzzer_active && tone < period {
            self.scheduler
                .post_delayed(Job::SilenceBuzzer, now_ms, tone);
        } else {
            self.scheduler.cancel(Job::SilenceBuzzer);
        }
    }

    fn stop_requested(&mut self, sink: &mut impl EventSink) -> bool {
        if !self.signal.is_requested() {
            return false;
        }
        self.announce(sink);
        true
    }

    fn announce(&mut self, sink: &mut impl EventSink) {
        if !self.announced {
            self.announced = true;
            sink.emit(&AppEvent::ShutdownRequested);
        }
    }

    // ── Shutdown ──────────────────────────────────────────────

    /// Cancel the loop and release every peripheral.  Calling it again is
    /// a no-op.
    pub fn shutdown(&mut self, sink: &mut impl EventSink) {
        if self.state == LifecycleState::Stopped {
            debug!("shutdown: already stopped");
            return;
        }
        self.signal.request();
        self.announce(sink);

        self.scheduler.cancel_all();

        let close_failures = self.hw.close_all(sink);
        self.state = LifecycleState::Stopped;
        if close_failures == 0 {
            info!("monitor stopped");
        } else {
            warn!("monitor stopped with {} close failure(s)", close_failures);
        }
        sink.emit(&AppEvent::Stopped { close_failures });
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// A handle that requests shutdown from anywhere.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    pub fn peripherals(&self) -> &Peripherals<B> {
        &self.hw
    }

    pub fn monitor(&self) -> &MonitorLoop {
        &self.monitor
    }

    pub fn is_scheduled(&self, job: Job) -> bool {
        self.scheduler.is_pending(job)
    }

    /// Deadline of the earliest pending job.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.scheduler.next_due_ms()
    }
}
