use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};
use log::debug;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Click { column: u16, row: u16 },
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;

    /// Block until an event arrives. `None` once the source is gone.
    fn recv(&self) -> Option<AppEvent>;
}

/// Production event source using crossterm.
///
/// The reader thread lives as long as this source: once it is dropped the
/// next send fails and the thread exits.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => Some(AppEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click {
                        column: mouse.column,
                        row: mouse.row,
                    }),
                    _ => None,
                },
                Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
                Ok(_) => None,
                Err(err) => {
                    debug!("terminal reader stopped: {}", err);
                    break;
                }
            };

            if let Some(evt) = evt {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<AppEvent> {
        self.rx.recv().ok()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<AppEvent> {
        self.rx.recv().ok()
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Option<Instant>>,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            next_tick: Cell::new(None),
        }
    }

    /// Next event. While `ticking`, yields `Tick` every tick interval on a
    /// fixed schedule, regardless of how often input arrives; otherwise
    /// blocks for input and drops the schedule.
    ///
    /// Returns `None` once the event source has disconnected.
    pub fn step(&self, ticking: bool) -> Option<AppEvent> {
        if !ticking {
            self.next_tick.set(None);
            return self.event_source.recv();
        }

        let now = Instant::now();
        let deadline = self
            .next_tick
            .get()
            .unwrap_or_else(|| now + self.ticker.interval());

        if deadline <= now {
            self.next_tick.set(Some(now + self.ticker.interval()));
            return Some(AppEvent::Tick);
        }
        self.next_tick.set(Some(deadline));

        match self
            .event_source
            .recv_timeout(deadline.saturating_duration_since(now))
        {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => {
                self.next_tick
                    .set(Some(Instant::now() + self.ticker.interval()));
                Some(AppEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
