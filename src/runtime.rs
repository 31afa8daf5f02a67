//! Event plumbing between the terminal and the game loop.
//!
//! Key presses arrive on a channel fed by a reader thread. Between presses
//! the [`Runner`] watches its clock, so the loop learns about midnight from
//! the same `step` call that delivers input.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::{debug, info};

use crate::date_key::{Clock, DateKey};

/// What the game loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// A quiet tick on the same day; only a redraw is needed
    Tick,
    /// The clock moved to a new day since the last step
    DayChanged(DateKey),
    /// The input side hung up; no more keys will come
    InputClosed,
}

/// Keeps presses and resizes. Releases and repeats are dropped so one
/// physical press submits at most once.
pub fn from_terminal(ev: CtEvent) -> Option<GameEvent> {
    match ev {
        CtEvent::Key(key) if key.kind == KeyEventKind::Press => Some(GameEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(GameEvent::Resize),
        _ => None,
    }
}

/// Source of input events
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Reads the terminal on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(ev) = from_terminal(ev) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    info!(error = %e, "terminal input closed");
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

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel fed by the test itself
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the loop one event at a time and notices day boundaries
pub struct Runner<E, C> {
    events: E,
    clock: C,
    tick: Duration,
    day: DateKey,
}

impl<E: GameEventSource, C: Clock> Runner<E, C> {
    pub fn new(events: E, clock: C, tick: Duration) -> Self {
        let day = clock.today();
        Self {
            events,
            clock,
            tick,
            day,
        }
    }

    /// The day the runner last reported
    pub fn day(&self) -> DateKey {
        self.day
    }

    /// Waits up to one tick for input. A quiet tick that finds the clock on
    /// a new day reports `DayChanged` once for that day.
    pub fn step(&mut self) -> GameEvent {
        match self.events.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Disconnected) => GameEvent::InputClosed,
            Err(RecvTimeoutError::Timeout) => {
                let today = self.clock.today();
                if today == self.day {
                    return GameEvent::Tick;
                }
                debug!(previous = %self.day, %today, "clock crossed a day boundary");
                self.day = today;
                GameEvent::DayChanged(today)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::FixedClock;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use std::cell::Cell;
    use std::rc::Rc;

    struct StepClock(Rc<Cell<DateKey>>);

    impl Clock for StepClock {
        fn today(&self) -> DateKey {
            self.0.get()
        }
    }

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn quiet_step_is_a_tick() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedClock(day("2025-09-15")),
            Duration::from_millis(1),
        );
        assert_eq!(runner.step(), GameEvent::Tick);
        assert_eq!(runner.day(), day("2025-09-15"));
    }

    #[test]
    fn step_passes_through_keys() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE,
        )))
        .unwrap();
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedClock(day("2025-09-15")),
            Duration::from_millis(10),
        );

        match runner.step() {
            GameEvent::Key(key) => assert_eq!(key.code, KeyCode::Enter),
            other => panic!("expected Key event, got {other:?}"),
        }
    }

    #[test]
    fn midnight_reported_once() {
        let (_tx, rx) = mpsc::channel();
        let today = Rc::new(Cell::new(day("2025-09-15")));
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            StepClock(Rc::clone(&today)),
            Duration::from_millis(1),
        );
        assert_eq!(runner.step(), GameEvent::Tick);

        today.set(day("2025-09-16"));
        assert_eq!(runner.step(), GameEvent::DayChanged(day("2025-09-16")));
        assert_eq!(runner.step(), GameEvent::Tick);
        assert_eq!(runner.day(), day("2025-09-16"));
    }

    #[test]
    fn hung_up_source_closes_input() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedClock(day("2025-09-15")),
            Duration::from_secs(5),
        );
        assert_eq!(runner.step(), GameEvent::InputClosed);
    }

    #[test]
    fn only_presses_and_resizes_pass() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert_eq!(
            from_terminal(CtEvent::Key(press)),
            Some(GameEvent::Key(press))
        );
        assert_eq!(from_terminal(CtEvent::Key(release)), None);
        assert_eq!(from_terminal(CtEvent::Resize(80, 24)), Some(GameEvent::Resize));
        assert_eq!(from_terminal(CtEvent::FocusGained), None);
    }
}
