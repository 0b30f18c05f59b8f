use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Periodic check of the live poll's current question.
    PollStatus,
    /// Per-question quiz countdown.
    Countdown,
    /// Short pause showing the result before the next quiz question.
    Flash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Interval,
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub purpose: TimerPurpose,
    pub generation: u64,
}

/// Timer operations the controllers are allowed to use.
///
/// Starting a timer for a purpose replaces whatever was running for that
/// purpose; `stop` on an idle purpose does nothing.
pub trait Scheduler {
    fn start(&mut self, purpose: TimerPurpose, period: Duration);
    fn once(&mut self, purpose: TimerPurpose, delay: Duration);
    fn stop(&mut self, purpose: TimerPurpose);
}

#[derive(Debug)]
struct Running {
    kind: TimerKind,
    cancel: Arc<AtomicBool>,
}

/// Slot holding at most one running timer.
#[derive(Debug, Default)]
pub struct ExclusiveTimer {
    generation: u64,
    running: Option<Running>,
}

impl ExclusiveTimer {
    /// Cancels the current occupant and claims the slot for a new timer.
    /// Returns the generation its ticks must carry and its cancel flag.
    pub fn start(&mut self, kind: TimerKind) -> (u64, Arc<AtomicBool>) {
        self.stop();
        self.generation += 1;
        let cancel = Arc::new(AtomicBool::new(false));
        self.running = Some(Running {
            kind,
            cancel: cancel.clone(),
        });
        (self.generation, cancel)
    }

    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick of `generation` may be delivered. Ticks from replaced
    /// or stopped timers are refused; an accepted one-shot tick frees the slot.
    pub fn accept(&mut self, generation: u64) -> bool {
        let kind = match &self.running {
            Some(running) if generation == self.generation => running.kind,
            _ => return false,
        };
        if kind == TimerKind::Once {
            self.running = None;
        }
        true
    }
}

/// Scheduler backed by one sleeping thread per running timer.
pub struct ThreadScheduler {
    tx: mpsc::Sender<TimerEvent>,
    slots: HashMap<TimerPurpose, ExclusiveTimer>,
}

impl ThreadScheduler {
    pub fn new(tx: mpsc::Sender<TimerEvent>) -> Self {
        Self {
            tx,
            slots: HashMap::new(),
        }
    }

    pub fn accept(&mut self, event: &TimerEvent) -> bool {
        self.slots
            .get_mut(&event.purpose)
            .map(|slot| slot.accept(event.generation))
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|s| s.is_active()).count()
    }

    fn spawn(&mut self, purpose: TimerPurpose, kind: TimerKind, period: Duration) {
        let slot = self.slots.entry(purpose).or_default();
        let (generation, cancel) = slot.start(kind);
        debug!(?purpose, ?kind, generation, ?period, "timer started");
        spawn_ticker(
            self.tx.clone(),
            TimerEvent {
                purpose,
                generation,
            },
            period,
            cancel,
            kind == TimerKind::Interval,
        );
    }
}

impl Scheduler for ThreadScheduler {
    fn start(&mut self, purpose: TimerPurpose, period: Duration) {
        self.spawn(purpose, TimerKind::Interval, period);
    }

    fn once(&mut self, purpose: TimerPurpose, delay: Duration) {
        self.spawn(purpose, TimerKind::Once, delay);
    }

    fn stop(&mut self, purpose: TimerPurpose) {
        if let Some(slot) = self.slots.get_mut(&purpose) {
            if slot.is_active() {
                debug!(?purpose, generation = slot.generation(), "timer stopped");
            }
            slot.stop();
        }
    }
}

fn spawn_ticker(
    tx: mpsc::Sender<TimerEvent>,
    event: TimerEvent,
    period: Duration,
    cancel: Arc<AtomicBool>,
    repeat: bool,
) {
    thread::spawn(move || loop {
        thread::sleep(period);
        if cancel.load(Ordering::SeqCst) {
            break;
        }
        if tx.send(event).is_err() || !repeat {
            break;
        }
    });
}

pub fn format_countdown(secs: i64) -> String {
    format!("{} s", secs.max(0))
}
