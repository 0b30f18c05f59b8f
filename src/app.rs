use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Mode;
use crate::config::Config;
use crate::gateway::{Delivery, Dispatcher, Envelope, ThreadDispatcher, Transport};
use crate::poll::PollController;
use crate::quiz::QuizController;
use crate::screen::{Action, Screen};
use crate::timer::{Scheduler, ThreadScheduler, TimerEvent, TimerPurpose};

/// The one activity running in this process.
pub enum Activity {
    Poll(PollController),
    Quiz(QuizController),
}

impl Activity {
    pub fn new(mode: &Mode, config: &Config) -> Self {
        match mode {
            Mode::Poll { document_id } => Activity::Poll(PollController::new(document_id, config)),
            Mode::Quiz { document_id } => Activity::Quiz(QuizController::new(document_id, config)),
        }
    }

    pub fn start<R: Scheduler + Dispatcher>(&mut self, rt: &mut R) {
        match self {
            Activity::Poll(c) => c.load(rt),
            Activity::Quiz(c) => c.load(rt),
        }
    }

    pub fn handle<R: Scheduler + Dispatcher>(&mut self, action: Action, rt: &mut R) {
        match self {
            Activity::Poll(c) => c.handle(action, rt),
            Activity::Quiz(c) => c.handle(action, rt),
        }
    }

    pub fn on_timer<R: Scheduler + Dispatcher>(&mut self, purpose: TimerPurpose, rt: &mut R) {
        match self {
            Activity::Poll(c) => c.on_timer(purpose, rt),
            Activity::Quiz(c) => c.on_timer(purpose, rt),
        }
    }

    pub fn on_reply<R: Scheduler + Dispatcher>(&mut self, delivery: Delivery, rt: &mut R) {
        match self {
            Activity::Poll(c) => c.on_reply(delivery, rt),
            Activity::Quiz(c) => c.on_reply(delivery, rt),
        }
    }

    pub fn screen(&self) -> &Screen {
        match self {
            Activity::Poll(c) => c.screen(),
            Activity::Quiz(c) => c.screen(),
        }
    }
}

/// Real timers and real HTTP, both reporting back over channels.
pub struct LiveRuntime {
    timers: ThreadScheduler,
    net: ThreadDispatcher,
}

impl LiveRuntime {
    pub fn new(
        transport: Arc<dyn Transport>,
        timer_tx: mpsc::Sender<TimerEvent>,
        net_tx: mpsc::Sender<Delivery>,
    ) -> Self {
        Self {
            timers: ThreadScheduler::new(timer_tx),
            net: ThreadDispatcher::new(transport, net_tx),
        }
    }

    /// Filters out ticks of timers that were replaced or stopped meanwhile.
    pub fn accept(&mut self, event: &TimerEvent) -> bool {
        self.timers.accept(event)
    }
}

impl Scheduler for LiveRuntime {
    fn start(&mut self, purpose: TimerPurpose, period: Duration) {
        self.timers.start(purpose, period);
    }

    fn once(&mut self, purpose: TimerPurpose, delay: Duration) {
        self.timers.once(purpose, delay);
    }

    fn stop(&mut self, purpose: TimerPurpose) {
        self.timers.stop(purpose);
    }
}

impl Dispatcher for LiveRuntime {
    fn dispatch(&mut self, envelope: Envelope) {
        self.net.dispatch(envelope);
    }
}
