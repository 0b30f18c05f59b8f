#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use quizpoll::error::ApiError;
use quizpoll::gateway::{Delivery, Dispatcher, Envelope, Reply, Request, Transport};
use quizpoll::model::{Poll, Quiz};
use quizpoll::timer::{Scheduler, TimerKind, TimerPurpose};

/// Records what the controllers ask for; tests deliver ticks and replies by hand.
#[derive(Default)]
pub struct FakeRuntime {
    pub sent: Vec<Envelope>,
    pub running: HashMap<TimerPurpose, (TimerKind, Duration)>,
    pub starts: Vec<(TimerPurpose, TimerKind, Duration)>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &Envelope {
        self.sent.last().expect("no request was sent")
    }

    pub fn requests(&self) -> Vec<Request> {
        self.sent.iter().map(|e| e.request.clone()).collect()
    }

    pub fn count(&self, pred: impl Fn(&Request) -> bool) -> usize {
        self.sent.iter().filter(|e| pred(&e.request)).count()
    }

    pub fn is_running(&self, purpose: TimerPurpose) -> bool {
        self.running.contains_key(&purpose)
    }
}

impl Scheduler for FakeRuntime {
    fn start(&mut self, purpose: TimerPurpose, period: Duration) {
        self.running.insert(purpose, (TimerKind::Interval, period));
        self.starts.push((purpose, TimerKind::Interval, period));
    }

    fn once(&mut self, purpose: TimerPurpose, delay: Duration) {
        self.running.insert(purpose, (TimerKind::Once, delay));
        self.starts.push((purpose, TimerKind::Once, delay));
    }

    fn stop(&mut self, purpose: TimerPurpose) {
        self.running.remove(&purpose);
    }
}

impl Dispatcher for FakeRuntime {
    fn dispatch(&mut self, envelope: Envelope) {
        self.sent.push(envelope);
    }
}

pub fn ok(envelope: &Envelope, reply: Reply) -> Delivery {
    Delivery {
        epoch: envelope.epoch,
        request: envelope.request.clone(),
        result: Ok(reply),
    }
}

pub fn failed(envelope: &Envelope, error: ApiError) -> Delivery {
    Delivery {
        epoch: envelope.epoch,
        request: envelope.request.clone(),
        result: Err(error),
    }
}

pub fn fixture(name: &str) -> String {
    fs::read_to_string(format!("fixtures/{}", name)).expect("Cannot read fixture")
}

pub fn poll_fixture() -> Poll {
    serde_json::from_str(&fixture("poll.json")).unwrap()
}

pub fn quiz_fixture() -> Quiz {
    serde_json::from_str(&fixture("quiz.json")).unwrap()
}

/// Canned JSON per path; remembers every call.
#[derive(Default)]
pub struct FakeTransport {
    pub responses: HashMap<String, Result<Value, ApiError>>,
    pub gets: Mutex<Vec<String>>,
    pub posts: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub fn with(mut self, path: &str, response: Result<Value, ApiError>) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    fn respond(&self, path: &str) -> Result<Value, ApiError> {
        self.responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Network(format!("{} returned 404 Not Found", path))))
    }
}

impl Transport for FakeTransport {
    fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.gets.lock().unwrap().push(path.to_string());
        self.respond(path)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.posts.lock().unwrap().push((path.to_string(), body.clone()));
        self.respond(path)
    }
}
