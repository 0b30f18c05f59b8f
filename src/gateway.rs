use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::model::{LeaderboardEntry, Poll, PollSubmission, Quiz};

/// JSON over HTTP, one call at a time. No retries.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> Result<Value, ApiError>;
    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<Value, ApiError> {
        let response = self.client.get(self.url(path)).send()?;
        read_json(path, response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send()?;
        read_json(path, response)
    }
}

fn read_json(path: &str, response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::status(path, status));
    }
    let body = response.text()?;
    // Submit endpoints may answer 200 with nothing
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    FetchPoll { document_id: String },
    PollStatus { document_id: String, sheet_id: String },
    SubmitPoll(PollSubmission),
    FetchQuiz { document_id: String },
    SubmitQuiz(Box<Quiz>),
    FetchLeaderboard { document_id: String, sheet_id: String },
}

impl Request {
    pub fn path(&self) -> String {
        match self {
            Request::FetchPoll { document_id } => format!("/api/poll/{}", document_id),
            Request::PollStatus {
                document_id,
                sheet_id,
            } => format!("/api/poll/status/{}/{}", document_id, sheet_id),
            Request::SubmitPoll(_) => "/api/poll/submit".to_string(),
            Request::FetchQuiz { document_id } => format!("/api/quiz/{}", document_id),
            Request::SubmitQuiz(_) => "/api/quiz/submit".to_string(),
            Request::FetchLeaderboard {
                document_id,
                sheet_id,
            } => format!("/api/quiz/leaderboard/{}/{}", document_id, sheet_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Poll(Poll),
    /// Raw 1-based index reported by the backend, sentinels included.
    PollStatus(i64),
    PollSubmitted,
    Quiz(Quiz),
    QuizSubmitted,
    Leaderboard(Vec<LeaderboardEntry>),
}

/// Performs `request` and parses the body into the matching reply.
pub fn execute(transport: &dyn Transport, request: &Request) -> Result<Reply, ApiError> {
    let path = request.path();
    debug!(%path, "request");
    match request {
        Request::FetchPoll { .. } => Ok(Reply::Poll(serde_json::from_value(
            transport.get(&path)?,
        )?)),
        Request::PollStatus { .. } => Ok(Reply::PollStatus(parse_status(&transport.get(&path)?)?)),
        Request::SubmitPoll(submission) => {
            transport.post(&path, &serde_json::to_value(submission)?)?;
            Ok(Reply::PollSubmitted)
        }
        Request::FetchQuiz { .. } => Ok(Reply::Quiz(serde_json::from_value(
            transport.get(&path)?,
        )?)),
        Request::SubmitQuiz(quiz) => {
            transport.post(&path, &serde_json::to_value(quiz)?)?;
            Ok(Reply::QuizSubmitted)
        }
        Request::FetchLeaderboard { .. } => Ok(Reply::Leaderboard(serde_json::from_value(
            transport.get(&path)?,
        )?)),
    }
}

/// The status endpoint answers with an integer, usually wrapped in a JSON string.
pub fn parse_status(value: &Value) -> Result<i64, ApiError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ApiError::Parse(format!("status is not an integer: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::Parse(format!("status is not an integer: {:?}", s))),
        other => Err(ApiError::Parse(format!("unexpected status body: {}", other))),
    }
}

/// A request tagged with the activity epoch it was issued in.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub epoch: u64,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub epoch: u64,
    pub request: Request,
    pub result: Result<Reply, ApiError>,
}

pub trait Dispatcher {
    fn dispatch(&mut self, envelope: Envelope);
}

/// Runs every request on its own worker thread and hands the outcome back
/// to the UI loop. Issued requests always run to completion.
pub struct ThreadDispatcher {
    transport: Arc<dyn Transport>,
    tx: mpsc::Sender<Delivery>,
}

impl ThreadDispatcher {
    pub fn new(transport: Arc<dyn Transport>, tx: mpsc::Sender<Delivery>) -> Self {
        Self { transport, tx }
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&mut self, envelope: Envelope) {
        let transport = self.transport.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = execute(transport.as_ref(), &envelope.request);
            if let Err(e) = &result {
                warn!(path = %envelope.request.path(), error = %e, "request failed");
            }
            let _ = tx.send(Delivery {
                epoch: envelope.epoch,
                request: envelope.request,
                result,
            });
        });
    }
}
