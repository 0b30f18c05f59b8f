use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::gateway::{Delivery, Dispatcher, Envelope, Reply, Request};
use crate::model::{Poll, PollSubmission};
use crate::screen::{Action, Panel, Screen, BUSY_LABEL, SUBMIT_LABEL};
use crate::session::{LiveIndex, PollSession};
use crate::timer::{Scheduler, TimerPurpose};

pub const WAITING_TEXT: &str = "Waiting for instructor ...";
pub const CLOSED_TEXT: &str = "Polling is closed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Loading,
    Waiting,
    ShowingQuestion(usize),
    /// Terminal: no status check changes anything afterwards.
    Closed,
    Failed,
}

/// Follows a live poll: the backend decides which question is open, the
/// player answers each one at most once.
pub struct PollController {
    document_id: String,
    check_interval: Duration,
    epoch: u64,
    state: PollState,
    session: Option<PollSession>,
    screen: Screen,
    status_in_flight: bool,
    /// Question whose answer is on its way to the backend.
    submitting: Option<usize>,
}

impl PollController {
    pub fn new(document_id: &str, config: &Config) -> Self {
        Self {
            document_id: document_id.to_string(),
            check_interval: config.poll_interval,
            epoch: 0,
            state: PollState::Loading,
            session: None,
            screen: Screen::new(),
            status_in_flight: false,
            submitting: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&PollSession> {
        self.session.as_ref()
    }

    pub fn load<R: Dispatcher>(&mut self, rt: &mut R) {
        info!(document_id = %self.document_id, "loading poll");
        self.state = PollState::Loading;
        self.screen.show_status("Loading ...");
        rt.dispatch(Envelope {
            epoch: self.epoch,
            request: Request::FetchPoll {
                document_id: self.document_id.clone(),
            },
        });
    }

    pub fn handle<R: Scheduler + Dispatcher>(&mut self, action: Action, rt: &mut R) {
        let answering = self.screen.panel == Panel::Question;
        match action {
            Action::Select(index) if answering => self.screen.toggle(index),
            Action::ToggleCursor if answering => {
                let cursor = self.screen.cursor;
                self.screen.toggle(cursor);
            }
            Action::MoveCursor(delta) if answering => self.screen.move_cursor(delta),
            Action::SubmitAnswer => self.submit_answer(rt),
            _ => {}
        }
    }

    pub fn on_timer<R: Scheduler + Dispatcher>(&mut self, purpose: TimerPurpose, rt: &mut R) {
        if purpose == TimerPurpose::PollStatus {
            self.check_status(rt);
        }
    }

    pub fn on_reply<R: Scheduler + Dispatcher>(&mut self, delivery: Delivery, rt: &mut R) {
        if delivery.epoch != self.epoch {
            debug!(epoch = delivery.epoch, "dropping reply from an earlier load");
            return;
        }
        match (delivery.request, delivery.result) {
            (_, Ok(Reply::Poll(poll))) => self.install(poll, rt),
            (_, Ok(Reply::PollStatus(remote))) => {
                self.status_in_flight = false;
                self.screen.notice = None;
                self.apply_status(LiveIndex::from_remote(remote), rt);
            }
            (Request::SubmitPoll(submission), Ok(Reply::PollSubmitted)) => {
                self.on_submitted(&submission)
            }
            (Request::FetchPoll { .. }, Err(e)) => {
                error!(error = %e, "poll could not be loaded");
                self.state = PollState::Failed;
                self.screen.show_status(&format!("Could not load poll: {}", e));
            }
            (Request::PollStatus { .. }, Err(e)) => {
                self.status_in_flight = false;
                self.screen.notice = Some(format!("Status check failed: {}", e));
            }
            (Request::SubmitPoll(submission), Err(e)) => {
                if !self.finish_submission(&submission) {
                    return;
                }
                self.screen.submit_label = SUBMIT_LABEL.to_string();
                self.screen.notice = Some(format!("Submission failed: {}", e));
            }
            (request, result) => {
                warn!(path = %request.path(), ?result, "unexpected reply");
            }
        }
    }

    fn install<R: Scheduler + Dispatcher>(&mut self, poll: Poll, rt: &mut R) {
        info!(title = %poll.title, questions = poll.questions.len(), "poll loaded");
        self.screen.title = poll.title.clone();
        self.session = Some(PollSession::init_poll(poll));
        self.check_status(rt);
        rt.start(TimerPurpose::PollStatus, self.check_interval);
    }

    /// Asks the backend which question is open. Skipped while an earlier
    /// check is still waiting for its answer.
    pub fn check_status<R: Dispatcher>(&mut self, rt: &mut R) {
        if self.state == PollState::Closed {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        if self.status_in_flight {
            debug!("status check still in flight, skipping tick");
            return;
        }
        self.status_in_flight = true;
        rt.dispatch(Envelope {
            epoch: self.epoch,
            request: Request::PollStatus {
                document_id: session.poll.document_id.clone(),
                sheet_id: session.poll.internal_data_sheet_id.clone(),
            },
        });
    }

    /// Moves to whatever `live` says is open. Returns false when nothing
    /// changed on screen.
    pub fn apply_status<R: Scheduler>(&mut self, live: LiveIndex, rt: &mut R) -> bool {
        if self.state == PollState::Closed {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if live == session.live {
            return false;
        }
        session.set_current_question(live);

        match live {
            LiveIndex::Closed => {
                info!("poll closed");
                rt.stop(TimerPurpose::PollStatus);
                self.state = PollState::Closed;
                self.screen.show_status(CLOSED_TEXT);
            }
            LiveIndex::Waiting | LiveIndex::Unset => self.wait(),
            LiveIndex::Question(index) => match session.question(index).cloned() {
                Some(question) => {
                    info!(question = index + 1, "showing question");
                    session.clear_submitted();
                    self.submitting = None;
                    self.screen.clear_feedback();
                    self.screen.render_question(&question);
                    self.state = PollState::ShowingQuestion(index);
                }
                None => {
                    warn!(question = index + 1, "backend opened a question the poll does not have");
                    self.wait();
                }
            },
        }
        true
    }

    fn wait(&mut self) {
        self.state = PollState::Waiting;
        self.screen.show_status(WAITING_TEXT);
    }

    /// Grades the selection and sends it. Does nothing once the open
    /// question has been answered or while the answer is on its way.
    pub fn submit_answer<R: Dispatcher>(&mut self, rt: &mut R) {
        let PollState::ShowingQuestion(index) = self.state else {
            return;
        };
        if self.submitting.is_some() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.submitted {
            return;
        }

        let selected = self.screen.selections();
        let correct = match session.poll.questions.get_mut(index) {
            Some(question) => question.evaluate(&selected),
            None => return,
        };
        self.screen.apply_feedback(correct);
        self.screen.submit_label = BUSY_LABEL.to_string();

        let submission =
            PollSubmission::new(&session.poll, index, &session.poll.questions[index], correct);
        info!(question = index + 1, answers = %submission.answers, correct, "submitting answer");
        self.submitting = Some(index);
        rt.dispatch(Envelope {
            epoch: self.epoch,
            request: Request::SubmitPoll(submission),
        });
    }

    /// Releases the in-flight guard if `submission` is the one it holds.
    /// Replies for any other question leave it alone.
    fn finish_submission(&mut self, submission: &PollSubmission) -> bool {
        let index = submission.question_number.checked_sub(1);
        if index.is_none() || self.submitting != index {
            debug!(question = submission.question_number, "reply for a submission no longer in flight");
            return false;
        }
        self.submitting = None;
        true
    }

    fn on_submitted(&mut self, submission: &PollSubmission) {
        if !self.finish_submission(submission) {
            return;
        }
        if self.state != PollState::ShowingQuestion(submission.question_number - 1) {
            debug!(question = submission.question_number, "answer accepted after the poll moved on");
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.mark_submitted();
        }
        self.screen.clear_feedback();
        self.wait();
    }
}
