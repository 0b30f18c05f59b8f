use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::gateway::{Delivery, Dispatcher, Envelope, Reply, Request};
use crate::model::{LeaderboardEntry, Quiz};
use crate::screen::{Action, Panel, Screen, BUSY_LABEL, SUBMIT_LABEL};
use crate::session::QuizSession;
use crate::timer::{format_countdown, Scheduler, TimerPurpose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Loading,
    Info,
    Answering(usize),
    /// Result of the last answer is on screen; the next question follows.
    Flashing,
    Submitting,
    Leaderboard,
    Failed,
}

/// Self-paced quiz: questions one after another, each against its own
/// countdown, then the score goes to the leaderboard.
pub struct QuizController {
    document_id: String,
    tick: Duration,
    flash: Duration,
    answer_seconds: i64,
    wrong_answer_penalty: i64,
    epoch: u64,
    state: QuizState,
    session: Option<QuizSession>,
    screen: Screen,
    submission_in_flight: bool,
}

impl QuizController {
    pub fn new(document_id: &str, config: &Config) -> Self {
        Self {
            document_id: document_id.to_string(),
            tick: config.countdown_tick,
            flash: config.result_flash,
            answer_seconds: config.answer_seconds,
            wrong_answer_penalty: config.wrong_answer_penalty,
            epoch: 0,
            state: QuizState::Loading,
            session: None,
            screen: Screen::new(),
            submission_in_flight: false,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn load<R: Dispatcher>(&mut self, rt: &mut R) {
        info!(document_id = %self.document_id, epoch = self.epoch, "loading quiz");
        self.state = QuizState::Loading;
        self.screen = Screen::new();
        rt.dispatch(Envelope {
            epoch: self.epoch,
            request: Request::FetchQuiz {
                document_id: self.document_id.clone(),
            },
        });
    }

    /// Starts over from a fresh fetch. Replies to anything issued before
    /// are dropped when they arrive.
    pub fn reload<R: Scheduler + Dispatcher>(&mut self, rt: &mut R) {
        rt.stop(TimerPurpose::Countdown);
        rt.stop(TimerPurpose::Flash);
        self.epoch += 1;
        self.session = None;
        self.submission_in_flight = false;
        self.load(rt);
    }

    pub fn handle<R: Scheduler + Dispatcher>(&mut self, action: Action, rt: &mut R) {
        match (action, self.state) {
            (Action::Select(index), QuizState::Answering(_)) => self.screen.toggle(index),
            (Action::ToggleCursor, QuizState::Answering(_)) => {
                let cursor = self.screen.cursor;
                self.screen.toggle(cursor);
            }
            (Action::MoveCursor(delta), QuizState::Answering(_)) => {
                self.screen.move_cursor(delta)
            }
            (Action::SubmitAnswer, QuizState::Answering(_)) => self.submit_answer(rt),
            (Action::SubmitAnswer, QuizState::Submitting) if !self.submission_in_flight => {
                self.submit_quiz(rt)
            }
            (Action::StartQuiz, QuizState::Info) => self.show_next_question(rt),
            (Action::ShowLeaderboard, QuizState::Info) => self.show_leaderboard(rt),
            (Action::Back, QuizState::Leaderboard) => self.reload(rt),
            _ => {}
        }
    }

    pub fn on_timer<R: Scheduler + Dispatcher>(&mut self, purpose: TimerPurpose, rt: &mut R) {
        match purpose {
            TimerPurpose::Countdown => self.tick(rt),
            TimerPurpose::Flash if self.state == QuizState::Flashing => self.show_next_question(rt),
            _ => {}
        }
    }

    pub fn on_reply<R: Scheduler + Dispatcher>(&mut self, delivery: Delivery, rt: &mut R) {
        if delivery.epoch != self.epoch {
            debug!(epoch = delivery.epoch, "dropping reply from an earlier load");
            return;
        }
        match (delivery.request, delivery.result) {
            (_, Ok(Reply::Quiz(quiz))) => self.install(quiz),
            (_, Ok(Reply::QuizSubmitted)) => {
                self.submission_in_flight = false;
                info!("quiz submitted");
                self.show_leaderboard(rt);
            }
            (_, Ok(Reply::Leaderboard(entries))) => self.on_leaderboard(entries),
            (Request::FetchQuiz { .. }, Err(e)) => {
                error!(error = %e, "quiz could not be loaded");
                self.state = QuizState::Failed;
                self.screen.show_status(&format!("Could not load quiz: {}", e));
            }
            (Request::SubmitQuiz(_), Err(e)) => {
                self.submission_in_flight = false;
                self.screen.submit_label = SUBMIT_LABEL.to_string();
                self.screen.notice = Some(format!("Submission failed: {} [Enter] retry", e));
            }
            (Request::FetchLeaderboard { .. }, Err(e)) => {
                if self.state == QuizState::Leaderboard {
                    self.screen.leaderboard_unavailable = true;
                }
                self.screen.notice = Some(format!("Leaderboard unavailable: {}", e));
            }
            (request, result) => {
                warn!(path = %request.path(), ?result, "unexpected reply");
            }
        }
    }

    fn install(&mut self, quiz: Quiz) {
        info!(title = %quiz.title, questions = quiz.questions.len(), "quiz loaded");
        self.screen.title = quiz.title.clone();
        self.session = Some(QuizSession::init_quiz(quiz, self.answer_seconds));
        self.show_info();
    }

    fn show_info(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.reset_score();
        session.set_current_question(0);
        session.reset_countdown();

        self.screen.description = session.quiz.description.clone();
        self.screen.image_url = session.quiz.image_url.clone();
        self.screen.score_value = Some(session.score);
        self.screen.timer_value = Some(format_countdown(session.remaining_seconds));
        self.screen.show(Panel::Info);
        self.state = QuizState::Info;
    }

    pub fn show_next_question<R: Scheduler + Dispatcher>(&mut self, rt: &mut R) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.screen.clear_feedback();
        if !session.has_question() {
            self.submit_quiz(rt);
            return;
        }

        let index = session.current_question;
        let question = session.quiz.questions[index].clone();
        self.screen.render_question(&question);
        self.screen.title = format!(
            "{} {}/{}",
            session.quiz.title,
            index + 1,
            session.question_count()
        );
        self.screen.timer_value = Some(format_countdown(session.remaining_seconds));
        self.state = QuizState::Answering(index);
        debug!(question = index + 1, "showing question");
        rt.start(TimerPurpose::Countdown, self.tick);
    }

    /// One second of the countdown; running out submits whatever is selected.
    pub fn tick<R: Scheduler + Dispatcher>(&mut self, rt: &mut R) {
        if !matches!(self.state, QuizState::Answering(_)) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let remaining = session.tick();
        self.screen.timer_value = Some(format_countdown(remaining));
        if remaining <= 0 {
            info!("time is up");
            self.submit_answer(rt);
        }
    }

    /// Grades the open question. Correct answers earn the seconds left,
    /// wrong ones cost a fixed penalty.
    pub fn submit_answer<R: Scheduler + Dispatcher>(&mut self, rt: &mut R) {
        let QuizState::Answering(index) = self.state else {
            return;
        };
        rt.stop(TimerPurpose::Countdown);
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let selected = self.screen.selections();
        let correct = session.quiz.questions[index].evaluate(&selected);
        if correct {
            let remaining = session.remaining_seconds;
            session.add_score(remaining);
        } else {
            session.add_score(-self.wrong_answer_penalty);
        }
        info!(question = index + 1, correct, score = session.score, "answer graded");

        session.reset_countdown();
        session.set_current_question(index + 1);
        self.screen.score_value = Some(session.score);
        self.screen.timer_value = Some(format_countdown(session.remaining_seconds));
        self.screen.apply_feedback(correct);
        self.state = QuizState::Flashing;
        rt.once(TimerPurpose::Flash, self.flash);
    }

    /// Sends the whole quiz, final score attached.
    pub fn submit_quiz<R: Dispatcher>(&mut self, rt: &mut R) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.quiz.score = Some(session.score);
        self.screen.submit_label = BUSY_LABEL.to_string();
        self.screen.notice = None;
        self.state = QuizState::Submitting;
        self.submission_in_flight = true;
        info!(score = session.score, "submitting quiz");
        rt.dispatch(Envelope {
            epoch: self.epoch,
            request: Request::SubmitQuiz(Box::new(session.quiz.clone())),
        });
    }

    pub fn show_leaderboard<R: Dispatcher>(&mut self, rt: &mut R) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let quiz = &session.quiz;
        self.screen.title = quiz.title.clone();
        self.screen.last_score = quiz.score;
        self.screen.back_label = if quiz.score.is_some() {
            "Try again".to_string()
        } else {
            "Back".to_string()
        };
        self.screen.leaderboard.clear();
        self.screen.leaderboard_fetched_at = None;
        self.screen.leaderboard_unavailable = false;
        self.screen.show(Panel::Leaderboard);
        self.state = QuizState::Leaderboard;
        rt.dispatch(Envelope {
            epoch: self.epoch,
            request: Request::FetchLeaderboard {
                document_id: quiz.document_id.clone(),
                sheet_id: quiz.leaderboard_sheet_id.clone(),
            },
        });
    }

    fn on_leaderboard(&mut self, entries: Vec<LeaderboardEntry>) {
        if self.state != QuizState::Leaderboard {
            return;
        }
        debug!(entries = entries.len(), "leaderboard received");
        self.screen.render_leaderboard(entries);
    }
}
