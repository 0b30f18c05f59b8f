mod common;

use std::time::Duration;

use common::{failed, ok, FakeRuntime};
use quizpoll::config::Config;
use quizpoll::error::ApiError;
use quizpoll::gateway::{Reply, Request};
use quizpoll::poll::{PollController, PollState, CLOSED_TEXT, WAITING_TEXT};
use quizpoll::screen::{Action, Feedback, Panel, BUSY_LABEL};
use quizpoll::session::LiveIndex;
use quizpoll::timer::{TimerKind, TimerPurpose};

fn loaded() -> (PollController, FakeRuntime) {
    let mut rt = FakeRuntime::new();
    let mut poll = PollController::new("poll-doc-1", &Config::default());
    poll.load(&mut rt);
    let fetch = rt.last().clone();
    poll.on_reply(ok(&fetch, Reply::Poll(common::poll_fixture())), &mut rt);
    (poll, rt)
}

/// Answers the outstanding status check with a 1-based index.
fn status(poll: &mut PollController, rt: &mut FakeRuntime, remote: i64) {
    let env = rt
        .sent
        .iter()
        .rev()
        .find(|e| matches!(e.request, Request::PollStatus { .. }))
        .cloned()
        .expect("no status request");
    poll.on_reply(ok(&env, Reply::PollStatus(remote)), rt);
}

fn is_status(r: &Request) -> bool {
    matches!(r, Request::PollStatus { .. })
}

#[test]
fn test_load_fetches_then_checks_status_every_three_seconds() {
    let (poll, rt) = loaded();

    assert_eq!(
        rt.requests()[0],
        Request::FetchPoll {
            document_id: "poll-doc-1".into()
        }
    );
    assert_eq!(
        rt.requests()[1],
        Request::PollStatus {
            document_id: "poll-doc-1".into(),
            sheet_id: "od7".into()
        }
    );
    assert_eq!(
        rt.running.get(&TimerPurpose::PollStatus),
        Some(&(TimerKind::Interval, Duration::from_millis(3000)))
    );
    assert_eq!(poll.screen().title, "Lecture 4: Memory");
    assert_eq!(poll.session().map(|s| s.live), Some(LiveIndex::Unset));
}

#[test]
fn test_unchanged_index_causes_no_transition() {
    let (mut poll, mut rt) = loaded();

    let transitions: Vec<bool> = [-2, -2, 3, 3, -3]
        .iter()
        .map(|&i| poll.apply_status(LiveIndex::from_internal(i), &mut rt))
        .collect();

    assert_eq!(transitions, vec![true, false, true, false, true]);
    assert_eq!(poll.state(), PollState::Closed);
}

#[test]
fn test_status_replies_drive_the_screen() {
    let (mut poll, mut rt) = loaded();

    status(&mut poll, &mut rt, -1);
    assert_eq!(poll.state(), PollState::Waiting);
    assert_eq!(poll.screen().panel, Panel::Status);
    assert_eq!(poll.screen().status_text, WAITING_TEXT);

    status(&mut poll, &mut rt, 4);
    assert_eq!(poll.state(), PollState::ShowingQuestion(3));
    assert_eq!(poll.screen().panel, Panel::Question);
    assert_eq!(poll.screen().question_text, "Does free() return memory to the OS?");
    assert_eq!(poll.screen().controls.len(), 2);

    status(&mut poll, &mut rt, -2);
    assert_eq!(poll.state(), PollState::Closed);
    assert_eq!(poll.screen().status_text, CLOSED_TEXT);
    assert!(!rt.is_running(TimerPurpose::PollStatus));
}

#[test]
fn test_closed_poll_ignores_later_status() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, -2);
    let sent = rt.sent.len();

    status(&mut poll, &mut rt, 1);
    assert_eq!(poll.state(), PollState::Closed);

    poll.on_timer(TimerPurpose::PollStatus, &mut rt);
    assert_eq!(rt.sent.len(), sent);
}

#[test]
fn test_ticks_skip_while_status_check_in_flight() {
    let (mut poll, mut rt) = loaded();
    assert_eq!(rt.count(is_status), 1);

    poll.on_timer(TimerPurpose::PollStatus, &mut rt);
    poll.on_timer(TimerPurpose::PollStatus, &mut rt);
    assert_eq!(rt.count(is_status), 1);

    status(&mut poll, &mut rt, -1);
    poll.on_timer(TimerPurpose::PollStatus, &mut rt);
    assert_eq!(rt.count(is_status), 2);
}

#[test]
fn test_failed_status_check_allows_next_tick() {
    let (mut poll, mut rt) = loaded();
    let env = rt.last().clone();
    poll.on_reply(failed(&env, ApiError::Network("timeout".into())), &mut rt);
    assert!(poll.screen().notice.is_some());

    poll.on_timer(TimerPurpose::PollStatus, &mut rt);
    assert_eq!(rt.count(is_status), 2);
}

#[test]
fn test_question_outside_the_poll_is_treated_as_waiting() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, 9);
    assert_eq!(poll.state(), PollState::Waiting);
    assert_eq!(poll.screen().status_text, WAITING_TEXT);
}

#[test]
fn test_submit_sends_selection_once() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, 2);
    assert!(poll.screen().multi_choice);

    poll.handle(Action::Select(0), &mut rt);
    poll.handle(Action::Select(1), &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);

    let submits: Vec<Request> = rt
        .requests()
        .into_iter()
        .filter(|r| matches!(r, Request::SubmitPoll(_)))
        .collect();
    assert_eq!(submits.len(), 1);
    let Request::SubmitPoll(submission) = &submits[0] else {
        unreachable!()
    };
    assert_eq!(submission.answers, "1,2");
    assert_eq!(submission.question_number, 2);
    assert!(submission.success);
    assert!(submission.anonymous);
    assert_eq!(submission.sheet_id, "od8");
    assert_eq!(poll.screen().feedback, Some(Feedback::Correct));
    assert_eq!(poll.screen().submit_label, BUSY_LABEL);
}

#[test]
fn test_accepted_answer_returns_to_waiting_until_next_question() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, 1);
    poll.handle(Action::Select(1), &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);

    let env = rt.last().clone();
    let Request::SubmitPoll(submission) = &env.request else {
        panic!("Expected a submission");
    };
    assert!(!submission.success);
    poll.on_reply(ok(&env, Reply::PollSubmitted), &mut rt);

    assert_eq!(poll.state(), PollState::Waiting);
    assert_eq!(poll.screen().status_text, WAITING_TEXT);
    assert_eq!(poll.screen().feedback, None);
    assert_eq!(poll.session().map(|s| s.submitted), Some(true));

    // Same question reported again: nothing to redo
    status(&mut poll, &mut rt, 1);
    assert_eq!(poll.state(), PollState::Waiting);

    status(&mut poll, &mut rt, 3);
    assert_eq!(poll.state(), PollState::ShowingQuestion(2));
    assert_eq!(poll.session().map(|s| s.submitted), Some(false));
}

#[test]
fn test_late_submission_reply_does_not_hide_new_question() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, 1);
    poll.handle(Action::Select(0), &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);
    let submit = rt.last().clone();

    status(&mut poll, &mut rt, 4);
    poll.on_reply(ok(&submit, Reply::PollSubmitted), &mut rt);

    assert_eq!(poll.state(), PollState::ShowingQuestion(3));
    assert_eq!(poll.session().map(|s| s.submitted), Some(false));
}

fn submitted_questions(rt: &FakeRuntime) -> Vec<usize> {
    rt.requests()
        .into_iter()
        .filter_map(|r| match r {
            Request::SubmitPoll(s) => Some(s.question_number),
            _ => None,
        })
        .collect()
}

/// Answers question 1, moves on to question 2 and answers it too; returns
/// the envelope of the first submission, still unanswered.
fn answer_two_questions(poll: &mut PollController, rt: &mut FakeRuntime) -> quizpoll::gateway::Envelope {
    status(poll, rt, 1);
    poll.handle(Action::Select(0), rt);
    poll.handle(Action::SubmitAnswer, rt);
    let first = rt.last().clone();

    status(poll, rt, 2);
    poll.handle(Action::Select(0), rt);
    poll.handle(Action::Select(1), rt);
    poll.handle(Action::SubmitAnswer, rt);
    first
}

#[test]
fn test_late_reply_keeps_guard_on_current_submission() {
    let (mut poll, mut rt) = loaded();
    let first = answer_two_questions(&mut poll, &mut rt);

    poll.on_reply(ok(&first, Reply::PollSubmitted), &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);

    assert_eq!(submitted_questions(&rt), vec![1, 2]);
    assert_eq!(poll.state(), PollState::ShowingQuestion(1));
    assert_eq!(poll.screen().submit_label, BUSY_LABEL);

    let second = rt.last().clone();
    poll.on_reply(ok(&second, Reply::PollSubmitted), &mut rt);
    assert_eq!(poll.state(), PollState::Waiting);
    assert_eq!(poll.session().map(|s| s.submitted), Some(true));
}

#[test]
fn test_late_failure_keeps_guard_on_current_submission() {
    let (mut poll, mut rt) = loaded();
    let first = answer_two_questions(&mut poll, &mut rt);

    poll.on_reply(failed(&first, ApiError::Network("timeout".into())), &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);

    assert_eq!(submitted_questions(&rt), vec![1, 2]);
    assert_eq!(poll.screen().submit_label, BUSY_LABEL);
    assert!(poll.screen().notice.is_none());
}

#[test]
fn test_failed_submission_can_be_retried() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, 1);
    poll.handle(Action::Select(0), &mut rt);
    poll.handle(Action::SubmitAnswer, &mut rt);
    let submit = rt.last().clone();
    poll.on_reply(failed(&submit, ApiError::Network("503".into())), &mut rt);

    assert_eq!(poll.state(), PollState::ShowingQuestion(0));
    assert!(poll.screen().notice.is_some());

    poll.handle(Action::SubmitAnswer, &mut rt);
    assert_eq!(rt.count(|r| matches!(r, Request::SubmitPoll(_))), 2);
}

#[test]
fn test_failed_load_installs_nothing() {
    let mut rt = FakeRuntime::new();
    let mut poll = PollController::new("nope", &Config::default());
    poll.load(&mut rt);
    let fetch = rt.last().clone();
    poll.on_reply(failed(&fetch, ApiError::Parse("expected value".into())), &mut rt);

    assert_eq!(poll.state(), PollState::Failed);
    assert!(poll.session().is_none());
    assert_eq!(poll.screen().panel, Panel::Status);
    assert!(poll.screen().status_text.contains("Could not load poll"));
    assert!(rt.running.is_empty());
}

#[test]
fn test_single_choice_selection_is_exclusive() {
    let (mut poll, mut rt) = loaded();
    status(&mut poll, &mut rt, 1);
    assert!(!poll.screen().multi_choice);

    poll.handle(Action::Select(0), &mut rt);
    poll.handle(Action::Select(2), &mut rt);
    assert_eq!(poll.screen().selections(), vec![false, false, true]);
}
