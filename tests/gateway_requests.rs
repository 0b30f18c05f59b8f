mod common;

use serde_json::json;

use common::FakeTransport;
use quizpoll::error::ApiError;
use quizpoll::gateway::{execute, Reply, Request};
use quizpoll::model::{LeaderboardEntry, PollSubmission};

fn fixture_json(name: &str) -> serde_json::Value {
    serde_json::from_str(&common::fixture(name)).unwrap()
}

#[test]
fn test_fetch_poll_parses_document() {
    let transport = FakeTransport::default().with("/api/poll/poll-doc-1", Ok(fixture_json("poll.json")));
    let reply = execute(
        &transport,
        &Request::FetchPoll {
            document_id: "poll-doc-1".into(),
        },
    )
    .unwrap();

    let Reply::Poll(poll) = reply else {
        panic!("Expected a poll");
    };
    assert_eq!(poll.title, "Lecture 4: Memory");
    assert_eq!(poll.internal_data_sheet_id, "od7");
    assert_eq!(poll.questions.len(), 4);
    assert!(poll.questions[1].anonymous);
}

#[test]
fn test_poll_status_string_body() {
    let transport = FakeTransport::default().with("/api/poll/status/doc/od7", Ok(json!("3")));
    let reply = execute(
        &transport,
        &Request::PollStatus {
            document_id: "doc".into(),
            sheet_id: "od7".into(),
        },
    );
    assert_eq!(reply, Ok(Reply::PollStatus(3)));
}

#[test]
fn test_submit_poll_posts_expected_body() {
    let transport = FakeTransport::default().with("/api/poll/submit", Ok(json!("OK")));
    let submission = PollSubmission {
        anonymous: false,
        success: true,
        question_number: 1,
        document_id: "doc".into(),
        sheet_id: "od8".into(),
        answers: "1,3".into(),
    };
    let reply = execute(&transport, &Request::SubmitPoll(submission));
    assert_eq!(reply, Ok(Reply::PollSubmitted));

    let posts = transport.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    let (path, body) = &posts[0];
    assert_eq!(path, "/api/poll/submit");
    assert_eq!(
        body,
        &json!({
            "anonymous": false,
            "success": true,
            "question_number": 1,
            "document_id": "doc",
            "sheet_id": "od8",
            "answers": "1,3"
        })
    );
}

#[test]
fn test_leaderboard_keeps_fetch_order() {
    let transport = FakeTransport::default().with(
        "/api/quiz/leaderboard/quiz-doc-1/od6",
        Ok(json!([{"ldap": "a", "score": "5"}, {"ldap": "b", "score": "9"}])),
    );
    let reply = execute(
        &transport,
        &Request::FetchLeaderboard {
            document_id: "quiz-doc-1".into(),
            sheet_id: "od6".into(),
        },
    )
    .unwrap();
    assert_eq!(
        reply,
        Reply::Leaderboard(vec![
            LeaderboardEntry {
                display_name: "a".into(),
                score: 5
            },
            LeaderboardEntry {
                display_name: "b".into(),
                score: 9
            },
        ])
    );
}

#[test]
fn test_submit_quiz_posts_whole_document() {
    let transport = FakeTransport::default().with("/api/quiz/submit", Ok(json!("OK")));
    let mut quiz = common::quiz_fixture();
    quiz.score = Some(0);

    let reply = execute(&transport, &Request::SubmitQuiz(Box::new(quiz)));
    assert_eq!(reply, Ok(Reply::QuizSubmitted));

    let posts = transport.posts.lock().unwrap();
    let (_, body) = &posts[0];
    assert_eq!(body["score"], 0);
    assert_eq!(body["document_id"], "quiz-doc-1");
    assert_eq!(body["questions"].as_array().map(|q| q.len()), Some(2));
}

#[test]
fn test_document_of_wrong_shape_is_parse_error() {
    let transport =
        FakeTransport::default().with("/api/quiz/broken", Ok(json!({"title": "no questions key"})));
    let reply = execute(
        &transport,
        &Request::FetchQuiz {
            document_id: "broken".into(),
        },
    );
    assert!(matches!(reply, Err(ApiError::Parse(_))));
}

#[test]
fn test_network_error_is_passed_through() {
    let transport = FakeTransport::default();
    let reply = execute(
        &transport,
        &Request::FetchQuiz {
            document_id: "missing".into(),
        },
    );
    assert!(matches!(reply, Err(ApiError::Network(_))));
    assert_eq!(
        *transport.gets.lock().unwrap(),
        vec!["/api/quiz/missing".to_string()]
    );
}
