//! 面试 / 测验完整流程测试：mock 模型接口 + 内存输入输出

use std::time::Duration;

use mock_interview::models::load_candidate_profile;
use mock_interview::services::{ReportWriter, SessionReport};
use mock_interview::{
    interview_loop, quiz_loop, CandidateProfile, GeminiClient, InterviewSession, OptionLabel,
    QuizService, QuizSession, RetryPolicy, RetryingGenerator,
};
use serde_json::json;
use tokio::io::AsyncBufReadExt;
use tokio_test::assert_ok;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

const QUIZ_OUTPUT: &str = "Here are your questions:\n\n\
**1. Which Rust keyword declares an immutable binding?**\n\
a) let\nb) var\nc) const mut\nd) static mut\n\
**Correct Answer: a)**\n\n\
**2. Which SQL clause filters grouped rows?**\n\
a) WHERE\nb) ORDER BY\nc) HAVING\nd) LIMIT\n\
**Correct Answer: c)**\n";

fn reply(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

fn generator(server: &MockServer) -> RetryingGenerator<GeminiClient> {
    let policy = RetryPolicy {
        max_attempts: 2,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(10),
        multiplier: 2.0,
    };
    RetryingGenerator::new(
        GeminiClient::with_base_url("test-key", "gemini-test", server.uri()),
        policy,
    )
}

fn profile() -> CandidateProfile {
    CandidateProfile::new(
        "Skills: Rust, PostgreSQL\nProjects: inventory API",
        Some("Backend engineer".to_string()),
    )
}

#[tokio::test]
async fn test_quiz_flow_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("Generate 2 multiple-choice questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(QUIZ_OUTPUT)))
        .expect(1)
        .mount(&server)
        .await;

    let quiz = assert_ok!(QuizService::new(generator(&server)).generate(&profile(), 2).await);
    assert_eq!(quiz.len(), 2);
    assert_eq!(quiz.questions[1].correct_answer, OptionLabel::C);

    let mut session = QuizSession::new(quiz);
    let mut lines = "a\nb\n".as_bytes().lines();
    let mut out = Vec::new();
    let score = assert_ok!(quiz_loop(&mut session, &mut lines, &mut out).await);

    assert_eq!(score.correct, 1);
    assert_eq!(score.total, 2);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Q1/2. Which Rust keyword declares an immutable binding?"));
    assert!(out.contains("✗ Wrong. Correct answer: c) HAVING"));

    let dir = tempfile::tempdir().unwrap();
    let path = assert_ok!(
        ReportWriter::new(dir.path())
            .write(&session.to_report("gemini-test"))
            .await
    );
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved["kind"], "quiz");
    assert_eq!(saved["answers"]["2"], "b");
}

#[tokio::test]
async fn test_interview_flow_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("friendly and professional AI interviewer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reply("Welcome! Can you introduce yourself?")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("then ask the next interview question"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("Good intro. Which database do you prefer and why?")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("This was the last question."))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("Clear answer. Good luck!")))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = InterviewSession::new(generator(&server), profile(), 2);
    let mut lines = "I am a backend developer.\n\nPostgreSQL,\nfor its transactions.\n\n"
        .as_bytes()
        .lines();
    let mut out = Vec::new();
    assert_ok!(interview_loop(&mut session, &mut lines, &mut out, None).await);

    assert!(session.is_finished());
    assert_eq!(session.question_count(), 2);

    let transcript = session.transcript();
    assert_eq!(transcript.answered_count(), 2);
    assert_eq!(
        transcript.turns[1].answer.as_deref(),
        Some("PostgreSQL, for its transactions.")
    );
    assert_eq!(
        transcript.turns[1].feedback.as_deref(),
        Some("Clear answer. Good luck!")
    );

    let report = SessionReport::interview(session.model_name(), transcript.clone());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["transcript"]["turns"][1]["stage"], "skills_and_tools");

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Welcome! Can you introduce yourself?"));
    assert!(out.contains("Interview complete"));
}

#[tokio::test]
async fn test_profile_from_files_feeds_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let resume = dir.path().join("resume.txt");
    std::fs::write(&resume, "Skills: Kotlin, Android").unwrap();

    let profile = assert_ok!(load_candidate_profile(Some(&resume), None).await);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("Kotlin, Android"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(QUIZ_OUTPUT)))
        .expect(1)
        .mount(&server)
        .await;

    let quiz = assert_ok!(QuizService::new(generator(&server)).generate(&profile, 2).await);
    assert_eq!(quiz.questions[0].options[0], "let");
}
