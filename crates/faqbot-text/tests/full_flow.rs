use faqbot_core::config::{MatcherSettings, DEFAULT_FALLBACK_ANSWER};
use faqbot_core::traits::Matcher;
use faqbot_core::types::{ChatRequest, ChatResponse, Corpus, CorpusEntry};
use faqbot_text::TfIdfMatcher;

fn store_corpus() -> Corpus {
    Corpus::new(vec![
        CorpusEntry::new("What are your hours?", "9am-5pm"),
        CorpusEntry::new("Where are you located?", "123 Main St"),
    ])
}

fn password_corpus() -> Corpus {
    Corpus::new(vec![
        CorpusEntry::new("How do I reset my password?", "Use the 'Forgot password' link."),
        CorpusEntry::new("How can I change my password?", "Go to Settings > Security."),
    ])
}

#[test]
fn exact_question_matches_itself() {
    let matcher = TfIdfMatcher::new(store_corpus());
    let r = matcher.find_best_match("What are your hours?", None).expect("match");
    assert_eq!(r.matched_question.as_deref(), Some("What are your hours?"));
    assert_eq!(r.answer, "9am-5pm");
    assert!((r.score - 1.0).abs() < 1e-9, "score={}", r.score);
}

#[test]
fn unrelated_wording_falls_back_with_zero_score() {
    let matcher = TfIdfMatcher::new(store_corpus());
    // normalizes to "time open", which shares no term with either question
    let r = matcher.find_best_match("what time do you open", None).expect("match");
    assert!(!r.is_match());
    assert_eq!(r.score, 0.0);
    assert_eq!(r.answer, DEFAULT_FALLBACK_ANSWER);
}

#[test]
fn gibberish_falls_back() {
    let matcher = TfIdfMatcher::new(store_corpus());
    let r = matcher.find_best_match("asdkjasd", None).expect("match");
    assert_eq!(r.matched_question, None);
    assert_eq!(r.score, 0.0);
    assert_eq!(r.answer, DEFAULT_FALLBACK_ANSWER);
}

#[test]
fn empty_corpus_falls_back() {
    let matcher = TfIdfMatcher::new(Corpus::default());
    let r = matcher.find_best_match("anything", Some(0.3)).expect("match");
    assert_eq!(r.matched_question, None);
    assert_eq!(r.score, 0.0);
    assert!(matcher.rank("anything", 5).is_empty());
}

#[test]
fn query_of_only_stopwords_falls_back() {
    let matcher = TfIdfMatcher::new(store_corpus());
    let r = matcher.find_best_match("Where are you?!", None).expect("match");
    assert!(!r.is_match());
    assert_eq!(r.score, 0.0);
}

#[test]
fn reference_scores() {
    let matcher = TfIdfMatcher::new(password_corpus());
    let scores = matcher.scores("reset password please");
    assert_eq!(scores.len(), 2);
    assert!((scores[0] - 0.693_627_942_179_770_4).abs() < 1e-9, "scores={scores:?}");
    assert!((scores[1] - 0.216_354_518_871_419_54).abs() < 1e-9, "scores={scores:?}");

    let r = matcher.find_best_match("reset password please", None).expect("match");
    assert_eq!(r.matched_question.as_deref(), Some("How do I reset my password?"));
    assert!((r.score - scores[0]).abs() < 1e-12);
}

#[test]
fn below_threshold_reports_best_score() {
    let matcher = TfIdfMatcher::new(password_corpus());
    let r = matcher.find_best_match("reset password please", Some(0.9)).expect("match");
    assert!(!r.is_match());
    assert!((r.score - 0.693_627_942_179_770_4).abs() < 1e-9);
}

#[test]
fn custom_fallback_answer() {
    let settings = MatcherSettings { threshold: 0.3, fallback_answer: "Ask a human.".to_string() };
    let matcher = TfIdfMatcher::with_settings(store_corpus(), settings).expect("matcher");
    let r = matcher.find_best_match("asdkjasd", None).expect("match");
    assert_eq!(r.answer, "Ask a human.");
}

#[test]
fn configured_threshold_is_the_default() {
    let settings = MatcherSettings { threshold: 0.8, ..MatcherSettings::default() };
    let matcher = TfIdfMatcher::with_settings(password_corpus(), settings).expect("matcher");
    assert!(!matcher.find_best_match("reset password please", None).expect("match").is_match());
    assert!(matcher.find_best_match("reset password please", Some(0.5)).expect("match").is_match());
}

#[test]
fn rank_orders_by_score_then_corpus_order() {
    let matcher = TfIdfMatcher::new(password_corpus());
    let ranked = matcher.rank("reset password please", 10);
    assert_eq!(ranked.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1]);
    assert!(ranked[0].score >= ranked[1].score);

    let ranked = matcher.rank("nothing shared", 10);
    assert_eq!(ranked.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1], "zero scores keep corpus order");
    assert_eq!(matcher.rank("reset password", 1).len(), 1);
}

#[test]
fn json_request_round_trip() {
    let matcher = TfIdfMatcher::new(store_corpus());
    let request = ChatRequest::parse(r#"{"question": "Where are you located?"}"#).expect("request");
    let result = matcher.find_best_match(&request.question, request.threshold).expect("match");
    let response = serde_json::to_value(ChatResponse::from(result)).expect("json");
    assert_eq!(response["answer"], "123 Main St");
    assert_eq!(response["matched_question"], "Where are you located?");
    assert!(response["confidence"].as_f64().unwrap() > 0.99);
}

#[test]
fn fused_negation_matches_like_its_split_form() {
    let matcher = TfIdfMatcher::new(Corpus::new(vec![
        CorpusEntry::new("How do I login?", "Use your email and password."),
        CorpusEntry::new("Where are you located?", "123 Main St"),
    ]));
    let r = matcher.find_best_match("I cannot login", None).expect("match");
    assert_eq!(r.matched_question.as_deref(), Some("How do I login?"));
    assert!((r.score - 1.0).abs() < 1e-9, "score={}", r.score);
}

#[test]
fn duplicate_questions_resolve_to_first_entry() {
    let matcher = TfIdfMatcher::new(Corpus::new(vec![
        CorpusEntry::new("Where are you located?", "first"),
        CorpusEntry::new("What are your hours?", "9am-5pm"),
        CorpusEntry::new("Where are you located?", "second"),
    ]));
    let r = matcher.find_best_match("Where are you located?", None).expect("match");
    assert_eq!(r.answer, "first");
    let scores = matcher.scores("Where are you located?");
    assert_eq!(scores[0].to_bits(), scores[2].to_bits(), "identical questions score identically");
    let ranked = matcher.rank("Where are you located?", 2);
    assert_eq!(ranked.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 2]);
}
