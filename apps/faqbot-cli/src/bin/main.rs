use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use faqbot_core::config::Config;
use faqbot_core::corpus::JsonFileCorpus;
use faqbot_core::error::Error;
use faqbot_core::traits::Matcher;
use faqbot_core::types::{ChatRequest, ChatResponse};
use faqbot_text::TfIdfMatcher;

const USAGE: &str = "Usage: faqbot [--corpus PATH] <ask|chat|jsonl|check> [args...]";

struct Cli {
    corpus: Option<PathBuf>,
    cmd: String,
    args: Vec<String>,
}

struct AskOptions {
    question: String,
    threshold: Option<f64>,
    top: usize,
    json: bool,
}

const COMMANDS: [&str; 4] = ["ask", "chat", "jsonl", "check"];

/// `--corpus PATH` is a global option and may appear anywhere on the line.
fn parse_args() -> Cli {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut corpus = None;
    while let Some(pos) = args.iter().position(|a| a == "--corpus") {
        args.remove(pos);
        if pos >= args.len() { eprintln!("Error: --corpus requires a path"); std::process::exit(1); }
        corpus = Some(PathBuf::from(args.remove(pos)));
    }
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    if !COMMANDS.contains(&cmd.as_str()) { eprintln!("Unknown command: {}\n{USAGE}", cmd); std::process::exit(1); }
    Cli { corpus, cmd, args }
}

fn parse_ask(args: &[String]) -> anyhow::Result<AskOptions> {
    let mut words = Vec::new();
    let (mut threshold, mut top, mut json) = (None, 0usize, false);
    let mut i = 0; while i < args.len() { match args[i].as_str() {
        "--threshold" | "-t" => {
            let v = args.get(i + 1).and_then(|s| s.parse::<f64>().ok()).ok_or_else(|| anyhow!("--threshold requires a number"))?;
            threshold = Some(v); i += 1;
        }
        "--top" | "-k" => {
            top = args.get(i + 1).and_then(|s| s.parse::<usize>().ok()).ok_or_else(|| anyhow!("--top requires a number"))?;
            i += 1;
        }
        "--json" => json = true,
        flag if flag.starts_with("--") => bail!("Unknown option: {flag}\nUsage: faqbot ask \"<question>\" [--threshold X] [--top N] [--json]"),
        word => words.push(word.to_string()),
    } i += 1; }
    let question = words.join(" ");
    if question.trim().is_empty() { bail!("Please enter a question\nUsage: faqbot ask \"<question>\" [--threshold X] [--top N] [--json]"); }
    Ok(AskOptions { question, threshold, top, json })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let cli = parse_args();

    let corpus_path = match cli.corpus { Some(p) => p, None => config.corpus_path()? };
    let settings = config.matcher_settings()?;
    let matcher = TfIdfMatcher::from_source(&JsonFileCorpus::new(&corpus_path), settings)
        .with_context(|| format!("Failed to load FAQ corpus from {}", corpus_path.display()))?;
    info!(entries = matcher.corpus().len(), threshold = matcher.settings().threshold, "matcher ready");

    match cli.cmd.as_str() {
        "ask" => ask(&matcher, &parse_ask(&cli.args)?)?,
        "chat" => chat(&matcher)?,
        "jsonl" => jsonl(&matcher)?,
        "check" => check(&matcher, &corpus_path),
        other => unreachable!("command {other} passed validation"),
    }
    Ok(())
}

fn ask(matcher: &TfIdfMatcher, opts: &AskOptions) -> anyhow::Result<()> {
    let result = matcher.find_best_match(&opts.question, opts.threshold)?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&ChatResponse::from(result))?);
        return Ok(());
    }
    if let Some(q) = &result.matched_question { println!("🔍 Matched: {}", q); }
    println!("💬 {}", result.answer);
    println!("📊 Confidence: {:.4}", result.score);
    if opts.top > 0 {
        println!("\nTop candidates:");
        for (i, hit) in matcher.rank(&opts.question, opts.top).iter().enumerate() {
            let question = matcher.corpus().get(hit.index).map_or("", |e| e.question.as_str());
            println!("  {}. score={:.4}  {}", i + 1, hit.score, question);
        }
    }
    Ok(())
}

fn chat(matcher: &dyn Matcher) -> anyhow::Result<()> {
    println!("💬 FAQ chat. Type 'quit' to exit.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { println!(); break };
        let line = line?;
        let question = line.trim();
        if question.eq_ignore_ascii_case("quit") || question.eq_ignore_ascii_case("exit") { break; }
        if question.is_empty() { println!("Please enter a question"); continue; }
        let result = matcher.find_best_match(question, None)?;
        println!("{}", result.answer);
        if let Some(q) = &result.matched_question { println!("   (matched \"{}\", confidence {:.2})", q, result.score); }
    }
    Ok(())
}

/// One JSON request per input line, one JSON reply per output line.
fn jsonl(matcher: &dyn Matcher) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let reply = ChatRequest::parse(&line)
            .and_then(|req| matcher.find_best_match(&req.question, req.threshold))
            .map(ChatResponse::from);
        let body = match reply {
            Ok(resp) => serde_json::to_value(resp)?,
            Err(e) => { warn!(error = %e, "rejected request"); error_body(&e) }
        };
        writeln!(out, "{}", body)?;
    }
    Ok(())
}

fn error_body(e: &Error) -> Value {
    match e {
        Error::InvalidInput(msg) => json!({ "error": msg }),
        other => json!({ "error": other.to_string() }),
    }
}

fn check(matcher: &TfIdfMatcher, corpus_path: &Path) {
    println!("📚 Corpus: {}", corpus_path.display());
    println!("Entries: {}", matcher.corpus().len());
    println!("Threshold: {}", matcher.settings().threshold);
    for (i, (entry, normalized)) in matcher.corpus().entries().iter().zip(matcher.normalized_questions()).enumerate() {
        println!("  {}. {}  ->  [{}]", i + 1, entry.question, normalized);
        if normalized.is_empty() { println!("     ⚠️  no terms survive normalization; this entry scores 0 against every query"); }
    }
}
