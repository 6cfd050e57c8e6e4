//! Turnguard CLI
//!
//! Usage:
//!   turnguard --text "user text" --draft "reply draft"   # Single evaluation
//!   turnguard --text "..." --draft "..." --json          # JSON output
//!   turnguard --interactive                              # Turn-by-turn loop
//!   turnguard --serve                                    # HTTP API server

use clap::Parser;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use turnguard::core::{
    run_server, ConfigProvider, CssInputs, CssScorer, FileConfigProvider, FixedClassifier,
    JsonFileStore, JsonlSink, MemoryStore, MoveDetector, OfflineGenerator, QualityEventSink,
    SelfCritic, SessionStore, StageEstimator, StaticConfig, SuppliedDraft, TracingSink,
    TurnPipeline, select_profile,
};
use turnguard::types::{
    Classification, CriticResult, CssResult, Emotion, EmotionReading, Intent, RiskLevel, Role,
    TurnOutcome, TurnPath, TurnRequest,
};
use turnguard::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "turnguard",
    version = VERSION,
    about = "Turnguard - enforce the output contract on guided-reflection replies",
    long_about = "Turnguard validates, repairs and scores model replies before they reach the user,\n\
                  and decides per turn whether to answer with a curated silence sentence instead.\n\n\
                  Modes:\n  \
                  --text/--draft  Evaluate one draft (critic, CSS, stage, pacing)\n  \
                  --interactive   Run turns against a session (user line, then draft line)\n  \
                  --serve         HTTP API server mode\n\n\
                  CSS:\n  \
                  5     - Fully within contract\n  \
                  3-4   - Minor drift, quality event at 3\n  \
                  0-2   - Unstable, late silence"
)]
struct Args {
    /// User text (single mode)
    #[arg(short, long, requires = "draft")]
    text: Option<String>,

    /// Reply draft to evaluate
    #[arg(short, long)]
    draft: Option<String>,

    /// Interactive mode - alternate user and draft lines on stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Detected emotion label
    #[arg(long, default_value = "confusion", value_parser = parse_emotion)]
    emotion: Emotion,

    /// Maturity risk level (low, medium, high)
    #[arg(long, default_value = "medium", value_parser = parse_risk)]
    risk: RiskLevel,

    /// User role (leader, doctor, staff)
    #[arg(long, default_value = "staff", value_parser = parse_role)]
    role: Role,

    /// User id for interactive sessions
    #[arg(long, default_value = "cli")]
    user: String,

    /// JSON file with rule overrides, re-read every turn
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for per-user session files (default: in memory)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Append quality events to this JSONL file (default: log them)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Seed for sentence selection
    #[arg(long)]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show penalty breakdown
    #[arg(long)]
    verbose: bool,
}

fn parse_emotion(s: &str) -> Result<Emotion, String> {
    Emotion::from_label(s).ok_or_else(|| format!("unknown emotion: {}", s))
}

fn parse_risk(s: &str) -> Result<RiskLevel, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(RiskLevel::Low),
        "medium" => Ok(RiskLevel::Medium),
        "high" => Ok(RiskLevel::High),
        other => Err(format!("unknown risk level: {}", other)),
    }
}

fn parse_role(s: &str) -> Result<Role, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "leader" => Ok(Role::Leader),
        "doctor" => Ok(Role::Doctor),
        "staff" => Ok(Role::Staff),
        other => Err(format!("unknown role: {}", other)),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "turnguard=debug" } else { "turnguard=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    if args.serve {
        run_serve(&args).await;
    } else if args.interactive {
        run_interactive(&args).await;
    } else if let (Some(text), Some(draft)) = (&args.text, &args.draft) {
        run_single(text, draft, &args).await;
    } else {
        run_interactive(&args).await;
    }
}

fn config_provider(args: &Args) -> Arc<dyn ConfigProvider> {
    match &args.config {
        Some(path) => Arc::new(FileConfigProvider::new(path)),
        None => Arc::new(StaticConfig::default()),
    }
}

fn build_pipeline(args: &Args) -> TurnPipeline {
    let store: Arc<dyn SessionStore> = match &args.state_dir {
        Some(dir) => Arc::new(JsonFileStore::new(dir)),
        None => Arc::new(MemoryStore::new()),
    };
    let sink: Arc<dyn QualityEventSink> = match &args.events {
        Some(path) => Arc::new(JsonlSink::new(path)),
        None => Arc::new(TracingSink),
    };
    TurnPipeline::new(
        store,
        Arc::new(FixedClassifier::new(classification(args))),
        Arc::new(OfflineGenerator),
    )
    .with_config(config_provider(args))
    .with_sink(sink)
}

fn classification(args: &Args) -> Classification {
    Classification::new(
        EmotionReading { detected_emotion: args.emotion, maturity_risk_level: args.risk },
        Intent::safe_default(),
    )
}

fn rng(args: &Args) -> StdRng {
    match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run the API server
async fn run_serve(args: &Args) {
    if let Err(e) = run_server(&args.addr, build_pipeline(args)).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Evaluate one draft without touching session state
async fn run_single(text: &str, draft: &str, args: &Args) {
    let config = config_provider(args).load().await;
    let stage = StageEstimator::new().estimate(text, args.emotion);
    let pacing = select_profile(stage.stage, args.role, args.risk);
    let critic = SelfCritic::new(&config).criticize(text, draft, pacing.max_sentences);
    let css = CssScorer::new().score(draft, &CssInputs { profile: Some(&pacing), ..Default::default() }, false);

    if args.json {
        let report = serde_json::json!({
            "stage": stage,
            "pacing": pacing,
            "critic": critic,
            "css": css,
            "moves": MoveDetector::new().moves(draft),
        });
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        return;
    }

    println!("stage={} max_sentences={} question={}", stage.stage, pacing.max_sentences, pacing.allow_question);
    print_critic(&critic);
    print_css(&css, args.verbose);
}

/// Interactive loop: one user line, then one draft line, per turn
async fn run_interactive(args: &Args) {
    let pipeline = build_pipeline(args);
    let mut rng = rng(args);

    print_header("Interactive", args.no_color);
    println!("Enter the user's message, then the model draft. Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut turns = 0usize;

    loop {
        let Some(text) = prompt_line(&stdin, "user  > ") else { break };
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }
        if text.is_empty() {
            continue;
        }
        let Some(draft) = prompt_line(&stdin, "draft > ") else { break };

        let req = TurnRequest::new(args.user.clone(), text, args.role);
        let turn = pipeline
            .clone()
            .with_generator(Arc::new(SuppliedDraft::new(draft)))
            .run_turn_with_classification(&req, classification(args), &mut rng)
            .await;

        match turn {
            Ok(outcome) if args.json => {
                println!("{}", serde_json::to_string_pretty(&outcome).unwrap_or_default());
            }
            Ok(outcome) => print_outcome(&outcome, args.verbose),
            Err(e) => println!("{}", format!("turn failed: {}", e).red()),
        }
        turns += 1;
    }

    println!("\nSession ended. Turns: {}", turns);
}

fn prompt_line(stdin: &io::Stdin, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    let title = format!("  Turnguard v{} - {}", VERSION, mode);
    println!("========================================");
    if no_color {
        println!("{}", title);
    } else {
        println!("{}", title.bold());
    }
    println!("========================================");
    println!();
}

fn print_outcome(outcome: &TurnOutcome, verbose: bool) {
    let path = match outcome.path {
        TurnPath::Spoken => "spoken".green(),
        TurnPath::EarlySilence => "silence (early)".cyan(),
        TurnPath::LateSilence => "silence (late)".yellow(),
    };
    println!("reply > {}", outcome.reply.bold());
    println!(
        "  [{}] {} | stage={} | css={}",
        path,
        outcome.silence.reason.code(),
        outcome.stage.stage,
        outcome.css.css
    );
    if let Some(critic) = &outcome.critic {
        if !critic.pass {
            print_critic(critic);
        }
    }
    if let Some(guardrail) = &outcome.guardrail {
        if !guardrail.actions.is_empty() {
            println!("  guardrail: {:?}", guardrail.actions);
        }
    }
    if verbose {
        print_css(&outcome.css, true);
    }
}

fn print_critic(critic: &CriticResult) {
    if critic.pass && critic.issues.is_empty() {
        println!("  critic: {}", "pass".green());
        return;
    }
    let verdict = if critic.pass { "pass".yellow() } else { "fail".red() };
    println!("  critic: {} (severity={})", verdict, critic.severity.as_str());
    for issue in &critic.issues {
        println!("    - {}", issue);
    }
}

fn print_css(css: &CssResult, verbose: bool) {
    let score = format!("{}", css.css);
    let score = match css.css {
        0..=2 => score.red(),
        3..=4 => score.yellow(),
        _ => score.green(),
    };
    println!("  css: {}", score);
    if verbose {
        println!("    sentence:          -{}", css.sentence_penalty);
        println!("    question:          -{}", css.question_penalty);
        println!("    coaching:          -{}", css.coaching_penalty);
        println!("    tone_drift:        -{}", css.tone_drift);
        println!("    escalation:        -{}", css.escalation_penalty);
        println!("    overprocessing:    -{}", css.emotion_overprocessing_penalty);
        println!("    pacing_profile:    -{}", css.pacing_profile_penalty);
    }
}
