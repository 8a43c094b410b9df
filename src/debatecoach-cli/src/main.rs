//! DebateCoach CLI - debate practice against an AI opponent
//!
//! An interactive terminal host for the debate session controller: argue a
//! topic over a fixed number of rounds, optionally by voice, then get a
//! coaching report.

use clap::Parser;
use colored::Colorize;
use debatecoach_core::audio::narration_filename;
use debatecoach_core::{
    ApiConfig, Config, DebateCallback, DebateController, DebateError, DebateEvent, DebateSetup,
    DraftUpdate, EvaluationReport, FirstSpeaker, NarratedTurn, NarrationQueue, OpenAiDebater,
    Phase, Side, Speaker, WhisperTranscriber,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "debatecoach",
    version,
    about = "Debate Trainer - argue a topic against an AI opponent",
    long_about = "Practice debating against an LLM over OpenAI-compatible APIs, with optional voice input and narration, and get a coaching report at the end."
)]
struct Cli {
    /// The topic to debate (defaults to the configured topic)
    #[arg(value_name = "TOPIC")]
    topic: Option<String>,

    /// Your side of the motion: pro or con
    #[arg(short, long, default_value = "pro", value_name = "SIDE")]
    side: Side,

    /// Who speaks first: user or ai
    #[arg(short, long, default_value = "user", value_name = "SPEAKER")]
    first: FirstSpeaker,

    /// Number of rounds (overrides the config file)
    #[arg(short, long, value_name = "ROUNDS")]
    rounds: Option<u32>,

    /// Chat model name (overrides the config file)
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Narrate AI turns (requires the `kokoro` feature)
    #[arg(long)]
    narrate: bool,

    /// Directory for narration clips
    #[arg(long, default_value = ".", value_name = "DIR")]
    clips_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Argument(&'a str),
    Voice(&'a str),
    ShowDraft,
    Edit(&'a str),
    SendDraft,
    Review,
    Save(&'a str),
    Reset,
    Start,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Argument(line);
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((rest, ""));

    match name {
        "voice" => Command::Voice(arg),
        "draft" => Command::ShowDraft,
        "edit" => Command::Edit(arg),
        "send" => Command::SendDraft,
        "review" => Command::Review,
        "save" => Command::Save(arg),
        "reset" => Command::Reset,
        "start" => Command::Start,
        "help" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(rounds) = cli.rounds {
        config.debate.total_rounds = rounds;
    }
    if let Some(model) = &cli.model {
        config.model.chat_model = model.clone();
    }

    // Get API configuration from environment
    let api_base = env::var("OPENAI_API_BASE")
        .or_else(|_| env::var("OPENAI_BASE_URL"))
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
    let api_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("GEMINI_API_KEY"))
        .unwrap_or_default();
    let api = ApiConfig::new(api_base, api_key);

    let topic = cli
        .topic
        .clone()
        .unwrap_or_else(|| config.debate.default_topic.clone());
    let setup = DebateSetup::new(topic.clone(), cli.side, cli.first);

    let debater = Arc::new(OpenAiDebater::new(&api, config.clone())?);
    let transcriber = Arc::new(WhisperTranscriber::new(
        &api,
        config.model.transcription_model.clone(),
        Duration::from_secs(config.model.request_timeout_secs),
    )?);

    let mut controller = DebateController::new(
        config.practice_format(),
        debater.clone(),
        debater,
    )
    .with_transcriber(transcriber)
    .with_callback(create_console_callback());

    if cli.narrate {
        match start_narration(&config).await {
            Ok((queue, clips)) => {
                spawn_clip_writer(clips, cli.clips_dir.clone(), topic.clone());
                controller = controller.with_narration(queue);
            }
            Err(e) => eprintln!("{} {}", "Narration disabled:".yellow(), e),
        }
    }

    print_header(&topic, &config);
    start_debate(&mut controller, &setup).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt(&controller);
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Argument(text) => {
                println!("{}", "  Thinking...".dimmed());
                if let Err(e) = controller.submit_argument(text).await {
                    report_error(&e);
                }
            }
            Command::Voice(path) => transcribe_file(&mut controller, path).await,
            Command::ShowDraft => print_draft(controller.draft()),
            Command::Edit(text) => {
                controller.set_draft(text);
                print_draft(controller.draft());
            }
            Command::SendDraft => {
                println!("{}", "  Thinking...".dimmed());
                if let Err(e) = controller.submit_draft().await {
                    report_error(&e);
                }
            }
            Command::Review => {
                println!("{}", "  Coach is analyzing your logic...".dimmed());
                if let Err(e) = controller.request_evaluation().await {
                    report_error(&e);
                }
            }
            Command::Save(path) => save_session(&controller, path).await,
            Command::Reset => controller.reset(),
            Command::Start => start_debate(&mut controller, &setup).await,
            Command::Unknown(name) => {
                eprintln!("{} unknown command ':{}' (try :help)", "Error:".red().bold(), name)
            }
        }
        print_prompt(&controller);
    }

    println!();
    println!("{}", "  Goodbye.".bright_green().bold());
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn start_debate(controller: &mut DebateController, setup: &DebateSetup) {
    if setup.first_speaker == FirstSpeaker::Ai {
        println!("{}", "  AI is formulating its opening argument...".dimmed());
    }
    if let Err(e) = controller.start(setup.clone()).await {
        report_error(&e);
        if matches!(e, DebateError::ConfigError(_)) {
            eprintln!(
                "{}",
                "Set OPENAI_API_KEY (or GEMINI_API_KEY), then type :start.".yellow()
            );
        }
    }
}

#[cfg(feature = "kokoro")]
async fn start_narration(
    config: &Config,
) -> Result<(NarrationQueue, UnboundedReceiver<NarratedTurn>), Box<dyn std::error::Error>> {
    println!("{}", "  Loading narration voice...".dimmed());
    let narrator = debatecoach_core::KokoroNarrator::new(&config.voices).await?;
    Ok(NarrationQueue::spawn(Arc::new(narrator)))
}

#[cfg(not(feature = "kokoro"))]
async fn start_narration(
    _config: &Config,
) -> Result<(NarrationQueue, UnboundedReceiver<NarratedTurn>), Box<dyn std::error::Error>> {
    Err("this build does not include the `kokoro` feature".into())
}

/// Write each narration clip to `dir` as it arrives.
fn spawn_clip_writer(mut clips: UnboundedReceiver<NarratedTurn>, dir: PathBuf, topic: String) {
    tokio::spawn(async move {
        let mut seq = 0;
        while let Some(clip) = clips.recv().await {
            let audio = match clip.audio {
                Ok(audio) => audio,
                Err(e) => {
                    warn!(round = clip.round, error = %e, "Skipping narration clip");
                    continue;
                }
            };
            seq += 1;
            let path = dir.join(narration_filename(&topic, seq));
            match tokio::fs::write(&path, audio).await {
                Ok(()) => info!(path = %path.display(), round = clip.round, "Narration saved"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to save narration"),
            }
        }
    });
}

async fn transcribe_file(controller: &mut DebateController, path: &str) {
    if path.is_empty() {
        eprintln!("{} usage: :voice <file.wav>", "Error:".red().bold());
        return;
    }
    let audio = match tokio::fs::read(path).await {
        Ok(audio) => audio,
        Err(e) => {
            eprintln!("{} cannot read {}: {}", "Error:".red().bold(), path, e);
            return;
        }
    };

    println!("{}", "  Transcribing audio...".dimmed());
    match controller.transcribe_into_draft(&audio).await {
        Ok(DraftUpdate::Transcribed(_)) => {
            println!(
                "{}",
                "  Audio transcribed! Edit with :edit, submit with :send.".green()
            );
            print_draft(controller.draft());
        }
        Ok(DraftUpdate::NoSpeech) => println!("{}", "  No speech detected.".yellow()),
        Ok(DraftUpdate::Duplicate) => {
            println!("{}", "  Same recording as before; draft unchanged.".yellow())
        }
        Err(e) => report_error(&e),
    }
}

async fn save_session(controller: &DebateController, path: &str) {
    let Some(session) = controller.session() else {
        eprintln!("{} no debate to save", "Error:".red().bold());
        return;
    };
    let path = if path.is_empty() { "debate.json" } else { path };
    let result = match serde_json::to_vec_pretty(session) {
        Ok(json) => tokio::fs::write(path, json).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match result {
        Ok(()) => println!("  Saved transcript to {}", path.bright_white()),
        Err(e) => eprintln!("{} failed to save {}: {}", "Error:".red().bold(), path, e),
    }
}

fn report_error(error: &DebateError) {
    match error {
        DebateError::ValidationError(msg) => eprintln!("{} {}", "Warning:".yellow().bold(), msg),
        other => eprintln!("{} {}", "Error:".red().bold(), other),
    }
}

fn print_header(topic: &str, config: &Config) {
    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!("{}", "  ⚖  Debate Trainer".bright_blue().bold());
    println!("{}", "═".repeat(70).bright_blue());
    println!();
    println!("{} {}", "Topic:".bold(), topic.bright_white());
    println!(
        "{} {} ({} rounds)",
        "Model:".bold(),
        config.model.chat_model.dimmed(),
        config.debate.total_rounds.max(1)
    );
    println!("{}", "Type your argument and press Enter. :help lists commands.".dimmed());
    println!("{}", "─".repeat(70).dimmed());
}

fn print_help() {
    println!("  {}  submit an argument", "<text>".bright_cyan());
    println!("  {}  transcribe a recording into the draft", ":voice <file.wav>".bright_cyan());
    println!("  {}  show the draft", ":draft".bright_cyan());
    println!("  {}  replace the draft", ":edit <text>".bright_cyan());
    println!("  {}  submit the draft", ":send".bright_cyan());
    println!("  {}  get coach feedback (after the last round)", ":review".bright_cyan());
    println!("  {}  save the transcript as JSON", ":save [file.json]".bright_cyan());
    println!("  {}  end the debate / start again", ":reset  :start".bright_cyan());
    println!("  {}  leave", ":quit".bright_cyan());
}

fn print_draft(draft: &str) {
    if draft.trim().is_empty() {
        println!("  {}", "(draft is empty)".dimmed());
    } else {
        println!("  {} {}", "Draft:".bold(), draft);
    }
}

fn print_prompt(controller: &DebateController) {
    let label = match (controller.phase(), controller.session()) {
        (Phase::Active, Some(s)) => s.format().round_label(s.current_round()),
        (Phase::Finished, _) => ":review for feedback".to_string(),
        (Phase::Reviewed, _) => ":reset to end".to_string(),
        _ => ":start to begin".to_string(),
    };
    println!("{} ", format!("[{}] >", label).bright_cyan());
}

/// Create a callback that prints debate events to the console.
fn create_console_callback() -> DebateCallback {
    Box::new(move |event| match event {
        DebateEvent::DebateStarted {
            user_side,
            ai_side,
            ..
        } => {
            println!(
                "  You argue {}, the AI argues {}.",
                user_side.display_name().yellow(),
                ai_side.display_name().yellow()
            );
        }
        DebateEvent::RoundStart {
            round,
            total_rounds,
        } => {
            println!();
            println!(
                "{}",
                format!("  Your turn (Round {} / {})", round, total_rounds)
                    .bright_magenta()
                    .bold()
            );
        }
        DebateEvent::TurnRecorded(turn) if turn.speaker == Speaker::Ai => {
            println!();
            println!(
                "{} {} {}",
                "▶".bright_cyan(),
                "AI".bright_cyan().bold(),
                format!("({}, Round {})", turn.side, turn.round).yellow()
            );
            for line in textwrap(&turn.text, 66).lines() {
                println!("  {}", line);
            }
        }
        DebateEvent::TurnRecorded(_) => {}
        DebateEvent::DebateFinished => {
            println!();
            println!("{}", "═".repeat(70).bright_green());
            println!("{}", "  🏁 Debate Complete".bright_green().bold());
            println!("{}", "═".repeat(70).bright_green());
        }
        DebateEvent::ReviewReady(report) => print_report(&report),
        DebateEvent::SessionReset => {
            println!("{}", "  Debate ended. Type :start for a new one.".dimmed());
        }
    })
}

fn print_report(report: &EvaluationReport) {
    println!();
    println!("{}", "  📊 Performance Review".bright_blue().bold());
    if let Some(score) = report.overall_score() {
        println!("  {} {}/100", "Overall Score:".bold(), score.to_string().bright_white());
    }
    if let Some(text) = report.text() {
        for line in text.lines() {
            println!("  {}", line);
        }
    }
}

/// Simple text wrapping function.
fn textwrap(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut current_line_len = 0;

    for word in text.split_whitespace() {
        if current_line_len + word.len() + 1 > width && current_line_len > 0 {
            result.push('\n');
            current_line_len = 0;
        }
        if current_line_len > 0 {
            result.push(' ');
            current_line_len += 1;
        }
        result.push_str(word);
        current_line_len += word.len();
    }

    result
}
