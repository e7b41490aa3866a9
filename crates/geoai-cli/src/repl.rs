//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history. The
//! conversation lives only for the session; every turn sends it to the
//! orchestrator, which trims it to the context window.

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use geoai_agent::Orchestrator;
use geoai_core::types::ConversationMessage;

use crate::helpers::{self, ProviderChoice};

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// A line the REPL handles itself instead of sending it as a question.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Exit,
    ListProviders,
    SetProvider(&'a str),
    Ask(&'a str),
}

fn parse_command(input: &str) -> Command<'_> {
    let lower = input.to_lowercase();
    if EXIT_COMMANDS.contains(&lower.as_str()) {
        return Command::Exit;
    }
    if lower == "/providers" {
        return Command::ListProviders;
    }
    if lower == "/provider" {
        return Command::SetProvider("");
    }
    match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) if cmd.eq_ignore_ascii_case("/provider") => {
            Command::SetProvider(rest.trim())
        }
        _ => Command::Ask(input),
    }
}

/// Run the interactive REPL loop.
pub async fn run(orchestrator: Orchestrator, mut preferred: Option<&'static str>) -> Result<()> {
    helpers::print_banner();

    let mut editor = create_editor()?;
    let mut conversation: Vec<ConversationMessage> = Vec::new();

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl-C at the prompt: exit cleanly
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&input);

        match parse_command(trimmed) {
            Command::Exit => {
                println!("\nGoodbye! 👋");
                break;
            }
            Command::ListProviders => print_providers(&orchestrator, preferred),
            Command::SetProvider(hint) => {
                let statuses = orchestrator.registry().list_providers();
                match helpers::match_provider(hint, &statuses) {
                    ProviderChoice::Named(name) => {
                        preferred = Some(name);
                        println!("  {} preferring {name}\n", "✓".green());
                    }
                    ProviderChoice::Auto => {
                        preferred = None;
                        println!("  {} automatic provider order\n", "✓".green());
                    }
                    ProviderChoice::Unknown => {
                        println!("  {} no provider matches \"{hint}\"\n", "✗".red());
                    }
                }
            }
            Command::Ask(question) => {
                debug!(input = question, history = conversation.len(), "processing input");
                conversation.push(ConversationMessage::user(question));

                helpers::print_thinking();
                let ctrl_c = helpers::cancel_on_ctrl_c();
                let result = orchestrator
                    .get_response_cancellable(&conversation, preferred, ctrl_c.token())
                    .await;
                drop(ctrl_c);
                helpers::clear_thinking();

                match result {
                    Some(result) => {
                        helpers::print_response(&result, orchestrator.registry());
                        conversation.push(ConversationMessage::assistant(result.text));
                    }
                    None => {
                        conversation.pop();
                        helpers::print_cancelled();
                    }
                }
            }
        }
    }

    save_history(&mut editor);

    Ok(())
}

fn print_providers(orchestrator: &Orchestrator, preferred: Option<&str>) {
    println!();
    for status in orchestrator.registry().list_providers() {
        let state = if status.available {
            "✓ available".green().to_string()
        } else {
            "· not configured".dimmed().to_string()
        };
        let marker = if preferred == Some(status.name) { " ★" } else { "" };
        println!("  {:<20} {:<10} {}{}", status.display_name, status.name, state, marker);
    }
    println!();
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    geoai_core::utils::get_history_path().join("chat_history")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
