//! Interactive shell.
//!
//! Sign-in runs in the foreground because the consent flow reads from the
//! terminal. Uploads and fetches are spawned and report when they settle, so
//! several can be in flight at once.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor, Helper};
use snacksy_application::{AppSnapshot, SnacksyApp};
use snacksy_infrastructure::load_image;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum ShellCommand {
    Signin,
    Signout,
    Select,
    Upload,
    Activity,
    Recommend,
    Status,
    Help,
    #[strum(to_string = "quit", serialize = "exit")]
    Quit,
}

impl ShellCommand {
    fn usage(self) -> &'static str {
        match self {
            ShellCommand::Signin => "signin            Sign in with Google",
            ShellCommand::Signout => "signout           Sign out and clear everything",
            ShellCommand::Select => "select <path>     Choose a food photo",
            ShellCommand::Upload => "upload            Analyze the selected photo",
            ShellCommand::Activity => "activity          Fetch my liked YouTube videos",
            ShellCommand::Recommend => "recommend         Get video recommendations",
            ShellCommand::Status => "status            Show everything",
            ShellCommand::Help => "help              Show this list",
            ShellCommand::Quit => "quit              Leave the shell",
        }
    }
}

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Command(ShellCommand, Option<String>),
    Unknown(String),
    Empty,
}

fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim().to_string())),
        None => (line, None),
    };
    match ShellCommand::from_str(word) {
        Ok(command) => Input::Command(command, rest.filter(|r| !r.is_empty())),
        Err(_) => Input::Unknown(word.to_string()),
    }
}

/// Completion for command names, and for file names after `select`.
struct ShellHelper {
    commands: Vec<String>,
    files: FilenameCompleter,
}

impl ShellHelper {
    fn new() -> Self {
        Self {
            commands: ShellCommand::iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
            files: FilenameCompleter::new(),
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        if head.starts_with("select ") {
            return self.files.complete(line, pos, ctx);
        }
        if head.contains(' ') {
            return Ok((pos, vec![]));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(head))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match parse_line(line) {
            Input::Command(..) => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let head = &line[..pos];
        if head.is_empty() || head.contains(' ') {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(head) && cmd.len() > head.len())
            .map(|cmd| cmd[head.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    for command in ShellCommand::iter() {
        println!("  {}", command.usage());
    }
}

pub async fn run(app: Arc<SnacksyApp>) -> Result<()> {
    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ShellHelper::new()));

    render::header();
    render::session(&app.snapshot().await);
    render::info("Type 'help' for commands, 'quit' to exit.");
    println!();

    loop {
        let line = match rl.readline("snacksy> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                render::info("^C (type 'quit' to exit)");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!("[Shell] Readline error: {}", e);
                break;
            }
        };

        let (command, argument) = match parse_line(&line) {
            Input::Empty => continue,
            Input::Unknown(word) => {
                render::failure(&format!("Unknown command '{}'. Type 'help'.", word));
                continue;
            }
            Input::Command(command, argument) => (command, argument),
        };
        let _ = rl.add_history_entry(line.as_str());

        if let Some(reason) = unavailable(command, &app.snapshot().await) {
            render::failure(&format!("'{}' is unavailable: {}.", command.as_ref(), reason));
            continue;
        }

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => print_help(),
            ShellCommand::Status => render::all(&app.snapshot().await),
            ShellCommand::Signin => {
                let _ = app.sign_in().await;
                render::session(&app.snapshot().await);
            }
            ShellCommand::Signout => {
                app.sign_out().await;
                render::info("Signed out.");
            }
            ShellCommand::Select => select(&app, argument).await,
            ShellCommand::Upload => spawn_upload(&app),
            ShellCommand::Activity => spawn_activity(&app),
            ShellCommand::Recommend => spawn_recommendations(&app),
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

/// Why `command` cannot run right now, if it cannot. Mirrors the disabled
/// buttons of the graphical front end.
fn unavailable(command: ShellCommand, snapshot: &AppSnapshot) -> Option<&'static str> {
    match command {
        ShellCommand::Upload if snapshot.uploading => Some("an upload is already in progress"),
        ShellCommand::Activity if !snapshot.can_fetch_activity() => Some(if snapshot.is_signed_in() {
            "activity is already loading"
        } else {
            "sign in first"
        }),
        ShellCommand::Recommend if !snapshot.can_recommend() => Some(if !snapshot.is_signed_in() {
            "sign in first"
        } else if snapshot.detected_tags.is_empty() {
            "upload a food photo first"
        } else {
            "recommendations are already loading"
        }),
        _ => None,
    }
}

async fn select(app: &SnacksyApp, argument: Option<String>) {
    let Some(path) = argument else {
        render::failure("Usage: select <path>");
        return;
    };
    match load_image(&PathBuf::from(path)).await {
        Ok(image) => {
            let name = image.file_name.clone();
            app.select_file(image).await;
            render::info(&format!("Selected {}.", name));
        }
        Err(e) => render::failure(&format!("Could not read image: {}", e)),
    }
}

fn spawn_upload(app: &Arc<SnacksyApp>) {
    render::info("Analyzing...");
    let app = Arc::clone(app);
    tokio::spawn(async move {
        let _ = app.upload().await;
        println!();
        render::tagging(&app.snapshot().await);
    });
}

fn spawn_activity(app: &Arc<SnacksyApp>) {
    render::info("Loading activity...");
    let app = Arc::clone(app);
    tokio::spawn(async move {
        let _ = app.fetch_activity().await;
        println!();
        render::activity(&app.snapshot().await);
    });
}

fn spawn_recommendations(app: &Arc<SnacksyApp>) {
    render::info("Getting recommendations...");
    let app = Arc::clone(app);
    tokio::spawn(async move {
        let _ = app.fetch_recommendations().await;
        println!();
        render::recommendations(&app.snapshot().await);
    });
}
