use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use burger_core::config::{self, GameConfig};
use burger_core::{
    BurgerError, DrawingArtifact, GameState, SessionStatus, UnlockOutcome, ValidationOutcome,
};

const COMMANDS: &[&str] = &[
    "/start", "/status", "/draw", "/push", "/serve", "/reset", "/menu", "/help",
];

/// Burger Rush: draw the ingredients, stack the burger, serve the customer.
#[derive(Parser, Debug)]
#[command(name = "burger-rush", version, about)]
struct Args {
    /// Path to a config.toml (defaults to ~/.config/burger-rush/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for order dealing, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Never call the AI judge; every drawing gets a random score
    #[arg(long)]
    offline: bool,
}

/// Line editor helper that knows the current order.
///
/// Completes slash commands, then component names after `/draw` (still to unlock)
/// and `/push` (unlocked and not yet stacked). Refresh with [`CliHelper::sync`]
/// after every command.
#[derive(Default)]
struct CliHelper {
    draw_targets: Vec<String>,
    push_targets: Vec<String>,
}

impl CliHelper {
    fn sync(&mut self, game: &GameState) {
        self.draw_targets = game.remaining_to_unlock();
        self.push_targets = game
            .order()
            .map(|order| {
                order
                    .available_components()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Returns where the word being completed starts and the names that fit it.
    fn candidates<'a>(&'a self, line: &str) -> (usize, Vec<&'a str>) {
        let Some((command, rest)) = line.split_once(' ') else {
            if !line.starts_with('/') {
                return (0, Vec::new());
            }
            let commands = COMMANDS
                .iter()
                .copied()
                .filter(|cmd| cmd.starts_with(line))
                .collect();
            return (0, commands);
        };

        let targets = match command {
            "/draw" => &self.draw_targets,
            "/push" => &self.push_targets,
            _ => return (0, Vec::new()),
        };
        let start = line.len() - rest.trim_start().len();
        let typed = &line[start..];
        let names = targets
            .iter()
            .map(String::as_str)
            .filter(|name| name.starts_with(typed))
            .collect();
        (start, names)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(&line[..pos]);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let (command, rest) = line.split_at(line.find(' ').unwrap_or(line.len()));
        let command = if COMMANDS.contains(&command) {
            command.bright_cyan()
        } else {
            command.red()
        };
        Owned(format!("{command}{rest}"))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, names) = self.candidates(line);
        let typed = &line[start..];
        names
            .into_iter()
            .find(|name| name.len() > typed.len())
            .map(|name| name[typed.len()..].to_string())
    }
}

impl Validator for CliHelper {}

/// Writes logs to a daily file so they never interleave with the game screen.
fn init_tracing() -> Result<WorkerGuard> {
    let log_dir = config::config_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "burger-rush.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => GameConfig::load_from_path(path)?,
        None => GameConfig::load()?,
    };
    Ok(config)
}

fn read_drawing(path: &Path) -> Result<DrawingArtifact> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read drawing {}", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(DrawingArtifact::new(bytes, mime.essence_str()))
}

fn print_help() {
    println!("{}", "How to play".bright_yellow().bold());
    println!("{}", "  /start                      take the first customer's order".bright_black());
    println!("{}", "  /draw <component> <image>   submit a drawing to unlock a component".bright_black());
    println!("{}", "  /push <component>           stack an unlocked component".bright_black());
    println!("{}", "  /serve                      hand the burger to the customer".bright_black());
    println!("{}", "  /status                     show order, stack and time left".bright_black());
    println!("{}", "  /menu                       list every recipe".bright_black());
    println!("{}", "  /reset                      start over from zero".bright_black());
    println!("{}", "  quit                        leave the game".bright_black());
    println!(
        "{}",
        "Every burger starts and ends with a bun. Better drawings make happier customers!"
            .bright_black()
    );
}

fn print_menu(game: &GameState) {
    for recipe in game.catalog().recipes() {
        println!(
            "{} {}",
            format!("{}:", recipe.name).bright_magenta(),
            recipe.components.join(" / ")
        );
    }
}

fn print_status(game: &GameState) {
    let snapshot = game.snapshot();
    match snapshot.session_status {
        SessionStatus::Idle => {
            println!("{}", "No customer yet. Type /start to take an order.".yellow());
            return;
        }
        SessionStatus::Expired => {
            print_summary(game);
            return;
        }
        SessionStatus::Active => {}
    }

    if let Some(name) = &snapshot.order_name {
        println!("{} {}", "Order:".bright_yellow(), name.bold());
    }
    println!("{} {}s", "Time left:".bright_yellow(), snapshot.remaining_seconds);
    if !snapshot.remaining_to_unlock.is_empty() {
        println!(
            "{} {}",
            "Still to draw:".bright_yellow(),
            snapshot.remaining_to_unlock.join(", ")
        );
    }
    if let Some(order) = game.order() {
        let available = order.available_components();
        if !available.is_empty() {
            println!("{} {}", "Ready to stack:".bright_yellow(), available.join(", "));
        }
    }
    println!(
        "{} [{}]",
        "Stack:".bright_yellow(),
        snapshot.assembly_contents.join(", ")
    );
    if let Some(score) = snapshot.last_judgment_score {
        println!("{} {}/10", "Last drawing:".bright_yellow(), score);
    }
    println!(
        "{} {} customers, {} satisfaction",
        "Served:".bright_yellow(),
        snapshot.customers_served,
        snapshot.cumulative_satisfaction
    );
}

fn print_summary(game: &GameState) {
    let summary = game.summary();
    println!("{}", "Time's up!".bright_green().bold());
    println!(
        "{}",
        format!(
            "Customers served: {}, total satisfaction: {}",
            summary.customers_served, summary.cumulative_satisfaction
        )
        .bright_green()
    );
    println!("{}", "Type /reset to play again.".bright_black());
}

fn print_rejection(err: &BurgerError) {
    match err {
        BurgerError::SessionExpired => print_line_warn("Time is up: only /reset works now."),
        other => print_line_warn(&other.to_string()),
    }
}

fn print_line_warn(message: &str) {
    println!("{}", message.yellow());
}

/// Splits `/draw <component> <image>`; the component may contain spaces.
fn parse_draw_args(args: &str) -> Option<(&str, &str)> {
    let (component, path) = args.trim().rsplit_once(' ')?;
    let component = component.trim();
    if component.is_empty() || path.is_empty() {
        return None;
    }
    Some((component, path))
}

async fn handle_command(game: &mut GameState, line: &str) -> Result<()> {
    let (command, args) = line.split_once(' ').unwrap_or((line, ""));
    let args = args.trim();

    match command {
        "/help" => print_help(),
        "/menu" => print_menu(game),
        "/status" => print_status(game),
        "/start" => match game.start_session() {
            Ok(order) => {
                println!("{} {}", "New customer! Order:".bright_green(), order.name().bold());
                print_status(game);
            }
            Err(err) => print_rejection(&err),
        },
        "/draw" => {
            let Some((component, path)) = parse_draw_args(args) else {
                print_line_warn("Usage: /draw <component> <image-path>");
                return Ok(());
            };
            let drawing = match read_drawing(Path::new(path)) {
                Ok(drawing) => drawing,
                Err(err) => {
                    print_line_warn(&format!("{err:#}"));
                    return Ok(());
                }
            };
            println!("{}", "The judge is looking at your drawing...".bright_black());
            match game.submit_drawing(component, &drawing).await {
                Ok(result) => {
                    println!(
                        "{} {}/10",
                        "AI score:".bright_blue(),
                        result.judgment.score
                    );
                    for line in result.judgment.comment.lines() {
                        println!("{}", line.bright_blue());
                    }
                    match result.unlock {
                        UnlockOutcome::Granted { .. } => {
                            println!("{}", format!("{component} is ready to stack!").green())
                        }
                        UnlockOutcome::Denied { threshold, .. } => print_line_warn(&format!(
                            "Not good enough ({threshold} needed). Try drawing {component} again."
                        )),
                    }
                }
                Err(err) => print_rejection(&err),
            }
        }
        "/push" => {
            if args.is_empty() {
                print_line_warn("Usage: /push <component>");
                return Ok(());
            }
            match game.push_component(args) {
                Ok(()) => println!(
                    "{} [{}]",
                    "Stack:".bright_yellow(),
                    game.assembly().join(", ")
                ),
                Err(err) => print_rejection(&err),
            }
        }
        "/serve" => match game.submit_assembly() {
            Ok(ValidationOutcome::Accepted { satisfaction }) => {
                println!(
                    "{}",
                    format!("Customer satisfaction: {satisfaction}!").bright_green().bold()
                );
                announce_next_order(game);
            }
            Ok(ValidationOutcome::Rejected { reason }) => {
                print_line_warn(reason.message());
                print_line_warn("The customer left.");
                announce_next_order(game);
            }
            Err(err) => print_rejection(&err),
        },
        "/reset" => {
            game.reset_session();
            println!("{}", "Game reset. Type /start to play.".bright_green());
        }
        _ => println!("{}", "Unknown command, try /help".bright_black()),
    }

    Ok(())
}

fn announce_next_order(game: &GameState) {
    if let Some(name) = game.order_name() {
        println!("{} {}", "Next customer! Order:".bright_green(), name.bold());
    }
}

/// The main entry point for the Burger Rush REPL.
///
/// Sets up logging, loads configuration, picks a judge and then feeds each
/// line typed by the player to the game state as a command.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing()?;

    // ===== Game Initialization =====
    let config = load_config(args.config.as_deref())?;
    let catalog = Arc::new(config.catalog()?);
    let judge = burger_interaction::select_judge(&config.oracle, args.offline);
    println!(
        "{}",
        format!("Judge: {}", judge.name()).bright_black()
    );

    let mut game = GameState::new(&config, catalog, judge);
    if let Some(seed) = args.seed {
        game = game.with_seed(seed);
    }
    tracing::info!(session_id = %game.id(), "Game created");

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    let mut helper = CliHelper::default();
    helper.sync(&game);
    rl.set_helper(Some(helper));

    println!("{}", "=== Burger Rush ===".bright_magenta().bold());
    print_help();
    println!();

    let mut announced_expiry = false;

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if game.is_expired() && !announced_expiry && trimmed != "/reset" {
                    print_summary(&game);
                    announced_expiry = true;
                    continue;
                }

                handle_command(&mut game, trimmed).await?;
                if let Some(helper) = rl.helper_mut() {
                    helper.sync(&game);
                }

                if game.session_status() != SessionStatus::Expired {
                    announced_expiry = false;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!(
        session_id = %game.id(),
        customers = game.summary().customers_served,
        satisfaction = game.summary().cumulative_satisfaction,
        "Game finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draw_args_allows_spaces_in_component() {
        assert_eq!(
            parse_draw_args("shrimp patty ./drawings/shrimp.png"),
            Some(("shrimp patty", "./drawings/shrimp.png"))
        );
        assert_eq!(parse_draw_args("bun bun.png"), Some(("bun", "bun.png")));
        assert_eq!(parse_draw_args("bun.png"), None);
        assert_eq!(parse_draw_args(""), None);
    }

    fn helper() -> CliHelper {
        CliHelper {
            draw_targets: vec!["patty".into(), "shrimp patty".into()],
            push_targets: vec!["bun".into()],
        }
    }

    #[test]
    fn test_completes_commands() {
        let helper = helper();
        assert_eq!(helper.candidates("/s"), (0, vec!["/start", "/status", "/serve"]));
        assert_eq!(helper.candidates("hello"), (0, vec![]));
    }

    #[test]
    fn test_completes_components_per_command() {
        let helper = helper();
        assert_eq!(helper.candidates("/draw sh"), (6, vec!["shrimp patty"]));
        assert_eq!(helper.candidates("/draw "), (6, vec!["patty", "shrimp patty"]));
        assert_eq!(helper.candidates("/push  b"), (7, vec!["bun"]));
        assert_eq!(helper.candidates("/push p"), (6, vec![]));
        assert_eq!(helper.candidates("/serve x"), (0, vec![]));
    }

    #[test]
    fn test_sync_tracks_active_order() {
        let config = GameConfig::default();
        let judge = Arc::new(burger_interaction::OfflineJudge::new("test"));
        let mut game = GameState::new(&config, Arc::new(config.catalog().unwrap()), judge)
            .with_seed(3);
        let mut helper = CliHelper::default();

        helper.sync(&game);
        assert!(helper.draw_targets.is_empty());

        game.start_session().unwrap();
        helper.sync(&game);
        assert_eq!(helper.draw_targets, game.remaining_to_unlock());
        assert!(helper.push_targets.is_empty());
    }
}
