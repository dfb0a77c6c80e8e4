use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use clap::Parser;
use habit_config::{Config, ConfigError, ConfigManager};
use habit_session::{GoalSessionSimulator, ReplyScript, SimulatorConfig, StaticSuggestions};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

mod app;
mod commands;
mod logging;
mod ui;

use app::{App, InputMode};
use commands::{run_config_command, Commands};
use logging::init_logging;

#[derive(Parser, Debug, Clone)]
#[command(name = "habit-tui")]
#[command(about = "Consistency30 goal-setting chat")]
#[command(version)]
struct Cli {
    /// Config file path [default: ~/.consistency30/config.json]
    #[arg(long, env = "CONSISTENCY30_CONFIG")]
    config: Option<String>,

    /// Seed for reply selection (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Reply delay in milliseconds (overrides config)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Log level or filter directive (overrides config)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::load(&config_path(&cli)?).await?;

    if let Some(Commands::Config(args)) = cli.command.clone() {
        println!("{}", run_config_command(&manager, args.command).await?);
        return Ok(());
    }

    let config = manager.snapshot().await;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.to_string());
    let log_file = config.logging.file.as_deref().and_then(habit_config::expand_tilde);
    let _log_guard = init_logging(&level, log_file.as_deref())?;

    let session = build_session(&config, &cli)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = run_app(&mut terminal, &mut app).await;
    app.quit();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("UI loop failed: {}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(habit_config::expand_tilde(path).unwrap_or_else(|| PathBuf::from(path))),
        None => Ok(habit_config::default_config_path().ok_or_else(|| {
            ConfigError::InvalidPath("Could not find home directory".to_string())
        })?),
    }
}

fn build_session(config: &Config, cli: &Cli) -> anyhow::Result<GoalSessionSimulator> {
    let delay_ms = cli.delay_ms.unwrap_or(config.simulator.reply_delay_ms);
    let script = ReplyScript::new(config.simulator.replies.iter().cloned())?;
    let suggestions = StaticSuggestions::new(config.suggestions.chips.iter().cloned())?;

    let mut builder = GoalSessionSimulator::builder()
        .config(SimulatorConfig::default().with_reply_delay_ms(delay_ms))
        .script(script)
        .suggestions(suggestions);
    if let Some(seed) = cli.seed.or(config.simulator.seed) {
        builder = builder.seed(seed);
    }
    Ok(builder.build())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let mut last_tick = tokio::time::Instant::now();
    let tick_rate = tokio::time::Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| tokio::time::Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press && handle_key_event(app, key) {
                    return Ok(());
                }
            }
        }

        // Replies land on the runtime's worker threads; pick them up here
        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = tokio::time::Instant::now();
        }
    }
}

/// Returns true when the user asked to quit
fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode() {
        InputMode::Normal => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return true;
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.pick_chip();
            }
            KeyCode::Esc => {
                return true;
            }
            KeyCode::Enter => {
                app.send_message();
            }
            KeyCode::Tab => {
                app.next_chip();
            }
            KeyCode::BackTab => {
                app.prev_chip();
            }
            KeyCode::F(n @ 1..=4) => {
                app.jump_to_stage(i64::from(n));
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                app.push_input(c);
            }
            KeyCode::Backspace => {
                app.pop_input();
            }
            KeyCode::Up => {
                app.scroll_up();
            }
            KeyCode::Down => {
                app.scroll_down();
            }
            KeyCode::PageUp => {
                app.scroll_page_up();
            }
            KeyCode::PageDown => {
                app.scroll_page_down();
            }
            _ => {}
        },
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use habit_session::FixedClock;

    fn app() -> App {
        let session = GoalSessionSimulator::builder()
            .seed(4)
            .clock(FixedClock::new("5:00 PM"))
            .build();
        App::new(session)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
        handle_key_event(app, KeyEvent::new(code, modifiers))
    }

    #[tokio::test]
    async fn test_modified_chars_do_not_type() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(app.input.is_empty());

        press(&mut app, KeyCode::Char('W'), KeyModifiers::SHIFT);
        press(&mut app, KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(app.input, "Wo");
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Esc, KeyModifiers::NONE));
        assert!(press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_function_keys_jump() {
        let mut app = app();
        press(&mut app, KeyCode::F(3), KeyModifiers::NONE);
        assert_eq!(app.snapshot.stage.number(), 3);
        press(&mut app, KeyCode::F(9), KeyModifiers::NONE);
        assert_eq!(app.snapshot.stage.number(), 3);
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = Cli::parse_from(["habit-tui", "--config", "/tmp/c.json", "config", "get", "logging.level"]);
        assert_eq!(config_path(&cli).unwrap(), PathBuf::from("/tmp/c.json"));
        assert!(matches!(
            cli.command,
            Some(Commands::Config(commands::ConfigArgs {
                command: commands::ConfigCommands::Get { .. }
            }))
        ));
    }
}
