pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wordo::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    dictionary::DictionaryLoader,
    input::{InputAction, WordInput},
    letters,
    persistence::Persistence,
    runtime::{CrosstermEventSource, GameEvent, Runner},
    stats::{self, StatsAggregate},
    Clock, DateKey, Dictionary, GameError, GameSession, LetterDraw, LocalClock, SqliteStore,
    SubmitOutcome,
};

use crate::ui::screen::current_screen;

/// How often a quiet loop checks the clock for a new day
const TICK_RATE_MS: u64 = 1000;

/// daily five-letter word puzzle for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Every day brings five letters, the same for every player. Make dictionary words from them; each repeated letter is worth 10 points. Ten attempts a day."
)]
pub struct Cli {
    /// play the puzzle for this day instead of today (YYYY-MM-DD)
    #[clap(short = 'd', long)]
    date: Option<DateKey>,

    /// practice on random letters; nothing is saved
    #[clap(short = 'p', long)]
    practice: bool,

    /// how letters are drawn
    #[clap(long, value_enum)]
    draw: Option<LetterDraw>,

    /// newline separated word list to use instead of the bundled one
    #[clap(long = "dict")]
    dictionary: Option<PathBuf>,

    /// database file holding progress and history
    #[clap(long)]
    db: Option<PathBuf>,

    /// config file to read (and write with --save-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// print lifetime stats and exit
    #[clap(long)]
    stats: bool,

    /// print the day's letters and exit
    #[clap(long)]
    letters: bool,

    /// save the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line values win over the config file
    fn merge_into(&self, cfg: &mut Config) {
        if let Some(draw) = self.draw {
            cfg.letter_draw = draw;
        }
        if let Some(ref path) = self.dictionary {
            cfg.dictionary_path = Some(path.clone());
        }
        if let Some(ref path) = self.db {
            cfg.db_path = Some(path.clone());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum AppClock {
    Local(LocalClock),
    Fixed(DateKey),
}

impl Clock for AppClock {
    fn today(&self) -> DateKey {
        match self {
            AppClock::Local(clock) => clock.today(),
            AppClock::Fixed(date) => *date,
        }
    }
}

pub type Game = GameSession<SqliteStore, Dictionary, AppClock>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Playing,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Good,
    Bad,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Status line after a submission. A failed save still reports the
    /// outcome that was recorded in memory.
    fn for_submission(
        result: &Result<SubmitOutcome, GameError>,
        recorded: Option<&SubmitOutcome>,
    ) -> Self {
        match result {
            Ok(outcome @ SubmitOutcome::Accepted(_)) => Self::new(outcome.to_string(), Tone::Good),
            Ok(outcome) => Self::new(outcome.to_string(), Tone::Bad),
            Err(e) => match recorded {
                Some(outcome) => Self::new(
                    format!("{outcome} (progress may not be saved: {e})"),
                    Tone::Warning,
                ),
                None => Self::new(format!("Progress may not be saved: {e}"), Tone::Warning),
            },
        }
    }
}

pub struct App {
    pub game: Game,
    pub input: WordInput,
    pub state: AppState,
    pub message: Option<Message>,
    pub stats: Option<StatsAggregate>,
    pub stats_scroll: usize,
}

impl App {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            input: WordInput::new(),
            state: AppState::Playing,
            message: None,
            stats: None,
            stats_scroll: 0,
        }
    }

    fn submit(&mut self, word: String) {
        let result = self.game.submit(&word);
        self.message = Some(Message::for_submission(&result, self.game.last_outcome()));
    }

    fn toggle_stats(&mut self) {
        match self.state {
            AppState::Stats => self.state = AppState::Playing,
            AppState::Playing => match self.game.stats() {
                Ok(stats) => {
                    self.stats = Some(stats);
                    self.stats_scroll = 0;
                    self.state = AppState::Stats;
                }
                Err(e) => {
                    self.message = Some(Message::new(format!("Stats unavailable: {e}"), Tone::Warning))
                }
            },
        }
    }

    fn on_day_changed(&mut self) {
        match self.game.rollover() {
            Ok(true) => {
                self.input.take();
                self.stats = None;
                self.state = AppState::Playing;
                self.message = Some(Message::new(
                    format!("A new day: {}", self.game.pool()),
                    Tone::Info,
                ));
            }
            Ok(false) => {}
            Err(e) => {
                self.message = Some(Message::new(
                    format!("Progress may not be saved: {e}"),
                    Tone::Warning,
                ))
            }
        }
    }

    /// Returns false once the user asks to quit
    fn on_key(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Quit => return false,
            InputAction::Submit(word) if self.state == AppState::Playing => self.submit(word),
            InputAction::ToggleStats => self.toggle_stats(),
            InputAction::ScrollUp => self.stats_scroll = self.stats_scroll.saturating_sub(1),
            InputAction::ScrollDown => self.stats_scroll += 1,
            InputAction::Edited => self.message = None,
            InputAction::Submit(_) | InputAction::Ignored => {}
        }
        true
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    // the terminal belongs to the ui, so logs go to a file
    let Ok(log_file) = std::fs::File::create(&path) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
}

fn print_stats(stats: &StatsAggregate) {
    println!("Total Games Played: {}", stats.games_played);
    println!("Lifetime Points: {}", stats.lifetime_points);
    println!("Longest Streak: {}", stats.current_streak);
    println!("Total Attempts: {}", stats.total_attempts);
    if let Some(best) = stats.best_day {
        println!("Best Day: {} ({} points)", best.date, best.points);
    }
    if let Some(last) = stats.last_played {
        println!("Last Played: {last}");
    }
    if !stats.top_words.is_empty() {
        println!("High Scores:");
        for (rank, top) in stats.top_words.iter().enumerate() {
            println!(
                "{:>3}. {:<16} {:>4} points  {}",
                rank + 1,
                top.word.to_uppercase(),
                top.score,
                top.date
            );
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let config_store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let mut config = config_store.load();
    cli.merge_into(&mut config);
    if cli.save_config {
        config_store.save(&config)?;
        info!(path = %config_store.path().display(), "config saved");
    }

    let clock = match cli.date {
        Some(date) => AppClock::Fixed(date),
        None => AppClock::Local(LocalClock),
    };

    if cli.letters {
        println!("{}", letters::generate(&clock.today(), config.letter_draw));
        return Ok(());
    }

    let store = SqliteStore::open(config.db_path())?;

    if cli.stats {
        let sessions = Persistence::new(store).all_sessions()?;
        print_stats(&stats::aggregate(&sessions));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    eprintln!("Loading dictionary...");
    let dictionary = match DictionaryLoader::spawn(config.dictionary_source())
        .wait(config.dictionary_timeout())
    {
        Ok(dict) => dict,
        Err(e) => {
            error!(error = %e, "cannot start without a dictionary");
            eprintln!("{e}");
            eprintln!("Check --dict or try again; the bundled list is used when no path is set.");
            std::process::exit(1);
        }
    };

    let game = if cli.practice {
        GameSession::practice(store, dictionary, clock, config.letter_draw)
    } else {
        GameSession::open(store, dictionary, clock, config.letter_draw)?
    };
    let mut app = App::new(game);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, clock);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if app.game.is_unsaved() {
        if let Err(e) = app.game.retry_save() {
            warn!(error = %e, "exiting with unsaved progress");
            eprintln!("Warning: today's progress could not be saved: {e}");
        }
    }

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    clock: AppClock,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        clock,
        Duration::from_millis(TICK_RATE_MS),
    );
    // the day may have turned while the dictionary loaded
    app.on_day_changed();

    loop {
        terminal.draw(|f| current_screen(&app.state).render(app, f))?;

        match runner.step() {
            GameEvent::Tick | GameEvent::Resize => {}
            GameEvent::DayChanged(_) => app.on_day_changed(),
            GameEvent::InputClosed => {
                warn!("terminal input closed");
                break;
            }
            GameEvent::Key(key) => {
                let action = app.input.handle_key(key);
                if !app.on_key(action) {
                    break;
                }
            }
        }
    }

    info!("quit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordo::session::{Rejection, ScoredWord};
    use wordo::StoreError;

    fn save_error() -> GameError {
        GameError::persistence(
            "wordo.played.2025-09-15",
            StoreError::Io(io::Error::other("disk full")),
        )
    }

    #[test]
    fn accepted_word_message() {
        let outcome = SubmitOutcome::Accepted(ScoredWord {
            word: "tint".into(),
            score: 10,
        });
        let msg = Message::for_submission(&Ok(outcome.clone()), Some(&outcome));
        assert_eq!(msg.text, "TINT +10 pts");
        assert_eq!(msg.tone, Tone::Good);
    }

    #[test]
    fn failed_save_still_shows_outcome() {
        let outcome = SubmitOutcome::Accepted(ScoredWord {
            word: "tint".into(),
            score: 10,
        });
        let msg = Message::for_submission(&Err(save_error()), Some(&outcome));
        assert_eq!(msg.tone, Tone::Warning);
        assert!(msg.text.starts_with("TINT +10 pts"));
        assert!(msg.text.contains("disk full"));
    }

    #[test]
    fn failed_save_after_exhaustion_names_it() {
        let outcome = SubmitOutcome::Rejected(Rejection::AttemptsExhausted);
        let msg = Message::for_submission(&Err(save_error()), Some(&outcome));
        assert!(msg.text.starts_with("No attempts left today"));
        assert!(msg.text.contains("progress may not be saved"));
    }

    #[test]
    fn failed_save_without_outcome() {
        let msg = Message::for_submission(&Err(save_error()), None);
        assert!(msg.text.starts_with("Progress may not be saved"));
    }
}
