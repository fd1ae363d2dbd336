use clap::{error::ErrorKind, ArgAction, Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use quiver::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    report,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    scoring::{format_for_export, ArrowsPerSet, BowType, Distance, SessionConfig, SetCount},
    store::{FileSessionStore, SessionStore},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin, BufRead, Write},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{info, Level};

const POLL_INTERVAL_MS: u64 = 250;

/// terminal archery score keeper
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Record archery sessions arrow by arrow, then review totals, the score distribution and per-set notes. Without a command the interactive session list opens."
)]
pub struct Cli {
    /// sessions file to read and write
    #[clap(long, global = true)]
    data_file: Option<PathBuf>,

    /// file remembering the shape of the last saved session
    #[clap(long, global = true)]
    config_file: Option<PathBuf>,

    /// more log output (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// start recording a new session
    Record(RecordArgs),
    /// list saved sessions, newest first
    List,
    /// show a saved session: totals, distribution, sets and notes
    Show { id: String },
    /// print a saved session in the plain-text export format
    Export { id: String },
    /// delete a saved session
    Delete {
        id: String,

        /// skip the confirmation question
        #[clap(short = 'y', long)]
        yes: bool,
    },
}

/// Overrides for the remembered session shape
#[derive(Args, Debug, Clone, Default)]
struct RecordArgs {
    /// bow type: compound or recurve
    #[clap(short = 'b', long)]
    bow: Option<BowType>,

    /// shooting distance: 18m, 30m, 50m, 70m or 90m
    #[clap(short = 'd', long)]
    distance: Option<Distance>,

    /// number of sets: 3, 4, 5, 6 or 12
    #[clap(short = 's', long)]
    sets: Option<SetCount>,

    /// arrows per set: 3, 6, 9 or 12
    #[clap(short = 'a', long)]
    arrows: Option<ArrowsPerSet>,
}

impl RecordArgs {
    fn apply(&self, base: SessionConfig) -> SessionConfig {
        SessionConfig {
            bow_type: self.bow.unwrap_or(base.bow_type),
            distance: self.distance.unwrap_or(base.distance),
            set_count: self.sets.unwrap_or(base.set_count),
            arrows_per_set: self.arrows.unwrap_or(base.arrows_per_set),
        }
    }
}

impl Cli {
    fn session_store(&self) -> FileSessionStore {
        self.data_file
            .as_ref()
            .map(FileSessionStore::with_path)
            .unwrap_or_default()
    }

    fn config_store(&self) -> FileConfigStore {
        self.config_file
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Plain commands log to stderr. The TUI owns the terminal, so it logs to a
/// file in the state dir, or nowhere if that cannot be opened.
fn init_logging(verbose: u8, interactive: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_target(false);

    if !interactive {
        builder.with_writer(io::stderr).init();
        return;
    }

    let log_file = AppDirs::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match log_file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(io::sink).init(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let store = cli.session_store();
    let config_store = cli.config_store();

    match cli.command.clone() {
        None => run_interactive(&cli, store, config_store, None),
        Some(Command::Record(args)) => {
            let config = args.apply(config_store.load().session_config());
            run_interactive(&cli, store, config_store, Some(config))
        }
        Some(Command::List) => {
            init_logging(cli.verbose, false);
            let sessions = store.newest_first();
            if sessions.is_empty() {
                println!("no sessions recorded yet");
            }
            let now = chrono::Utc::now();
            for session in &sessions {
                println!("{}", report::list_line(session, now));
            }
            Ok(())
        }
        Some(Command::Show { id }) => {
            init_logging(cli.verbose, false);
            let session = find_or_exit(&store, &id);
            print!("{}", report::session_report(&session));
            Ok(())
        }
        Some(Command::Export { id }) => {
            init_logging(cli.verbose, false);
            let session = find_or_exit(&store, &id);
            print!("{}", format_for_export(&session));
            Ok(())
        }
        Some(Command::Delete { id, yes }) => {
            init_logging(cli.verbose, false);
            let session = find_or_exit(&store, &id);
            if !yes && !confirm(&format!("Delete session {} ({})?", session.id, session.total_score))? {
                println!("kept {}", session.id);
                return Ok(());
            }
            store.delete(&session.id)?;
            println!("deleted {}", session.id);
            Ok(())
        }
    }
}

fn find_or_exit(store: &impl SessionStore, id: &str) -> quiver::Session {
    match store.find(id) {
        Ok(session) => session,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit()
        }
    }
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn run_interactive(
    cli: &Cli,
    store: FileSessionStore,
    config_store: FileConfigStore,
    record: Option<SessionConfig>,
) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }
    init_logging(cli.verbose, true);
    info!(data = %store.path().display(), "starting interactive session");

    let mut app = App::new(Box::new(store), Box::new(config_store));
    if record.is_some() {
        app.start_recording(record);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_INTERVAL_MS),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        match runner.step() {
            AppEvent::Tick => {}
            AppEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppEvent::Key(key) => {
                app.on_key(key);
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}
