// wsdebug: interactive Whitespace debugger

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use num_bigint::BigInt;
use ratatui::{backend::CrosstermBackend, Terminal};

use wsdebug::debugger::Debugger;
use wsdebug::interpreter::constants::{MachineConfig, DEFAULT_HEAP_CELLS, DEFAULT_STEP_BUDGET};
use wsdebug::interpreter::labels::CacheSize;
use wsdebug::interpreter::{Machine, Stop};
use wsdebug::logging::init_tracing;
use wsdebug::memory::Number;
use wsdebug::program::Program;
use wsdebug::repl;
use wsdebug::ui::App;

#[derive(Copy, Clone, clap::ValueEnum)]
enum NumberKind {
    /// Arbitrary precision integers
    Big,
    /// 64-bit integers, wrapping on overflow
    Fixed,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum CacheKind {
    /// 16 buckets
    Small,
    /// 256 buckets
    Large,
}

/// Interactive debugger for Whitespace programs
#[derive(clap::Parser)]
#[command(name = "wsdebug", version, about)]
struct Cli {
    /// Whitespace program to debug
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Line-oriented debugger on stdin/stdout instead of the full-screen UI
    #[arg(long, conflicts_with = "run")]
    plain: bool,

    /// Run the program without the debugger
    #[arg(long)]
    run: bool,

    /// Numeric back end for stack and heap values
    #[arg(long, value_enum, default_value = "big")]
    number: NumberKind,

    /// Label cache size
    #[arg(long, value_enum, default_value = "small")]
    cache: CacheKind,

    /// Largest heap address plus one
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_HEAP_CELLS)]
    heap_limit: usize,

    /// Instructions executed between checks for Esc/Ctrl-C in the UI
    #[arg(long, value_name = "STEPS", default_value_t = DEFAULT_STEP_BUDGET)]
    budget: usize,

    /// Write logs to FILE (filter with WSDEBUG_LOG, default "info")
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

impl Cli {
    fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            cache_size: match self.cache {
                CacheKind::Small => CacheSize::Small,
                CacheKind::Large => CacheSize::Large,
            },
            heap_limit: self.heap_limit,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_tracing(path)?;
    }

    let program = match &cli.file {
        Some(path) => Program::load(path)?,
        None if cli.run => return Err("--run needs a program file".into()),
        None => Program::default(),
    };

    match cli.number {
        NumberKind::Big => launch::<BigInt>(&cli, program),
        NumberKind::Fixed => launch::<i64>(&cli, program),
    }
}

fn launch<N: Number>(cli: &Cli, program: Program) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(number = N::NAME, "starting");
    let config = cli.machine_config();

    if cli.run {
        let mut machine: Machine<N> = Machine::new(program, config);
        let stop = repl::run_program(&mut machine, &mut io::stdin().lock(), &mut io::stdout())?;
        if stop != Stop::Exit {
            eprintln!("{}", stop);
            std::process::exit(1);
        }
        return Ok(());
    }

    let debugger: Debugger<N> = Debugger::new(program, config);

    if cli.plain {
        let mut debugger = debugger;
        repl::run_session(&mut debugger, &mut io::stdin().lock(), &mut io::stdout())?;
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(debugger, cli.budget);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
