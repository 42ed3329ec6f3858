mod config;
mod draw;
mod errors;
mod form;
mod generators;
mod password;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{Config, DrawConfig};
use crate::draw::{Draw, DrawSlots};
use crate::errors::{AppError, ValidationError};
use crate::form::{InputType, Page};
use crate::generators::OsSource;
use crate::password::VisibilityToggle;

#[derive(Parser)]
#[command(name = "luckydip", version, about = "Lottery draw picker and login form helpers")]
struct Cli {
    /// Config file (defaults to <config dir>/luckydip/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "luckydip=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick unique random numbers and fill the draw form
    Draw {
        /// Number of draws to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print draws as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a hand-picked draw
    Check {
        #[arg(required = true, allow_hyphen_values = true)]
        numbers: Vec<String>,
    },

    /// Enter a password, shown or masked, and check it against the policy
    Login {
        /// Tick the "show password" box
        #[arg(short, long)]
        show: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match start(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn start(cli: Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level);

    run(cli.command, &config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(command: Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::Draw { count, json } => draw(&config.draw, count, json),
        Command::Check { numbers } => check(&config.draw, &numbers),
        Command::Login { show } => login(config, show),
    }
}

fn draw_page(rules: &DrawConfig) -> Page {
    rules
        .slot_ids()
        .iter()
        .fold(Page::new(), |page, id| page.with_input(id, InputType::Number))
}

fn draw(rules: &DrawConfig, count: usize, json: bool) -> Result<(), AppError> {
    let mut page = draw_page(rules);
    let slots = DrawSlots::bind(&page, rules)?;
    let mut source = OsSource;

    let draws = (0..count)
        .map(|_| slots.lucky_dip(&mut page, &mut source, rules))
        .collect::<Result<Vec<Draw>, _>>()?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &draws)?;
        writeln!(out)?;
    } else {
        for draw in &draws {
            writeln!(out, "{}", draw)?;
        }
    }

    Ok(())
}

fn check(rules: &DrawConfig, numbers: &[String]) -> Result<(), AppError> {
    let mut page = draw_page(rules);
    let slots = DrawSlots::bind(&page, rules)?;

    if numbers.len() != slots.ids().len() {
        return Err(ValidationError::WrongCount {
            expected: slots.ids().len(),
            found: numbers.len(),
        }
        .into());
    }

    for (id, value) in slots.ids().iter().zip(numbers) {
        page.set_value(id, value.as_str())?;
    }

    let draw = Draw::from_entries(&slots.entries(&page)?, rules)?;
    println!("Draw {} accepted.", draw);
    Ok(())
}

fn login(config: &Config, show: bool) -> Result<(), AppError> {
    let mut page = Page::new()
        .with_checkbox(VisibilityToggle::CHECKBOX_ID, false)
        .with_input(VisibilityToggle::PASSWORD_ID, InputType::Password);
    let toggle = VisibilityToggle::login(&page)?;

    page.set_checked(VisibilityToggle::CHECKBOX_ID, show)?;
    let input_type = toggle.on_change(&mut page)?;
    debug!(?input_type, "password field updated");

    let password = match input_type {
        InputType::Password => rpassword::prompt_password("Password: ")?,
        _ => {
            print!("Password: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    page.set_value(VisibilityToggle::PASSWORD_ID, password)?;

    config
        .password
        .check(page.value(VisibilityToggle::PASSWORD_ID)?)?;
    println!("Password meets the policy.");
    Ok(())
}
