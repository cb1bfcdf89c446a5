//! A line-based converter session.
//!
//! The startup refresh runs in the background while the session keeps
//! answering from whatever rates are in memory. Every edit recomputes at
//! once; refresh results are printed as they arrive.

use super::{convert::render_conversion, rates, ui};
use crate::core::config::{AppConfig, DisplayConfig};
use crate::core::currency::parse_currency_code;
use crate::core::{ConversionRequest, RateTableManager, RefreshError, RefreshOutcome};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

const HELP: &str = "\
Commands:
  amount <x> | <x>   set the amount
  from <code>        set the source currency
  to <code>          set the target currency
  swap               exchange source and target
  refresh            fetch the latest rates
  rates              show all rates
  help               show this help
  quit               leave";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Show,
    Amount(String),
    Source(String),
    Target(String),
    Swap,
    Refresh,
    Rates,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(SessionCommand::Show);
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("Too many arguments: {}", line.trim()));
    }

    match (head.to_ascii_lowercase().as_str(), arg) {
        ("amount" | "a", Some(value)) => Ok(SessionCommand::Amount(value.to_string())),
        ("from" | "f", Some(code)) => parse_currency_code(code).map(SessionCommand::Source),
        ("to" | "t", Some(code)) => parse_currency_code(code).map(SessionCommand::Target),
        ("swap" | "s", None) => Ok(SessionCommand::Swap),
        ("refresh" | "r", None) => Ok(SessionCommand::Refresh),
        ("rates", None) => Ok(SessionCommand::Rates),
        ("help" | "h" | "?", None) => Ok(SessionCommand::Help),
        ("quit" | "q" | "exit", None) => Ok(SessionCommand::Quit),
        (_, None) if head.parse::<f64>().is_ok() => Ok(SessionCommand::Amount(head.to_string())),
        _ => Err(format!(
            "Unknown command: {}. Type 'help' for commands",
            line.trim()
        )),
    }
}

/// What the user has selected. The amount is kept as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub amount: String,
    pub source: String,
    pub target: String,
}

impl Session {
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        Ok(Self {
            amount: config.defaults.amount.clone(),
            source: parse_currency_code(&config.defaults.from)?,
            target: parse_currency_code(&config.defaults.to)?,
        })
    }

    pub fn request(&self) -> ConversionRequest {
        ConversionRequest::parse(&self.amount, &self.source, &self.target)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }
}

fn forward_outcome(outcomes: &mpsc::Sender<RefreshOutcome>, refresh: JoinHandle<RefreshOutcome>) {
    let outcomes = outcomes.clone();
    tokio::spawn(async move {
        let outcome = refresh
            .await
            .unwrap_or_else(|e| RefreshOutcome::Failed(RefreshError::TransportFailure(e.to_string())));
        if outcomes.send(outcome).await.is_err() {
            debug!("Session ended before refresh finished");
        }
    });
}

fn show(
    out: &mut impl Write,
    manager: &RateTableManager,
    session: &Session,
    display: &DisplayConfig,
) -> std::io::Result<()> {
    let request = session.request();
    let result = manager.convert(&request);
    writeln!(out, "{}", render_conversion(&request, &result, display))
}

/// Drives a session until `quit` or end of input.
pub async fn run_session<R>(
    manager: Arc<RateTableManager>,
    mut session: Session,
    display: &DisplayConfig,
    input: R,
    out: &mut impl Write,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let (tx, mut outcomes) = mpsc::channel::<RefreshOutcome>(8);
    if let Some(handle) = manager.begin() {
        forward_outcome(&tx, handle);
    }

    writeln!(out, "{}", ui::status_line(&manager.snapshot()))?;
    show(out, &manager, &session, display)?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            Some(outcome) = outcomes.recv() => {
                if outcome != RefreshOutcome::Superseded {
                    writeln!(out, "{}", ui::status_line(&manager.snapshot()))?;
                    show(out, &manager, &session, display)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(SessionCommand::Quit) => break,
                    Ok(SessionCommand::Help) => writeln!(out, "{HELP}")?,
                    Ok(SessionCommand::Rates) => {
                        writeln!(out, "{}", rates::render(&manager.snapshot(), display))?;
                    }
                    Ok(SessionCommand::Refresh) => {
                        forward_outcome(&tx, manager.spawn_refresh());
                        writeln!(out, "{}", ui::status_line(&manager.snapshot()))?;
                    }
                    Ok(command) => {
                        match command {
                            SessionCommand::Amount(amount) => session.amount = amount,
                            SessionCommand::Source(code) => session.source = code,
                            SessionCommand::Target(code) => session.target = code,
                            SessionCommand::Swap => session.swap(),
                            _ => {}
                        }
                        show(out, &manager, &session, display)?;
                    }
                    Err(message) => writeln!(out, "{}", ui::style_text(&message, ui::StyleType::Error))?,
                }
            }
        }
    }

    writeln!(out, "Bye")?;
    Ok(())
}

pub async fn run(manager: Arc<RateTableManager>, config: &AppConfig) -> Result<()> {
    println!("{}", ui::style_text("Myanmar Currency Converter", ui::StyleType::Title));
    println!("Type 'help' for commands.\n");

    let session = Session::from_config(config)
        .map_err(|e| anyhow::anyhow!("Invalid default in config: {e}"))?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(
        manager,
        session,
        &config.display,
        stdin,
        &mut stdout,
    )
    .await
}
