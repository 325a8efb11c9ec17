//! The `halo` command: argument resolution, prompting, and one run.

pub mod args;
pub mod prompt;

use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::debug;

use halo::prelude::*;
use halo::engine::SinkError;

use args::Cli;

/// Errors surfaced by the command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration or run failure.
    Run(RunError),
    /// The elapsed-time log could not be written.
    Sink(SinkError),
    /// Terminal I/O failed.
    Io(io::Error),
    /// Standard input ended while a prompt was waiting.
    InputClosed,
    /// A required value was neither given nor derivable.
    Missing(&'static str),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(e) => write!(f, "{e}"),
            Self::Sink(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "terminal i/o failed: {e}"),
            Self::InputClosed => write!(f, "input closed before all values were entered"),
            Self::Missing(what) => write!(f, "missing required value: {what}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Run(e) => Some(e),
            Self::Sink(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InputClosed | Self::Missing(_) => None,
        }
    }
}

impl From<RunError> for CliError {
    fn from(e: RunError) -> Self {
        Self::Run(e)
    }
}

impl From<SinkError> for CliError {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Resolve the run configuration and initial domain from flags or prompts.
pub fn resolve<R: BufRead, W: Write>(
    cli: &Cli,
    input: &mut R,
    output: &mut W,
) -> Result<(RunConfig, Domain), CliError> {
    let explicit = cli
        .domain
        .as_deref()
        .map(str::parse::<Domain>)
        .transpose()?;

    let (cells, rule, generations, periodic) = if cli.interactive {
        let a = prompt::ask(input, output)?;
        (a.cells, a.rule, a.generations, a.periodic)
    } else {
        let cells = cli
            .cells
            .or_else(|| explicit.as_ref().map(Domain::len))
            .ok_or(CliError::Missing("cells"))?;
        (
            cells,
            cli.rule.ok_or(CliError::Missing("rule"))?,
            cli.generations.ok_or(CliError::Missing("generations"))?,
            cli.periodic,
        )
    };

    let config = RunConfig {
        cells,
        rule,
        generations,
        boundary: Boundary::from_periodic(periodic),
    };
    config.validate()?;

    let domain = match explicit {
        Some(domain) => domain,
        None => cli.init.build(cells, cli.seed)?,
    };
    if domain.len() != cells {
        return Err(RunError::invalid_config(format!(
            "domain has {} cells but {cells} were requested",
            domain.len()
        ))
        .into());
    }
    debug!(
        cells,
        rule,
        generations,
        boundary = %config.boundary,
        "resolved configuration"
    );
    Ok((config, domain))
}

/// Resolve, run, print, and record elapsed time.
pub fn execute<R: BufRead, W: Write>(
    cli: &Cli,
    input: &mut R,
    output: &mut W,
) -> Result<RunReport, CliError> {
    let (config, domain) = resolve(cli, input, output)?;
    let cluster = Cluster::new(&ClusterConfig { ranks: cli.ranks })?;

    writeln!(output, "Initial state: {domain}")?;
    let report = cluster.run(config, domain)?;
    writeln!(output, "Result: {}", report.domain)?;

    ElapsedLog::new(&cli.log).record(report.elapsed)?;
    debug!(log = %cli.log.display(), "elapsed time recorded");
    Ok(report)
}
