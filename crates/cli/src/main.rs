// ShelfMark CLI — migrate Goodreads finished status to Audiobookshelf.

mod apply;
mod exit_codes;
mod fetch;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use exit_codes::{
    EXIT_ABS_AUTH, EXIT_ABS_UPSTREAM, EXIT_APPLY_PARTIAL, EXIT_ERROR, EXIT_EXPORT_PARSE,
    EXIT_SUCCESS, EXIT_USAGE,
};
use shelfmark_abs::{AbsClient, AbsError, AuthCredentials};

#[derive(Parser)]
#[command(name = "shelfmark")]
#[command(about = "Migrate Goodreads finished status to Audiobookshelf")]
#[command(version)]
#[command(after_help = "\
Examples:
  shelfmark --goodreads-csv export.csv --url http://localhost:13378 --api-key KEY
  shelfmark --goodreads-csv export.csv --apply
  shelfmark --goodreads-csv export.csv --library Audiobooks --json")]
struct Cli {
    /// Path to the Goodreads CSV export file
    #[arg(long, value_name = "FILE")]
    goodreads_csv: PathBuf,

    /// Audiobookshelf server URL (e.g., http://localhost:13378)
    #[arg(long, env = "ABS_URL")]
    url: Option<String>,

    /// Audiobookshelf API key
    #[arg(long, env = "ABS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Restrict matching to a single library by name
    #[arg(long)]
    library: Option<String>,

    /// Apply changes to Audiobookshelf; without this flag the run is a
    /// dry-run and only reports what it would do
    #[arg(long)]
    apply: bool,

    /// Save the server URL and API key for future runs
    #[arg(long)]
    save_auth: bool,

    /// Output the full match result as JSON instead of a human summary
    #[arg(long)]
    json: bool,

    /// Write the JSON match result to a file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Map an Audiobookshelf client error to the right exit code.
    pub fn abs(err: AbsError) -> Self {
        match err {
            AbsError::NotAuthenticated => Self {
                code: EXIT_ABS_AUTH,
                message: err.to_string(),
                hint: Some("check the API key (Audiobookshelf settings → Users → API token)".into()),
            },
            _ => Self { code: EXIT_ABS_UPSTREAM, message: err.to_string(), hint: None },
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let creds = resolve_credentials(&cli)?;

    if cli.save_auth {
        shelfmark_abs::save_auth(&creds).map_err(CliError::io)?;
    }

    let csv_data = std::fs::read_to_string(&cli.goodreads_csv).map_err(|e| {
        CliError::usage(format!("cannot read {}: {e}", cli.goodreads_csv.display()))
    })?;
    let records = shelfmark_resolve::goodreads::load_export(&csv_data).map_err(|e| CliError {
        code: EXIT_EXPORT_PARSE,
        message: e.to_string(),
        hint: Some("expected an unmodified Goodreads library export".into()),
    })?;

    let progress = !cli.quiet && atty::is(atty::Stream::Stderr);
    if progress {
        eprintln!("{} finished books in export", records.len());
    }
    if records.is_empty() {
        eprintln!("no finished books in the export; nothing to do");
        if cli.json || cli.output.is_some() {
            // Keep stdout machine-readable: an empty run still emits a
            // well-formed result document.
            let result = shelfmark_resolve::run(Vec::new(), &[]);
            report::emit(&result, None, cli.apply, cli.json, cli.output.as_deref())?;
        }
        return Ok(());
    }

    let client = AbsClient::new(&creds.server_url, &creds.api_key);
    let user = client.verify().map_err(CliError::abs)?;
    if progress {
        eprintln!("authenticated as {}", user.username);
    }

    let catalog = fetch::fetch_catalog(&client, cli.library.as_deref(), progress)?;

    let result = shelfmark_resolve::run(records, &catalog);

    let apply_outcome = if cli.apply {
        Some(apply::apply_matches(&client, &result.pairs, progress))
    } else {
        None
    };

    report::emit(
        &result,
        apply_outcome.as_ref(),
        cli.apply,
        cli.json,
        cli.output.as_deref(),
    )?;

    if let Some(outcome) = &apply_outcome {
        if !outcome.failed.is_empty() {
            return Err(CliError {
                code: EXIT_APPLY_PARTIAL,
                message: format!(
                    "{} of {} updates failed",
                    outcome.failed.len(),
                    result.pairs.len()
                ),
                hint: None,
            });
        }
    }

    Ok(())
}

/// Flag/env credentials win; saved auth fills in whatever is missing.
fn resolve_credentials(cli: &Cli) -> Result<AuthCredentials, CliError> {
    if let (Some(url), Some(key)) = (&cli.url, &cli.api_key) {
        return Ok(AuthCredentials::new(url.clone(), key.clone()));
    }

    if let Some(saved) = shelfmark_abs::load_auth() {
        return Ok(AuthCredentials {
            server_url: cli.url.clone().unwrap_or(saved.server_url),
            api_key: cli.api_key.clone().unwrap_or(saved.api_key),
        });
    }

    Err(CliError {
        code: EXIT_USAGE,
        message: "missing Audiobookshelf credentials".into(),
        hint: Some(
            "pass --url and --api-key (or set ABS_URL / ABS_API_KEY), \
             or save them once with --save-auth"
                .into(),
        ),
    })
}
