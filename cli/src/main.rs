//! Capability review CLI - inspect and decide capability submissions

mod render;

use anyhow::{bail, Context, Result};
use capability_review::{Payload, StoreConfig, SubmissionStatus, SubmissionStore};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "capability-review")]
#[command(about = "Review capability submissions stored in a local JSON file")]
#[command(version)]
struct Cli {
    /// Storage file (default: $CAPABILITY_SUBMISSIONS_FILE or data/capability-submissions.json)
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List submissions, newest first
    List {
        /// Only submissions by this username
        #[arg(short, long)]
        user: Option<String>,

        /// Print the raw JSON records
        #[arg(long)]
        json: bool,
    },

    /// Show one submission in full
    Show {
        /// Submission ID
        id: String,
    },

    /// Submit a capability form from a JSON file
    Submit {
        /// JSON object with the form fields, or "-" for stdin
        #[arg(short, long)]
        payload: PathBuf,

        /// Submitter's user ID
        #[arg(long)]
        by: Option<String>,

        /// Submitter's username
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Approve a submission
    Approve(DecisionArgs),

    /// Reject a submission
    Reject(DecisionArgs),

    /// Count submissions by status
    Stats,
}

#[derive(Args)]
struct DecisionArgs {
    /// Submission ID
    id: String,

    /// Comment recorded with the decision
    #[arg(short, long)]
    remark: Option<String>,

    /// Reviewer's user ID
    #[arg(long)]
    reviewer: Option<String>,

    /// Reviewer's display name
    #[arg(long)]
    reviewer_name: Option<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capability_review=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.file {
        Some(path) => StoreConfig::with_storage_file(path),
        None => StoreConfig::from_env(),
    };
    let store = SubmissionStore::open(config);

    match cli.command {
        Commands::List { user, json } => run_list(&store, user.as_deref(), json),
        Commands::Show { id } => run_show(&store, &id),
        Commands::Submit {
            payload,
            by,
            username,
        } => run_submit(&store, &payload, by.as_deref(), username.as_deref()),
        Commands::Approve(args) => run_decide(&store, SubmissionStatus::Approved, &args),
        Commands::Reject(args) => run_decide(&store, SubmissionStatus::Rejected, &args),
        Commands::Stats => {
            println!("{}", render::stats(&store.stats()));
            Ok(())
        }
    }
}

fn run_list(store: &SubmissionStore, user: Option<&str>, json: bool) -> Result<()> {
    let submissions = match user {
        Some(user) => store.list_submissions_by_user(Some(user)),
        None => store.list_submissions(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
    } else if submissions.is_empty() {
        println!("No submissions found.");
    } else {
        println!("Submissions:");
        println!("{:─<72}", "");
        for submission in &submissions {
            println!("  {}", render::summary_line(submission));
        }
    }

    Ok(())
}

fn run_show(store: &SubmissionStore, id: &str) -> Result<()> {
    let submission = store
        .get_submission(id)
        .with_context(|| format!("Submission not found: {}", id))?;
    println!("{}", serde_json::to_string_pretty(&submission)?);
    Ok(())
}

fn run_submit(
    store: &SubmissionStore,
    payload_path: &Path,
    by: Option<&str>,
    username: Option<&str>,
) -> Result<()> {
    let payload = read_payload(payload_path)?;
    let submission = store.create(&payload, by, username);
    tracing::info!("Created submission {}", submission.id);
    println!("{}", submission.id);
    Ok(())
}

fn run_decide(store: &SubmissionStore, status: SubmissionStatus, args: &DecisionArgs) -> Result<()> {
    let submission = store
        .decide(
            &args.id,
            status,
            args.remark.as_deref(),
            args.reviewer.as_deref(),
            args.reviewer_name.as_deref(),
        )
        .with_context(|| format!("Submission not found: {}", args.id))?;
    println!("{}", render::summary_line(&submission));
    Ok(())
}

fn read_payload(path: &Path) -> Result<Payload> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read payload from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path.display()))?
    };
    parse_payload(&text)
}

fn parse_payload(text: &str) -> Result<Payload> {
    match serde_json::from_str::<serde_json::Value>(text).context("Payload is not valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("Payload must be a JSON object, got: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_object() {
        let payload = parse_payload(r#"{"companyName": "Acme", "patents": "CN1"}"#).unwrap();
        assert_eq!(payload["companyName"], "Acme");
    }

    #[test]
    fn test_parse_payload_rejects_non_object() {
        assert!(parse_payload(r#"["Acme"]"#).is_err());
        assert!(parse_payload("not json").is_err());
    }

    #[test]
    fn test_read_payload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{"companyName": "Acme"}"#).unwrap();
        assert_eq!(read_payload(&path).unwrap()["companyName"], "Acme");
        assert!(read_payload(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_cli_parses_decision() {
        let cli = Cli::try_parse_from([
            "capability-review",
            "--file",
            "/tmp/subs.json",
            "approve",
            "abc",
            "--remark",
            "looks good",
            "--reviewer-name",
            "Reviewer",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/subs.json")));
        match cli.command {
            Commands::Approve(args) => {
                assert_eq!(args.id, "abc");
                assert_eq!(args.remark.as_deref(), Some("looks good"));
                assert_eq!(args.reviewer, None);
                assert_eq!(args.reviewer_name.as_deref(), Some("Reviewer"));
            }
            _ => panic!("expected approve"),
        }
    }

    #[test]
    fn test_decide_unknown_id_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::open(StoreConfig::with_storage_file(dir.path().join("s.json")));
        let args = DecisionArgs {
            id: "missing".to_string(),
            remark: None,
            reviewer: None,
            reviewer_name: None,
        };
        let err = run_decide(&store, SubmissionStatus::Rejected, &args).unwrap_err();
        assert_eq!(err.to_string(), "Submission not found: missing");
    }
}
