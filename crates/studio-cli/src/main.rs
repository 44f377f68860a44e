//! Studio command-line tool.
//!
//! ```text
//! studio upload <path> <job|profile> <id>
//! studio job-status <job-id>
//! studio verify-webhook <secret> <timestamp> <payload> <signature>
//! ```
//!
//! Connection settings come from `STUDIO_*` environment variables (a `.env`
//! file is honored).

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studio_client::{verify_signature, StudioClient};
use studio_models::OwnerKind;

const USAGE: &str = "usage:
  studio upload <path> <job|profile> <id>
  studio job-status <job-id>
  studio verify-webhook <secret> <timestamp> <payload> <signature>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Upload {
        path: PathBuf,
        owner: OwnerKind,
        owner_id: u64,
    },
    JobStatus {
        job_id: u64,
    },
    VerifyWebhook {
        secret: String,
        timestamp: String,
        payload: String,
        signature: String,
    },
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let (name, rest) = args.split_first().ok_or_else(|| anyhow!("{}", USAGE))?;

        match (name.as_str(), rest) {
            ("upload", [path, owner, id]) => Ok(Command::Upload {
                path: PathBuf::from(path),
                owner: owner.parse()?,
                owner_id: parse_id(id)?,
            }),
            ("job-status", [id]) => Ok(Command::JobStatus {
                job_id: parse_id(id)?,
            }),
            ("verify-webhook", [secret, timestamp, payload, signature]) => {
                Ok(Command::VerifyWebhook {
                    secret: secret.clone(),
                    timestamp: timestamp.clone(),
                    payload: payload.clone(),
                    signature: signature.clone(),
                })
            }
            _ => bail!("{}", USAGE),
        }
    }
}

fn parse_id(raw: &str) -> anyhow::Result<u64> {
    raw.parse()
        .with_context(|| format!("invalid id '{}'", raw))
}

fn init_tracing(debug: bool) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let default_level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studio_client={0},studio={0}", default_level)));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // TLS for the API and storage endpoints
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    if let Command::VerifyWebhook {
        secret,
        timestamp,
        payload,
        signature,
    } = &command
    {
        init_tracing(false);
        if verify_signature(secret, payload, timestamp, signature) {
            println!("valid");
            return Ok(());
        }
        bail!("invalid webhook signature");
    }

    let client = StudioClient::from_env().context("failed to configure Studio client")?;
    init_tracing(client.config().debug);
    info!(base_url = %client.config().base_url, "Starting studio");

    match command {
        Command::Upload {
            path,
            owner,
            owner_id,
        } => {
            let outcome = client
                .upload_photo(&path, owner_id, owner)
                .await
                .with_context(|| format!("upload of {} failed", path.display()))?;
            println!(
                "uploaded photo {} (storage status {})",
                outcome.photo.id, outcome.upload_status
            );
        }
        Command::JobStatus { job_id } => {
            let job = client.get_job(job_id).await?;
            let in_front = client.fetch_jobs_in_front(job_id).await?;
            println!(
                "job {} ({}): state={} in_front={}",
                job.id,
                job.name.as_deref().unwrap_or("-"),
                job.state.as_deref().unwrap_or("unknown"),
                in_front
            );
        }
        Command::VerifyWebhook { .. } => {}
    }

    Ok(())
}
