use anyhow::{Context, Result};
use clap::Parser;
use prepfrog::api::InterviewMode;
use prepfrog::{ApiClient, Config, SessionClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Mock-interview practice client
#[derive(Parser)]
#[command(name = "prepfrog")]
struct Args {
    /// Config file (without extension), e.g. config/prepfrog
    #[arg(long, default_value = "config/prepfrog")]
    config: String,

    /// Resume file to upload (pdf or docx)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Target job role for the interview
    #[arg(long)]
    job_role: Option<String>,

    /// Use the pressure (HARD) interview mode
    #[arg(long)]
    hard: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config).unwrap_or_else(|_| {
        info!("No config file at {}, using defaults", args.config);
        Config::default()
    });

    info!("prepfrog v0.1.0");
    info!("Backend: {}", cfg.api.base_url);

    let api = ApiClient::new(
        &cfg.api.base_url,
        Duration::from_secs(cfg.api.request_timeout_secs),
    )?;

    let (Some(resume), Some(job_role)) = (args.resume, args.job_role) else {
        info!("Pass --resume and --job-role to bootstrap an interview session");
        return Ok(());
    };

    let file_name = resume
        .file_name()
        .and_then(|n| n.to_str())
        .context("resume path has no file name")?
        .to_string();
    let bytes = std::fs::read(&resume)
        .with_context(|| format!("failed to read resume: {}", resume.display()))?;

    let mode = if args.hard {
        InterviewMode::Hard
    } else {
        InterviewMode::Normal
    };

    let client = SessionClient::new(api);
    let key = client.upload_resume(&file_name, bytes.into()).await?;
    let session = client.create_session(&key, &job_role, mode).await?;

    info!("Session {} ready", session.session_id);
    info!(
        "First question (order {}): {}",
        session.first_question.order, session.first_question.main_text
    );

    Ok(())
}
