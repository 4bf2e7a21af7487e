//! # Whistleblower
//!
//! Command-line entry point. Each subcommand runs one operation of the Twitter
//! target and exits; scheduling is left to cron or the surrounding pipeline.
//!
//! ## Environment Variables
//!
//! See [`whistleblower::Config::from_env`]. A `.env` file in the working
//! directory is loaded first when present.
//!
//! ## Example Usage
//!
//! ```bash
//! # Follow every congressperson in the profiles CSV
//! whistleblower follow
//!
//! # Post at most five pending alerts
//! RUST_LOG=info whistleblower publish --reimbursements data/suspicions.csv --limit 5
//! ```

use clap::{Parser, Subcommand};
use futures_util::TryStreamExt;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use whistleblower::{
    Clients, Config, Error, MongoPostStore, ProfileDirectory, Reimbursement, ReqwestWebClient,
    Result, TwitterClient, TwitterTarget,
};

#[derive(Debug, Parser)]
#[command(name = "whistleblower", version, about = "Tweets suspicious reimbursements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Follow every congressperson account in the profiles CSV
    Follow,
    /// Record the account's existing posts in the database
    Provision,
    /// Post alerts for reimbursements not posted yet
    Publish {
        /// CSV with document_id, congressperson_name, state, twitter_profile, applicant_id, year
        #[arg(long)]
        reimbursements: PathBuf,
        /// Stop after this many alerts
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one page of the account's posts as JSON
    Timeline {
        #[arg(long)]
        max_id: Option<u64>,
    },
}

fn load_reimbursements(path: &Path) -> Result<Vec<Reimbursement>> {
    let csv_error = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    reader
        .deserialize::<Reimbursement>()
        .map(|record| record.map_err(csv_error))
        .collect()
}

async fn build_target(config: &Config) -> Result<TwitterTarget> {
    let api = TwitterClient::new(config.credentials.clone(), config.http_timeout)?;
    let store = MongoPostStore::connect(&config.mongo_url, &config.mongo_database).await?;
    let web = ReqwestWebClient::new(config.http_timeout)?;

    let clients = Clients::new(Arc::new(api), Arc::new(store), Arc::new(web));
    Ok(TwitterTarget::new(
        clients,
        ProfileDirectory::new(&config.profiles_file),
        config.screen_name.clone(),
    ))
}

async fn publish(target: &TwitterTarget, path: &Path, limit: Option<usize>) -> Result<()> {
    let reimbursements = load_reimbursements(path)?;
    info!(
        "Loaded {} reimbursements from {}",
        reimbursements.len(),
        path.display()
    );

    let queue = target.post_queue(reimbursements).await?;
    let limit = limit.unwrap_or(queue.len());

    let mut published = 0;
    for reimbursement in queue {
        if published >= limit {
            break;
        }
        let mut post = target.post(reimbursement);
        match post.publish().await {
            Ok(record) => {
                published += 1;
                info!("Posted document {} as {}", record.document_id, record.id);
            }
            Err(Error::MissingProfile { document_id }) => {
                warn!("Skipping document {}: no Twitter profile", document_id);
            }
            Err(e) => return Err(e),
        }
    }

    info!("Published {} alerts", published);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let target = build_target(&config).await?;

    match cli.command {
        Command::Follow => {
            let report = target.follow_congresspeople().await?;
            println!(
                "followed {} accounts, {} not found",
                report.followed.len(),
                report.not_found.len()
            );
        }
        Command::Provision => {
            let records = target.provision_database().await?;
            println!("provisioned {} posts", records.len());
        }
        Command::Publish {
            reimbursements,
            limit,
        } => publish(&target, &reimbursements, limit).await?,
        Command::Timeline { max_id } => {
            let statuses = Box::pin(target.posts(max_id))
                .try_next()
                .await?
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    if let Err(e) = dotenvy::dotenv() {
        info!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("whistleblower failed: {}", e);
        std::process::exit(1);
    }
}
