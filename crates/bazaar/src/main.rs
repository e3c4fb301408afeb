use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar::cli::{format_output, Cli, Commands};
use bazaar::events::TracingSink;
use bazaar::{seed, Config, Persistence, Repositories};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let (persistence, worker) = Persistence::from_config(&config, Arc::new(TracingSink)).await?;
    let repos = Repositories::new(&persistence);
    drop(persistence);

    let outcome = run(&cli, &repos).await;

    // Flush pending events before exit
    drop(repos);
    worker.finish().await;

    outcome
}

async fn run(cli: &Cli, repos: &Repositories) -> Result<()> {
    match &cli.command {
        Commands::Seed => {
            let summary = seed::seed(repos).await?;
            println!("{}", format_output(&summary, cli.format));
        }
        Commands::Get { collection, id } => {
            let handle = repos
                .collection(collection)
                .ok_or_else(|| unknown_collection(repos, collection))?;
            match handle.get_document(id).await? {
                Some(record) => println!("{}", format_output(&record, cli.format)),
                None => {
                    return Err(anyhow!("{} {id} not found", handle.entity_type()));
                }
            }
        }
        Commands::List { collection, .. } => {
            let handle = repos
                .collection(collection)
                .ok_or_else(|| unknown_collection(repos, collection))?;
            let Some((filter, page)) = cli.command.list_query() else {
                return Ok(());
            };
            let page = handle.list_documents(&filter, &page).await?;
            println!("{}", format_output(&page, cli.format));
        }
        Commands::Delete { collection, id } => {
            let handle = repos
                .collection(collection)
                .ok_or_else(|| unknown_collection(repos, collection))?;
            if handle.delete(id).await? {
                if !cli.quiet {
                    println!("Deleted {} {id}", handle.entity_type());
                }
            } else {
                return Err(anyhow!("{} {id} not found", handle.entity_type()));
            }
        }
    }
    Ok(())
}

fn unknown_collection(repos: &Repositories, name: &str) -> anyhow::Error {
    let known: Vec<_> = repos.collections().collect();
    anyhow!("unknown collection {name:?} (known: {})", known.join(", "))
}
