use clap::Parser;
use clothing_recommender::{cli, client, config, error, image_file, render};
use clothing_recommender_common::{LocalStore, Outcome, Phase, RecommenderApi, Session, Workflow};
use cli::{Cli, Commands};
use client::HttpClient;
use config::Config;
use error::{RecommenderError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let api_url = config.resolve_api_base_url(cli.api_url.as_deref());
    tracing::debug!(%api_url, "using backend");

    match cli.command {
        Commands::Recommend { image, limit, json } => {
            let payload = image_file::load_image(&image)?;
            let client = HttpClient::from_config(&config, &api_url)?;
            let workflow = Workflow::new(client, LocalStore::new())
                .with_similar_limit(limit.unwrap_or(config.similar_limit))
                .with_max_image_bytes(config.max_image_bytes);
            workflow.select_image(payload);

            if !json {
                println!("👕 clothing-rec - recommend\n");
                println!("- {} ({})\n", image.display(), api_url);
            }

            let outcome = with_spinner(!json, workflow.submit(), || workflow.session().phase()).await;
            let session = workflow.session();

            if json {
                println!("{}", serde_json::to_string_pretty(&render::SessionReport::new(&session))?);
            } else {
                print!("{}", render::render_session(&session));
            }

            finish(outcome, &session, json)?;
        }

        Commands::Tag { image } => {
            let payload = image_file::load_image(&image)?;
            let client = HttpClient::from_config(&config, &api_url)?;
            let workflow = Workflow::new(client, LocalStore::new())
                .with_max_image_bytes(config.max_image_bytes);
            workflow.select_image(payload);

            println!("🏷  clothing-rec - tag\n");
            let outcome = with_spinner(true, workflow.tag_only(), || workflow.session().phase()).await;
            let session = workflow.session();
            print!("{}", render::render_session(&session));

            finish(outcome, &session, false)?;
        }

        Commands::Similar { id, limit } => {
            let client = HttpClient::from_config(&config, &api_url)?;
            let items = client
                .fetch_similar_items(&id, limit.unwrap_or(config.similar_limit))
                .await?;
            print_items(&items);
        }

        Commands::ByUrl { url, limit } => {
            let client = HttpClient::from_config(&config, &api_url)?;
            let items = client
                .recommend_by_url(&url, limit.unwrap_or(config.similar_limit))
                .await?;
            print_items(&items);
        }

        Commands::ProcessCatalog => {
            let client = HttpClient::from_config(&config, &api_url)?;
            println!("[1/1] Requesting catalog processing...");
            let response = client.process_catalog().await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            println!("\n✅ Done");
        }

        Commands::Config { set_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                println!("✔ API URL saved");
            }

            if show {
                println!("Config:");
                println!("  API URL: {}", config.api_base_url);
                println!("  Effective URL: {}", config.resolve_api_base_url(cli.api_url.as_deref()));
                println!("  Similar items: {}", config.similar_limit);
                println!("  Max image size: {} bytes", config.max_image_bytes);
                println!("  Timeout: {}s", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 処理中はスピナーに現在の段階を表示する
async fn with_spinner<F, P>(show: bool, task: F, phase: P) -> Outcome
where
    F: Future<Output = Outcome>,
    P: Fn() -> Phase,
{
    if !show {
        return task.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));

    tokio::pin!(task);
    let outcome = loop {
        spinner.set_message(phase().label());
        tokio::select! {
            outcome = &mut task => break outcome,
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
    };

    spinner.finish_and_clear();
    outcome
}

/// 結果をコマンドの終了状態に変換
fn finish(outcome: Outcome, session: &Session, quiet: bool) -> Result<()> {
    match outcome {
        Outcome::Completed | Outcome::Superseded => {
            if !quiet {
                println!("\n✅ Done");
            }
            Ok(())
        }
        Outcome::NoImage => Err(RecommenderError::ImageLoad("no image selected".into())),
        Outcome::Rejected | Outcome::Failed(_) => match session.error() {
            Some(error) => Err(RecommenderError::Workflow {
                stage: error.stage,
                detail: error.detail.clone(),
            }),
            None => Err(RecommenderError::ImageLoad("request failed".into())),
        },
    }
}

fn print_items(items: &[clothing_recommender_common::RecommendationItem]) {
    if items.is_empty() {
        println!("No similar items found");
    } else {
        print!("{}", render::render_recommendations(items));
    }
}
