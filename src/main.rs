//! swingcoach - swing analysis from the command line
//!
//! Sends athlete measurements to the analysis service, prints the biomechanics
//! report, and browses the drill video library. Responses are cached on disk so
//! recent results stay available when the service can't be reached.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use swingcoach::cli::{parse_category_arg, CacheCommand, Cli, Command, VideoCommand};
use swingcoach::data::VideoList;
use swingcoach::{output, ApiClient, ClientConfig, Fetched};

/// Logs go to stderr so stdout stays clean for `--json`
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_data<T: Serialize>(
    data: &T,
    json: bool,
    render: impl Fn(&T) -> String,
) -> Result<(), serde_json::Error> {
    if json {
        print_json(data)
    } else {
        println!("{}", render(data));
        Ok(())
    }
}

/// Prints a cacheable response, noting on stderr when it came from the cache
fn print_fetched<T: Serialize>(
    fetched: &Fetched<T>,
    json: bool,
    render: impl Fn(&T) -> String,
) -> Result<(), serde_json::Error> {
    if let Some(note) = output::source_note(&fetched.source) {
        eprintln!("{}", note);
    }
    print_data(&fetched.data, json, render)
}

async fn run_videos(
    client: &ApiClient,
    command: VideoCommand,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    match command {
        VideoCommand::Featured => {
            let fetched = client.featured_videos().await?;
            print_fetched(&fetched, json, output::render_video_list)?;
        }
        VideoCommand::List { limit, offset } => {
            let fetched = client.all_videos(limit, offset).await?;
            print_fetched(&fetched, json, output::render_video_list)?;
        }
        VideoCommand::Search(args) => {
            let query = args.to_query()?;
            let list = client.search_videos(&query).await?;
            print_data(&list, json, output::render_video_list)?;
        }
        VideoCommand::Category { category } => {
            let category = parse_category_arg(&category)?;
            let list = client.videos_by_category(category).await?;
            print_data(&list, json, output::render_video_list)?;
        }
        VideoCommand::Show { video_id } => {
            let video = client.video(&video_id).await?;
            print_data(&video, json, output::render_video)?;
        }
        VideoCommand::Drill { drill_id } => {
            let list = match client.videos_for_drill(&drill_id).await {
                Err(e) if e.is_not_found() => VideoList::default(),
                other => other?,
            };
            print_data(&list, json, output::render_video_list)?;
        }
        VideoCommand::Plan { drill_ids } => {
            let plan = client.videos_for_correction_plan(&drill_ids).await?;
            print_data(&plan, json, output::render_plan_videos)?;
        }
        VideoCommand::Tags => {
            let tags = client.video_tags().await?;
            print_data(&tags, json, output::render_tags)?;
        }
        VideoCommand::View { video_id } => {
            client.increment_video_view(&video_id).await;
            if !json {
                println!("View sent for {}", video_id);
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = cli.client_config(ClientConfig::from_env());
    debug!(?config, "resolved configuration");

    let client = ApiClient::new(&config)?;
    let json = cli.json;

    match cli.command {
        Command::Analyze(args) => {
            let input = args.to_input()?;
            let fetched = client.analyze_swing(&input).await?;
            print_fetched(&fetched, json, output::render_report)?;
        }
        Command::Videos(command) => run_videos(&client, command, json).await?,
        Command::Cache(CacheCommand::Clear) => {
            let removed = client.clear_cache();
            if json {
                print_json(&serde_json::json!({ "removed": removed }))?;
            } else {
                println!("Removed {} cached response(s)", removed);
            }
        }
        Command::Status => {
            let online = client.is_online().await;
            if json {
                print_json(&serde_json::json!({
                    "base_url": client.base_url().as_str(),
                    "online": online,
                }))?;
            } else if online {
                println!("Online: {}", client.base_url());
            } else {
                println!("Offline: {} is not reachable", client.base_url());
            }
            if !online {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
