use std::env;
use std::process::ExitCode;

use names_crawlers::models::config::AppConfig;
use names_crawlers::processing::harvest::{HarvestError, run_update};
use names_crawlers::processing::search::find_closest;
use names_crawlers::repository::{DatasetReader, YamlRepository};

const USAGE: &str = "usage: names-crawlers <update | status | search QUERY>";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config_file = env::var("NAMES_CONFIG").unwrap_or_else(|_| "config.yml".to_string());
    let config = match AppConfig::load(&config_file) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let repo = YamlRepository::new(&config.dataset_path);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("update") => match run_update(&config).await {
            Ok(report) => {
                println!("Update done: {} names", report.unique_names);
                for failure in &report.failed {
                    println!("  skipped {}: {}", failure.source, failure.error);
                }
                ExitCode::SUCCESS
            }
            Err(HarvestError::AllSourcesFailed(failures)) => {
                for failure in &failures {
                    log::error!("{}: {}", failure.source, failure.error);
                }
                log::error!("Update failed, dataset unchanged");
                ExitCode::FAILURE
            }
            Err(e) => {
                log::error!("Update failed: {e}");
                ExitCode::FAILURE
            }
        },
        Some("status") => match repo.status() {
            Ok(status) => {
                println!("{:<10}: {}", "Filename", status.path.display());
                println!("{:<10}: {}", "Updated", status.updated_label());
                println!("{:<10}: {}", "Count", status.count);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to read dataset: {e}");
                ExitCode::FAILURE
            }
        },
        Some("search") if args.len() == 2 => {
            let dataset = match repo.load() {
                Ok(dataset) => dataset,
                Err(e) => {
                    log::error!("Failed to read dataset: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let result = find_closest(&args[1], &dataset);
            for name in &result.names {
                println!("{name}");
            }
            match result.min_distance {
                Some(min) => println!("min distance: {min}"),
                None => println!("dataset is empty"),
            }
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}
