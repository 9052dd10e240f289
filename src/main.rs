use archivescraper::storage::write_report;
use archivescraper::{date_range, ChromeBrowser, CsvStorage, HarvestResult, Harvester};
use chrono::Local;
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("archivescraper", log::LevelFilter::Info)
        .filter_module("tungstenite", log::LevelFilter::Error)
        .parse_default_env()
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> HarvestResult<ExitCode> {
    let fail_on_error = cli.fail_on_error;
    let config = cli.into_config()?;

    let dates = date_range(config.start, config.end);
    info!(
        "Harvesting {} days from {} to {} (exclusive)",
        dates.len(),
        config.start,
        config.end
    );

    let storage = CsvStorage::new(&config.output)?;
    let browser = ChromeBrowser::new(config.browser.clone());
    let harvester = Harvester::new(browser, storage, config);

    println!("Starting Time: {}", Local::now());
    let (table, report) = harvester.run(&dates).await;
    println!("End Time: {}", Local::now());

    harvester.stats().print_summary();

    if let Some(path) = &harvester.config().report {
        write_report(&report, path)?;
    }

    let failed = report.failures().count();
    println!(
        "\nDone: {} links from {} days written to {} ({} days failed)",
        table.len(),
        dates.len(),
        report.output,
        failed
    );

    if fail_on_error && failed > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
