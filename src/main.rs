use chrono::Utc;
use dotenv::dotenv;
use room_scrape::{
    MAX_IN_FLIGHT_REQUESTS, ScrapingConfig, ScrapingContext, run_room_scrape_job, write_outputs,
};

extern crate env_logger;
extern crate log;

use log::LevelFilter;

use log::{error, info, warn};

async fn run(scraping_context: &mut ScrapingContext) -> anyhow::Result<()> {
    let report = run_room_scrape_job(scraping_context).await?;
    if report.summary.error_count > 0 {
        warn!(
            "{} of {} timetables had parse errors, their free times are best-effort",
            report.summary.error_count, report.summary.timetable_count
        );
    }

    info!("Printing free room table to stdout and saving to files");
    write_outputs(
        &report.table,
        &scraping_context.scraping_config.output_dir,
        Utc::now(),
    )?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let scraping_config = ScrapingConfig::new();
    let level = match &scraping_config {
        Ok(config) if config.debug_mode => LevelFilter::Debug,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let scraping_context = scraping_config.and_then(ScrapingContext::with_config);
    let mut scraping_context = match scraping_context {
        Ok(scraping_context) => scraping_context,
        Err(e) => {
            error!("room_scrape failed to start, exiting: {e:#}");
            std::process::exit(1);
        }
    };

    info!(
        "Starting room_scrape for rooms matching {} (week offset {}, {} request in flight)",
        scraping_context.scraping_config.room_selector.pattern(),
        scraping_context.scraping_config.week_offset,
        MAX_IN_FLIGHT_REQUESTS
    );

    if let Err(e) = run(&mut scraping_context).await {
        error!("room_scrape failed: {e:#}");
        std::process::exit(1);
    }
}
