use log::info;

use crate::{
    result_aggregator::{AggregateReport, ResultAggregator},
    room_request_dispatcher::RoomRequestDispatcher,
    scraping_context::ScrapingContext,
    session_bootstrapper::SessionBootstrapper,
};

/// Bootstrap, request every selected room, then fold the timetables.
///
/// Errors only when the bootstrap fails; individual rooms that fail are
/// dropped by the dispatcher.
pub async fn run_room_scrape_job(
    scraping_context: &mut ScrapingContext,
) -> anyhow::Result<AggregateReport> {
    let bootstrapper = SessionBootstrapper::from_config(&scraping_context.scraping_config);
    let session = bootstrapper
        .bootstrap(&scraping_context.request_client)
        .await?;

    let url = scraping_context.scraping_config.room_timetable_url.as_str();
    let mut dispatcher =
        RoomRequestDispatcher::new(&mut scraping_context.request_client, url, &session.state);
    let timetables = dispatcher.dispatch_all(&session.rooms).await;

    let report = ResultAggregator::aggregate(&timetables);
    info!(
        "Finished all requests: timetableCount={} errors={} emptyTimetables={} freeTimesCount={}",
        report.summary.timetable_count,
        report.summary.error_count,
        report.summary.empty_timetable_count,
        report.summary.free_times_count
    );
    Ok(report)
}
