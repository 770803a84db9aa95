mod bootstrap_error;
mod config;
mod output;
mod requests;
mod result_aggregator;
mod room_request_dispatcher;
mod room_scrape_job;
mod scraping_context;
mod session_bootstrapper;
mod session_state;
mod text_manipulators;
mod timetable;
mod timetable_parser;

pub use bootstrap_error::BootstrapError;
pub use config::{
    DEFAULT_ROOM_TIMETABLE_URL, LoadFromEnv, MAX_IN_FLIGHT_REQUESTS, RoomSelector, ScrapingConfig,
    ScrapingEnv,
};
pub use output::{GRID_TIMES, WrittenOutputs, render_ascii_grid, render_json, write_outputs};
pub use requests::RequestClient;
pub use result_aggregator::{AggregateReport, FreeRoomTable, ResultAggregator, RunSummary};
pub use room_request_dispatcher::RoomRequestDispatcher;
pub use room_scrape_job::run_room_scrape_job;
pub use scraping_context::ScrapingContext;
pub use session_bootstrapper::{BootstrappedSession, SessionBootstrapper, resolve_week_code};
pub use session_state::{FormTokens, RoomCandidate, SessionState};
pub use timetable::{Timetable, Weekday};
pub use timetable_parser::TimetableParser;
