use log::{error, info, warn};

use crate::{
    requests::RequestClient,
    session_state::{RoomCandidate, SessionState},
    timetable::Timetable,
    timetable_parser::TimetableParser,
};

/// Replays the bootstrapped session once per room, strictly one request at a
/// time.
///
/// Holds the client by `&mut` for its whole life, so nothing else can send on
/// the session while rooms are being requested.
#[derive(Debug)]
pub struct RoomRequestDispatcher<'a> {
    request_client: &'a mut RequestClient,
    url: &'a str,
    state: &'a SessionState,
}

impl<'a> RoomRequestDispatcher<'a> {
    pub fn new(request_client: &'a mut RequestClient, url: &'a str, state: &'a SessionState) -> Self {
        Self {
            request_client,
            url,
            state,
        }
    }

    /// Requests every room in order. Rooms whose request fails are logged and
    /// left out; the returned records keep the order of `rooms`.
    pub async fn dispatch_all(&mut self, rooms: &[RoomCandidate]) -> Vec<Timetable> {
        let mut timetables = Vec::with_capacity(rooms.len());
        for room in rooms {
            match self.dispatch(room).await {
                Ok(timetable) => timetables.push(timetable),
                Err(e) => error!("Requesting room {room} failed, dropping it: {e:#}"),
            }
        }
        timetables
    }

    pub async fn dispatch(&mut self, room: &RoomCandidate) -> anyhow::Result<Timetable> {
        info!("Requesting room {room}");
        let form = self.state.form_for_room(room);
        let html = self.request_client.submit_form_body(self.url, &form).await?;

        let mut timetable = TimetableParser::parse(&html);
        if timetable.room.is_empty() {
            warn!("Timetable for {room} names no room, using the requested id");
            timetable.room = room.id().to_string();
        } else if timetable.room != room.id() {
            // A stale page from a confused session. Its slots belong to the
            // room we asked for, or that room would go missing while the
            // other one shows up twice.
            error!(
                "Requested room {room} but the page is for {}",
                timetable.room
            );
            timetable.has_error = true;
            timetable.room = room.id().to_string();
        }
        Ok(timetable)
    }
}
