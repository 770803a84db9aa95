/// Hidden ASP.NET fields echoed back on every room submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormTokens {
    pub view_state: Option<String>,
    pub view_state_generator: Option<String>,
    pub event_validation: Option<String>,
}

impl FormTokens {
    pub const VIEW_STATE: &'static str = "__VIEWSTATE";
    pub const VIEW_STATE_GENERATOR: &'static str = "__VIEWSTATEGENERATOR";
    pub const EVENT_VALIDATION: &'static str = "__EVENTVALIDATION";

    /// Stores `value` if `name` is one of the three token fields. Returns
    /// whether it was.
    pub fn capture(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            Self::VIEW_STATE => &mut self.view_state,
            Self::VIEW_STATE_GENERATOR => &mut self.view_state_generator,
            Self::EVENT_VALIDATION => &mut self.event_validation,
            _ => return false,
        };
        *slot = Some(value.to_string());
        true
    }

    /// Names of the tokens the landing page did not carry.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (Self::VIEW_STATE, &self.view_state),
            (Self::VIEW_STATE_GENERATOR, &self.view_state_generator),
            (Self::EVENT_VALIDATION, &self.event_validation),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A room option taken from the landing page's `CboLocation` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCandidate(pub String);

impl RoomCandidate {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a room submission needs besides the room itself.
///
/// Built once from the landing page and never changed afterwards; the room is
/// layered on per request by [`SessionState::form_for_room`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub tokens: FormTokens,
    pub week_code: String,
}

// Query defaults the site expects with every "Generate Timetable" postback.
const SCHOOL_WILDCARD: &str = "%";
const DEPT_WILDCARD: &str = "%";
const START_TIME_CODE: &str = "1";
const END_TIME_CODE: &str = "9";
const RETRIEVE_BUTTON_LABEL: &str = "Generate Timetable";

impl SessionState {
    pub fn new(tokens: FormTokens, week_code: String) -> Self {
        Self { tokens, week_code }
    }

    /// The full URL-encodable form body for one room. Absent tokens are left
    /// out rather than sent empty.
    pub fn form_for_room(&self, room: &RoomCandidate) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("__EVENTTARGET", String::new()),
            ("__EVENTARGUMENT", String::new()),
            ("__LASTFOCUS", String::new()),
            ("hProgram", String::new()),
            ("hStudentcount", String::new()),
            ("cboSchool", SCHOOL_WILDCARD.to_string()),
            ("CboDept", DEPT_WILDCARD.to_string()),
            ("CboStartTime", START_TIME_CODE.to_string()),
            ("CboEndTime", END_TIME_CODE.to_string()),
            ("BtnRetrieve", RETRIEVE_BUTTON_LABEL.to_string()),
        ];
        let tokens = [
            (FormTokens::VIEW_STATE, &self.tokens.view_state),
            (FormTokens::VIEW_STATE_GENERATOR, &self.tokens.view_state_generator),
            (FormTokens::EVENT_VALIDATION, &self.tokens.event_validation),
        ];
        for (name, value) in tokens {
            if let Some(value) = value {
                form.push((name, value.clone()));
            }
        }
        form.push(("CboWeeks", self.week_code.clone()));
        form.push(("CboLocation", room.id().to_string()));
        form
    }
}
