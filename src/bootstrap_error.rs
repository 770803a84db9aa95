#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// The landing page has no `CboLocation` room selector.
    MissingRoomSelector { url: String },
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::MissingRoomSelector { url } => {
                write!(f, "The landing page at {url} has no room selector!")
            }
        }
    }
}

impl std::error::Error for BootstrapError {}
