use std::fmt;

/// Every failure a user can see collapses into one of these kinds, each with
/// a single canonical message. Call sites pick the kind, never the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    LocationDenied,
    LocationUnavailable,
    BackendUnavailable,
    BackendRejected,
    EmptyMessage,
    InvalidCredentials,
    LoginFailed,
}

impl ErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::LocationDenied =>
                "Location access denied. Please enable location services.",
            ErrorKind::LocationUnavailable => "Unable to get your location",
            ErrorKind::BackendUnavailable => "Service is currently unavailable. Please try again later.",
            ErrorKind::BackendRejected => "The request could not be processed. Please try again.",
            ErrorKind::EmptyMessage => "Please enter a health question",
            ErrorKind::InvalidCredentials => "Invalid credentials",
            ErrorKind::LoginFailed => "Something went wrong",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}
