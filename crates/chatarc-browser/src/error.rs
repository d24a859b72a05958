use std::fmt;

/// Result type for chatarc-browser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the browser layer
#[derive(Debug)]
pub enum Error {
    /// WebDriver session could not be established
    Session(fantoccini::error::NewSessionError),

    /// A WebDriver command failed
    Command(fantoccini::error::CmdError),

    /// The app shell never appeared, even after the extended login grace period
    LoginTimeout { waited_secs: u64 },

    /// Configuration error (bad URL, unresolvable profile directory)
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Session(err) => write!(f, "WebDriver session error: {}", err),
            Error::Command(err) => write!(f, "WebDriver command error: {}", err),
            Error::LoginTimeout { waited_secs } => write!(
                f,
                "no authenticated app shell after {}s; giving up",
                waited_secs
            ),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Session(err) => Some(err),
            Error::Command(err) => Some(err),
            Error::LoginTimeout { .. } | Error::Config(_) => None,
        }
    }
}

impl From<fantoccini::error::NewSessionError> for Error {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        Error::Session(err)
    }
}

impl From<fantoccini::error::CmdError> for Error {
    fn from(err: fantoccini::error::CmdError) -> Self {
        Error::Command(err)
    }
}
