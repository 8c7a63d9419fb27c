use reqwest::StatusCode;
use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    // Transport
    #[snafu(display("Failed to send http request: {}", source))]
    Transport { source: reqwest::Error },
    #[snafu(display("Received status {status} from {url}"))]
    UnexpectedStatus { status: StatusCode, url: String },

    // Deserialization
    #[snafu(display("Failed to decode response body"))]
    Decode { source: reqwest::Error },
    #[snafu(display("Encountered error during json serialization"))]
    SerializationErrorJson { source: serde_json::Error },

    // Timestamps
    #[snafu(display("Invalid {field} timestamp {value:?}"))]
    TimestampParse {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
    #[snafu(display("Missing {field} timestamp"))]
    MissingTimestamp { field: &'static str },

    // Store
    #[snafu(display("Store operation failed"))]
    Store { source: sqlx::Error },

    // Configuration
    #[snafu(display("Failed to read config file {path}"))]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to deserialize config file {path}"))]
    ConfigParse {
        path: String,
        source: serde_norway::Error,
    },
    #[snafu(display("Missing {name} environment variable"))]
    MissingEnvVar { name: &'static str },

    // Output
    #[snafu(display("Failed to write chart to {path}"))]
    WriteChart {
        path: String,
        source: std::io::Error,
    },
}

impl Error {
    /// Whether retrying the failed operation could plausibly succeed.
    /// Decode and timestamp errors are structural: the payload itself is
    /// wrong and a retry would fetch the same payload.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport { .. } | Error::Store { .. } => true,
            Error::UnexpectedStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
