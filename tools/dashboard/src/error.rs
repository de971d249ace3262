/// Dashboard client error variants.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status} from {path}")]
    Status { status: u16, path: String },
    #[error("undecodable payload from {path}: {source}")]
    Payload {
        path: String,
        source: serde_json::Error,
    },
}

impl DashboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT",
            Self::Status { .. } => "STATUS",
            Self::Payload { .. } => "PAYLOAD",
        }
    }
}
