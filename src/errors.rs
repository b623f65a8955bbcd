use thiserror::Error;

/// Failure to build the shared Kubernetes connection.
///
/// Cached by the client provider and handed out to every later caller,
/// so it has to be cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to connect kubernetes: {0}")]
pub struct ClientInitError(String);

impl ClientInitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<anyhow::Error> for ClientInitError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(init) = err.downcast_ref::<ClientInitError>() {
            return init.clone();
        }
        // Keep the whole context chain in the message.
        Self(format!("{err:#}"))
    }
}

#[derive(Debug, Error)]
pub enum PodDiscoveryError {
    #[error(transparent)]
    ClientInit(#[from] ClientInitError),

    #[error("Invalid pod name pattern: {0}")]
    InvalidNamePattern(#[from] regex::Error),

    #[error("Failed to list pods in namespace '{namespace}': {source:#}")]
    ListFailed {
        namespace: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PodDiscoveryError {
    /// True when the shared connection could not be built. Such failures are
    /// permanent for the provider that produced them.
    pub fn is_client_init(&self) -> bool {
        matches!(self, PodDiscoveryError::ClientInit(_))
    }
}
