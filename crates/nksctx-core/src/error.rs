use std::fmt;

/// One regional endpoint that could not produce a cluster list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub reason: String,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

#[derive(Debug)]
pub enum NksError {
    Configuration(String),
    AllEndpointsFailed(Vec<EndpointFailure>),
    Materialization { cluster: String, reason: String },
    Store(String),
    NotFound(String),
}

impl fmt::Display for NksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "{msg}"),
            Self::AllEndpointsFailed(failures) => {
                write!(f, "all API endpoints failed:")?;
                for failure in failures {
                    write!(f, "\n  {failure}")?;
                }
                Ok(())
            }
            Self::Materialization { cluster, reason } => write!(f, "failed to sync {cluster}: {reason}"),
            Self::Store(msg) => write!(f, "{msg}"),
            Self::NotFound(name) => {
                write!(f, "context not found for '{name}'.\nRun 'kubectl nks-ctx' first to sync clusters.")
            }
        }
    }
}

impl std::error::Error for NksError {}

impl From<nksctx_config::CredentialsError> for NksError {
    fn from(err: nksctx_config::CredentialsError) -> Self {
        Self::Configuration(err.to_string())
    }
}
