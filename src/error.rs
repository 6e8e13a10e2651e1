use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::procurement::{DispatchError, ServiceError, StoreError, WorkflowError};
use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Workflow(WorkflowError),
    Store(StoreError),
    Dispatch(DispatchError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(err) => write!(f, "configuration error: {}", err),
            EngineError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            EngineError::Workflow(err) => write!(f, "workflow error: {}", err),
            EngineError::Store(err) => write!(f, "store error: {}", err),
            EngineError::Dispatch(err) => write!(f, "dispatch error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            EngineError::Telemetry(err) => Some(err),
            EngineError::Workflow(err) => Some(err),
            EngineError::Store(err) => Some(err),
            EngineError::Dispatch(err) => Some(err),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for EngineError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<WorkflowError> for EngineError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DispatchError> for EngineError {
    fn from(value: DispatchError) -> Self {
        Self::Dispatch(value)
    }
}

impl From<ServiceError> for EngineError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Workflow(err) => Self::Workflow(err),
            ServiceError::Store(err) => Self::Store(err),
            ServiceError::Dispatch(err) => Self::Dispatch(err),
        }
    }
}
