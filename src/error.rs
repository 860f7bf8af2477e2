use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level error type for the engine. Each concern gets its own variant enum,
/// composed here via `#[from]`, following the house convention of one file of
/// error kinds per subsystem rolled up into a single crate-wide error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Decomposition(#[from] DecompositionError),

    #[error(transparent)]
    LotInvariant(#[from] LotInvariantError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Event-field validation failures, raised at construction. A handler is never
/// invoked with an event that failed this validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

/// Missing rate or division-by-zero while converting between currencies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("no rate available to convert {from} to {to}")]
    NoRate { from: String, to: String },

    #[error("zero rate encountered converting {from} to {to}")]
    ZeroRate { from: String, to: String },
}

/// Missing rates needed to split a cross trade into direct-pair legs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecompositionError {
    #[error("missing market rate for leg pair {0}")]
    MissingRate(String),

    #[error("missing open mid for leg pair {0}")]
    MissingOpenMid(String),

    #[error("invalid leg for pair {0}: {1}")]
    InvalidLeg(String, String),
}

/// Bad quantities, wrong-side match attempts, or unknown risk pairs. Fatal:
/// callers abort the run on this variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LotInvariantError {
    #[error("risk pair {0} is not a direct pair (must quote the reporting currency)")]
    NotDirectPair(String),

    #[error("lot quantity must be positive, got {0}")]
    NonPositiveQuantity(String),

    #[error("reduction {delta} exceeds open quantity {quantity} on lot {lot_id}")]
    OverReduction {
        lot_id: String,
        delta: String,
        quantity: String,
    },

    #[error("risk pair {0} is not configured on the lot manager")]
    UnconfiguredPair(String),

    #[error("qty_closed must satisfy 0 < qty_closed <= original_quantity, got {0}")]
    InvalidClosedQuantity(String),
}

/// Catch-all for a handler's unexpected internal failure; logged with full
/// event context by the processor and re-raised.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler failed while processing event {event_kind} at {timestamp}: {source}")]
    Failed {
        event_kind: &'static str,
        timestamp: String,
        #[source]
        source: Box<EngineError>,
    },
}

/// File-system, (de)serialization, and columnar-codec failures in the I/O layer.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("columnar read/write failed: {0}")]
    Polars(String),

    #[error("unrecognized event-kind tag: {0}")]
    UnknownEventKind(String),

    #[error("malformed decimal field '{field}': {value}")]
    MalformedDecimal { field: String, value: String },

    #[error("malformed timestamp field '{field}': {value}")]
    MalformedTimestamp { field: String, value: String },
}

impl From<polars::prelude::PolarsError> for IoError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        IoError::Polars(value.to_string())
    }
}

/// YAML-parsing and validation failures in the configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
