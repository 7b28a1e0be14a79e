//! Error types for the classification engine.

use thiserror::Error;

use crate::position::{LegType, Stage};

/// Errors raised while building, enriching or classifying the position model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A required key is absent from an inbound record.
    #[error("{record} record is missing `{field}`")]
    MissingField {
        /// Record kind (position, contract detail, market snapshot).
        record: &'static str,
        /// Wire name of the absent key.
        field: &'static str,
    },

    /// A key is present but its value cannot be used.
    #[error("invalid value for `{field}`: {value}")]
    InvalidField {
        /// Wire name of the offending key.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Days to expiry is zero, so annualized figures are undefined.
    #[error("contract {conid} has zero days to expiry; annualized yield is undefined")]
    DegenerateTenor {
        /// Contract id.
        conid: i64,
    },

    /// The option has already expired relative to the valuation clock.
    #[error("contract {conid} expired {} day(s) ago", -days_to_expiry)]
    ContractExpired {
        /// Contract id.
        conid: i64,
        /// Negative days to expiry.
        days_to_expiry: i64,
    },

    /// An enrichment step was called out of order.
    #[error("cannot {operation} position {conid} in stage {stage}")]
    StageViolation {
        /// Contract id of the position.
        conid: i64,
        /// Rejected operation.
        operation: &'static str,
        /// Stage the position was in.
        stage: Stage,
    },

    /// A position was offered to a campaign of another underlying.
    #[error("position {conid} has underlying {actual}, campaign is {expected}")]
    UnderlyingMismatch {
        /// Contract id of the position.
        conid: i64,
        /// Campaign underlying.
        expected: i64,
        /// Position underlying.
        actual: i64,
    },

    /// Closing orders are only built for single option legs.
    #[error("position {conid} ({leg_type}) cannot be closed by a target order")]
    NotClosable {
        /// Contract id of the position.
        conid: i64,
        /// Leg type of the position.
        leg_type: LegType,
    },

    /// No target price has been derived for the contract.
    #[error("contract {conid} has no target price")]
    MissingTargetPrice {
        /// Contract id.
        conid: i64,
    },
}

impl EngineError {
    /// Creates a missing field error.
    pub const fn missing(record: &'static str, field: &'static str) -> Self {
        Self::MissingField { record, field }
    }

    /// Whether the error only says the option cannot be valued at this
    /// clock (zero or negative days to expiry).
    pub const fn is_tenor(&self) -> bool {
        matches!(
            self,
            Self::DegenerateTenor { .. } | Self::ContractExpired { .. }
        )
    }

    /// Creates an invalid field error.
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
