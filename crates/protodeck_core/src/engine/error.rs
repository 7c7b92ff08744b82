//! Engine error types.

use super::address::AddressFields;
use crate::model::document::DocumentError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, EngineError>;

/// Link in the addressing chain that could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Module,
    Node,
    Overlay,
    OverlayItem,
    ScrollZone,
    Hotspot,
    GlobalHotspot,
    Comment,
}

impl Missing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Node => "node",
            Self::Overlay => "overlay",
            Self::OverlayItem => "overlay item",
            Self::ScrollZone => "scroll zone",
            Self::Hotspot => "hotspot",
            Self::GlobalHotspot => "global hotspot",
            Self::Comment => "comment",
        }
    }
}

/// Errors from resolution and mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Nothing exists at the resolved address.
    NotFound {
        missing: Missing,
        address: AddressFields,
        /// Entity key looked up at the final hop (hotspot/comment id, master name).
        key: Option<String>,
    },
    /// The document does not have the expected shape.
    Malformed(String),
    /// The request cannot be applied regardless of document content.
    InvalidRequest(String),
}

impl EngineError {
    pub(crate) fn not_found(missing: Missing, address: &AddressFields) -> Self {
        Self::NotFound {
            missing,
            address: address.clone(),
            key: None,
        }
    }

    pub(crate) fn not_found_key(
        missing: Missing,
        address: &AddressFields,
        key: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            missing,
            address: address.clone(),
            key: Some(key.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                missing,
                address,
                key: Some(key),
            } => write!(f, "{} `{key}` not found at {address}", missing.as_str()),
            Self::NotFound {
                missing,
                address,
                key: None,
            } => write!(f, "{} not found at {address}", missing.as_str()),
            Self::Malformed(message) => write!(f, "malformed: {message}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
        }
    }
}

impl Error for EngineError {}

impl From<DocumentError> for EngineError {
    fn from(value: DocumentError) -> Self {
        Self::Malformed(value.0)
    }
}
