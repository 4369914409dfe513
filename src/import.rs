//! Parsing of tunnel route import identifiers.
//!
//! The accepted forms are `accountID/network` and
//! `accountID/network/virtualNetworkID`. The network is CIDR notation and
//! always contributes exactly one inner slash, so the forms are told apart
//! purely by segment count: three segments without a virtual network, four
//! with one.

use thiserror::Error;

use crate::route::{RouteId, fields};
use crate::state::StateRecord;

/// Errors raised for malformed import identifiers.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ImportError {
    /// Raised when the identifier matches neither accepted form.
    #[error(
        "invalid id ({id:?}) specified, should be in format \"accountID/network\" or \"accountID/network/virtual_network_id\""
    )]
    InvalidFormat {
        /// Identifier as supplied by the user.
        id: String,
    },
}

/// Decomposed import identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportId {
    /// Owning account.
    pub account_id: String,
    /// CIDR network, rejoined from its address and mask segments.
    pub network: String,
    /// Virtual network carried by the four-segment form.
    pub virtual_network_id: Option<String>,
}

impl ImportId {
    /// Parses an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidFormat`] unless the identifier has
    /// exactly three or four non-empty `/`-separated segments.
    pub fn parse(raw: &str) -> Result<Self, ImportError> {
        let invalid = || ImportError::InvalidFormat { id: raw.to_owned() };
        // Every `/` splits, so a virtual network id containing `/` (as in
        // `a/b/c/d/e`) is rejected instead of swallowing the tail.
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid());
        }

        match segments.as_slice() {
            [account, address, mask] => Ok(Self {
                account_id: (*account).to_owned(),
                network: format!("{address}/{mask}"),
                virtual_network_id: None,
            }),
            [account, address, mask, vnet] => Ok(Self {
                account_id: (*account).to_owned(),
                network: format!("{address}/{mask}"),
                virtual_network_id: Some((*vnet).to_owned()),
            }),
            _ => Err(invalid()),
        }
    }

    /// Identifier the imported record is stored under.
    #[must_use]
    pub fn route_id(&self) -> RouteId {
        RouteId::new(&self.network, self.virtual_network_id.as_deref())
    }

    /// Seeds a state record with the fields needed to read the route.
    #[must_use]
    pub fn to_record(&self) -> StateRecord {
        let mut record = StateRecord::new();
        record.set_id(self.route_id().to_string());
        record.set_str(fields::ACCOUNT_ID, &self.account_id);
        record.set_str(fields::NETWORK, &self.network);
        if let Some(vnet) = &self.virtual_network_id {
            record.set_str(fields::VIRTUAL_NETWORK_ID, vnet);
        }
        record
    }
}
