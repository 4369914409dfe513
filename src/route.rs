//! Tunnel route model: remote representation, typed desired state, and the
//! composite identifier.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::state::StateRecord;

/// Field names used by tunnel route state records.
pub mod fields {
    /// Owning account identifier.
    pub const ACCOUNT_ID: &str = "account_id";
    /// Tunnel that carries the routed traffic.
    pub const TUNNEL_ID: &str = "tunnel_id";
    /// CIDR network being routed.
    pub const NETWORK: &str = "network";
    /// Optional virtual network scoping the route.
    pub const VIRTUAL_NETWORK_ID: &str = "virtual_network_id";
    /// Free-text annotation.
    pub const COMMENT: &str = "comment";
}

/// Route as reported by the remote API.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct TunnelRoute {
    /// CIDR network routed through the tunnel.
    pub network: String,
    /// Tunnel identifier.
    #[serde(default)]
    pub tunnel_id: String,
    /// Human readable tunnel name.
    #[serde(default)]
    pub tunnel_name: String,
    /// Free-text annotation; the API omits it when empty.
    #[serde(default)]
    pub comment: String,
    /// Virtual network the route belongs to. The API always reports one,
    /// falling back to the account default.
    #[serde(default)]
    pub virtual_network_id: String,
    /// Creation timestamp as reported by the API.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Deletion timestamp for soft-deleted routes.
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// Errors raised when desired state is missing a required field.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RouteSpecError {
    /// Raised when a field required by the operation is empty.
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
}

/// Strongly typed desired state for a tunnel route.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteSpec {
    /// Owning account.
    pub account_id: String,
    /// Tunnel the route directs traffic through.
    pub tunnel_id: String,
    /// CIDR network, for example `192.168.0.0/26`.
    pub network: String,
    /// Virtual network scope; `None` targets the default virtual network.
    pub virtual_network_id: Option<String>,
    /// Comment sent to the API; empty when unset.
    pub comment: String,
}

impl RouteSpec {
    /// Starts a builder for a [`RouteSpec`].
    #[must_use]
    pub fn builder() -> RouteSpecBuilder {
        RouteSpecBuilder::new()
    }

    /// Reads desired state from a record. Absent or non-string values
    /// become empty rather than failing; use [`RouteSpec::require`] to
    /// enforce what an operation needs.
    #[must_use]
    pub fn from_record(record: &StateRecord) -> Self {
        Self {
            account_id: record.get_str(fields::ACCOUNT_ID).to_owned(),
            tunnel_id: record.get_str(fields::TUNNEL_ID).to_owned(),
            network: record.get_str(fields::NETWORK).to_owned(),
            virtual_network_id: non_empty(record.get_str(fields::VIRTUAL_NETWORK_ID)),
            comment: record.get_str(fields::COMMENT).to_owned(),
        }
    }

    /// Writes the desired fields into a record, leaving its identifier
    /// untouched.
    pub fn write_to(&self, record: &mut StateRecord) {
        record.set_str(fields::ACCOUNT_ID, &self.account_id);
        record.set_str(fields::TUNNEL_ID, &self.tunnel_id);
        record.set_str(fields::NETWORK, &self.network);
        if let Some(vnet) = &self.virtual_network_id {
            record.set_str(fields::VIRTUAL_NETWORK_ID, vnet);
        }
        record.set_str(fields::COMMENT, &self.comment);
    }

    /// Virtual network id as sent to the API, empty when unset.
    #[must_use]
    pub fn virtual_network_or_empty(&self) -> &str {
        self.virtual_network_id.as_deref().unwrap_or_default()
    }

    /// Ensures every listed field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`RouteSpecError::MissingField`] for the first empty field.
    pub fn require(&self, required: &[&'static str]) -> Result<(), RouteSpecError> {
        for &field in required {
            let value = match field {
                fields::ACCOUNT_ID => self.account_id.as_str(),
                fields::TUNNEL_ID => self.tunnel_id.as_str(),
                fields::NETWORK => self.network.as_str(),
                fields::VIRTUAL_NETWORK_ID => self.virtual_network_or_empty(),
                _ => self.comment.as_str(),
            };
            if value.is_empty() {
                return Err(RouteSpecError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Identifier for this route once created.
    #[must_use]
    pub fn route_id(&self) -> RouteId {
        RouteId::new(&self.network, self.virtual_network_id.as_deref())
    }
}

/// Builder for [`RouteSpec`] that trims every input.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteSpecBuilder {
    account_id: String,
    tunnel_id: String,
    network: String,
    virtual_network_id: Option<String>,
    comment: String,
}

impl RouteSpecBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account identifier.
    #[must_use]
    pub fn account_id(mut self, value: impl Into<String>) -> Self {
        self.account_id = value.into();
        self
    }

    /// Sets the tunnel identifier.
    #[must_use]
    pub fn tunnel_id(mut self, value: impl Into<String>) -> Self {
        self.tunnel_id = value.into();
        self
    }

    /// Sets the CIDR network.
    #[must_use]
    pub fn network(mut self, value: impl Into<String>) -> Self {
        self.network = value.into();
        self
    }

    /// Sets the optional virtual network.
    #[must_use]
    pub fn virtual_network_id(mut self, value: Option<String>) -> Self {
        self.virtual_network_id = value;
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, value: impl Into<String>) -> Self {
        self.comment = value.into();
        self
    }

    /// Builds the spec and checks the fields every operation needs.
    ///
    /// # Errors
    ///
    /// Returns [`RouteSpecError::MissingField`] when `account_id` or
    /// `network` is empty after trimming.
    pub fn build(self) -> Result<RouteSpec, RouteSpecError> {
        let spec = RouteSpec {
            account_id: self.account_id.trim().to_owned(),
            tunnel_id: self.tunnel_id.trim().to_owned(),
            network: self.network.trim().to_owned(),
            virtual_network_id: self
                .virtual_network_id
                .as_deref()
                .and_then(|value| non_empty(value.trim())),
            comment: self.comment.trim().to_owned(),
        };
        spec.require(&[fields::ACCOUNT_ID, fields::NETWORK])?;
        Ok(spec)
    }
}

/// Composite identifier of a tunnel route: the network, qualified by the
/// virtual network when one is set.
///
/// Several routes may share a network when they live in different virtual
/// networks, so the network alone is only unique in the default one.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RouteId {
    network: String,
    virtual_network_id: Option<String>,
}

impl RouteId {
    /// Builds an identifier; an empty virtual network counts as absent.
    #[must_use]
    pub fn new(network: &str, virtual_network_id: Option<&str>) -> Self {
        Self {
            network: network.to_owned(),
            virtual_network_id: virtual_network_id.and_then(non_empty),
        }
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.virtual_network_id {
            Some(vnet) => write!(f, "{}/{vnet}", self.network),
            None => f.write_str(&self.network),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
