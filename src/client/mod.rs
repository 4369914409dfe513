//! Remote client abstraction for tunnel routes.
//!
//! The reconciler talks to the remote service through [`RouteClient`] so the
//! HTTP implementation ([`CloudflareClient`]) and in-memory doubles are
//! interchangeable.

mod cloudflare;
mod error;

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::route::TunnelRoute;

pub use cloudflare::{CloudflareClient, DEFAULT_BASE_URL};
pub use error::{ApiMessage, ClientError};

/// Future returned by client operations.
pub type ClientFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Filter for listing routes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListRoutesParams {
    /// Account to list routes for; sent in the path, not the query.
    #[serde(skip)]
    pub account_id: String,
    /// Only return routes whose network is a subset of this CIDR.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_subset: String,
    /// Only return routes whose network is a superset of this CIDR.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_superset: String,
    /// Restrict results to one virtual network.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub virtual_network_id: String,
    /// Whether soft-deleted routes are included.
    pub is_deleted: bool,
}

impl ListRoutesParams {
    /// Builds an exact-match filter for a single network: the network is
    /// used as both the subset and superset bound.
    #[must_use]
    pub fn exact(account_id: &str, network: &str, virtual_network_id: &str) -> Self {
        Self {
            account_id: account_id.to_owned(),
            network_subset: network.to_owned(),
            network_superset: network.to_owned(),
            virtual_network_id: virtual_network_id.to_owned(),
            is_deleted: false,
        }
    }
}

/// Parameters for creating a route.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateRouteParams {
    /// Owning account.
    pub account_id: String,
    /// Tunnel carrying the traffic.
    pub tunnel_id: String,
    /// CIDR network to route.
    pub network: String,
    /// Virtual network scope, empty for the default one.
    pub virtual_network_id: String,
    /// Comment, empty when unset.
    pub comment: String,
}

/// Parameters for replacing a route. The remote matches on network,
/// virtual network, and account; every other field is overwritten.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateRouteParams {
    /// Owning account.
    pub account_id: String,
    /// Tunnel carrying the traffic.
    pub tunnel_id: String,
    /// CIDR network to route.
    pub network: String,
    /// Virtual network scope, empty for the default one.
    pub virtual_network_id: String,
    /// Comment; an empty value clears the remote comment.
    pub comment: String,
}

/// Parameters for deleting a route by its natural key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeleteRouteParams {
    /// Owning account.
    pub account_id: String,
    /// CIDR network of the route.
    pub network: String,
    /// Virtual network scope, empty for the default one.
    pub virtual_network_id: String,
}

/// Operations the remote service exposes for tunnel routes.
pub trait RouteClient {
    /// Client specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists routes matching the filter.
    fn list_routes<'a>(
        &'a self,
        params: &'a ListRoutesParams,
    ) -> ClientFuture<'a, Vec<TunnelRoute>, Self::Error>;

    /// Creates a route and returns the remote representation.
    fn create_route<'a>(
        &'a self,
        params: &'a CreateRouteParams,
    ) -> ClientFuture<'a, TunnelRoute, Self::Error>;

    /// Replaces a route and returns the remote representation.
    fn update_route<'a>(
        &'a self,
        params: &'a UpdateRouteParams,
    ) -> ClientFuture<'a, TunnelRoute, Self::Error>;

    /// Deletes a route.
    fn delete_route<'a>(
        &'a self,
        params: &'a DeleteRouteParams,
    ) -> ClientFuture<'a, (), Self::Error>;
}
