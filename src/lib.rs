//! Core library for the `tunroute` tunnel route reconciler.
//!
//! The crate exposes a client abstraction over the Cloudflare tunnel route
//! API, a reconciler that maps desired state onto remote calls, an import
//! parser for route identifiers, and a convergence driver that decides
//! between create, update and no change.

pub mod client;
pub mod config;
pub mod converge;
pub mod import;
pub mod logging;
pub mod reconciler;
pub mod resource;
pub mod route;
pub mod state;
pub mod test_support;

pub use client::{
    ApiMessage, ClientError, CloudflareClient, CreateRouteParams, DEFAULT_BASE_URL,
    DeleteRouteParams, ListRoutesParams, RouteClient, UpdateRouteParams,
};
pub use config::{CloudflareConfig, ConfigError};
pub use converge::{ApplyOutcome, Converger, Plan};
pub use import::{ImportError, ImportId};
pub use reconciler::{ReconcileError, TunnelRouteReconciler};
pub use resource::{ReadOutcome, Resource, ResourceFuture};
pub use route::{RouteId, RouteSpec, RouteSpecBuilder, RouteSpecError, TunnelRoute, fields};
pub use state::{StateFile, StateRecord, StateStore, StateStoreError};
