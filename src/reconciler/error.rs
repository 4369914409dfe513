//! Errors surfaced by the tunnel route reconciler.

use thiserror::Error;

use crate::import::ImportError;
use crate::route::RouteSpecError;

/// Errors raised by [`super::TunnelRouteReconciler`] operations, generic
/// over the client error type.
#[derive(Debug, Error)]
pub enum ReconcileError<ClientError>
where
    ClientError: std::error::Error + 'static,
{
    /// Raised when desired state lacks a field the operation needs.
    #[error("invalid tunnel route configuration: {0}")]
    Validation(#[from] RouteSpecError),
    /// Raised when listing routes fails.
    #[error("failed to fetch Tunnel Route for network {network:?}: {source}")]
    Read {
        /// Network being looked up.
        network: String,
        /// Client failure.
        #[source]
        source: ClientError,
    },
    /// Raised when the create call fails.
    #[error("error creating Tunnel Route for network {network:?}: {source}")]
    Create {
        /// Network being created.
        network: String,
        /// Client failure.
        #[source]
        source: ClientError,
    },
    /// Raised when the update call fails.
    #[error("error updating Tunnel Route for network {network:?}: {source}")]
    Update {
        /// Network being updated.
        network: String,
        /// Client failure.
        #[source]
        source: ClientError,
    },
    /// Raised when the delete call fails.
    #[error("error deleting Tunnel Route for network {network:?}: {source}")]
    Delete {
        /// Network being deleted.
        network: String,
        /// Client failure.
        #[source]
        source: ClientError,
    },
    /// Raised when the recorded identifier no longer matches the desired
    /// network and virtual network. Those fields name the remote route, so
    /// acting on the record would address a different route than the one
    /// it tracks.
    #[error(
        "Tunnel Route {id:?} cannot become {desired:?}: network and virtual network \
         are fixed once created, destroy the route before changing them"
    )]
    IdentifierMismatch {
        /// Identifier held by the record.
        id: String,
        /// Identifier the desired fields resolve to.
        desired: String,
    },
    /// Raised when an import identifier is malformed.
    #[error(transparent)]
    Import(#[from] ImportError),
    /// Raised when reading state during import fails. The message stays
    /// generic; the failure is available through `source()`.
    #[error("failed to read Tunnel Route state")]
    ImportRead {
        /// Identifier being imported.
        id: String,
        /// Underlying read failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Raised when the imported route does not exist remotely.
    #[error("Tunnel Route {id:?} not found")]
    ImportNotFound {
        /// Identifier being imported.
        id: String,
    },
}
