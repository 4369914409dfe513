//! Tunnel route reconciler.
//!
//! Translates desired tunnel route state into remote calls and copies what
//! the remote service reports back into the state record. Each operation
//! issues one action call followed, where needed, by a confirming read.

mod error;

use tracing::{debug, info};

use crate::client::{
    CreateRouteParams, DeleteRouteParams, ListRoutesParams, RouteClient, UpdateRouteParams,
};
use crate::import::ImportId;
use crate::resource::{ReadOutcome, Resource, ResourceFuture};
use crate::route::{RouteId, RouteSpec, TunnelRoute, fields};
use crate::state::StateRecord;

pub use error::ReconcileError;

const READ_FIELDS: &[&str] = &[fields::ACCOUNT_ID, fields::NETWORK];
const WRITE_FIELDS: &[&str] = &[fields::ACCOUNT_ID, fields::TUNNEL_ID, fields::NETWORK];
const DELETE_FIELDS: &[&str] = &[fields::ACCOUNT_ID, fields::NETWORK];
const MUTABLE_FIELDS: &[&str] = &[fields::TUNNEL_ID, fields::COMMENT];

/// Reconciles tunnel routes through an injected [`RouteClient`].
#[derive(Clone, Debug)]
pub struct TunnelRouteReconciler<C> {
    client: C,
}

impl<C> TunnelRouteReconciler<C>
where
    C: RouteClient + Sync,
{
    /// Creates a reconciler that issues every remote call through `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Looks up the route matching the desired natural key. The first match
    /// is authoritative; `None` means the route does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] when the account or network is
    /// missing and [`ReconcileError::Read`] when the list call fails.
    pub async fn find_route(
        &self,
        spec: &RouteSpec,
    ) -> Result<Option<TunnelRoute>, ReconcileError<C::Error>> {
        spec.require(READ_FIELDS)?;
        let params = ListRoutesParams::exact(
            &spec.account_id,
            &spec.network,
            spec.virtual_network_or_empty(),
        );
        let routes =
            self.client
                .list_routes(&params)
                .await
                .map_err(|source| ReconcileError::Read {
                    network: spec.network.clone(),
                    source,
                })?;
        Ok(routes.into_iter().next())
    }

    /// Creates the route and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] when a required field is
    /// missing and [`ReconcileError::Create`] when the create call fails.
    pub async fn create_route(&self, spec: &RouteSpec) -> Result<RouteId, ReconcileError<C::Error>> {
        spec.require(WRITE_FIELDS)?;
        let params = CreateRouteParams {
            account_id: spec.account_id.clone(),
            tunnel_id: spec.tunnel_id.clone(),
            network: spec.network.clone(),
            virtual_network_id: spec.virtual_network_or_empty().to_owned(),
            comment: spec.comment.clone(),
        };
        let created = self
            .client
            .create_route(&params)
            .await
            .map_err(|source| ReconcileError::Create {
                network: spec.network.clone(),
                source,
            })?;
        debug!(network = %created.network, "tunnel route created");
        Ok(RouteId::new(
            &created.network,
            spec.virtual_network_id.as_deref(),
        ))
    }

    /// Replaces the route with the spec. This is a full replace: an empty
    /// comment clears the remote one.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] when a required field is
    /// missing and [`ReconcileError::Update`] when the update call fails.
    pub async fn update_route(
        &self,
        spec: &RouteSpec,
    ) -> Result<TunnelRoute, ReconcileError<C::Error>> {
        spec.require(WRITE_FIELDS)?;
        let params = UpdateRouteParams {
            account_id: spec.account_id.clone(),
            tunnel_id: spec.tunnel_id.clone(),
            network: spec.network.clone(),
            virtual_network_id: spec.virtual_network_or_empty().to_owned(),
            comment: spec.comment.clone(),
        };
        self.client
            .update_route(&params)
            .await
            .map_err(|source| ReconcileError::Update {
                network: spec.network.clone(),
                source,
            })
    }

    /// Deletes the route by its natural key without checking that it
    /// exists first.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] when a required field is
    /// missing and [`ReconcileError::Delete`] when the delete call fails.
    pub async fn delete_route(&self, spec: &RouteSpec) -> Result<(), ReconcileError<C::Error>> {
        spec.require(DELETE_FIELDS)?;
        let params = DeleteRouteParams {
            account_id: spec.account_id.clone(),
            network: spec.network.clone(),
            virtual_network_id: spec.virtual_network_or_empty().to_owned(),
        };
        self.client
            .delete_route(&params)
            .await
            .map_err(|source| ReconcileError::Delete {
                network: spec.network.clone(),
                source,
            })
    }

    /// Rejects a record whose identifier names a different route than its
    /// desired network and virtual network. Records without an identifier
    /// pass.
    fn check_identifier(
        record: &StateRecord,
        spec: &RouteSpec,
    ) -> Result<(), ReconcileError<C::Error>> {
        let desired = spec.route_id().to_string();
        if !record.has_id() || record.id() == desired {
            return Ok(());
        }
        Err(ReconcileError::IdentifierMismatch {
            id: record.id().to_owned(),
            desired,
        })
    }

    async fn read_record(
        &self,
        record: &mut StateRecord,
    ) -> Result<ReadOutcome, ReconcileError<C::Error>> {
        let spec = RouteSpec::from_record(record);
        Self::check_identifier(record, &spec)?;
        let Some(route) = self.find_route(&spec).await? else {
            info!(
                network = %spec.network,
                account_id = %spec.account_id,
                "Tunnel Route not found"
            );
            record.clear_id();
            return Ok(ReadOutcome::NotFound);
        };
        observe(record, &route, &spec);
        Ok(ReadOutcome::Found)
    }

    async fn create_record(&self, record: &mut StateRecord) -> Result<(), ReconcileError<C::Error>> {
        let spec = RouteSpec::from_record(record);
        let id = self.create_route(&spec).await?;
        record.set_id(id.to_string());
        self.read_record(record).await.map(|_| ())
    }

    async fn update_record(&self, record: &mut StateRecord) -> Result<(), ReconcileError<C::Error>> {
        let spec = RouteSpec::from_record(record);
        Self::check_identifier(record, &spec)?;
        self.update_route(&spec).await?;
        self.read_record(record).await.map(|_| ())
    }

    async fn import_record(&self, id: &str) -> Result<StateRecord, ReconcileError<C::Error>> {
        let import_id = ImportId::parse(id)?;
        let mut record = import_id.to_record();
        match self.read_record(&mut record).await {
            Ok(ReadOutcome::Found) => Ok(record),
            Ok(ReadOutcome::NotFound) => Err(ReconcileError::ImportNotFound { id: id.to_owned() }),
            Err(err) => Err(ReconcileError::ImportRead {
                id: id.to_owned(),
                source: Box::new(err),
            }),
        }
    }
}

/// Copies remote truth into the record.
///
/// An empty remote comment never overwrites a local one, since the API
/// omits empty comments. The virtual network is only copied when the
/// desired state names one: the API always reports a virtual network, and
/// routes managed without one must not start to diff.
fn observe(record: &mut StateRecord, route: &TunnelRoute, desired: &RouteSpec) {
    record.set_str(fields::TUNNEL_ID, &route.tunnel_id);
    record.set_str(fields::NETWORK, &route.network);
    if !route.comment.is_empty() {
        record.set_str(fields::COMMENT, &route.comment);
    }
    if desired.virtual_network_id.is_some() {
        record.set_str(fields::VIRTUAL_NETWORK_ID, &route.virtual_network_id);
    }
}

impl<C> Resource for TunnelRouteReconciler<C>
where
    C: RouteClient + Send + Sync,
{
    type Error = ReconcileError<C::Error>;

    fn mutable_fields(&self) -> &'static [&'static str] {
        MUTABLE_FIELDS
    }

    fn read<'a>(
        &'a self,
        record: &'a mut StateRecord,
    ) -> ResourceFuture<'a, ReadOutcome, Self::Error> {
        Box::pin(self.read_record(record))
    }

    fn create<'a>(&'a self, record: &'a mut StateRecord) -> ResourceFuture<'a, (), Self::Error> {
        Box::pin(self.create_record(record))
    }

    fn update<'a>(&'a self, record: &'a mut StateRecord) -> ResourceFuture<'a, (), Self::Error> {
        Box::pin(self.update_record(record))
    }

    fn delete<'a>(&'a self, record: &'a StateRecord) -> ResourceFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let spec = RouteSpec::from_record(record);
            Self::check_identifier(record, &spec)?;
            self.delete_route(&spec).await
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, StateRecord, Self::Error> {
        Box::pin(self.import_record(id))
    }
}
