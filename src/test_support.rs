//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::{
    ClientError, ClientFuture, CreateRouteParams, DeleteRouteParams, ListRoutesParams,
    RouteClient, UpdateRouteParams,
};
use crate::route::TunnelRoute;

/// Virtual network assigned to routes created without one.
pub const DEFAULT_VIRTUAL_NETWORK: &str = "vnet-default";

/// Client operation a scripted failure applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    /// `list_routes`.
    List,
    /// `create_route`.
    Create,
    /// `update_route`.
    Update,
    /// `delete_route`.
    Delete,
}

/// Records a single call made through [`MemoryRouteClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientCall {
    /// A list call with its filter.
    List(ListRoutesParams),
    /// A create call with its parameters.
    Create(CreateRouteParams),
    /// An update call with its parameters.
    Update(UpdateRouteParams),
    /// A delete call with its parameters.
    Delete(DeleteRouteParams),
}

impl ClientCall {
    /// Operation this call exercised.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List(_) => Operation::List,
            Self::Create(_) => Operation::Create,
            Self::Update(_) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

#[derive(Clone, Debug)]
struct StoredRoute {
    account_id: String,
    route: TunnelRoute,
}

#[derive(Debug)]
struct Inner {
    routes: Vec<StoredRoute>,
    calls: Vec<ClientCall>,
    failures: VecDeque<(Operation, ClientError)>,
    default_virtual_network: String,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            calls: Vec::new(),
            failures: VecDeque::new(),
            default_virtual_network: String::from(DEFAULT_VIRTUAL_NETWORK),
        }
    }
}

impl Inner {
    fn take_failure(&mut self, operation: Operation) -> Option<ClientError> {
        let position = self
            .failures
            .iter()
            .position(|(scripted, _)| *scripted == operation)?;
        self.failures.remove(position).map(|(_, err)| err)
    }

    fn effective_virtual_network(&self, requested: &str) -> String {
        if requested.is_empty() {
            self.default_virtual_network.clone()
        } else {
            requested.to_owned()
        }
    }

    fn position(&self, account_id: &str, network: &str, virtual_network_id: &str) -> Option<usize> {
        let vnet = self.effective_virtual_network(virtual_network_id);
        self.routes.iter().position(|stored| {
            stored.account_id == account_id
                && stored.route.network == network
                && stored.route.virtual_network_id == vnet
        })
    }
}

/// In-memory [`RouteClient`] that behaves like the remote route API.
///
/// Routes created without a virtual network land in the default one, and
/// list calls without a virtual network filter match every virtual network.
/// Every call is recorded and failures can be scripted per operation.
#[derive(Clone, Debug, Default)]
pub struct MemoryRouteClient {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRouteClient {
    /// Creates an empty client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the virtual network assigned to routes created without one.
    #[must_use]
    pub fn with_default_virtual_network(self, virtual_network_id: &str) -> Self {
        self.lock().default_virtual_network = virtual_network_id.to_owned();
        self
    }

    /// Seeds an existing route owned by `account_id`.
    pub fn insert(&self, account_id: &str, route: TunnelRoute) {
        self.lock().routes.push(StoredRoute {
            account_id: account_id.to_owned(),
            route,
        });
    }

    /// Removes every stored route, simulating out-of-band deletion.
    pub fn clear_routes(&self) {
        self.lock().routes.clear();
    }

    /// Makes the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ClientError) {
        self.lock().failures.push_back((operation, error));
    }

    /// Returns a snapshot of stored routes owned by `account_id`.
    #[must_use]
    pub fn routes(&self, account_id: &str) -> Vec<TunnelRoute> {
        self.lock()
            .routes
            .iter()
            .filter(|stored| stored.account_id == account_id)
            .map(|stored| stored.route.clone())
            .collect()
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ClientCall> {
        self.lock().calls.clone()
    }

    /// Counts recorded calls of one operation.
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn list(&self, params: &ListRoutesParams) -> Result<Vec<TunnelRoute>, ClientError> {
        let mut inner = self.lock();
        inner.calls.push(ClientCall::List(params.clone()));
        if let Some(err) = inner.take_failure(Operation::List) {
            return Err(err);
        }
        Ok(inner
            .routes
            .iter()
            .filter(|stored| stored.account_id == params.account_id)
            .filter(|stored| {
                params.network_subset.is_empty() || stored.route.network == params.network_subset
            })
            .filter(|stored| {
                params.virtual_network_id.is_empty()
                    || stored.route.virtual_network_id == params.virtual_network_id
            })
            .filter(|stored| params.is_deleted || stored.route.deleted_at.is_none())
            .map(|stored| stored.route.clone())
            .collect())
    }

    fn create(&self, params: &CreateRouteParams) -> Result<TunnelRoute, ClientError> {
        let mut inner = self.lock();
        inner.calls.push(ClientCall::Create(params.clone()));
        if let Some(err) = inner.take_failure(Operation::Create) {
            return Err(err);
        }
        if inner
            .position(
                &params.account_id,
                &params.network,
                &params.virtual_network_id,
            )
            .is_some()
        {
            return Err(ClientError::api(409, 1014, "route already exists"));
        }
        let route = TunnelRoute {
            network: params.network.clone(),
            tunnel_id: params.tunnel_id.clone(),
            comment: params.comment.clone(),
            virtual_network_id: inner.effective_virtual_network(&params.virtual_network_id),
            ..TunnelRoute::default()
        };
        inner.routes.push(StoredRoute {
            account_id: params.account_id.clone(),
            route: route.clone(),
        });
        Ok(route)
    }

    fn update(&self, params: &UpdateRouteParams) -> Result<TunnelRoute, ClientError> {
        let mut inner = self.lock();
        inner.calls.push(ClientCall::Update(params.clone()));
        if let Some(err) = inner.take_failure(Operation::Update) {
            return Err(err);
        }
        let position = inner
            .position(
                &params.account_id,
                &params.network,
                &params.virtual_network_id,
            )
            .ok_or_else(|| ClientError::api(404, 1002, "route not found"))?;
        let stored = inner
            .routes
            .get_mut(position)
            .ok_or_else(|| ClientError::api(404, 1002, "route not found"))?;
        stored.route.tunnel_id.clone_from(&params.tunnel_id);
        stored.route.comment.clone_from(&params.comment);
        Ok(stored.route.clone())
    }

    fn delete(&self, params: &DeleteRouteParams) -> Result<(), ClientError> {
        let mut inner = self.lock();
        inner.calls.push(ClientCall::Delete(params.clone()));
        if let Some(err) = inner.take_failure(Operation::Delete) {
            return Err(err);
        }
        let position = inner
            .position(
                &params.account_id,
                &params.network,
                &params.virtual_network_id,
            )
            .ok_or_else(|| ClientError::api(404, 1002, "route not found"))?;
        inner.routes.remove(position);
        Ok(())
    }
}

impl RouteClient for MemoryRouteClient {
    type Error = ClientError;

    fn list_routes<'a>(
        &'a self,
        params: &'a ListRoutesParams,
    ) -> ClientFuture<'a, Vec<TunnelRoute>, Self::Error> {
        Box::pin(async move { self.list(params) })
    }

    fn create_route<'a>(
        &'a self,
        params: &'a CreateRouteParams,
    ) -> ClientFuture<'a, TunnelRoute, Self::Error> {
        Box::pin(async move { self.create(params) })
    }

    fn update_route<'a>(
        &'a self,
        params: &'a UpdateRouteParams,
    ) -> ClientFuture<'a, TunnelRoute, Self::Error> {
        Box::pin(async move { self.update(params) })
    }

    fn delete_route<'a>(
        &'a self,
        params: &'a DeleteRouteParams,
    ) -> ClientFuture<'a, (), Self::Error> {
        Box::pin(async move { self.delete(params) })
    }
}
