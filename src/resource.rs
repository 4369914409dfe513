//! Reconciliation-resource abstraction.
//!
//! A [`Resource`] translates a [`StateRecord`] into remote calls and writes
//! what it observes back into the record. The orchestrating caller invokes
//! at most one operation per record at a time; cancellation happens by
//! dropping the returned future.

use std::future::Future;
use std::pin::Pin;

use crate::state::StateRecord;

/// Future returned by resource operations.
pub type ResourceFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Result of reading a resource back from the remote service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadOutcome {
    /// The resource exists and the record now reflects it.
    Found,
    /// The resource is gone; the record identifier has been cleared and
    /// every other field left untouched.
    NotFound,
}

/// CRUD and import operations of a managed resource type.
pub trait Resource {
    /// Error type returned by every operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fields that can change in place through [`Resource::update`].
    fn mutable_fields(&self) -> &'static [&'static str];

    /// Refreshes the record from the remote service.
    fn read<'a>(
        &'a self,
        record: &'a mut StateRecord,
    ) -> ResourceFuture<'a, ReadOutcome, Self::Error>;

    /// Creates the remote object, assigns the record identifier, and reads
    /// the object back.
    fn create<'a>(&'a self, record: &'a mut StateRecord) -> ResourceFuture<'a, (), Self::Error>;

    /// Replaces the remote object with the desired fields and reads it back.
    fn update<'a>(&'a self, record: &'a mut StateRecord) -> ResourceFuture<'a, (), Self::Error>;

    /// Deletes the remote object identified by the record.
    fn delete<'a>(&'a self, record: &'a StateRecord) -> ResourceFuture<'a, (), Self::Error>;

    /// Builds a record for an existing remote object from an identifier.
    fn import<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, StateRecord, Self::Error>;
}
