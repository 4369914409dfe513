//! Convergence of desired state onto a [`Resource`].
//!
//! The converger owns the decision between create, update and no change,
//! and drives refresh and destroy. It knows nothing about tunnel routes
//! beyond what the [`Resource`] trait exposes.

use tracing::{debug, info};

use crate::resource::{ReadOutcome, Resource};
use crate::state::StateRecord;

/// Action needed to bring the remote object in line with desired state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Plan {
    /// The object does not exist and must be created.
    Create,
    /// The object exists but the listed mutable fields differ.
    Update {
        /// Mutable fields whose values differ.
        changed: Vec<&'static str>,
    },
    /// Remote state already matches.
    NoOp,
}

/// Result of [`Converger::apply`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ApplyOutcome {
    /// A new object was created.
    Created,
    /// The existing object was updated in place.
    Updated {
        /// Mutable fields that were changed.
        changed: Vec<&'static str>,
    },
    /// Nothing needed to change.
    Unchanged,
}

/// Drives a [`Resource`] towards desired state.
#[derive(Clone, Debug)]
pub struct Converger<R> {
    resource: R,
}

impl<R: Resource + Sync> Converger<R> {
    /// Wraps a resource.
    #[must_use]
    pub const fn new(resource: R) -> Self {
        Self { resource }
    }

    /// Returns the wrapped resource.
    #[must_use]
    pub const fn resource(&self) -> &R {
        &self.resource
    }

    /// Decides what to do given the desired record, the record as observed
    /// by a read, and the read outcome.
    #[must_use]
    pub fn plan(&self, desired: &StateRecord, observed: &StateRecord, outcome: ReadOutcome) -> Plan {
        if !desired.has_id() || outcome == ReadOutcome::NotFound {
            return Plan::Create;
        }
        let changed: Vec<&'static str> = self
            .resource
            .mutable_fields()
            .iter()
            .copied()
            .filter(|field| desired.get_str(field) != observed.get_str(field))
            .collect();
        if changed.is_empty() {
            Plan::NoOp
        } else {
            Plan::Update { changed }
        }
    }

    /// Converges the remote object onto `desired`, updating the record with
    /// what the remote service reports.
    ///
    /// # Errors
    ///
    /// Returns the resource error of the first failing call; the record is
    /// left as it was after the last successful step.
    pub async fn apply(&self, desired: &mut StateRecord) -> Result<ApplyOutcome, R::Error> {
        let (observed, outcome) = if desired.has_id() {
            let mut current = desired.clone();
            let read = self.resource.read(&mut current).await?;
            (current, read)
        } else {
            (desired.clone(), ReadOutcome::NotFound)
        };

        match self.plan(desired, &observed, outcome) {
            Plan::Create => {
                if desired.has_id() {
                    info!(id = desired.id(), "remote object vanished; recreating");
                    desired.clear_id();
                }
                self.resource.create(desired).await?;
                debug!(id = desired.id(), "created");
                Ok(ApplyOutcome::Created)
            }
            Plan::Update { changed } => {
                debug!(id = desired.id(), ?changed, "updating");
                self.resource.update(desired).await?;
                Ok(ApplyOutcome::Updated { changed })
            }
            Plan::NoOp => {
                *desired = observed;
                Ok(ApplyOutcome::Unchanged)
            }
        }
    }

    /// Refreshes the record from the remote service.
    ///
    /// # Errors
    ///
    /// Returns the resource error when the read fails.
    pub async fn refresh(&self, record: &mut StateRecord) -> Result<ReadOutcome, R::Error> {
        self.resource.read(record).await
    }

    /// Deletes the remote object and clears the record identifier. Returns
    /// `false` without calling the remote when the record has no identifier.
    ///
    /// # Errors
    ///
    /// Returns the resource error when the delete fails; the identifier is
    /// kept in that case.
    pub async fn destroy(&self, record: &mut StateRecord) -> Result<bool, R::Error> {
        if !record.has_id() {
            return Ok(false);
        }
        self.resource.delete(record).await?;
        record.clear_id();
        Ok(true)
    }
}
