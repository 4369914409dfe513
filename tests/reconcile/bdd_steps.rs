//! BDD step definitions for tunnel route reconciliation.

use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;
use tunroute::test_support::Operation;
use tunroute::{ApplyOutcome, ClientError, ReadOutcome, Resource, fields};

use super::test_helpers::{ReconcileContext, StepOutcome, remote_route};
use crate::test_constants::{ACCOUNT_ID, TUNNEL_ID};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a desired route for network \"{network}\"")]
fn desired_route(mut reconcile_context: ReconcileContext, network: String) -> ReconcileContext {
    let record = &mut reconcile_context.record;
    record.set_str(fields::ACCOUNT_ID, ACCOUNT_ID);
    record.set_str(fields::TUNNEL_ID, TUNNEL_ID);
    record.set_str(fields::NETWORK, &network);
    reconcile_context
}

#[given("the desired virtual network is \"{vnet}\"")]
fn desired_virtual_network(mut reconcile_context: ReconcileContext, vnet: String) -> ReconcileContext {
    reconcile_context
        .record
        .set_str(fields::VIRTUAL_NETWORK_ID, &vnet);
    reconcile_context
}

#[given("the desired tunnel is \"{tunnel}\"")]
fn desired_tunnel(mut reconcile_context: ReconcileContext, tunnel: String) -> ReconcileContext {
    reconcile_context.record.set_str(fields::TUNNEL_ID, &tunnel);
    reconcile_context
}

#[given("the desired comment is \"{comment}\"")]
fn desired_comment(mut reconcile_context: ReconcileContext, comment: String) -> ReconcileContext {
    reconcile_context.record.set_str(fields::COMMENT, &comment);
    reconcile_context
}

#[given("the state records identifier \"{id}\"")]
fn recorded_identifier(mut reconcile_context: ReconcileContext, id: String) -> ReconcileContext {
    reconcile_context.record.set_id(id);
    reconcile_context
}

#[given("an existing remote route for network \"{network}\"")]
fn existing_route(reconcile_context: ReconcileContext, network: String) -> ReconcileContext {
    reconcile_context
        .client
        .insert(ACCOUNT_ID, remote_route(&network, None));
    reconcile_context
}

#[given("an existing remote route in virtual network \"{vnet}\" for network \"{network}\"")]
fn existing_scoped_route(
    reconcile_context: ReconcileContext,
    vnet: String,
    network: String,
) -> ReconcileContext {
    reconcile_context
        .client
        .insert(ACCOUNT_ID, remote_route(&network, Some(&vnet)));
    reconcile_context
}

#[given("the remote route is deleted out of band")]
fn deleted_out_of_band(reconcile_context: ReconcileContext) -> ReconcileContext {
    reconcile_context.client.clear_routes();
    reconcile_context
}

#[given("the remote rejects route creation")]
fn remote_rejects_create(reconcile_context: ReconcileContext) -> ReconcileContext {
    reconcile_context.client.fail_next(
        Operation::Create,
        ClientError::api(403, 10000, "Authentication error"),
    );
    reconcile_context
}

#[when("I apply the desired route")]
fn apply_route(mut reconcile_context: ReconcileContext) -> Result<ReconcileContext, StepError> {
    let runtime = Runtime::new()?;
    let converger = reconcile_context.converger();
    let mut record = reconcile_context.record.clone();
    let result = runtime.block_on(async { converger.apply(&mut record).await });
    reconcile_context.record = record;
    reconcile_context.outcome = Some(match result {
        Ok(outcome) => StepOutcome::Applied(outcome),
        Err(err) => StepOutcome::Failure(err.to_string()),
    });
    Ok(reconcile_context)
}

#[when("I refresh the route")]
fn refresh_route(mut reconcile_context: ReconcileContext) -> Result<ReconcileContext, StepError> {
    let runtime = Runtime::new()?;
    let converger = reconcile_context.converger();
    let mut record = reconcile_context.record.clone();
    let result = runtime.block_on(async { converger.refresh(&mut record).await });
    reconcile_context.record = record;
    reconcile_context.outcome = Some(match result {
        Ok(outcome) => StepOutcome::Refreshed(outcome),
        Err(err) => StepOutcome::Failure(err.to_string()),
    });
    Ok(reconcile_context)
}

#[when("I destroy the route")]
fn destroy_route(mut reconcile_context: ReconcileContext) -> Result<ReconcileContext, StepError> {
    let runtime = Runtime::new()?;
    let converger = reconcile_context.converger();
    let mut record = reconcile_context.record.clone();
    let result = runtime.block_on(async { converger.destroy(&mut record).await });
    reconcile_context.record = record;
    reconcile_context.outcome = Some(match result {
        Ok(deleted) => StepOutcome::Destroyed(deleted),
        Err(err) => StepOutcome::Failure(err.to_string()),
    });
    Ok(reconcile_context)
}

#[when("I import \"{id}\"")]
fn import_route(mut reconcile_context: ReconcileContext, id: String) -> Result<ReconcileContext, StepError> {
    let runtime = Runtime::new()?;
    let converger = reconcile_context.converger();
    let result = runtime.block_on(async { converger.resource().import(&id).await });
    reconcile_context.outcome = Some(match result {
        Ok(record) => {
            reconcile_context.record = record;
            StepOutcome::Imported
        }
        Err(err) => StepOutcome::Failure(err.to_string()),
    });
    Ok(reconcile_context)
}

#[then("the apply outcome is \"{expected}\"")]
fn apply_outcome_is(reconcile_context: &ReconcileContext, expected: String) -> Result<(), StepError> {
    let matches = match (reconcile_context.outcome.as_ref(), expected.as_str()) {
        (Some(StepOutcome::Applied(ApplyOutcome::Created)), "created")
        | (Some(StepOutcome::Applied(ApplyOutcome::Updated { .. })), "updated")
        | (Some(StepOutcome::Applied(ApplyOutcome::Unchanged)), "unchanged") => true,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {expected}, got {:?}",
            reconcile_context.outcome
        )))
    }
}

#[then("the route identifier is \"{id}\"")]
fn identifier_is(reconcile_context: &ReconcileContext, id: String) -> Result<(), StepError> {
    if let Some(message) = reconcile_context.failure_message() {
        return Err(StepError::Assertion(format!("operation failed: {message}")));
    }
    let actual = reconcile_context.record.id();
    if actual == id {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected identifier {id}, got {actual:?}"
        )))
    }
}

#[then("the recorded virtual network is \"{vnet}\"")]
fn recorded_virtual_network(reconcile_context: &ReconcileContext, vnet: String) -> Result<(), StepError> {
    let actual = reconcile_context.record.get_str(fields::VIRTUAL_NETWORK_ID);
    if actual == vnet {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected virtual network {vnet}, got {actual:?}"
        )))
    }
}

#[then("the recorded comment is \"{comment}\"")]
fn recorded_comment(reconcile_context: &ReconcileContext, comment: String) -> Result<(), StepError> {
    let actual = reconcile_context.record.get_str(fields::COMMENT);
    if actual == comment {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected comment {comment:?}, got {actual:?}"
        )))
    }
}

#[then("the remote route count is {count:u32}")]
fn remote_route_count(reconcile_context: &ReconcileContext, count: u32) -> Result<(), StepError> {
    let actual = reconcile_context.client.routes(ACCOUNT_ID).len();
    if u32::try_from(actual).is_ok_and(|stored| stored == count) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} routes, got {actual}"
        )))
    }
}

#[then("no update call was made")]
fn no_update_call(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    let updates = reconcile_context.client.call_count(Operation::Update);
    if updates == 0 {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no update calls, got {updates}"
        )))
    }
}

#[then("the remote route uses tunnel \"{tunnel}\"")]
fn remote_uses_tunnel(reconcile_context: &ReconcileContext, tunnel: String) -> Result<(), StepError> {
    let routes = reconcile_context.client.routes(ACCOUNT_ID);
    let Some(route) = routes.first() else {
        return Err(StepError::Assertion(String::from("no remote route stored")));
    };
    if route.tunnel_id == tunnel {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected tunnel {tunnel}, got {}",
            route.tunnel_id
        )))
    }
}

#[then("the route is reported missing")]
fn reported_missing(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    match reconcile_context.outcome {
        Some(StepOutcome::Refreshed(ReadOutcome::NotFound)) => Ok(()),
        ref other => Err(StepError::Assertion(format!(
            "expected a missing route, got {other:?}"
        ))),
    }
}

#[then("the record has no identifier")]
fn record_without_identifier(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    if reconcile_context.record.has_id() {
        Err(StepError::Assertion(format!(
            "expected no identifier, got {}",
            reconcile_context.record.id()
        )))
    } else {
        Ok(())
    }
}

#[then("the operation fails mentioning \"{text}\"")]
fn fails_mentioning(reconcile_context: &ReconcileContext, text: String) -> Result<(), StepError> {
    assert_failure_mentions(reconcile_context, &text)
}

#[then("the failure names network \"{network}\"")]
fn failure_names_network(reconcile_context: &ReconcileContext, network: String) -> Result<(), StepError> {
    assert_failure_mentions(reconcile_context, &format!("{network:?}"))
}

fn assert_failure_mentions(reconcile_context: &ReconcileContext, text: &str) -> Result<(), StepError> {
    let Some(message) = reconcile_context.failure_message() else {
        return Err(StepError::Assertion(format!(
            "expected failure, got {:?}",
            reconcile_context.outcome
        )));
    };
    if message.contains(text) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected failure mentioning {text:?}, got: {message}"
        )))
    }
}
