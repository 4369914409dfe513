//! BDD scenarios for tunnel route reconciliation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ReconcileContext, reconcile_context};

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Create a route in the default virtual network"
)]
fn scenario_create_default_network(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Create a route scoped to a virtual network"
)]
fn scenario_create_scoped(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Re-applying an unchanged route does nothing"
)]
fn scenario_reapply_unchanged(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Moving a route to another tunnel updates it in place"
)]
fn scenario_update_tunnel(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "A route deleted out of band is forgotten on refresh"
)]
fn scenario_out_of_band_delete(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "An empty remote comment keeps the local comment"
)]
fn scenario_comment_preserved(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Import a route scoped to a virtual network"
)]
fn scenario_import_scoped(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Reject a malformed import identifier"
)]
fn scenario_import_malformed(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Destroy a route and clear its identifier"
)]
fn scenario_destroy(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Remote failures name the network"
)]
fn scenario_remote_failure(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Refuse to move a recorded route to another network"
)]
fn scenario_refuse_key_change(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}
