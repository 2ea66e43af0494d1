//! Walks one ride through its lifecycle against the configured store.
//!
//! RIDESHARE_STORE=sled RIDESHARE_DB_TEMPORARY=true cargo run --example ride_lifecycle

use ride_share::{
    IdentityContext, RideError, RideRequest, RideService, Role, config::Config,
    registry::ParticipantRegistry, telemetry,
};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_with_filter(&config.log_filter);

    let service = RideService::new(config.open_store()?);
    tracing::info!(store = ?config.store, "ride service ready");

    let registry = ParticipantRegistry::new();
    registry.register("alice", Role::Rider)?;
    registry.register("dan", Role::Driver)?;
    registry.register("eve", Role::Driver)?;

    let alice = registry.session(Some("alice")).current_identity();
    let dan = registry.session(Some("dan")).current_identity();
    let eve = registry.session(Some("eve")).current_identity();

    let ride = service.request_ride(alice.as_ref(), RideRequest::new("Station", "Harbour"))?;

    let pending = service.list_pending_requests(dan.as_ref())?;
    tracing::info!(count = pending.len(), "pending rides visible to dan");

    let ride = service.accept_ride(dan.as_ref(), ride.id())?;

    match service.accept_ride(eve.as_ref(), ride.id()) {
        Err(err @ RideError::Conflict(_)) => {
            tracing::info!(code = err.kind().code(), %err, "eve was too late")
        }
        other => anyhow::bail!("expected a conflict for the second driver, got {other:?}"),
    }

    let ride = service.complete_ride(alice.as_ref(), ride.id())?;
    tracing::info!(ride_id = ride.id(), status = %ride.status(), "ride finished");

    for ride in service.view_rider_rides(alice.as_ref())? {
        tracing::info!(
            ride_id = ride.id(),
            pickup = ride.pickup_location(),
            drop = ride.drop_location(),
            driver = ride.driver_id(),
            status = %ride.status(),
            "alice's ride"
        );
    }

    Ok(())
}
