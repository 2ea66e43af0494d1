//! Service layer API for ride lifecycle operations
use super::error::RideError;
use super::guard;
use super::identity::{Identity, Role};
use super::ride::{RIDE_ID_PREFIX, Ride, RideRequest, RideStatus, TimeStamp, Transition};
use super::store::{ConditionalUpdate, RideStore};
use super::utils;
use tracing::{debug, info, instrument, warn};

/// Applies the ride state machine and its ownership rules on top of a store.
///
/// Holds no ride state between calls; every operation reads from and writes
/// to the store. The caller is always passed in explicitly.
pub struct RideService<S: RideStore> {
    store: S,
}

fn caller_id(identity: Option<&Identity>) -> Option<&str> {
    identity.map(Identity::id)
}

impl<S: RideStore> RideService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Request a new ride as a rider
    #[instrument(skip_all, fields(caller = caller_id(identity)))]
    pub fn request_ride(
        &self,
        identity: Option<&Identity>,
        request: RideRequest,
    ) -> Result<Ride, RideError> {
        let rider = guard::require_role(identity, Role::Rider)?;
        request.validate()?;

        let ride_id = utils::new_uuid_to_bech32(RIDE_ID_PREFIX)?;
        let ride = Ride::new(ride_id, rider.id(), request, TimeStamp::new());
        let ride = self.store.save(&ride)?;

        info!(ride_id = ride.id(), "ride requested");
        Ok(ride)
    }

    /// Rides still waiting for a driver, oldest first
    #[instrument(skip_all, fields(caller = caller_id(identity)))]
    pub fn list_pending_requests(
        &self,
        identity: Option<&Identity>,
    ) -> Result<Vec<Ride>, RideError> {
        guard::require_role(identity, Role::Driver)?;

        let rides = self.store.find_by_status(RideStatus::Requested)?;
        debug!(count = rides.len(), "listed pending rides");
        Ok(rides)
    }

    /// Claim a requested ride as a driver.
    ///
    /// Of any number of drivers racing on the same ride exactly one wins; the
    /// rest get [`RideError::Conflict`].
    #[instrument(skip(self, identity), fields(caller = caller_id(identity)))]
    pub fn accept_ride(
        &self,
        identity: Option<&Identity>,
        ride_id: &str,
    ) -> Result<Ride, RideError> {
        let driver = guard::require_role(identity, Role::Driver)?;

        let transition = Transition::Accept {
            driver_id: driver.id().to_string(),
        };

        match self.store.apply_transition(ride_id, &transition)? {
            ConditionalUpdate::Applied(ride) => {
                info!("ride accepted");
                Ok(ride)
            }
            ConditionalUpdate::Missing => Err(RideError::ride_not_found(ride_id)),
            ConditionalUpdate::StatusMismatch(current) => {
                warn!(status = %current.status(), "ride is no longer requested");
                Err(RideError::Conflict(format!(
                    "ride {ride_id} is not in {} status (current: {}); pick another ride",
                    RideStatus::Requested,
                    current.status()
                )))
            }
        }
    }

    /// Mark an accepted ride completed, as its rider or its driver
    #[instrument(skip(self, identity), fields(caller = caller_id(identity)))]
    pub fn complete_ride(
        &self,
        identity: Option<&Identity>,
        ride_id: &str,
    ) -> Result<Ride, RideError> {
        let caller = identity.ok_or(RideError::Unauthenticated)?;

        let ride = self
            .store
            .find_by_id(ride_id)?
            .ok_or_else(|| RideError::ride_not_found(ride_id))?;

        if ride.status() != RideStatus::Accepted {
            return Err(Self::not_completable(&ride));
        }

        if !ride.is_participant(caller.id()) {
            warn!("caller is neither rider nor driver");
            return Err(RideError::Forbidden(
                "only the rider or the assigned driver can complete this ride".into(),
            ));
        }

        // participants cannot change once accepted, only the status can
        match self.store.apply_transition(ride_id, &Transition::Complete)? {
            ConditionalUpdate::Applied(ride) => {
                info!("ride completed");
                Ok(ride)
            }
            ConditionalUpdate::Missing => Err(RideError::ride_not_found(ride_id)),
            ConditionalUpdate::StatusMismatch(current) => Err(Self::not_completable(&current)),
        }
    }

    /// Every ride the caller has requested, oldest first
    #[instrument(skip_all, fields(caller = caller_id(identity)))]
    pub fn view_rider_rides(&self, identity: Option<&Identity>) -> Result<Vec<Ride>, RideError> {
        let caller = identity.ok_or(RideError::Unauthenticated)?;

        let rides = self.store.find_by_rider_id(caller.id())?;
        debug!(count = rides.len(), "listed rider rides");
        Ok(rides)
    }

    /// Fetch one ride. Visible to its participants and, while it is still
    /// open for claiming, to any driver.
    #[instrument(skip(self, identity), fields(caller = caller_id(identity)))]
    pub fn ride(&self, identity: Option<&Identity>, ride_id: &str) -> Result<Ride, RideError> {
        let caller = identity.ok_or(RideError::Unauthenticated)?;

        let ride = self
            .store
            .find_by_id(ride_id)?
            .ok_or_else(|| RideError::ride_not_found(ride_id))?;

        let open_to_drivers =
            ride.status() == RideStatus::Requested && guard::has_role(Some(caller), Role::Driver);

        if ride.is_participant(caller.id()) || open_to_drivers {
            Ok(ride)
        } else {
            Err(RideError::Forbidden(
                "ride is only visible to its rider and driver".into(),
            ))
        }
    }

    fn not_completable(ride: &Ride) -> RideError {
        RideError::BadRequest(format!(
            "ride must be {} to be completed (current: {})",
            RideStatus::Accepted,
            ride.status()
        ))
    }
}
