//! Ride persistence.
//!
//! The coordinator owns the rules, a [`RideStore`] owns the records. The one
//! guarantee a store must give beyond plain reads and writes is that
//! [`RideStore::apply_transition`] evaluates the status precondition and
//! writes the result as one indivisible step.
use crate::error::StoreError;
use crate::ride::{Ride, RideStatus, Transition};
use std::sync::Arc;

mod memory;
mod sled_store;

pub use memory::InMemoryRideStore;
pub use sled_store::SledRideStore;

/// Outcome of a conditional write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalUpdate {
    /// The precondition held and the new ride was written
    Applied(Ride),
    /// No ride with that id
    Missing,
    /// The stored ride was not in the transition's starting status.
    /// Carries the ride as observed at write time.
    StatusMismatch(Ride),
}

pub trait RideStore: Send + Sync {
    /// Insert or overwrite a ride, returning what was stored
    fn save(&self, ride: &Ride) -> Result<Ride, StoreError>;

    fn find_by_id(&self, ride_id: &str) -> Result<Option<Ride>, StoreError>;

    /// Rides in `status`, oldest first
    fn find_by_status(&self, status: RideStatus) -> Result<Vec<Ride>, StoreError>;

    /// Rides requested by `rider_id`, oldest first
    fn find_by_rider_id(&self, rider_id: &str) -> Result<Vec<Ride>, StoreError>;

    /// Apply `transition` only if the stored ride is currently in
    /// `transition.from_status()`. Check and write are atomic: of two racing
    /// calls on the same ride at most one observes `Applied`.
    fn apply_transition(
        &self,
        ride_id: &str,
        transition: &Transition,
    ) -> Result<ConditionalUpdate, StoreError>;
}

impl<S: RideStore + ?Sized> RideStore for Box<S> {
    fn save(&self, ride: &Ride) -> Result<Ride, StoreError> {
        (**self).save(ride)
    }
    fn find_by_id(&self, ride_id: &str) -> Result<Option<Ride>, StoreError> {
        (**self).find_by_id(ride_id)
    }
    fn find_by_status(&self, status: RideStatus) -> Result<Vec<Ride>, StoreError> {
        (**self).find_by_status(status)
    }
    fn find_by_rider_id(&self, rider_id: &str) -> Result<Vec<Ride>, StoreError> {
        (**self).find_by_rider_id(rider_id)
    }
    fn apply_transition(
        &self,
        ride_id: &str,
        transition: &Transition,
    ) -> Result<ConditionalUpdate, StoreError> {
        (**self).apply_transition(ride_id, transition)
    }
}

impl<S: RideStore + ?Sized> RideStore for Arc<S> {
    fn save(&self, ride: &Ride) -> Result<Ride, StoreError> {
        (**self).save(ride)
    }
    fn find_by_id(&self, ride_id: &str) -> Result<Option<Ride>, StoreError> {
        (**self).find_by_id(ride_id)
    }
    fn find_by_status(&self, status: RideStatus) -> Result<Vec<Ride>, StoreError> {
        (**self).find_by_status(status)
    }
    fn find_by_rider_id(&self, rider_id: &str) -> Result<Vec<Ride>, StoreError> {
        (**self).find_by_rider_id(rider_id)
    }
    fn apply_transition(
        &self,
        ride_id: &str,
        transition: &Transition,
    ) -> Result<ConditionalUpdate, StoreError> {
        (**self).apply_transition(ride_id, transition)
    }
}
