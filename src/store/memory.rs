use std::collections::HashMap;
use std::sync::RwLock;

use super::{ConditionalUpdate, RideStore};
use crate::error::StoreError;
use crate::ride::{Ride, RideStatus, Transition, sort_by_creation};

/// In-memory ride store.
///
/// Intended for tests/dev. Conditional writes run under the write lock, so
/// they are atomic within one process only.
#[derive(Debug, Default)]
pub struct InMemoryRideStore {
    rides: RwLock<HashMap<String, Ride>>,
}

impl InMemoryRideStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, keep: impl Fn(&Ride) -> bool) -> Result<Vec<Ride>, StoreError> {
        let rides = self.rides.read().map_err(|_| StoreError::Poisoned)?;

        let mut selected: Vec<Ride> = rides.values().filter(|&r| keep(r)).cloned().collect();
        sort_by_creation(&mut selected);

        Ok(selected)
    }
}

impl RideStore for InMemoryRideStore {
    fn save(&self, ride: &Ride) -> Result<Ride, StoreError> {
        let mut rides = self.rides.write().map_err(|_| StoreError::Poisoned)?;
        rides.insert(ride.id().to_string(), ride.clone());
        Ok(ride.clone())
    }

    fn find_by_id(&self, ride_id: &str) -> Result<Option<Ride>, StoreError> {
        let rides = self.rides.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rides.get(ride_id).cloned())
    }

    fn find_by_status(&self, status: RideStatus) -> Result<Vec<Ride>, StoreError> {
        self.select(|r| r.status() == status)
    }

    fn find_by_rider_id(&self, rider_id: &str) -> Result<Vec<Ride>, StoreError> {
        self.select(|r| r.rider_id() == rider_id)
    }

    fn apply_transition(
        &self,
        ride_id: &str,
        transition: &Transition,
    ) -> Result<ConditionalUpdate, StoreError> {
        let mut rides = self.rides.write().map_err(|_| StoreError::Poisoned)?;

        let Some(current) = rides.get_mut(ride_id) else {
            return Ok(ConditionalUpdate::Missing);
        };

        match current.apply(transition) {
            Some(next) => {
                *current = next.clone();
                Ok(ConditionalUpdate::Applied(next))
            }
            None => Ok(ConditionalUpdate::StatusMismatch(current.clone())),
        }
    }
}
