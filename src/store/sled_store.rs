//! Persistent ride store on top of sled
use std::path::Path;

use super::{ConditionalUpdate, RideStore};
use crate::error::StoreError;
use crate::ride::{Ride, RideStatus, Transition, sort_by_creation};

const RIDES_TREE: &str = "rides";

/// Rides are kept in their own tree, keyed by ride id, valued by the CBOR
/// encoding of the ride.
///
/// Conditional writes use sled's compare-and-swap on the encoded bytes, so
/// they stay atomic for every thread sharing the database.
#[derive(Debug, Clone)]
pub struct SledRideStore {
    rides: sled::Tree,
}

impl SledRideStore {
    pub fn new(db: &sled::Db) -> Result<Self, StoreError> {
        let rides = db.open_tree(RIDES_TREE)?;
        Ok(Self { rides })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Self::new(&db)
    }

    /// A throwaway database that is removed once dropped
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::new(&db)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.rides.flush()?;
        Ok(())
    }

    fn encode(ride: &Ride) -> Result<Vec<u8>, StoreError> {
        minicbor::to_vec(ride).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<Ride, StoreError> {
        Ok(minicbor::decode(bytes)?)
    }

    // full scan; sled keeps no secondary indexes for us
    fn select(&self, keep: impl Fn(&Ride) -> bool) -> Result<Vec<Ride>, StoreError> {
        let mut selected = Vec::new();
        for entry in self.rides.iter() {
            let (_, value) = entry?;
            let ride = Self::decode(&value)?;
            if keep(&ride) {
                selected.push(ride);
            }
        }
        sort_by_creation(&mut selected);

        Ok(selected)
    }
}

impl RideStore for SledRideStore {
    fn save(&self, ride: &Ride) -> Result<Ride, StoreError> {
        self.rides.insert(ride.id().as_bytes(), Self::encode(ride)?)?;
        Ok(ride.clone())
    }

    fn find_by_id(&self, ride_id: &str) -> Result<Option<Ride>, StoreError> {
        match self.rides.get(ride_id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
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
        let key = ride_id.as_bytes();

        loop {
            let Some(current_bytes) = self.rides.get(key)? else {
                return Ok(ConditionalUpdate::Missing);
            };
            let current = Self::decode(&current_bytes)?;

            let Some(next) = current.apply(transition) else {
                return Ok(ConditionalUpdate::StatusMismatch(current));
            };

            // the swap only lands if nobody rewrote the ride since our read
            match self
                .rides
                .compare_and_swap(key, Some(&current_bytes), Some(Self::encode(&next)?))?
            {
                Ok(()) => return Ok(ConditionalUpdate::Applied(next)),
                Err(_) => {
                    tracing::trace!(ride_id, "compare and swap lost, re-reading ride");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[test]
    fn save_and_find() {
        contract::save_and_find(&SledRideStore::temporary().unwrap());
    }

    #[test]
    fn queries_filter_and_order() {
        contract::queries_filter_and_order(&SledRideStore::temporary().unwrap());
    }

    #[test]
    fn conditional_write() {
        contract::conditional_write(&SledRideStore::temporary().unwrap());
    }

    #[test]
    fn rides_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("reopen.db");

        {
            let store = SledRideStore::open(&path).unwrap();
            store.save(&contract::ride("ride_a", "r1")).unwrap();
            store.flush().unwrap();
        }

        let store = SledRideStore::open(&path).unwrap();
        let ride = store.find_by_id("ride_a").unwrap().unwrap();
        assert_eq!(ride.rider_id(), "r1");
    }
}
