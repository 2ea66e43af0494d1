//! Smoke Screen Unit tests for ride share components
//!
//! These tests span the public API of the crate, exercising each component
//! in isolation from the integration scenarios. They are intended as a
//! smoke-screen and generally test the happy-path.

use chrono::Utc;
use ride_share::{
    ErrorKind, Identity, InMemoryRideStore, RideError, RideRequest, RideService, RideStatus,
    Role, Transition,
    config::{Config, StoreBackend},
    guard::{has_role, require_role},
    ride::TimeStamp,
    utils::new_uuid_to_bech32,
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Test that new_uuid_to_bech32 generates valid bech32-encoded strings
    /// with the correct human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32("ride_").unwrap();

        assert!(encoded.starts_with("ride_1"));
        assert!(encoded.len() > 10);
    }

    /// Test that different HRPs produce different encoded strings
    #[test]
    fn different_hrps_produce_different_encodings() {
        let ride_id = new_uuid_to_bech32("ride_").unwrap();
        let user_id = new_uuid_to_bech32("user_").unwrap();

        assert!(user_id.starts_with("user_"));
        assert_ne!(ride_id, user_id);
    }
}

// RIDE MODULE TESTS
#[cfg(test)]
mod ride_tests {
    use super::*;

    /// Test that TimeStamp::new() creates a timestamp close to current time
    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let now = Utc::now();

        let diff = (now - ts.to_datetime_utc()).num_seconds().abs();
        assert!(diff < 1);
    }

    /// Test that statuses render with their wire names
    #[test]
    fn status_display() {
        assert_eq!(RideStatus::Requested.to_string(), "REQUESTED");
        assert_eq!(RideStatus::Accepted.to_string(), "ACCEPTED");
        assert_eq!(RideStatus::Completed.to_string(), "COMPLETED");
    }

    /// Test that statuses order along the lifecycle
    #[test]
    fn status_order_follows_lifecycle() {
        assert!(RideStatus::Requested < RideStatus::Accepted);
        assert!(RideStatus::Accepted < RideStatus::Completed);
        assert!(!RideStatus::Accepted.is_terminal());
    }

    /// Test that each transition names its start and end status
    #[test]
    fn transitions_name_their_edges() {
        let accept = Transition::Accept {
            driver_id: "d1".into(),
        };

        assert_eq!(accept.from_status(), RideStatus::Requested);
        assert_eq!(accept.to_status(), RideStatus::Accepted);
        assert_eq!(Transition::Complete.from_status(), RideStatus::Accepted);
        assert_eq!(Transition::Complete.to_status(), RideStatus::Completed);
    }

    /// Test that a full request passes validation
    #[test]
    fn request_with_locations_is_valid() {
        assert!(RideRequest::new("Airport", "Downtown").validate().is_ok());
    }
}

// GUARD MODULE TESTS
#[cfg(test)]
mod guard_tests {
    use super::*;

    /// Test that a granted role is recognised
    #[test]
    fn granted_role_passes() {
        let driver = Identity::driver("d1");

        assert!(has_role(Some(&driver), Role::Driver));
        assert!(require_role(Some(&driver), Role::Driver).is_ok());
    }

    /// Test that an identity holding both roles passes either check
    #[test]
    fn multi_role_identity_passes_both() {
        let both = Identity::with_roles("x", [Role::Rider, Role::Driver]);

        assert!(has_role(Some(&both), Role::Rider));
        assert!(has_role(Some(&both), Role::Driver));
    }
}

// ERROR MODULE TESTS
#[cfg(test)]
mod error_tests {
    use super::*;

    /// Test that coordinator failures expose their kind
    #[test]
    fn failures_expose_kind() {
        let service = RideService::new(InMemoryRideStore::new());
        let err = service
            .accept_ride(Some(&Identity::driver("d1")), "ride_missing")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.kind().to_string(), "NOT_FOUND");
        assert!(err.to_string().contains("ride_missing"));
    }

    /// Test that forbidden failures carry a message
    #[test]
    fn forbidden_has_message() {
        let err = RideError::Forbidden("no".into());
        assert_eq!(err.kind().code(), "FORBIDDEN");
        assert_eq!(err.to_string(), "forbidden: no");
    }
}

// CONFIG MODULE TESTS
#[cfg(test)]
mod config_tests {
    use super::*;

    /// Test that the default config keeps rides in memory
    #[test]
    fn default_is_memory() {
        let config = Config::default();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.log_filter, "info");
    }

    /// Test that a temporary sled backend opens and serves the coordinator
    #[test]
    fn temporary_sled_backend_serves_rides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config {
            store: StoreBackend::Sled {
                path: temp_dir.path().join("smoke.db"),
                temporary: true,
            },
            ..Config::default()
        };

        let service = RideService::new(config.open_store().unwrap());
        let ride = service
            .request_ride(Some(&Identity::rider("r1")), RideRequest::new("A", "B"))
            .unwrap();

        assert_eq!(ride.status(), RideStatus::Requested);
    }
}
