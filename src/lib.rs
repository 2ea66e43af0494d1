pub mod config;
pub mod error;
pub mod guard;
pub mod identity;
pub mod registry;
pub mod ride;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use error::{ErrorKind, RideError, StoreError};
pub use identity::{Identity, IdentityContext, Role, RoleBearer};
pub use ride::{Ride, RideRequest, RideStatus, Transition};
pub use service::RideService;
pub use store::{ConditionalUpdate, InMemoryRideStore, RideStore, SledRideStore};
