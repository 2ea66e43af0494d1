//! Core ride record, its lifecycle states and transitions
use super::error::RideError;
use chrono::{DateTime, TimeZone, Utc};

/// Human readable prefix of every ride id
pub const RIDE_ID_PREFIX: &str = "ride_";

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash,
)]
pub enum RideStatus {
    #[n(0)]
    Requested,
    #[n(1)]
    Accepted,
    #[n(2)]
    Completed,
}

// Key is the ride id, value is this struct encoded into CBOR
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Eq, PartialEq)]
pub struct Ride {
    #[n(0)]
    id: String, // bech32 encoded uuid7
    #[n(1)]
    rider_id: String,
    #[n(2)]
    driver_id: Option<String>, // set once, on acceptance
    #[n(3)]
    pickup_location: String,
    #[n(4)]
    drop_location: String,
    #[n(5)]
    status: RideStatus,
    #[n(6)]
    created_at: TimeStamp<Utc>,
}

/// Input of a ride request
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RideRequest {
    pub pickup_location: String,
    pub drop_location: String,
}

/// A single forward step of the ride state machine
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Transition {
    Accept { driver_id: String },
    Complete,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Requested => "REQUESTED",
            RideStatus::Accepted => "ACCEPTED",
            RideStatus::Completed => "COMPLETED",
        }
    }
    pub fn is_terminal(&self) -> bool {
        matches!(self, RideStatus::Completed)
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RideRequest {
    pub fn new(pickup_location: impl Into<String>, drop_location: impl Into<String>) -> Self {
        Self {
            pickup_location: pickup_location.into(),
            drop_location: drop_location.into(),
        }
    }
    /// Both locations must carry something other than whitespace
    pub fn validate(&self) -> Result<(), RideError> {
        if self.pickup_location.trim().is_empty() {
            return Err(RideError::Validation("pickup location is required".into()));
        }
        if self.drop_location.trim().is_empty() {
            return Err(RideError::Validation("drop location is required".into()));
        }
        Ok(())
    }
}

impl Transition {
    /// The only status this transition may start from
    pub fn from_status(&self) -> RideStatus {
        match self {
            Transition::Accept { .. } => RideStatus::Requested,
            Transition::Complete => RideStatus::Accepted,
        }
    }
    pub fn to_status(&self) -> RideStatus {
        match self {
            Transition::Accept { .. } => RideStatus::Accepted,
            Transition::Complete => RideStatus::Completed,
        }
    }
}

impl Ride {
    pub(crate) fn new(
        id: String,
        rider_id: impl Into<String>,
        request: RideRequest,
        created_at: TimeStamp<Utc>,
    ) -> Self {
        Self {
            id,
            rider_id: rider_id.into(),
            driver_id: None,
            pickup_location: request.pickup_location,
            drop_location: request.drop_location,
            status: RideStatus::Requested,
            created_at,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn rider_id(&self) -> &str {
        &self.rider_id
    }
    pub fn driver_id(&self) -> Option<&str> {
        self.driver_id.as_deref()
    }
    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }
    pub fn drop_location(&self) -> &str {
        &self.drop_location
    }
    pub fn status(&self) -> RideStatus {
        self.status
    }
    pub fn created_at(&self) -> &TimeStamp<Utc> {
        &self.created_at
    }
    /// True for the rider and, once assigned, the driver
    pub fn is_participant(&self, identity_id: &str) -> bool {
        self.rider_id == identity_id || self.driver_id.as_deref() == Some(identity_id)
    }
    /// Returns the ride after `transition`, or `None` when the current status
    /// is not the transition's starting point.
    ///
    /// The driver id is only ever written by `Accept`, which in turn only
    /// applies to a `Requested` ride, so an assigned driver can never change.
    pub fn apply(&self, transition: &Transition) -> Option<Ride> {
        if self.status != transition.from_status() {
            return None;
        }

        let mut next = self.clone();
        next.status = transition.to_status();
        if let Transition::Accept { driver_id } = transition {
            next.driver_id = Some(driver_id.clone());
        }

        Some(next)
    }
}

/// Orders rides by creation time, falling back to the id for equal stamps
pub fn sort_by_creation(rides: &mut [Ride]) {
    rides.sort_by(|a, b| {
        a.created_at
            .to_datetime_utc()
            .cmp(&b.created_at.to_datetime_utc())
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}
impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}
impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
