//! Role checks. No IO, no state.
use super::error::RideError;
use super::identity::{Role, RoleBearer};

/// True iff an identity is present and was granted `required`
pub fn has_role<I: RoleBearer + ?Sized>(identity: Option<&I>, required: Role) -> bool {
    identity.is_some_and(|i| i.roles().contains(&required))
}

/// Like [`has_role`] but tells the two failure modes apart, handing back the
/// identity on success.
pub fn require_role<I: RoleBearer + ?Sized>(
    identity: Option<&I>,
    required: Role,
) -> Result<&I, RideError> {
    let identity = identity.ok_or(RideError::Unauthenticated)?;

    if !identity.roles().contains(&required) {
        return Err(RideError::Forbidden(format!(
            "only callers with {required} may perform this operation"
        )));
    }

    Ok(identity)
}
