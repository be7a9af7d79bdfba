//! NFC access validation.
//!
//! An edge device presents a tag id together with its own client id. The
//! validator resolves the door bound to that client id, checks the tag's
//! active permissions on that door, and appends one access-history row for
//! the attempt. Storage is reached through [`AccessStore`].
//!
//! The three lookups and the audit insert are independent round trips; no
//! transaction spans them.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::types::DbId;

/// The door fields the validator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorRef {
    pub id: DbId,
    pub name: String,
    pub client_id: String,
    pub is_active: bool,
}

/// An active tag together with the number of active permissions it holds on
/// one specific door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagGrants {
    pub tag_pk: DbId,
    pub active_permissions: i64,
}

/// One access-history row to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessAttempt {
    pub door_id: DbId,
    pub tag_id: String,
    pub access_granted: bool,
    pub client_ip: Option<String>,
    pub image: Option<String>,
}

/// Storage seam for [`validate_access`].
#[async_trait]
pub trait AccessStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Find the door bound to `client_id`. With `active_only`, inactive
    /// doors are treated as absent.
    async fn find_door(
        &self,
        client_id: &str,
        active_only: bool,
    ) -> Result<Option<DoorRef>, Self::Error>;

    /// Find an active tag by its printed id, counting only its active
    /// permissions on `door_id`. `None` when the tag is unknown or inactive.
    async fn find_active_tag(
        &self,
        tag_id: &str,
        door_id: DbId,
    ) -> Result<Option<TagGrants>, Self::Error>;

    /// Append one access-history row.
    async fn record_attempt(&self, attempt: &AccessAttempt) -> Result<(), Self::Error>;
}

/// What to do when the audit insert fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditFailurePolicy {
    /// Log the failure and return the access decision unchanged.
    #[default]
    Swallow,
    /// Fail the whole validation with the store error.
    Propagate,
}

impl AuditFailurePolicy {
    /// The name accepted by `AUDIT_FAILURE_POLICY`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swallow => "swallow",
            Self::Propagate => "propagate",
        }
    }
}

impl FromStr for AuditFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "swallow" => Ok(Self::Swallow),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown audit failure policy '{other}' (expected 'swallow' or 'propagate')"
            )),
        }
    }
}

/// Why an attempt was denied. Only used for diagnostics; callers of the
/// validation endpoint see a bare `allowed: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No door at all is bound to the client id.
    UnknownDoor,
    /// The door exists but is deactivated.
    DoorInactive,
    /// The tag is unknown or deactivated.
    UnknownTag,
    /// The tag is active but holds no active permission on this door.
    NoPermission,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownDoor => "door not found",
            Self::DoorInactive => "door inactive",
            Self::UnknownTag => "tag not found or inactive",
            Self::NoPermission => "tag has no permission for door",
        };
        f.write_str(text)
    }
}

/// A single presentation of a tag at a door.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    pub tag_id: &'a str,
    pub client_id: &'a str,
    /// Optional base64 camera snapshot taken at the reader.
    pub image: Option<&'a str>,
}

/// Result of [`validate_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub door_id: Option<DbId>,
    pub deny_reason: Option<DenyReason>,
    /// Whether an access-history row was written.
    pub audited: bool,
}

/// Decide whether `request.tag_id` may open the door bound to
/// `request.client_id` and audit the attempt.
///
/// Every attempt that can be attributed to a door (active or not) produces
/// exactly one audit row. Attempts from unknown client ids are not audited.
pub async fn validate_access<S>(
    store: &S,
    request: &AccessRequest<'_>,
    policy: AuditFailurePolicy,
) -> Result<AccessDecision, S::Error>
where
    S: AccessStore + ?Sized,
{
    let door = match store.find_door(request.client_id, true).await? {
        Some(door) => door,
        None => return deny_without_active_door(store, request, policy).await,
    };

    let grants = store.find_active_tag(request.tag_id, door.id).await?;
    let (tag_pk, deny_reason) = match grants {
        None => (None, Some(DenyReason::UnknownTag)),
        Some(g) if g.active_permissions > 0 => (Some(g.tag_pk), None),
        Some(g) => (Some(g.tag_pk), Some(DenyReason::NoPermission)),
    };
    let allowed = deny_reason.is_none();

    let audited = audit(store, door.id, request, allowed, policy).await?;

    match deny_reason {
        None => tracing::info!(
            tag_id = request.tag_id,
            tag_pk = ?tag_pk,
            door_id = door.id,
            door = %door.name,
            client_id = %door.client_id,
            "Access granted"
        ),
        Some(reason) => tracing::info!(
            tag_id = request.tag_id,
            tag_pk = ?tag_pk,
            door_id = door.id,
            door = %door.name,
            %reason,
            "Access denied"
        ),
    }

    Ok(AccessDecision {
        allowed,
        door_id: Some(door.id),
        deny_reason,
        audited,
    })
}

/// Handle an attempt whose client id has no active door: audit against an
/// inactive door when one exists, otherwise deny without a row.
async fn deny_without_active_door<S>(
    store: &S,
    request: &AccessRequest<'_>,
    policy: AuditFailurePolicy,
) -> Result<AccessDecision, S::Error>
where
    S: AccessStore + ?Sized,
{
    let Some(door) = store.find_door(request.client_id, false).await? else {
        tracing::info!(
            tag_id = request.tag_id,
            client_id = request.client_id,
            reason = %DenyReason::UnknownDoor,
            "Access denied"
        );
        return Ok(AccessDecision {
            allowed: false,
            door_id: None,
            deny_reason: Some(DenyReason::UnknownDoor),
            audited: false,
        });
    };

    let audited = audit(store, door.id, request, false, policy).await?;
    tracing::info!(
        tag_id = request.tag_id,
        door_id = door.id,
        client_id = request.client_id,
        reason = %DenyReason::DoorInactive,
        "Access denied"
    );

    Ok(AccessDecision {
        allowed: false,
        door_id: Some(door.id),
        deny_reason: Some(DenyReason::DoorInactive),
        audited,
    })
}

/// Append the audit row, applying `policy` to a failed insert.
///
/// The client IP is not taken from the transport and is always stored as
/// null.
async fn audit<S>(
    store: &S,
    door_id: DbId,
    request: &AccessRequest<'_>,
    access_granted: bool,
    policy: AuditFailurePolicy,
) -> Result<bool, S::Error>
where
    S: AccessStore + ?Sized,
{
    let attempt = AccessAttempt {
        door_id,
        tag_id: request.tag_id.to_string(),
        access_granted,
        client_ip: None,
        image: request.image.map(str::to_string),
    };

    match store.record_attempt(&attempt).await {
        Ok(()) => Ok(true),
        Err(err) => match policy {
            AuditFailurePolicy::Swallow => {
                tracing::error!(
                    error = %err,
                    door_id,
                    tag_id = request.tag_id,
                    "Failed to record access attempt"
                );
                Ok(false)
            }
            AuditFailurePolicy::Propagate => Err(err),
        },
    }
}
