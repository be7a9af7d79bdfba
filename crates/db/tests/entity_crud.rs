//! Integration tests for the repository layer.
//!
//! Exercises doors, tags, permissions, access history and tamper logs
//! against a real database:
//! - Unique constraint violations on client/tag ids
//! - Permission assignment without de-duplication
//! - Delete behaviour: permissions cascade, access history blocks
//! - Paginated history ordering and filters

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use doorctl_core::pagination::PageRequest;
use doorctl_db::models::access_history::CreateAccessHistory;
use doorctl_db::models::door::{CreateDoor, UpdateDoor};
use doorctl_db::models::nfc_tag::{CreateNfcTag, UpdateNfcTag};
use doorctl_db::models::tamper_log::CreateTamperLog;
use doorctl_db::repositories::access_history_repo::HistoryFilter;
use doorctl_db::repositories::{
    AccessHistoryRepo, DoorPermissionRepo, DoorRepo, NfcTagRepo, TamperLogRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_door(name: &str, client_id: &str) -> CreateDoor {
    CreateDoor {
        name: name.to_string(),
        location: None,
        client_id: client_id.to_string(),
    }
}

fn new_tag(tag_id: &str) -> CreateNfcTag {
    CreateNfcTag {
        tag_id: tag_id.to_string(),
        name: None,
        owner_name: None,
    }
}

fn attempt(door_id: i64, tag_id: &str, granted: bool) -> CreateAccessHistory {
    CreateAccessHistory {
        door_id,
        tag_id: tag_id.to_string(),
        access_granted: granted,
        client_ip: None,
        image: None,
    }
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    has_sqlstate(err, "23505", constraint)
}

fn is_foreign_key_violation(err: &sqlx::Error, constraint: &str) -> bool {
    has_sqlstate(err, "23503", constraint)
}

fn has_sqlstate(err: &sqlx::Error, code: &str, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(code) && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Doors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_create_defaults_active(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();

    assert!(door.is_active);
    assert_eq!(door.client_id, "door-1");
    assert_eq!(door.location, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_duplicate_client_id_rejected(pool: PgPool) {
    DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();

    let err = DoorRepo::create(&pool, &new_door("Back", "door-1"))
        .await
        .unwrap_err();

    assert!(is_unique_violation(&err, "uq_doors_client_id"), "got {err:?}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_partial_update_keeps_other_fields(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();

    let patch = UpdateDoor {
        is_active: Some(false),
        ..Default::default()
    };
    let updated = DoorRepo::update(&pool, door.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.name, "Front");
    assert_eq!(updated.client_id, "door-1");

    assert!(DoorRepo::find_by_client_id(&pool, "door-1", true)
        .await
        .unwrap()
        .is_none());
    assert!(DoorRepo::find_by_client_id(&pool, "door-1", false)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_update_clears_location_only_when_sent(pool: PgPool) {
    let door = DoorRepo::create(
        &pool,
        &CreateDoor {
            name: "Front".into(),
            location: Some("Lobby".into()),
            client_id: "door-1".into(),
        },
    )
    .await
    .unwrap();

    let renamed = DoorRepo::update(
        &pool,
        door.id,
        &UpdateDoor {
            name: Some("Front entrance".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.location.as_deref(), Some("Lobby"));

    let cleared = DoorRepo::update(
        &pool,
        door.id,
        &UpdateDoor {
            location: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.location, None);
    assert_eq!(cleared.name, "Front entrance");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_door_returns_none(pool: PgPool) {
    let result = DoorRepo::update(&pool, 999_999, &UpdateDoor::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_delete_cascades_permissions(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();
    let tag = NfcTagRepo::create(&pool, &new_tag("T1")).await.unwrap();
    DoorPermissionRepo::assign(&pool, tag.id, door.id)
        .await
        .unwrap();

    assert!(DoorRepo::delete(&pool, door.id).await.unwrap());
    assert!(!DoorRepo::delete(&pool, door.id).await.unwrap());

    assert!(DoorPermissionRepo::list_for_tag(&pool, tag.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_with_history_cannot_be_deleted(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();
    let tag = NfcTagRepo::create(&pool, &new_tag("T1")).await.unwrap();
    DoorPermissionRepo::assign(&pool, tag.id, door.id)
        .await
        .unwrap();
    AccessHistoryRepo::create(&pool, &attempt(door.id, "T1", true))
        .await
        .unwrap();

    let err = DoorRepo::delete(&pool, door.id).await.unwrap_err();
    assert!(
        is_foreign_key_violation(&err, "fk_access_history_door"),
        "got {err:?}"
    );

    assert!(DoorRepo::find_by_id(&pool, door.id).await.unwrap().is_some());
    assert_eq!(
        DoorPermissionRepo::list_for_tag(&pool, tag.id)
            .await
            .unwrap()
            .len(),
        1
    );
    let (rows, total) =
        AccessHistoryRepo::list_page(&pool, HistoryFilter::All, PageRequest::default())
            .await
            .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].entry.door_id, door.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_door_list_counts_history(pool: PgPool) {
    let a = DoorRepo::create(&pool, &new_door("A", "door-a")).await.unwrap();
    let b = DoorRepo::create(&pool, &new_door("B", "door-b")).await.unwrap();
    for _ in 0..3 {
        AccessHistoryRepo::create(&pool, &attempt(a.id, "T1", false))
            .await
            .unwrap();
    }

    let doors = DoorRepo::list_with_counts(&pool).await.unwrap();

    assert_eq!(doors.len(), 2);
    assert_eq!(doors[0].door.id, a.id);
    assert_eq!(doors[0].access_count, 3);
    assert_eq!(doors[1].door.id, b.id);
    assert_eq!(doors[1].access_count, 0);
}

// ---------------------------------------------------------------------------
// Tags and permissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_duplicate_tag_id_rejected(pool: PgPool) {
    NfcTagRepo::create(&pool, &new_tag("T1")).await.unwrap();
    let err = NfcTagRepo::create(&pool, &new_tag("T1")).await.unwrap_err();
    assert!(is_unique_violation(&err, "uq_nfc_tags_tag_id"), "got {err:?}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeated_assignment_creates_rows_and_remove_clears_all(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();
    let tag = NfcTagRepo::create(&pool, &new_tag("T1")).await.unwrap();

    DoorPermissionRepo::assign(&pool, tag.id, door.id)
        .await
        .unwrap();
    DoorPermissionRepo::assign(&pool, tag.id, door.id)
        .await
        .unwrap();

    let pair = DoorPermissionRepo::list_for_pair(&pool, tag.id, door.id)
        .await
        .unwrap();
    assert_eq!(pair.len(), 2);

    let removed = DoorPermissionRepo::remove(&pool, tag.id, door.id)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let removed_again = DoorPermissionRepo::remove(&pool, tag.id, door.id)
        .await
        .unwrap();
    assert_eq!(removed_again, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_grants_respect_every_activity_flag(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();
    let other = DoorRepo::create(&pool, &new_door("Back", "door-2"))
        .await
        .unwrap();
    let tag = NfcTagRepo::create(&pool, &new_tag("T1")).await.unwrap();

    let grants = NfcTagRepo::find_active_grants(&pool, "T1", door.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(grants.tag_pk, tag.id);
    assert_eq!(grants.active_permissions, 0);

    DoorPermissionRepo::assign(&pool, tag.id, other.id)
        .await
        .unwrap();
    DoorPermissionRepo::assign(&pool, tag.id, door.id)
        .await
        .unwrap();
    let grants = NfcTagRepo::find_active_grants(&pool, "T1", door.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(grants.active_permissions, 1);

    let toggled = DoorPermissionRepo::set_active(&pool, tag.id, door.id, false)
        .await
        .unwrap();
    assert_eq!(toggled.len(), 1);
    assert!(!toggled[0].is_active);
    let grants = NfcTagRepo::find_active_grants(&pool, "T1", door.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(grants.active_permissions, 0);

    let patch = UpdateNfcTag {
        is_active: Some(false),
        ..Default::default()
    };
    NfcTagRepo::update(&pool, tag.id, &patch).await.unwrap();
    assert!(NfcTagRepo::find_active_grants(&pool, "T1", other.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_update_clears_name_and_owner(pool: PgPool) {
    let tag = NfcTagRepo::create(
        &pool,
        &CreateNfcTag {
            tag_id: "T1".into(),
            name: Some("Blue fob".into()),
            owner_name: Some("Alex".into()),
        },
    )
    .await
    .unwrap();

    let owner_cleared = NfcTagRepo::update(
        &pool,
        tag.id,
        &UpdateNfcTag {
            owner_name: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(owner_cleared.owner_name, None);
    assert_eq!(owner_cleared.name.as_deref(), Some("Blue fob"));

    let both = NfcTagRepo::update(
        &pool,
        tag.id,
        &UpdateNfcTag {
            name: Some(None),
            owner_name: Some(Some("Sam".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(both.name, None);
    assert_eq!(both.owner_name.as_deref(), Some("Sam"));
    assert!(both.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_permission_joins_carry_summaries(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();
    let tag = NfcTagRepo::create(
        &pool,
        &CreateNfcTag {
            tag_id: "T1".into(),
            name: Some("Blue fob".into()),
            owner_name: Some("Alex".into()),
        },
    )
    .await
    .unwrap();
    DoorPermissionRepo::assign(&pool, tag.id, door.id)
        .await
        .unwrap();

    let on_door = DoorPermissionRepo::list_for_door(&pool, door.id)
        .await
        .unwrap();
    assert_eq!(on_door.len(), 1);
    assert_eq!(on_door[0].tag_uid, "T1");
    assert_eq!(on_door[0].tag_owner_name.as_deref(), Some("Alex"));

    let on_tag = DoorPermissionRepo::list_with_doors(&pool).await.unwrap();
    assert_eq!(on_tag.len(), 1);
    assert_eq!(on_tag[0].door_client_id, "door-1");
    assert_eq!(on_tag[0].door_name, "Front");
}

// ---------------------------------------------------------------------------
// Access history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_pages_newest_first(pool: PgPool) {
    let door = DoorRepo::create(&pool, &new_door("Front", "door-1"))
        .await
        .unwrap();
    let mut ids = Vec::new();
    for i in 0..5 {
        let row = AccessHistoryRepo::create(&pool, &attempt(door.id, &format!("T{i}"), i % 2 == 0))
            .await
            .unwrap();
        ids.push(row.id);
    }

    let (first, total) =
        AccessHistoryRepo::list_page(&pool, HistoryFilter::All, PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
    assert_eq!(total, 5);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].entry.id, ids[4]);
    assert_eq!(first[1].entry.id, ids[3]);
    assert_eq!(first[0].door_name, "Front");

    let (last, _) =
        AccessHistoryRepo::list_page(&pool, HistoryFilter::All, PageRequest::new(Some(3), Some(2)))
            .await
            .unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].entry.id, ids[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_filters_by_door_and_tag(pool: PgPool) {
    let a = DoorRepo::create(&pool, &new_door("A", "door-a")).await.unwrap();
    let b = DoorRepo::create(&pool, &new_door("B", "door-b")).await.unwrap();
    AccessHistoryRepo::create(&pool, &attempt(a.id, "T1", true))
        .await
        .unwrap();
    AccessHistoryRepo::create(&pool, &attempt(a.id, "T2", false))
        .await
        .unwrap();
    AccessHistoryRepo::create(&pool, &attempt(b.id, "T1", false))
        .await
        .unwrap();

    let (rows, total) =
        AccessHistoryRepo::list_page(&pool, HistoryFilter::Door(a.id), PageRequest::default())
            .await
            .unwrap();
    assert_eq!(total, 2);
    assert!(rows.iter().all(|r| r.entry.door_id == a.id));

    let (rows, total) =
        AccessHistoryRepo::list_page(&pool, HistoryFilter::Tag("T1"), PageRequest::default())
            .await
            .unwrap();
    assert_eq!(total, 2);
    assert!(rows.iter().all(|r| r.entry.tag_id == "T1"));

    let counts = AccessHistoryRepo::counts(&pool).await.unwrap();
    assert_eq!(counts, (3, 1, 2));
}

// ---------------------------------------------------------------------------
// Tamper logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tamper_resolve_and_statistics(pool: PgPool) {
    let now = Utc::now();
    let older = TamperLogRepo::create(
        &pool,
        &CreateTamperLog {
            client_id: "door-1".into(),
            timestamp: now - Duration::minutes(5),
            image: None,
        },
    )
    .await
    .unwrap();
    let newer = TamperLogRepo::create(
        &pool,
        &CreateTamperLog {
            client_id: "door-1".into(),
            timestamp: now,
            image: Some("aGVsbG8=".into()),
        },
    )
    .await
    .unwrap();
    assert!(!older.resolved);

    let listed = TamperLogRepo::list_by_client_id(&pool, "door-1").await.unwrap();
    assert_eq!(listed[0].id, newer.id);

    let resolved = TamperLogRepo::update(&pool, older.id, Some(true), Some(Some("false alarm")))
        .await
        .unwrap()
        .unwrap();
    assert!(resolved.resolved);
    assert_eq!(resolved.notes.as_deref(), Some("false alarm"));

    let stats = TamperLogRepo::statistics(&pool).await.unwrap();
    assert_eq!((stats.total, stats.unresolved, stats.resolved), (2, 1, 1));

    let unresolved = TamperLogRepo::list(&pool, true).await.unwrap();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].id, newer.id);

    let kept = TamperLogRepo::update(&pool, older.id, None, None)
        .await
        .unwrap()
        .unwrap();
    assert!(kept.resolved);
    assert_eq!(kept.notes.as_deref(), Some("false alarm"));

    let cleared = TamperLogRepo::update(&pool, older.id, None, Some(None))
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.resolved);
    assert_eq!(cleared.notes, None);

    assert_matches!(
        TamperLogRepo::update(&pool, 999_999, Some(true), None).await,
        Ok(None)
    );
}
