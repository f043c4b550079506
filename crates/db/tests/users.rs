//! Integration tests for the user repository.
//!
//! Verifies the unique username constraint, case-sensitive lookup, patch
//! updates, and soft-delete visibility.

use sqlx::PgPool;
use workplan_db::models::user::{CreateUser, UpdateUser};
use workplan_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        role: "user".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: duplicate username violates the unique constraint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice")).await.unwrap();

    let result = UserRepo::create(&pool, &new_user("alice")).await;
    let err = result.expect_err("duplicate username should fail");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert!(db_err
                .constraint()
                .is_some_and(|c| c.starts_with("uq_")));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: a soft-deleted username still blocks re-registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_username_still_reserved(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("bob")).await.unwrap();
    UserRepo::soft_delete(&pool, user.id).await.unwrap();

    let result = UserRepo::create(&pool, &new_user("bob")).await;
    assert!(
        result.is_err(),
        "username stays reserved after soft delete"
    );
}

// ---------------------------------------------------------------------------
// Test: find_by_username only returns visible users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_username_visibility(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("carol")).await.unwrap();

    let found = UserRepo::find_by_username(&pool, "carol").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    assert!(UserRepo::find_by_username(&pool, "CAROL")
        .await
        .unwrap()
        .is_none());

    UserRepo::soft_delete(&pool, user.id).await.unwrap();
    assert!(UserRepo::find_by_username(&pool, "carol")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: update patches only the provided fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_patches_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("dave")).await.unwrap();

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            username: None,
            password_hash: None,
            role: Some("admin".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.username, "dave");
    assert_eq!(updated.role, "admin");
    assert_eq!(updated.password_hash, user.password_hash);
}

// ---------------------------------------------------------------------------
// Test: updating a missing user returns None
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_returns_none(pool: PgPool) {
    let result = UserRepo::update(
        &pool,
        999_999,
        &UpdateUser {
            username: Some("ghost".to_string()),
            password_hash: None,
            role: None,
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}
