//! Integration tests for catch-up generation of recurring goals.

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use waypoint_core::recurrence::{Frequency, NewOccurrence};
use waypoint_core::types::{DbId, Timestamp};
use waypoint_db::models::pattern::{CreatePattern, RecurringPattern};
use waypoint_db::models::user::CreateUser;
use waypoint_db::repositories::{GoalRepo, PatternRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            timezone: "UTC".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_pattern(
    pool: &PgPool,
    user_id: DbId,
    frequency: Frequency,
    anchor_at: Timestamp,
) -> RecurringPattern {
    let input = CreatePattern {
        title: "Stretch".to_string(),
        description: Some("Ten minutes".to_string()),
        frequency,
        anchor_at,
        category_id: None,
    };
    GoalRepo::create_recurring(pool, user_id, &input).await.unwrap().1
}

async fn live_deadlines(pool: &PgPool, pattern_id: DbId) -> Vec<Timestamp> {
    sqlx::query_scalar::<_, Timestamp>(
        "SELECT deadline FROM goals
         WHERE pattern_id = $1 AND deleted_at IS NULL
         ORDER BY deadline ASC",
    )
    .bind(pattern_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: daily catch-up fills the gap and is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_daily_catch_up_fills_gap(pool: PgPool) {
    let user_id = new_user(&pool, "daily").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    let generated = GoalRepo::catch_up_for_user(&pool, user_id, at(2024, 1, 4, 10))
        .await
        .unwrap();
    assert_eq!(generated, 3);

    assert_eq!(
        live_deadlines(&pool, pattern.id).await,
        vec![
            at(2024, 1, 1, 9),
            at(2024, 1, 2, 9),
            at(2024, 1, 3, 9),
            at(2024, 1, 4, 9),
        ]
    );

    let again = GoalRepo::catch_up_for_user(&pool, user_id, at(2024, 1, 4, 10))
        .await
        .unwrap();
    assert_eq!(again, 0, "second run at the same instant must generate nothing");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generated_goals_copy_pattern_template(pool: PgPool) {
    let user_id = new_user(&pool, "template").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Weekly, at(2024, 1, 1, 7)).await;

    GoalRepo::catch_up_for_user(&pool, user_id, at(2024, 1, 9, 0))
        .await
        .unwrap();

    let row: (String, Option<String>, i16, DbId) = sqlx::query_as(
        "SELECT title, description, status_id, user_id FROM goals
         WHERE pattern_id = $1 AND deadline = $2",
    )
    .bind(pattern.id)
    .bind(at(2024, 1, 8, 7))
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(row.0, "Stretch");
    assert_eq!(row.1.as_deref(), Some("Ten minutes"));
    assert_eq!(row.2, 1, "generated goals start pending");
    assert_eq!(row.3, user_id);
}

// ---------------------------------------------------------------------------
// Test: deleting occurrences moves the cursor back
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_all_occurrences_restarts_from_anchor(pool: PgPool) {
    let user_id = new_user(&pool, "restart").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    sqlx::query("UPDATE goals SET deleted_at = NOW() WHERE pattern_id = $1")
        .bind(pattern.id)
        .execute(&pool)
        .await
        .unwrap();

    let generated = GoalRepo::catch_up_pattern(&pool, pattern.id, at(2024, 1, 3, 10))
        .await
        .unwrap();
    assert_eq!(generated, 2);
    assert_eq!(
        live_deadlines(&pool, pattern.id).await,
        vec![at(2024, 1, 2, 9), at(2024, 1, 3, 9)]
    );
}

// ---------------------------------------------------------------------------
// Test: inactive patterns never generate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_pattern_is_skipped(pool: PgPool) {
    let user_id = new_user(&pool, "inactive").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    let deactivated = PatternRepo::deactivate(&pool, pattern.id).await.unwrap().unwrap();
    assert!(!deactivated.is_active);

    let generated = GoalRepo::catch_up_for_user(&pool, user_id, at(2024, 2, 1, 9))
        .await
        .unwrap();
    assert_eq!(generated, 0);
    assert_eq!(live_deadlines(&pool, pattern.id).await.len(), 1);

    let direct = GoalRepo::catch_up_pattern(&pool, pattern.id, at(2024, 2, 1, 9))
        .await
        .unwrap();
    assert_eq!(direct, 0);
}

// ---------------------------------------------------------------------------
// Test: undated latest occurrence skips the pattern
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_undated_only_occurrence_skips_pattern(pool: PgPool) {
    let user_id = new_user(&pool, "undated").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    sqlx::query("UPDATE goals SET deadline = NULL WHERE pattern_id = $1")
        .bind(pattern.id)
        .execute(&pool)
        .await
        .unwrap();

    let generated = GoalRepo::catch_up_pattern(&pool, pattern.id, at(2024, 1, 10, 9))
        .await
        .unwrap();
    assert_eq!(generated, 0);
}

// ---------------------------------------------------------------------------
// Test: batch insert skips existing occurrences
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_occurrences_skips_duplicates(pool: PgPool) {
    let user_id = new_user(&pool, "dupes").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    let batch = vec![
        NewOccurrence {
            pattern_id: pattern.id,
            title: "Stretch".to_string(),
            description: None,
            category_id: None,
            deadline: at(2024, 1, 1, 9),
        },
        NewOccurrence {
            pattern_id: pattern.id,
            title: "Stretch".to_string(),
            description: None,
            category_id: None,
            deadline: at(2024, 1, 2, 9),
        },
    ];

    let mut conn = pool.acquire().await.unwrap();
    let inserted = GoalRepo::insert_occurrences(&mut conn, user_id, &batch)
        .await
        .unwrap();
    assert_eq!(inserted, 1, "the anchor occurrence already exists");

    let again = GoalRepo::insert_occurrences(&mut conn, user_id, &batch)
        .await
        .unwrap();
    assert_eq!(again, 0);

    let empty = GoalRepo::insert_occurrences(&mut conn, user_id, &[])
        .await
        .unwrap();
    assert_eq!(empty, 0);
}

// ---------------------------------------------------------------------------
// Test: latest deadline lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_deadline_ignores_deleted_goals(pool: PgPool) {
    let user_id = new_user(&pool, "latest").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;
    GoalRepo::catch_up_pattern(&pool, pattern.id, at(2024, 1, 3, 10))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let latest = GoalRepo::latest_deadline_for_pattern(&mut conn, pattern.id)
        .await
        .unwrap();
    assert_eq!(latest, Some(Some(at(2024, 1, 3, 9))));

    sqlx::query("UPDATE goals SET deleted_at = NOW() WHERE pattern_id = $1 AND deadline = $2")
        .bind(pattern.id)
        .bind(at(2024, 1, 3, 9))
        .execute(&mut *conn)
        .await
        .unwrap();

    let latest = GoalRepo::latest_deadline_for_pattern(&mut conn, pattern.id)
        .await
        .unwrap();
    assert_eq!(latest, Some(Some(at(2024, 1, 2, 9))));
}

// ---------------------------------------------------------------------------
// Test: catch-up is scoped to the requesting user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catch_up_only_touches_own_patterns(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let bobs = new_pattern(&pool, bob, Frequency::Daily, at(2024, 1, 1, 9)).await;

    let generated = GoalRepo::catch_up_for_user(&pool, alice, at(2024, 1, 5, 9))
        .await
        .unwrap();
    assert_eq!(generated, 0);
    assert_eq!(live_deadlines(&pool, bobs.id).await.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: concurrent catch-up never duplicates an occurrence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_parallel_catch_up_inserts_each_occurrence_once(pool: PgPool) {
    let user_id = new_user(&pool, "parallel").await;
    let pattern = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                GoalRepo::catch_up_for_user(&pool, user_id, at(2024, 1, 4, 10)).await
            })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        inserted += handle.await.unwrap().unwrap();
    }

    assert_eq!(inserted, 3, "exactly one request generates each occurrence");
    assert_eq!(
        live_deadlines(&pool, pattern.id).await,
        vec![
            at(2024, 1, 1, 9),
            at(2024, 1, 2, 9),
            at(2024, 1, 3, 9),
            at(2024, 1, 4, 9),
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: a failing pattern does not block the others
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failing_pattern_does_not_stop_catch_up(pool: PgPool) {
    let user_id = new_user(&pool, "partial").await;
    let broken = new_pattern(&pool, user_id, Frequency::Daily, at(2024, 1, 1, 9)).await;

    let healthy_input = CreatePattern {
        title: "Read".to_string(),
        description: None,
        frequency: Frequency::Daily,
        anchor_at: at(2024, 1, 1, 9),
        category_id: None,
    };
    let healthy = GoalRepo::create_recurring(&pool, user_id, &healthy_input)
        .await
        .unwrap()
        .1;

    // Make every further insert of the first pattern's title fail.
    sqlx::query("ALTER TABLE goals ADD CONSTRAINT ck_goals_no_stretch CHECK (title <> 'Stretch') NOT VALID")
        .execute(&pool)
        .await
        .unwrap();

    let generated = GoalRepo::catch_up_for_user(&pool, user_id, at(2024, 1, 3, 10))
        .await
        .unwrap();

    assert_eq!(generated, 2);
    assert_eq!(live_deadlines(&pool, broken.id).await, vec![at(2024, 1, 1, 9)]);
    assert_eq!(
        live_deadlines(&pool, healthy.id).await,
        vec![at(2024, 1, 1, 9), at(2024, 1, 2, 9), at(2024, 1, 3, 9)]
    );
}
