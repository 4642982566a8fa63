//! Repository tests against a real store
//!
//! These need a reachable PostgreSQL instance (`DATABASE_URL`) that may be
//! wiped, and are ignored by default. Run them with `cargo test -- --ignored`.

use chrono::{Days, NaiveDate, Utc};
use common::database::{DatabaseConfig, init_pool, run_migrations};
use serial_test::serial;
use sqlx::PgPool;

use super::{ReportRepository, UserRepository, VacationRepository};
use crate::{
    listing::{ListingQuery, PAGE_SIZE, VacationFilter},
    middleware::Principal,
    models::{
        report::FollowersReportRow,
        user::{NewUser, Role},
        vacation::NewVacation,
    },
};

async fn setup() -> PgPool {
    let db_config = DatabaseConfig::from_env().unwrap();
    let pool = init_pool(&db_config).await.unwrap();
    run_migrations(&pool).await.unwrap();

    sqlx::query("TRUNCATE followers, vacations, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn vacation(destination: &str, start_date: NaiveDate, end_date: NaiveDate) -> NewVacation {
    NewVacation {
        destination: destination.to_string(),
        description: format!("A week in {}", destination),
        start_date,
        end_date,
        price: 500.0,
        image_name: format!("{}.jpg", destination.to_lowercase()),
    }
}

async fn user(pool: &PgPool, email: &str) -> i64 {
    UserRepository::new(pool.clone())
        .create(&NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::User,
        })
        .await
        .unwrap()
        .id
}

fn viewer(id: i64) -> Principal {
    Principal {
        id: Some(id),
        role: Role::User,
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_created_vacation_is_listed_as_upcoming() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool);

    let id = repo
        .create(&vacation("Oslo", date(2099, 1, 1), date(2099, 1, 10)))
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let query = ListingQuery::new(1, VacationFilter::Upcoming, &Principal::anonymous(), today);
    let (vacations, total) = repo.list(&query).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(vacations.len(), 1);
    assert_eq!(vacations[0].vacation.id, id);
    assert_eq!(vacations[0].vacation.destination, "Oslo");
    assert_eq!(vacations[0].followers_count, 0);
    assert!(!vacations[0].is_followed);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_follow_and_unfollow_are_idempotent() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool.clone());
    let user_id = user(&pool, "ada@example.com").await;
    let vacation_id = repo
        .create(&vacation("Oslo", date(2099, 1, 1), date(2099, 1, 10)))
        .await
        .unwrap();

    assert!(repo.follow(user_id, vacation_id).await.unwrap());
    assert!(!repo.follow(user_id, vacation_id).await.unwrap());

    let follows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM followers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(follows, 1);

    assert!(repo.unfollow(user_id, vacation_id).await.unwrap());
    assert!(!repo.unfollow(user_id, vacation_id).await.unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_follow_of_unknown_vacation_names_the_constraint() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool.clone());
    let user_id = user(&pool, "ada@example.com").await;

    let error = repo.follow(user_id, 9999).await.unwrap_err();
    assert!(error.is_foreign_key_violation());
    assert_eq!(error.violated_constraint(), Some("followers_vacation_id_fkey"));
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_delete_cascades_to_follows() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool.clone());
    let user_id = user(&pool, "ada@example.com").await;
    let vacation_id = repo
        .create(&vacation("Oslo", date(2099, 1, 1), date(2099, 1, 10)))
        .await
        .unwrap();
    repo.follow(user_id, vacation_id).await.unwrap();

    assert!(repo.delete(vacation_id).await.unwrap());
    assert!(!repo.delete(vacation_id).await.unwrap());

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM followers WHERE vacation_id = $1")
        .bind(vacation_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_update_reports_missing_rows() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool);
    let id = repo
        .create(&vacation("Oslo", date(2099, 1, 1), date(2099, 1, 10)))
        .await
        .unwrap();

    let mut changed = vacation("Bergen", date(2001, 1, 1), date(2001, 1, 5));
    changed.price = 0.0;
    assert!(repo.update(id, &changed).await.unwrap());
    assert!(!repo.update(id + 1, &changed).await.unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_followed_filter_and_flag() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool.clone());
    let ada = user(&pool, "ada@example.com").await;
    let bob = user(&pool, "bob@example.com").await;

    let oslo = repo
        .create(&vacation("Oslo", date(2099, 1, 1), date(2099, 1, 10)))
        .await
        .unwrap();
    repo.create(&vacation("Rome", date(2099, 2, 1), date(2099, 2, 10)))
        .await
        .unwrap();
    repo.follow(ada, oslo).await.unwrap();
    repo.follow(bob, oslo).await.unwrap();

    let today = date(2030, 6, 15);
    let query = ListingQuery::new(1, VacationFilter::Followed, &viewer(ada), today);
    let (vacations, total) = repo.list(&query).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(vacations.len(), 1);
    assert_eq!(vacations[0].vacation.id, oslo);
    assert_eq!(vacations[0].followers_count, 2);
    assert!(vacations[0].is_followed);

    // Without an identity the filter is ignored and nothing is flagged
    let query = ListingQuery::new(1, VacationFilter::Followed, &Principal::anonymous(), today);
    let (vacations, total) = repo.list(&query).await.unwrap();
    assert_eq!(total, 2);
    assert!(vacations.iter().all(|v| !v.is_followed));
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_active_and_upcoming_boundaries() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool);
    let today = date(2030, 6, 15);
    let day = |offset: i64| {
        if offset >= 0 {
            today.checked_add_days(Days::new(offset as u64)).unwrap()
        } else {
            today.checked_sub_days(Days::new(offset.unsigned_abs())).unwrap()
        }
    };

    repo.create(&vacation("Past", day(-10), day(-1))).await.unwrap();
    repo.create(&vacation("StartsToday", day(0), day(3))).await.unwrap();
    repo.create(&vacation("EndsToday", day(-3), day(0))).await.unwrap();
    repo.create(&vacation("Tomorrow", day(1), day(4))).await.unwrap();

    let destinations = |filter| {
        let repo = repo.clone();
        async move {
            let query = ListingQuery::new(1, filter, &Principal::anonymous(), today);
            let (vacations, _) = repo.list(&query).await.unwrap();
            vacations
                .into_iter()
                .map(|v| v.vacation.destination)
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(
        destinations(VacationFilter::Active).await,
        vec!["EndsToday", "StartsToday"]
    );
    assert_eq!(destinations(VacationFilter::Upcoming).await, vec!["Tomorrow"]);
    assert_eq!(destinations(VacationFilter::All).await.len(), 4);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_pages_are_ordered_and_bounded() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool);

    for n in 0..(PAGE_SIZE + 2) {
        let start = date(2099, 1, 1).checked_add_days(Days::new(n as u64)).unwrap();
        repo.create(&vacation(&format!("Stop{:02}", n), start, start))
            .await
            .unwrap();
    }

    let today = date(2030, 6, 15);
    let first = ListingQuery::new(1, VacationFilter::All, &Principal::anonymous(), today);
    let (vacations, total) = repo.list(&first).await.unwrap();
    assert_eq!(total, PAGE_SIZE + 2);
    assert_eq!(vacations.len() as i64, PAGE_SIZE);
    assert_eq!(vacations[0].vacation.destination, "Stop00");

    let second = ListingQuery::new(2, VacationFilter::All, &Principal::anonymous(), today);
    let (vacations, total) = repo.list(&second).await.unwrap();
    assert_eq!(total, PAGE_SIZE + 2);
    assert_eq!(vacations.len(), 2);

    let beyond = ListingQuery::new(9, VacationFilter::All, &Principal::anonymous(), today);
    let (vacations, _) = repo.list(&beyond).await.unwrap();
    assert!(vacations.is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_report_includes_unfollowed_vacations() {
    let pool = setup().await;
    let repo = VacationRepository::new(pool.clone());
    let ada = user(&pool, "ada@example.com").await;

    let rome = repo
        .create(&vacation("Rome", date(2099, 2, 1), date(2099, 2, 10)))
        .await
        .unwrap();
    repo.create(&vacation("Oslo", date(2099, 1, 1), date(2099, 1, 10)))
        .await
        .unwrap();
    repo.follow(ada, rome).await.unwrap();

    let rows = ReportRepository::new(pool).followers_report().await.unwrap();
    assert_eq!(
        rows,
        vec![
            FollowersReportRow {
                destination: "Oslo".to_string(),
                followers: 0,
            },
            FollowersReportRow {
                destination: "Rome".to_string(),
                followers: 1,
            },
        ]
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_duplicate_email_is_a_unique_violation() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    user(&pool, "ada@example.com").await;

    let error = users
        .create(&NewUser {
            first_name: "Other".to_string(),
            last_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::User,
        })
        .await
        .unwrap_err();
    assert!(error.is_unique_violation());

    let stored = users.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(stored.user.first_name, "Test");
    assert_eq!(stored.user.role, Role::User);
    assert!(users.find_by_email("nobody@example.com").await.unwrap().is_none());
}
