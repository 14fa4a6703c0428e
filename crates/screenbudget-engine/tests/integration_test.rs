use chrono::{TimeZone, Utc};
use screenbudget_common::{FixedClock, NewMonitoredApp};
use screenbudget_db::{Database, DatabaseConfig};
use screenbudget_engine::{AnalyticsService, ChallengeService, LedgerService};
use std::sync::Arc;

async fn setup() -> (Arc<Database>, Arc<FixedClock>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let config = DatabaseConfig { path: db_path.to_str().unwrap().to_string() };
    let db = Arc::new(Database::new(config).await.unwrap());
    db.run_migrations().await.unwrap();

    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()));
    (db, clock, dir)
}

/// The full earn-and-spend loop: an app runs out of budget, the user
/// answers a challenge, the reward is explicitly credited, and the app
/// unblocks.
#[tokio::test]
async fn blocked_app_unblocks_after_earned_reward() {
    let (db, clock, _dir) = setup().await;
    let ledger = LedgerService::new(db.clone(), clock.clone());
    let challenges = ChallengeService::new(db.clone(), clock.clone(), None);

    let app = ledger
        .add_app(NewMonitoredApp {
            user_id: "default".to_string(),
            package_name: "com.example.social".to_string(),
            app_name: "Social".to_string(),
            daily_limit_minutes: 60,
        })
        .await
        .unwrap();

    let (_, day) = ledger.record_session(app.id, 30).await.unwrap();
    assert!(!day.blocked);
    let (_, day) = ledger.record_session(app.id, 35).await.unwrap();
    assert_eq!(day.minutes_used, 65);
    assert!(day.blocked);

    let challenge = challenges.generate("auto", &[true, false, true]).await.unwrap();
    let result = challenges.submit(challenge.id, challenge.answer).await.unwrap();
    assert!(result.correct);
    assert!(result.reward_minutes >= 8, "medium pays at least 8 minutes");

    // Submission alone changes nothing in the ledger.
    let statuses = ledger.status("default").await.unwrap();
    assert!(statuses[0].blocked);

    let day = ledger.credit_reward(app.id, result.reward_minutes).await.unwrap();
    assert!(!day.blocked);
    assert_eq!(day.minutes_used, 65);
}

#[tokio::test]
async fn analytics_reflects_ledger_and_challenges() {
    let (db, clock, _dir) = setup().await;
    let ledger = LedgerService::new(db.clone(), clock.clone());
    let challenges = ChallengeService::new(db.clone(), clock.clone(), None);
    let analytics = AnalyticsService::new(db.clone(), clock.clone());

    let app = ledger
        .add_app(NewMonitoredApp {
            user_id: "default".to_string(),
            package_name: "com.example.video".to_string(),
            app_name: "Video".to_string(),
            daily_limit_minutes: 120,
        })
        .await
        .unwrap();

    ledger.record_session(app.id, 90).await.unwrap();

    let challenge = challenges.generate("hard", &[]).await.unwrap();
    let result = challenges.submit(challenge.id, challenge.answer).await.unwrap();

    let summary = analytics.summarize(30).await.unwrap();
    assert_eq!(summary.total_minutes_used, 90);
    assert_eq!(summary.average_daily_minutes, 3.0);
    assert_eq!(summary.most_used_app.as_deref(), Some("Video"));
    assert_eq!(summary.challenges_completed, 1);
    assert_eq!(summary.minutes_earned, result.reward_minutes);
    assert_eq!(summary.streak_days, 1);
}
