//! Integration tests for activities and attendance aggregation.

mod common;

use common::*;
use scoutdesk::core::db::{ActivityUpdate, AttendanceSummary};

#[tokio::test]
async fn test_add_and_list_activities() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;

    let activity = db
        .add_activity(&make_activity("Acampamento de inverno", "2026-07-18"))
        .await?;
    db.add_activity(&make_activity("Reunião de sede", "2026-08-08"))
        .await?;

    let activities = db.get_activities().await?;
    assert_eq!(activities.len(), 2);
    // Newest first
    assert_eq!(activities[0].title, "Reunião de sede");

    let fetched = db
        .get_activity_by_id(activity.id)
        .await?
        .expect("activity exists");
    assert_eq!(fetched.title, "Acampamento de inverno");

    // Reschedule it; a malformed date in the update is rejected
    let update = ActivityUpdate {
        date: Some("2026-07-25".to_string()),
        ..Default::default()
    };
    let moved = db.update_activity(&fetched, &update).await?;
    assert_eq!(moved.date, "2026-07-25");
    assert_eq!(moved.title, "Acampamento de inverno");

    let bad = ActivityUpdate {
        date: Some("25/07/2026".to_string()),
        ..Default::default()
    };
    assert!(db.update_activity(&moved, &bad).await.is_err());

    db.delete_activity(moved).await?;
    assert_eq!(db.get_activities().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_activity_validation() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    assert!(db.add_activity(&make_activity("", "2026-08-08")).await.is_err());
    assert!(
        db.add_activity(&make_activity("Ok", "08/08/2026"))
            .await
            .is_err()
    );
    assert!(db.get_activities().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_attendance_summary_aggregates_per_section() -> anyhow::Result<()> {
    // 1. Scouts in two sections
    let (db, _dir) = create_test_db().await;
    let ana = db
        .add_scout(&make_new_scout("Ana", Section::Alcateia))
        .await?;
    let bia = db
        .add_scout(&make_new_scout("Bia", Section::Alcateia))
        .await?;
    let caio = db
        .add_scout(&make_new_scout("Caio", Section::Alcateia))
        .await?;
    let davi = db
        .add_scout(&make_new_scout("Davi", Section::TropaEscoteira))
        .await?;

    let activity = db
        .add_activity(&make_activity("Reunião", "2026-08-08"))
        .await?;

    // 2. Two of three lobinhos present, the escoteiro absent
    for (scout_id, present) in [(ana.id, true), (bia.id, true), (caio.id, false)] {
        db.record_attendance(&NewAttendanceEntry {
            scout_id,
            activity_id: activity.id,
            present,
        })
        .await?;
    }
    db.record_attendance(&NewAttendanceEntry {
        scout_id: davi.id,
        activity_id: activity.id,
        present: false,
    })
    .await?;

    // 3. Aggregation mirrors the hosted attendance_by_group view
    let summaries = db.get_attendance_by_group().await?;
    assert_eq!(summaries.len(), 2);

    let alcateia = summaries
        .iter()
        .find(|s| s.section == Section::Alcateia)
        .expect("alcateia aggregated");
    assert_eq!(alcateia.recorded, 3);
    assert_eq!(alcateia.present, 2);
    assert_eq!(alcateia.rate_percent, 66.7);

    let tropa = summaries
        .iter()
        .find(|s| s.section == Section::TropaEscoteira)
        .expect("tropa aggregated");
    assert_eq!(tropa.recorded, 1);
    assert_eq!(tropa.present, 0);
    assert_eq!(tropa.rate_percent, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_attendance_listing_per_activity() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let scout = db
        .add_scout(&make_new_scout("Ana", Section::Alcateia))
        .await?;
    let first = db
        .add_activity(&make_activity("Primeira", "2026-08-01"))
        .await?;
    let second = db
        .add_activity(&make_activity("Segunda", "2026-08-08"))
        .await?;

    db.record_attendance(&NewAttendanceEntry {
        scout_id: scout.id,
        activity_id: first.id,
        present: true,
    })
    .await?;

    assert_eq!(db.get_attendance_for_activity(first.id).await?.len(), 1);
    assert!(db.get_attendance_for_activity(second.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rate_helper() {
    assert_eq!(AttendanceSummary::rate(2, 3), 66.7);
    assert_eq!(AttendanceSummary::rate(0, 0), 0.0);
    assert_eq!(AttendanceSummary::rate(3, 3), 100.0);
}
