//! Integration tests for console accounts and the audit trail.

mod common;

use common::*;
use scoutdesk::core::db::UserRole;

fn make_user(username: &str, role: UserRole) -> NewSystemUser {
    NewSystemUser {
        username: username.to_string(),
        password: "correto-cavalo-bateria".to_string(),
        role,
        active: true,
    }
}

#[tokio::test]
async fn test_add_user_records_audit_entry() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;

    let user = db.add_user(&make_user("chefe.ana", UserRole::Admin), "setup").await?;
    assert_eq!(user.role, UserRole::Admin);

    let entries = db.get_audit_entries(None).await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "setup");
    assert_eq!(entries[0].action, "user.create");
    assert_eq!(entries[0].detail.as_deref(), Some("chefe.ana"));
    assert!(!entries[0].at.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    db.add_user(&make_user("tesoureiro", UserRole::Editor), "setup")
        .await?;

    let duplicate = db
        .add_user(&make_user("tesoureiro", UserRole::Viewer), "setup")
        .await;
    assert!(duplicate.is_err());

    assert_eq!(db.get_users().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_are_audited() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let user = db
        .add_user(&make_user("secretaria", UserRole::Viewer), "setup")
        .await?;

    let update = SystemUserUpdate {
        role: Some(UserRole::Editor),
        ..Default::default()
    };
    let updated = db.update_user(&user, &update, "chefe.ana").await?;
    assert_eq!(updated.role, UserRole::Editor);
    // Untouched credentials survive
    assert_eq!(updated.password, user.password);

    db.delete_user(updated, "chefe.ana").await?;
    assert!(db.get_user_by_username("secretaria").await?.is_none());

    let actions: Vec<String> = db
        .get_audit_entries(None)
        .await?
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(actions.len(), 3);
    assert!(actions.contains(&"user.create".to_string()));
    assert!(actions.contains(&"user.update".to_string()));
    assert!(actions.contains(&"user.delete".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_audit_listing_honors_limit() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    for i in 0..5 {
        db.record_action("console", "probe", Some(format!("entry {i}")))
            .await?;
    }

    assert_eq!(db.get_audit_entries(None).await?.len(), 5);
    assert_eq!(db.get_audit_entries(Some(2)).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_user_validation() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;

    // Whitespace in username
    assert!(
        db.add_user(&make_user("chefe ana", UserRole::Viewer), "setup")
            .await
            .is_err()
    );

    // Short password
    let mut weak = make_user("ok.name", UserRole::Viewer);
    weak.password = "12345".to_string();
    assert!(db.add_user(&weak, "setup").await.is_err());

    assert!(db.get_users().await?.is_empty());
    // Failed validations never reach the audit log either
    assert!(db.get_audit_entries(None).await?.is_empty());
    Ok(())
}
