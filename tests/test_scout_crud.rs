//! Integration tests for the member registry.
//!
//! Tests cover:
//! - Creating scouts and listing by section
//! - Updating status and clearing nullable fields
//! - Deleting scouts (no cascade to medical records)
//! - The inactive-members read model
//! - Persistence through a close/reopen cycle
//! - Submit-time validation

mod common;

use common::*;

#[tokio::test]
async fn test_create_and_retrieve_scout() -> anyhow::Result<()> {
    // 1. Create test store and scout
    let (db, _dir) = create_test_db().await;
    let scout = db
        .add_scout(&make_new_scout("Ana Souza", Section::Alcateia))
        .await?;

    // 2. Verify the stored record
    assert!(scout.id > 0, "scout should get a generated id");
    assert_eq!(scout.name, "Ana Souza");
    assert_eq!(scout.section, Section::Alcateia);
    assert_eq!(scout.status, MemberStatus::Active);

    // 3. Retrieve by id and by section
    let by_id = db.get_scout_by_id(scout.id).await?.expect("scout exists");
    assert_eq!(by_id.name, "Ana Souza");

    let in_section = db.get_scouts_in_section(Section::Alcateia).await?;
    assert_eq!(in_section.len(), 1);
    let other_section = db.get_scouts_in_section(Section::ClaPioneiro).await?;
    assert!(other_section.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_scouts_list_is_sorted_by_name() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    db.add_scout(&make_new_scout("Carla", Section::TropaEscoteira))
        .await?;
    db.add_scout(&make_new_scout("Bruno", Section::Alcateia))
        .await?;
    db.add_scout(&make_new_scout("Alice", Section::TropaSenior))
        .await?;

    let names: Vec<String> = db.get_scouts().await?.into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Alice", "Bruno", "Carla"]);
    Ok(())
}

#[tokio::test]
async fn test_update_scout_status_and_clear_guardian() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let scout = db
        .add_scout(&make_new_scout("Bruno Lima", Section::TropaEscoteira))
        .await?;

    let update = ScoutUpdate {
        status: Some(MemberStatus::Inactive),
        guardian_phone: Some(None),
        ..Default::default()
    };
    let updated = db.update_scout(&scout, &update).await?;

    assert_eq!(updated.id, scout.id);
    assert_eq!(updated.status, MemberStatus::Inactive);
    assert_eq!(updated.guardian_phone, None);
    // Untouched fields survive the patch
    assert_eq!(updated.name, "Bruno Lima");
    assert_eq!(updated.guardian_name.as_deref(), Some("Responsável Teste"));
    Ok(())
}

#[tokio::test]
async fn test_inactive_members_view() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let keep = db
        .add_scout(&make_new_scout("Ativa", Section::Alcateia))
        .await?;
    let drop_out = db
        .add_scout(&make_new_scout("Inativa", Section::Alcateia))
        .await?;

    let update = ScoutUpdate {
        status: Some(MemberStatus::Inactive),
        ..Default::default()
    };
    db.update_scout(&drop_out, &update).await?;

    let inactive = db.get_inactive_members().await?;
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].name, "Inativa");

    let all = db.get_scouts().await?;
    assert_eq!(all.len(), 2, "view must not hide the registry itself");
    assert!(all.iter().any(|s| s.id == keep.id));
    Ok(())
}

#[tokio::test]
async fn test_delete_scout_keeps_medical_records() -> anyhow::Result<()> {
    // 1. Scout with a medical record
    let (db, _dir) = create_test_db().await;
    let scout = db
        .add_scout(&make_new_scout("Carla Dias", Section::TropaSenior))
        .await?;
    db.add_medical_record(&NewMedicalRecord {
        scout_id: scout.id,
        blood_type: Some("O+".to_string()),
        allergies: Some("amendoim".to_string()),
        medications: None,
        notes: None,
    })
    .await?;

    // 2. Delete the scout
    let scout_id = scout.id;
    db.delete_scout(scout).await?;
    assert!(db.get_scout_by_id(scout_id).await?.is_none());

    // 3. The medical record is orphaned, not cascaded
    let mut records = db.get_medical_records(scout_id).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].blood_type.as_deref(), Some("O+"));

    // 4. Explicit deletion still works on the orphan
    db.delete_medical_record(records.remove(0)).await?;
    assert!(db.get_medical_records(scout_id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_paperwork_delivery_flow() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;
    let scout = db
        .add_scout(&make_new_scout("Duda Reis", Section::Alcateia))
        .await?;

    let record = db
        .add_documentation_record(&NewDocumentationRecord {
            scout_id: scout.id,
            document: "ficha_medica".to_string(),
            delivered: false,
            delivered_at: None,
        })
        .await?;
    assert!(!record.delivered);

    let delivered = db
        .set_documentation_delivered(&record, true, Some("2026-08-06".to_string()))
        .await?;
    assert!(delivered.delivered);
    assert_eq!(delivered.delivered_at.as_deref(), Some("2026-08-06"));

    let listed = db.get_documentation_records(scout.id).await?;
    assert_eq!(listed.len(), 1);
    assert!(listed[0].delivered);
    Ok(())
}

#[tokio::test]
async fn test_scouts_persist_across_reopen() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;

    // 1. Create and populate
    {
        let connector = RemoteConnector::new(None);
        let db = GroupDb::connect(&connector, dir.path()).await?;
        db.add_scout(&make_new_scout("Persistente", Section::ClaPioneiro))
            .await?;
    }

    // 2. Reopen over the same directory
    let db = reopen_test_db(&dir).await;
    let scouts = db.get_scouts().await?;
    assert_eq!(scouts.len(), 1);
    assert_eq!(scouts[0].name, "Persistente");
    assert_eq!(scouts[0].section, Section::ClaPioneiro);
    Ok(())
}

#[tokio::test]
async fn test_validation_rejects_bad_input_before_storage() -> anyhow::Result<()> {
    let (db, _dir) = create_test_db().await;

    // Empty name
    let mut bad = make_new_scout("", Section::Alcateia);
    assert!(db.add_scout(&bad).await.is_err());

    // Malformed birthdate
    bad = make_new_scout("Ok Name", Section::Alcateia);
    bad.birthdate = Some("06/08/2026".to_string());
    assert!(db.add_scout(&bad).await.is_err());

    // Guardian phone too short
    bad = make_new_scout("Ok Name", Section::Alcateia);
    bad.guardian_phone = Some("123".to_string());
    assert!(db.add_scout(&bad).await.is_err());

    // Nothing reached the storage layer
    assert!(db.get_scouts().await?.is_empty());
    assert!(!db.local().exists("scouts"));
    Ok(())
}
