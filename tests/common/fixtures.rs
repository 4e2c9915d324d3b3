use scoutdesk::RemoteConfig;
use scoutdesk::core::db::{
    GroupDb, NewActivity, NewScout, NewTransaction, RemoteConnector, Section, MemberStatus,
    FinanceCategory, TransactionKind,
};

/// Creates a GroupDb in local-fallback mode (no remote credentials) over a
/// temp directory. Returns both; keep the directory alive for the test.
pub async fn create_test_db() -> (GroupDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let connector = RemoteConnector::new(None);
    let db = GroupDb::connect(&connector, dir.path())
        .await
        .expect("Failed to open test store");
    (db, dir)
}

/// Reopens a GroupDb over an existing data directory, still local-only.
pub async fn reopen_test_db(dir: &tempfile::TempDir) -> GroupDb {
    let connector = RemoteConnector::new(None);
    GroupDb::connect(&connector, dir.path())
        .await
        .expect("Failed to reopen test store")
}

/// Remote credentials pointing nowhere; good enough to construct a client.
pub fn dummy_remote_config() -> RemoteConfig {
    RemoteConfig {
        base_url: "http://localhost:1".to_string(),
        api_key: "test-key".to_string(),
    }
}

pub fn make_new_scout(name: &str, section: Section) -> NewScout {
    NewScout {
        name: name.to_string(),
        birthdate: Some("2014-03-21".to_string()),
        section,
        status: MemberStatus::Active,
        guardian_name: Some("Responsável Teste".to_string()),
        guardian_phone: Some("11987654321".to_string()),
        joined_at: Some("2024-02-01".to_string()),
    }
}

pub fn make_activity(title: &str, date: &str) -> NewActivity {
    NewActivity {
        title: title.to_string(),
        date: date.to_string(),
        location: Some("Sede do grupo".to_string()),
        section: None,
        description: None,
    }
}

pub fn make_transaction(
    date: &str,
    category: FinanceCategory,
    kind: TransactionKind,
    amount_cents: i64,
) -> NewTransaction {
    NewTransaction {
        date: date.to_string(),
        description: format!("{kind:?} {category:?}"),
        category,
        kind,
        amount_cents,
    }
}
