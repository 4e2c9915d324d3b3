mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from scoutdesk for tests
pub use scoutdesk::core::db::{
    ActivityRepository, AttendanceRepository, AuditRepository, DirigenteRepository,
    DocumentationRepository, FinanceCategory, FinanceRepository, GroupDb, LocalStore,
    MedicalRepository, MemberStatus, NewActivity, NewAttendanceEntry, NewBudget,
    NewDocumentationRecord, NewMedicalRecord, NewScout, NewSystemUser, NewTransaction,
    RemoteConnector, Scout, ScoutRepository, ScoutUpdate, Section, StoreMode, SystemUserUpdate,
    TransactionKind, UserRepository,
};
pub use scoutdesk::RemoteConfig;
