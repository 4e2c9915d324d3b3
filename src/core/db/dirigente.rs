use serde::{Deserialize, Serialize};

use crate::core::db::model::{MemberStatus, Section};
use crate::core::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirigenteRole {
    Chefe,
    Assistente,
    Diretor,
    Apoio,
}

impl DirigenteRole {
    pub const ALL: [DirigenteRole; 4] = [
        DirigenteRole::Chefe,
        DirigenteRole::Assistente,
        DirigenteRole::Diretor,
        DirigenteRole::Apoio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DirigenteRole::Chefe => "chefe",
            DirigenteRole::Assistente => "assistente",
            DirigenteRole::Diretor => "diretor",
            DirigenteRole::Apoio => "apoio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DirigenteRole::Chefe => "Chefe de Seção",
            DirigenteRole::Assistente => "Assistente",
            DirigenteRole::Diretor => "Diretor",
            DirigenteRole::Apoio => "Apoio",
        }
    }
}

impl std::str::FromStr for DirigenteRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DirigenteRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown dirigente role: {s}"))
    }
}

impl std::fmt::Display for DirigenteRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dirigente {
    pub id: i64,
    pub name: String,
    pub role: DirigenteRole,
    #[serde(default)]
    pub section: Option<Section>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: MemberStatus,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDirigente {
    pub name: String,
    pub role: DirigenteRole,
    pub section: Option<Section>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: MemberStatus,
}

impl NewDirigente {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.name.trim().is_empty() {
            issues.push("name", "must not be empty");
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                issues.push("email", format!("not an email address: {email}"));
            }
        }
        issues.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DirigenteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<DirigenteRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Option<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
}

pub trait DirigenteRepository {
    fn get_dirigentes(&self) -> impl Future<Output = anyhow::Result<Vec<Dirigente>>>;
    fn get_dirigente_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<Dirigente>>>;
    fn add_dirigente(
        &self,
        dirigente: &NewDirigente,
    ) -> impl Future<Output = anyhow::Result<Dirigente>>;
    fn update_dirigente(
        &self,
        dirigente: &Dirigente,
        update: &DirigenteUpdate,
    ) -> impl Future<Output = anyhow::Result<Dirigente>>;
    fn delete_dirigente(&self, dirigente: Dirigente) -> impl Future<Output = anyhow::Result<()>>;
}
