use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// The group's age sections. Stored as snake_case strings in both
/// backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Alcateia,
    TropaEscoteira,
    TropaSenior,
    ClaPioneiro,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Alcateia,
        Section::TropaEscoteira,
        Section::TropaSenior,
        Section::ClaPioneiro,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Alcateia => "alcateia",
            Section::TropaEscoteira => "tropa_escoteira",
            Section::TropaSenior => "tropa_senior",
            Section::ClaPioneiro => "cla_pioneiro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Alcateia => "Alcateia",
            Section::TropaEscoteira => "Tropa Escoteira",
            Section::TropaSenior => "Tropa Sênior",
            Section::ClaPioneiro => "Clã Pioneiro",
        }
    }
}

impl std::str::FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown section: {s}"))
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            _ => Err(anyhow::anyhow!("Unknown member status: {s}")),
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dates travel as ISO `YYYY-MM-DD` strings; required-ness and shape are
/// checked at submit time, not by the storage layer.
pub fn parse_date(s: &str) -> anyhow::Result<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Ok(Date::parse(s, &format)?)
}

/// Budget periods are `YYYY-MM` strings.
pub fn parse_month(s: &str) -> anyhow::Result<(i32, u8)> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("Expected YYYY-MM, got {s}"))?;
    let year: i32 = year.parse()?;
    let month: u8 = month.parse()?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month out of range in {s}");
    }
    Ok((year, month))
}

pub fn now_rfc3339() -> anyhow::Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

pub fn today_iso() -> anyhow::Result<String> {
    let format = format_description!("[year]-[month]-[day]");
    Ok(OffsetDateTime::now_utc().date().format(&format)?)
}
