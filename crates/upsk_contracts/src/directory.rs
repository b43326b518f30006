#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::{ContractViolation, Validate};

/// Officer name shown while a slot has not been assigned.
pub const PLACEHOLDER_OFFICER: &str = "[Nama Pegawai]";

const COUNSELOR_ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CounselorId(String);

impl CounselorId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        validate_counselor_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CounselorId {
    type Error = ContractViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CounselorId> for String {
    fn from(value: CounselorId) -> Self {
        value.0
    }
}

impl std::fmt::Display for CounselorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Validate for CounselorId {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_counselor_id(&self.0)
    }
}

fn validate_counselor_id(id: &str) -> Result<(), ContractViolation> {
    if id.trim().is_empty() {
        return Err(ContractViolation::InvalidValue {
            field: "counselor.id",
            reason: "must not be empty",
        });
    }
    if id.len() > COUNSELOR_ID_MAX_LEN {
        return Err(ContractViolation::InvalidValue {
            field: "counselor.id",
            reason: "must be <= 64 bytes",
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounselorRole {
    #[serde(rename = "Ketua Penolong Pengarah")]
    KetuaPenolongPengarah,
    #[serde(rename = "Penolong Pengarah")]
    PenolongPengarah,
    #[serde(rename = "Ketua Kaunselor Pendidikan IPGK")]
    KetuaKaunselorIpgk,
    #[serde(rename = "Kaunselor Pendidikan (Pentadbir)")]
    KaunselorPentadbir,
    #[serde(rename = "Kaunselor Pendidikan (Pelajar)")]
    KaunselorPelajar,
}

impl CounselorRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KetuaPenolongPengarah => "Ketua Penolong Pengarah",
            Self::PenolongPengarah => "Penolong Pengarah",
            Self::KetuaKaunselorIpgk => "Ketua Kaunselor Pendidikan IPGK",
            Self::KaunselorPentadbir => "Kaunselor Pendidikan (Pentadbir)",
            Self::KaunselorPelajar => "Kaunselor Pendidikan (Pelajar)",
        }
    }

    /// Campus roles map onto the campus record slot that holds the officer.
    pub const fn campus_slot(self) -> Option<SlotKey> {
        match self {
            Self::KetuaKaunselorIpgk => Some(SlotKey::Ketua),
            Self::KaunselorPentadbir => Some(SlotKey::Pentadbir),
            Self::KaunselorPelajar => Some(SlotKey::Pelajar),
            Self::KetuaPenolongPengarah | Self::PenolongPengarah => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounselorCategory {
    #[serde(rename = "IPGM")]
    Ipgm,
    #[serde(rename = "IPGK")]
    Ipgk,
}

impl CounselorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ipgm => "IPGM",
            Self::Ipgk => "IPGK",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "IPGM" => Ok(Self::Ipgm),
            "IPGK" => Ok(Self::Ipgk),
            _ => Err(ContractViolation::UnknownVariant {
                field: "counselor.category",
                got: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counselor {
    pub id: CounselorId,
    pub name: String,
    pub role: CounselorRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: CounselorCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<Vec<String>>,
}

impl Counselor {
    pub fn ipgm_v1(
        id: CounselorId,
        name: impl Into<String>,
        role: CounselorRole,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            image,
            category: CounselorCategory::Ipgm,
            campus: None,
            specialization: None,
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Validate for Counselor {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.id.validate()
    }
}

/// Validates a whole roster: per-entry contracts plus id uniqueness.
pub fn validate_roster(roster: &[Counselor]) -> Result<(), ContractViolation> {
    let mut seen = std::collections::BTreeSet::new();
    for counselor in roster {
        counselor.validate()?;
        if !seen.insert(counselor.id.as_str()) {
            return Err(ContractViolation::InvalidValue {
                field: "counselor.id",
                reason: "must be unique within the roster",
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Ketua,
    Pentadbir,
    Pelajar,
}

impl SlotKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ketua => "ketua",
            Self::Pentadbir => "pentadbir",
            Self::Pelajar => "pelajar",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Ketua, Self::Pentadbir, Self::Pelajar]
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ketua" => Ok(Self::Ketua),
            "pentadbir" => Ok(Self::Pentadbir),
            "pelajar" => Ok(Self::Pelajar),
            _ => Err(ContractViolation::UnknownVariant {
                field: "campus.slot",
                got: raw.to_string(),
            }),
        }
    }

    pub const fn role(self) -> CounselorRole {
        match self {
            Self::Ketua => CounselorRole::KetuaKaunselorIpgk,
            Self::Pentadbir => CounselorRole::KaunselorPentadbir,
            Self::Pelajar => CounselorRole::KaunselorPelajar,
        }
    }
}

/// The three officer slots of a campus. All three are required on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusSlots {
    pub ketua: String,
    pub pentadbir: String,
    pub pelajar: String,
}

impl Default for CampusSlots {
    fn default() -> Self {
        Self {
            ketua: PLACEHOLDER_OFFICER.to_string(),
            pentadbir: PLACEHOLDER_OFFICER.to_string(),
            pelajar: PLACEHOLDER_OFFICER.to_string(),
        }
    }
}

impl CampusSlots {
    pub fn get(&self, slot: SlotKey) -> &str {
        match slot {
            SlotKey::Ketua => &self.ketua,
            SlotKey::Pentadbir => &self.pentadbir,
            SlotKey::Pelajar => &self.pelajar,
        }
    }

    pub fn with_slot(&self, slot: SlotKey, value: impl Into<String>) -> Self {
        let mut out = self.clone();
        let value = value.into();
        match slot {
            SlotKey::Ketua => out.ketua = value,
            SlotKey::Pentadbir => out.pentadbir = value,
            SlotKey::Pelajar => out.pelajar = value,
        }
        out
    }

    pub fn is_assigned(&self, slot: SlotKey) -> bool {
        self.get(slot) != PLACEHOLDER_OFFICER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusRecord {
    pub name: String,
    pub counselors: CampusSlots,
}

impl CampusRecord {
    pub fn unassigned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counselors: CampusSlots::default(),
        }
    }

    pub fn with_slot(&self, slot: SlotKey, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            counselors: self.counselors.with_slot(slot, value),
        }
    }
}
