#![forbid(unsafe_code)]

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use upsk_contracts::directory::{validate_roster, CampusRecord, Counselor, SlotKey};
use upsk_contracts::logo::LogoAsset;

use crate::fixtures::{campus_list_default, ipgm_counselors_default};
use crate::{KeyValuePort, StorageError};

pub const STORAGE_KEY_LOGO: &str = "app_logo";
pub const STORAGE_KEY_COUNSELORS_IPGM: &str = "counselors_ipgm";
pub const STORAGE_KEY_CAMPUS_LIST: &str = "campus_list";

/// Where a field's value came from during `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Stored,
    DefaultAbsent,
    DefaultCorrupt,
}

/// Per-field hydration result. Fields hydrate independently, so a report can
/// mix stored and default sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReport {
    pub logo: FieldSource,
    pub counselors: FieldSource,
    pub campuses: FieldSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Unchanged,
}

/// Owns the logo, the IPGM roster and the IPGK campus list, and mirrors each
/// to its own storage key right after it changes.
///
/// Memory is updated before the write-through; a failed write is returned to
/// the caller and memory keeps the new value.
#[derive(Debug)]
pub struct PersistedEntityStore<P: KeyValuePort> {
    port: P,
    logo: Option<LogoAsset>,
    counselors: Vec<Counselor>,
    campuses: Vec<CampusRecord>,
}

impl<P: KeyValuePort> PersistedEntityStore<P> {
    pub fn load(port: P) -> (Self, HydrationReport) {
        let (logo, logo_source) = hydrate_field(&port, STORAGE_KEY_LOGO, |raw| {
            Ok(LogoAsset::from_data_uri(raw)?)
        });
        let (counselors, counselors_source) =
            hydrate_field(&port, STORAGE_KEY_COUNSELORS_IPGM, |raw| {
                let roster: Vec<Counselor> = parse_json(&raw)?;
                validate_roster(&roster)?;
                Ok(roster)
            });
        let (campuses, campuses_source) =
            hydrate_field(&port, STORAGE_KEY_CAMPUS_LIST, |raw| {
                parse_json::<Vec<CampusRecord>>(&raw)
            });

        let store = Self {
            port,
            logo,
            counselors: counselors.unwrap_or_else(ipgm_counselors_default),
            campuses: campuses.unwrap_or_else(campus_list_default),
        };
        let report = HydrationReport {
            logo: logo_source,
            counselors: counselors_source,
            campuses: campuses_source,
        };
        info!(
            logo = ?report.logo,
            counselors = ?report.counselors,
            campuses = ?report.campuses,
            counselor_count = store.counselors.len(),
            campus_count = store.campuses.len(),
            "persisted entity store loaded"
        );
        (store, report)
    }

    pub fn logo(&self) -> Option<&LogoAsset> {
        self.logo.as_ref()
    }

    pub fn counselors(&self) -> &[Counselor] {
        &self.counselors
    }

    pub fn campuses(&self) -> &[CampusRecord] {
        &self.campuses
    }

    pub fn campus(&self, name: &str) -> Option<&CampusRecord> {
        self.campuses.iter().find(|c| c.name == name)
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// `None` removes the key rather than storing an empty value.
    pub fn set_logo(&mut self, logo: Option<LogoAsset>) -> Result<(), StorageError> {
        self.logo = logo;
        match &self.logo {
            Some(asset) => {
                self.port.set(STORAGE_KEY_LOGO, asset.as_str())?;
                debug!(bytes = asset.as_str().len(), "logo written");
            }
            None => {
                self.port.remove(STORAGE_KEY_LOGO)?;
                debug!("logo removed");
            }
        }
        Ok(())
    }

    pub fn set_counselors(&mut self, counselors: Vec<Counselor>) -> Result<(), StorageError> {
        validate_roster(&counselors)?;
        self.counselors = counselors;
        self.persist_counselors()
    }

    pub fn set_campuses(&mut self, campuses: Vec<CampusRecord>) -> Result<(), StorageError> {
        self.campuses = campuses;
        self.persist_campuses()
    }

    pub fn update_counselor_name(
        &mut self,
        id: &str,
        new_name: &str,
    ) -> Result<EditOutcome, StorageError> {
        if !self.counselors.iter().any(|c| c.id.as_str() == id) {
            debug!(id, "counselor rename skipped: id not in roster");
            return Ok(EditOutcome::Unchanged);
        }
        self.counselors = rename_counselor(&self.counselors, id, new_name);
        self.persist_counselors()?;
        Ok(EditOutcome::Applied)
    }

    /// Edits the first campus with a matching name. A missing campus is a no-op.
    pub fn update_campus_counselor_slot(
        &mut self,
        campus_name: &str,
        slot: SlotKey,
        new_value: &str,
    ) -> Result<EditOutcome, StorageError> {
        let Some(updated) = assign_campus_slot(&self.campuses, campus_name, slot, new_value)
        else {
            debug!(campus_name, slot = slot.as_str(), "campus slot edit skipped: campus not found");
            return Ok(EditOutcome::Unchanged);
        };
        self.campuses = updated;
        self.persist_campuses()?;
        Ok(EditOutcome::Applied)
    }

    /// Duplicate names are accepted; lookups by name resolve to the first one.
    pub fn add_campus(&mut self, name: &str) -> Result<EditOutcome, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            debug!("campus add skipped: blank name");
            return Ok(EditOutcome::Unchanged);
        }
        if self.campuses.iter().any(|c| c.name == name) {
            warn!(campus_name = name, "adding campus with a name already in the list");
        }
        self.campuses.push(CampusRecord::unassigned(name));
        self.persist_campuses()?;
        Ok(EditOutcome::Applied)
    }

    pub fn remove_campus(&mut self, index: usize) -> Result<EditOutcome, StorageError> {
        if index >= self.campuses.len() {
            debug!(index, len = self.campuses.len(), "campus remove skipped: index out of range");
            return Ok(EditOutcome::Unchanged);
        }
        let removed = self.campuses.remove(index);
        self.persist_campuses()?;
        info!(index, campus_name = %removed.name, "campus removed");
        Ok(EditOutcome::Applied)
    }

    pub fn replace_campus(
        &mut self,
        index: usize,
        record: CampusRecord,
    ) -> Result<EditOutcome, StorageError> {
        let Some(slot) = self.campuses.get_mut(index) else {
            debug!(index, "campus replace skipped: index out of range");
            return Ok(EditOutcome::Unchanged);
        };
        *slot = record;
        self.persist_campuses()?;
        Ok(EditOutcome::Applied)
    }

    fn persist_counselors(&mut self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.counselors)?;
        self.port.set(STORAGE_KEY_COUNSELORS_IPGM, &raw)?;
        debug!(count = self.counselors.len(), "counselor roster written");
        Ok(())
    }

    fn persist_campuses(&mut self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.campuses)?;
        self.port.set(STORAGE_KEY_CAMPUS_LIST, &raw)?;
        debug!(count = self.campuses.len(), "campus list written");
        Ok(())
    }
}

/// Returns a new roster with the matching entry renamed; other entries and
/// the order are untouched.
pub fn rename_counselor(roster: &[Counselor], id: &str, new_name: &str) -> Vec<Counselor> {
    roster
        .iter()
        .map(|c| {
            if c.id.as_str() == id {
                c.with_name(new_name)
            } else {
                c.clone()
            }
        })
        .collect()
}

/// Returns the campus list with one slot of the first `campus_name` match
/// replaced, or `None` when no campus has that name.
pub fn assign_campus_slot(
    campuses: &[CampusRecord],
    campus_name: &str,
    slot: SlotKey,
    new_value: &str,
) -> Option<Vec<CampusRecord>> {
    let index = campuses.iter().position(|c| c.name == campus_name)?;
    let mut out = campuses.to_vec();
    out[index] = campuses[index].with_slot(slot, new_value);
    Some(out)
}

fn hydrate_field<P, T, F>(port: &P, key: &'static str, parse: F) -> (Option<T>, FieldSource)
where
    P: KeyValuePort,
    F: FnOnce(String) -> Result<T, StorageError>,
{
    let raw = match port.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (None, FieldSource::DefaultAbsent),
        Err(err) => {
            warn!(key, error = %err, "storage read failed; using default");
            return (None, FieldSource::DefaultCorrupt);
        }
    };
    match parse(raw) {
        Ok(value) => (Some(value), FieldSource::Stored),
        Err(err) => {
            warn!(key, error = %err, "stored value unreadable; using default");
            (None, FieldSource::DefaultCorrupt)
        }
    }
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    Ok(serde_json::from_str(raw)?)
}
