#![forbid(unsafe_code)]

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use upsk_contracts::directory::{CampusRecord, Counselor, SlotKey};
use upsk_contracts::generation::{AssessmentKind, DraftRequest};
use upsk_contracts::logo::LogoAsset;
use upsk_engines::{GenerationProvider, TextGenerationGateway};
use upsk_storage::{
    EditOutcome, HydrationReport, KeyValuePort, PersistedEntityStore, StorageError,
};

use crate::generation_slot::{GenerationSlot, GenerationTicket};
use crate::logo_asset;
use crate::view_state::{EditTarget, TestSelection, ViewState, ViewType};
use crate::AdminGate;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("admin access required")]
    NotAuthenticated,
    #[error("no assessment selected")]
    NoAssessmentSelected,
    #[error("memo topic is empty")]
    EmptyTopic,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GenerationJob {
    Draft(DraftRequest),
    Critique(String),
}

/// A dispatched generation request. `run` performs the blocking call and
/// resolves the owning slot; it may be moved to a worker thread.
#[derive(Debug)]
pub struct PendingGeneration<G>
where
    G: GenerationProvider,
{
    ticket: GenerationTicket,
    slot: GenerationSlot,
    gateway: Arc<TextGenerationGateway<G>>,
    job: GenerationJob,
}

impl<G> PendingGeneration<G>
where
    G: GenerationProvider,
{
    pub fn ticket(&self) -> GenerationTicket {
        self.ticket
    }

    pub fn run(self) -> String {
        let text = match &self.job {
            GenerationJob::Draft(req) => self.gateway.draft_request(req),
            GenerationJob::Critique(context) => self.gateway.critique_assessment(context),
        };
        self.slot.resolve(self.ticket, text.clone());
        text
    }
}

/// One loaded portal: durable entities, transient view state, the admin gate
/// and the generation boundary.
#[derive(Debug)]
pub struct Portal<P, G>
where
    P: KeyValuePort,
    G: GenerationProvider,
{
    store: PersistedEntityStore<P>,
    hydration: HydrationReport,
    view: ViewState,
    gate: AdminGate,
    gateway: Arc<TextGenerationGateway<G>>,
    memo_slot: GenerationSlot,
    critique_slot: GenerationSlot,
}

impl<P, G> Portal<P, G>
where
    P: KeyValuePort,
    G: GenerationProvider,
{
    pub fn start(port: P, gate: AdminGate, gateway: TextGenerationGateway<G>) -> Self {
        Self::start_shared(port, gate, Arc::new(gateway))
    }

    fn start_shared(port: P, gate: AdminGate, gateway: Arc<TextGenerationGateway<G>>) -> Self {
        let (store, hydration) = PersistedEntityStore::load(port);
        let view = ViewState::new(store.campuses().first().map(|c| c.name.as_str()));
        Self {
            store,
            hydration,
            view,
            gate,
            gateway,
            memo_slot: GenerationSlot::new(),
            critique_slot: GenerationSlot::new(),
        }
    }

    /// Simulates a page reload: durable entities are re-read, everything
    /// transient (including authentication) starts over.
    pub fn reload(self) -> Self {
        let Self {
            store,
            gate,
            gateway,
            ..
        } = self;
        Self::start_shared(store.into_port(), gate, gateway)
    }

    pub fn hydration(&self) -> HydrationReport {
        self.hydration
    }

    pub fn store(&self) -> &PersistedEntityStore<P> {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn counselors(&self) -> &[Counselor] {
        self.store.counselors()
    }

    pub fn campuses(&self) -> &[CampusRecord] {
        self.store.campuses()
    }

    pub fn logo(&self) -> Option<&LogoAsset> {
        self.store.logo()
    }

    pub fn selected_campus_info(&self) -> Option<&CampusRecord> {
        self.view
            .selected_campus()
            .and_then(|name| self.store.campus(name))
    }

    pub fn memo_slot(&self) -> &GenerationSlot {
        &self.memo_slot
    }

    pub fn critique_slot(&self) -> &GenerationSlot {
        &self.critique_slot
    }

    pub fn login(&mut self, candidate: &str) -> bool {
        self.view.set_view(ViewType::Admin);
        let granted = self.view.submit_login(&self.gate, candidate);
        if granted {
            info!("admin access granted");
        } else {
            warn!("admin access denied");
        }
        granted
    }

    pub fn logout(&mut self) {
        self.view.logout();
    }

    fn require_admin(&self) -> Result<(), PortalError> {
        if self.view.is_authenticated() {
            Ok(())
        } else {
            Err(PortalError::NotAuthenticated)
        }
    }

    pub fn rename_counselor(&mut self, id: &str, name: &str) -> Result<EditOutcome, PortalError> {
        self.require_admin()?;
        Ok(self.store.update_counselor_name(id, name)?)
    }

    pub fn set_campus_slot(
        &mut self,
        campus_name: &str,
        slot: SlotKey,
        value: &str,
    ) -> Result<EditOutcome, PortalError> {
        self.require_admin()?;
        Ok(self
            .store
            .update_campus_counselor_slot(campus_name, slot, value)?)
    }

    pub fn add_campus(&mut self, name: &str) -> Result<EditOutcome, PortalError> {
        self.require_admin()?;
        Ok(self.store.add_campus(name)?)
    }

    pub fn remove_campus(&mut self, index: usize) -> Result<EditOutcome, PortalError> {
        self.require_admin()?;
        Ok(self.store.remove_campus(index)?)
    }

    pub fn set_logo(&mut self, logo: Option<LogoAsset>) -> Result<(), PortalError> {
        self.require_admin()?;
        match &logo {
            Some(asset) => info!(
                fingerprint = %logo_asset::fingerprint(asset),
                media_type = asset.media_type().unwrap_or("unknown"),
                decoded_bytes = logo_asset::decoded_len(asset).unwrap_or(0),
                "logo updated"
            ),
            None => info!("logo cleared"),
        }
        self.store.set_logo(logo)?;
        Ok(())
    }

    /// Opens the rename dialog for a counselor. Unknown ids leave it closed.
    pub fn start_counselor_edit(&mut self, id: &str) -> Result<bool, PortalError> {
        self.require_admin()?;
        let Some(counselor) = self.store.counselors().iter().find(|c| c.id.as_str() == id) else {
            return Ok(false);
        };
        let (id, name) = (counselor.id.clone(), counselor.name.clone());
        self.view.start_counselor_edit(id, &name);
        Ok(true)
    }

    pub fn start_campus_edit(&mut self, index: usize) -> Result<bool, PortalError> {
        self.require_admin()?;
        let Some(campus) = self.store.campuses().get(index).cloned() else {
            return Ok(false);
        };
        self.view.start_campus_edit(index, campus);
        Ok(true)
    }

    /// Commits the open edit dialog and closes it.
    pub fn save_edit(&mut self) -> Result<EditOutcome, PortalError> {
        self.require_admin()?;
        match self.view.take_edit_target() {
            Some(EditTarget::Counselor { id, name_draft }) => {
                Ok(self.store.update_counselor_name(id.as_str(), &name_draft)?)
            }
            Some(EditTarget::Campus { index, draft }) => {
                Ok(self.store.replace_campus(index, draft)?)
            }
            None => Ok(EditOutcome::Unchanged),
        }
    }

    /// A memo needs a topic; an empty one dispatches nothing.
    pub fn begin_memo_draft(&mut self) -> Result<PendingGeneration<G>, PortalError> {
        self.require_admin()?;
        if self.view.memo_form().topic.is_empty() {
            return Err(PortalError::EmptyTopic);
        }
        Ok(PendingGeneration {
            ticket: self.memo_slot.begin(),
            slot: self.memo_slot.clone(),
            gateway: Arc::clone(&self.gateway),
            job: GenerationJob::Draft(self.view.memo_form().clone()),
        })
    }

    pub fn draft_memo(&mut self) -> Result<String, PortalError> {
        Ok(self.begin_memo_draft()?.run())
    }

    pub fn select_test(&mut self, kind: AssessmentKind) -> TestSelection {
        self.view.select_test(kind)
    }

    /// Back to the test list: selection, answers and the shown review reset.
    pub fn leave_test(&mut self) {
        self.view.leave_test();
        self.critique_slot.clear_result();
    }

    pub fn begin_critique(&mut self) -> Result<PendingGeneration<G>, PortalError> {
        let context = self
            .view
            .assessment_context()
            .ok_or(PortalError::NoAssessmentSelected)?;
        Ok(PendingGeneration {
            ticket: self.critique_slot.begin(),
            slot: self.critique_slot.clone(),
            gateway: Arc::clone(&self.gateway),
            job: GenerationJob::Critique(context),
        })
    }

    pub fn submit_assessment(&mut self) -> Result<String, PortalError> {
        Ok(self.begin_critique()?.run())
    }
}
