#![forbid(unsafe_code)]

use upsk_contracts::directory::{CampusRecord, CounselorCategory, CounselorId, SlotKey};
use upsk_contracts::generation::{assessment_context, AssessmentAnswers, AssessmentKind, DraftRequest};
use upsk_contracts::resources::LOGIN_DENIED_MESSAGE;

use crate::AdminGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    #[default]
    Public,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminMenu {
    #[default]
    Stats,
    Appointments,
    DataManagement,
    Documents,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagementTab {
    #[default]
    Counselors,
    Resources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicTab {
    #[default]
    Counselors,
    Test,
    Booking,
    Posters,
    Worksheets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSelection {
    OpenExternal(&'static str),
    Started { under_construction: bool },
}

/// Edit dialog contents held until the admin saves or cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Counselor { id: CounselorId, name_draft: String },
    Campus { index: usize, draft: CampusRecord },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssessmentSession {
    pub selected: Option<AssessmentKind>,
    pub answers: AssessmentAnswers,
}

/// Transient UI state. Nothing here is persisted; a new value is the state
/// of a freshly loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    view: ViewType,
    authenticated: bool,
    login_error: Option<&'static str>,
    admin_menu: AdminMenu,
    management_tab: ManagementTab,
    public_tab: PublicTab,
    counselor_category: Option<CounselorCategory>,
    selected_campus: Option<String>,
    memo_form: DraftRequest,
    edit_target: Option<EditTarget>,
    assessment: AssessmentSession,
}

impl ViewState {
    pub fn new(first_campus: Option<&str>) -> Self {
        Self {
            counselor_category: Some(CounselorCategory::Ipgm),
            selected_campus: first_campus.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn view(&self) -> ViewType {
        self.view
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn login_error(&self) -> Option<&'static str> {
        self.login_error
    }

    pub fn set_view(&mut self, view: ViewType) {
        self.view = view;
        if view == ViewType::Public {
            self.login_error = None;
        }
    }

    pub fn submit_login(&mut self, gate: &AdminGate, candidate: &str) -> bool {
        if gate.check_admin_access(candidate) {
            self.authenticated = true;
            self.login_error = None;
            true
        } else {
            self.login_error = Some(LOGIN_DENIED_MESSAGE);
            false
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.edit_target = None;
        self.view = ViewType::Public;
    }

    pub fn admin_menu(&self) -> AdminMenu {
        self.admin_menu
    }

    pub fn select_admin_menu(&mut self, menu: AdminMenu) {
        self.admin_menu = menu;
    }

    pub fn management_tab(&self) -> ManagementTab {
        self.management_tab
    }

    pub fn select_management_tab(&mut self, tab: ManagementTab) {
        self.management_tab = tab;
    }

    pub fn public_tab(&self) -> PublicTab {
        self.public_tab
    }

    pub fn select_public_tab(&mut self, tab: PublicTab) {
        self.public_tab = tab;
    }

    pub fn counselor_category(&self) -> CounselorCategory {
        self.counselor_category.unwrap_or(CounselorCategory::Ipgm)
    }

    pub fn select_counselor_category(&mut self, category: CounselorCategory) {
        self.counselor_category = Some(category);
    }

    pub fn selected_campus(&self) -> Option<&str> {
        self.selected_campus.as_deref()
    }

    pub fn select_campus(&mut self, name: impl Into<String>) {
        self.selected_campus = Some(name.into());
    }

    pub fn memo_form(&self) -> &DraftRequest {
        &self.memo_form
    }

    pub fn memo_form_mut(&mut self) -> &mut DraftRequest {
        &mut self.memo_form
    }

    pub fn edit_target(&self) -> Option<&EditTarget> {
        self.edit_target.as_ref()
    }

    pub fn start_counselor_edit(&mut self, id: CounselorId, current_name: &str) {
        self.edit_target = Some(EditTarget::Counselor {
            id,
            name_draft: current_name.to_string(),
        });
    }

    pub fn start_campus_edit(&mut self, index: usize, current: CampusRecord) {
        self.edit_target = Some(EditTarget::Campus {
            index,
            draft: current,
        });
    }

    /// Returns `false` when no counselor edit is open.
    pub fn set_name_draft(&mut self, name: &str) -> bool {
        match &mut self.edit_target {
            Some(EditTarget::Counselor { name_draft, .. }) => {
                *name_draft = name.to_string();
                true
            }
            _ => false,
        }
    }

    /// Returns `false` when no campus edit is open.
    pub fn set_campus_slot_draft(&mut self, slot: SlotKey, value: &str) -> bool {
        match &mut self.edit_target {
            Some(EditTarget::Campus { draft, .. }) => {
                *draft = draft.with_slot(slot, value);
                true
            }
            _ => false,
        }
    }

    pub fn take_edit_target(&mut self) -> Option<EditTarget> {
        self.edit_target.take()
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
    }

    pub fn assessment(&self) -> &AssessmentSession {
        &self.assessment
    }

    /// Profiles hosted elsewhere are opened by URL; every other test becomes
    /// the selected one. Answers are kept until `leave_test`.
    pub fn select_test(&mut self, kind: AssessmentKind) -> TestSelection {
        if let Some(url) = kind.external_url() {
            return TestSelection::OpenExternal(url);
        }
        self.assessment.selected = Some(kind);
        TestSelection::Started {
            under_construction: kind.under_construction(),
        }
    }

    pub fn answer(&mut self, question: &str, value: &str) {
        self.assessment.answers.answer(question, value);
    }

    pub fn leave_test(&mut self) {
        self.assessment = AssessmentSession::default();
    }

    pub fn assessment_context(&self) -> Option<String> {
        self.assessment
            .selected
            .map(|kind| assessment_context(kind, &self.assessment.answers))
    }
}
