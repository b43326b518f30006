#![forbid(unsafe_code)]

use crate::ContractViolation;

/// Default external model used for every generation request.
pub const GENERATION_MODEL_DEFAULT: &str = "gemini-3-flash-preview";

/// Question key used by the free-text answer box shown for every local test.
pub const FREE_TEXT_QUESTION: &str = "Konteks Diri";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentKind {
    #[default]
    Memo,
    Surat,
}

impl DocumentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memo => "Memo",
            Self::Surat => "Surat",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memo" => Ok(Self::Memo),
            "surat" => Ok(Self::Surat),
            _ => Err(ContractViolation::UnknownVariant {
                field: "document.kind",
                got: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftRequest {
    pub kind: DocumentKind,
    pub topic: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssessmentKind {
    Pkpp,
    Pkpw,
    MindaSihat,
    Personaliti,
    IkpsiP,
    GayaBelajar,
    Kerjaya,
}

impl AssessmentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pkpp => "PKPP",
            Self::Pkpw => "PKPW",
            Self::MindaSihat => "Minda Sihat",
            Self::Personaliti => "Personaliti",
            Self::IkpsiP => "IKPSI-P",
            Self::GayaBelajar => "Gaya Belajar",
            Self::Kerjaya => "Kerjaya",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Pkpp,
            Self::Pkpw,
            Self::MindaSihat,
            Self::Personaliti,
            Self::IkpsiP,
            Self::GayaBelajar,
            Self::Kerjaya,
        ]
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "pkpp" => Ok(Self::Pkpp),
            "pkpw" => Ok(Self::Pkpw),
            "minda-sihat" => Ok(Self::MindaSihat),
            "personaliti" => Ok(Self::Personaliti),
            "ikpsi-p" => Ok(Self::IkpsiP),
            "gaya-belajar" => Ok(Self::GayaBelajar),
            "kerjaya" => Ok(Self::Kerjaya),
            _ => Err(ContractViolation::UnknownVariant {
                field: "assessment.kind",
                got: raw.to_string(),
            }),
        }
    }

    /// PKPP and PKPW are hosted outside the portal.
    pub const fn external_url(self) -> Option<&'static str> {
        match self {
            Self::Pkpp => Some("https://upskipgm.com/PKPP"),
            Self::Pkpw => Some("https://upskipgm.com/PKPW"),
            _ => None,
        }
    }

    /// Local tests whose dedicated question set has not been published yet;
    /// they collect the free-text answer only.
    pub const fn under_construction(self) -> bool {
        self.external_url().is_none()
    }
}

/// Question/answer pairs in first-answered order. Re-answering a question
/// replaces its answer in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssessmentAnswers {
    entries: Vec<(String, String)>,
}

impl AssessmentAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&mut self, question: impl Into<String>, value: impl Into<String>) {
        let question = question.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(q, _)| *q == question) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((question, value)),
        }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(q, a)| format!("Q: {q}, A: {a}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Caller-assembled context handed to the critique prompt.
pub fn assessment_context(kind: AssessmentKind, answers: &AssessmentAnswers) -> String {
    format!("Jenis Ujian: {}. Data: {}", kind.as_str(), answers.summary())
}
