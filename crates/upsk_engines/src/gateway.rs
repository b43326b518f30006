#![forbid(unsafe_code)]

use tracing::{debug, warn};
use upsk_contracts::generation::{DocumentKind, DraftRequest};

use crate::provider::GenerationProvider;

pub const DRAFT_EMPTY_FALLBACK: &str = "Gagal menjana draf. Sila cuba lagi.";
pub const DRAFT_ERROR_FALLBACK: &str = "Ralat teknikal semasa menjana draf.";
pub const CRITIQUE_EMPTY_FALLBACK: &str = "Ulasan tidak tersedia buat masa ini.";
pub const CRITIQUE_ERROR_FALLBACK: &str =
    "Sistem sibuk menganalisis data. Sila hubungi Unit Kaunseling secara terus untuk keputusan rasmi.";

/// Single-shot boundary to the generation service. Every call returns text:
/// the service's answer verbatim, or a fixed Malay fallback sentence.
#[derive(Debug, Clone)]
pub struct TextGenerationGateway<P>
where
    P: GenerationProvider,
{
    provider: P,
    model: String,
}

impl<P> TextGenerationGateway<P>
where
    P: GenerationProvider,
{
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn draft_official_text(&self, kind: DocumentKind, topic: &str, recipient: &str) -> String {
        let prompt = draft_prompt(kind, topic, recipient);
        self.run("draft", &prompt, DRAFT_EMPTY_FALLBACK, DRAFT_ERROR_FALLBACK)
    }

    pub fn draft_request(&self, req: &DraftRequest) -> String {
        self.draft_official_text(req.kind, &req.topic, &req.recipient)
    }

    pub fn critique_assessment(&self, context: &str) -> String {
        let prompt = critique_prompt(context);
        self.run(
            "critique",
            &prompt,
            CRITIQUE_EMPTY_FALLBACK,
            CRITIQUE_ERROR_FALLBACK,
        )
    }

    fn run(
        &self,
        operation: &'static str,
        prompt: &str,
        empty_fallback: &str,
        error_fallback: &str,
    ) -> String {
        match self.provider.generate(&self.model, prompt) {
            Ok(text) if !text.is_empty() => {
                debug!(operation, model = %self.model, chars = text.len(), "generation ok");
                text
            }
            Ok(_) => {
                warn!(operation, model = %self.model, "generation returned no text");
                empty_fallback.to_string()
            }
            Err(err) => {
                warn!(operation, model = %self.model, detail = %err.safe_detail(), "generation failed");
                error_fallback.to_string()
            }
        }
    }
}

/// Inputs are embedded verbatim. Line breaks, indentation and trailing
/// spaces are part of the template.
pub fn draft_prompt(kind: DocumentKind, topic: &str, recipient: &str) -> String {
    format!(
        concat!(
            "Sila draf satu {kind} rasmi daripada Unit Kaunseling. \n",
            "  Topik: {topic}. \n",
            "  Penerima: {recipient}. \n",
            "  Bahasa: Bahasa Melayu Formal. \n",
            "  Sertakan struktur lengkap: Tarikh, No Rujukan, Tajuk, dan Kandungan Utama."
        ),
        kind = kind.as_str(),
        topic = topic,
        recipient = recipient,
    )
}

pub fn critique_prompt(context: &str) -> String {
    format!(
        concat!(
            "Anda adalah seorang Kaunselor Berdaftar yang sangat empati. Berikan ulasan ringkas dan profesional berdasarkan data ujian psikologi berikut: {context}. \n",
            "  Garis panduan:\n",
            "  1. Jika ini ujian Kerjaya, berikan cadangan bidang yang sesuai.\n",
            "  2. Jika ini ujian Minda Sihat, berikan galakan dan nasihat kesihatan mental.\n",
            "  3. Jika ini PKPP (Profil Kesejahteraan Psikologi Pelajar) atau PKPW (Profil Kesejahteraan Psikologi Warga), berikan ulasan tentang tahap kesejahteraan dan cadangan penambahbaikan diri.\n",
            "  4. Jika Gaya Belajar, berikan tip belajar yang berkesan.\n",
            "  5. Gunakan Bahasa Melayu yang sopan, memberi inspirasi, dan mudah difahami.\n",
            "  6. Pastikan ulasan dalam 3-5 ayat sahaja."
        ),
        context = context,
    )
}
