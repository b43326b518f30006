#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use upsk_contracts::directory::{CounselorCategory, SlotKey};
use upsk_contracts::generation::{AssessmentKind, DocumentKind, FREE_TEXT_QUESTION};
use upsk_contracts::resources::BOOKING_URL;
use upsk_engines::GenerationProvider;
use upsk_os::logo_asset::{data_uri_from_bytes, media_type_for_path};
use upsk_os::view_state::TestSelection;
use upsk_os::{Portal, PortalError};
use upsk_storage::{EditOutcome, KeyValuePort};

#[derive(Debug, Parser)]
#[command(name = "upsk", version, about = "Counseling unit portal")]
pub struct Cli {
    /// Storage file; defaults to UPSK_STORAGE_PATH or the XDG config dir.
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: PortalCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortalCommand {
    /// List the counselor directory.
    Directory {
        #[arg(long, default_value = "ipgm")]
        category: String,
    },
    /// Show the officers of one campus.
    Campus { name: String },
    BookingUrl,
    /// List the self-assessments.
    Tests,
    /// Run a self-assessment and print the generated review.
    Critique {
        kind: String,
        /// `question=answer`; a bare value answers the free-text question.
        #[arg(long = "answer")]
        answers: Vec<String>,
    },
    /// Administrative edits. The admin password is read from the terminal or stdin.
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    Rename { id: String, name: String },
    CampusAdd { name: String },
    CampusRm { index: usize },
    CampusSet {
        campus: String,
        slot: String,
        value: String,
    },
    LogoSet { file: PathBuf },
    LogoClear,
    Draft {
        #[arg(default_value = "memo")]
        kind: String,
        #[arg(long, default_value = "")]
        topic: String,
        #[arg(long, default_value = "")]
        recipient: String,
    },
}

pub fn execute_portal_command<P, G>(
    portal: &mut Portal<P, G>,
    command: PortalCommand,
) -> Result<String, String>
where
    P: KeyValuePort,
    G: GenerationProvider,
{
    match command {
        PortalCommand::Directory { category } => {
            let category = CounselorCategory::parse(&category).map_err(|e| e.to_string())?;
            portal.view_mut().select_counselor_category(category);
            Ok(render_directory(portal, category))
        }
        PortalCommand::Campus { name } => {
            let campus = portal
                .store()
                .campus(&name)
                .ok_or_else(|| format!("unknown campus '{name}'"))?;
            let lines: Vec<String> = SlotKey::all()
                .iter()
                .map(|slot| format!("{}: {}", slot.role().as_str(), campus.counselors.get(*slot)))
                .collect();
            portal.view_mut().select_campus(name);
            Ok(lines.join("\n"))
        }
        PortalCommand::BookingUrl => Ok(BOOKING_URL.to_string()),
        PortalCommand::Tests => Ok(AssessmentKind::all()
            .iter()
            .map(|kind| match kind.external_url() {
                Some(url) => format!("{} ({url})", kind.as_str()),
                None => kind.as_str().to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")),
        PortalCommand::Critique { kind, answers } => {
            let kind = AssessmentKind::parse(&kind).map_err(|e| e.to_string())?;
            match portal.select_test(kind) {
                TestSelection::OpenExternal(url) => return Ok(url.to_string()),
                TestSelection::Started { .. } => {}
            }
            for raw in &answers {
                let (question, value) = raw
                    .split_once('=')
                    .unwrap_or((FREE_TEXT_QUESTION, raw.as_str()));
                portal.view_mut().answer(question.trim(), value.trim());
            }
            portal.submit_assessment().map_err(portal_error)
        }
        PortalCommand::Admin(admin) => execute_admin_command(portal, admin),
    }
}

fn execute_admin_command<P, G>(
    portal: &mut Portal<P, G>,
    command: AdminCommand,
) -> Result<String, String>
where
    P: KeyValuePort,
    G: GenerationProvider,
{
    match command {
        AdminCommand::Rename { id, name } => {
            outcome_text(portal.rename_counselor(&id, &name), &format!("no counselor '{id}'"))
        }
        AdminCommand::CampusAdd { name } => {
            outcome_text(portal.add_campus(&name), "campus name is blank")
        }
        AdminCommand::CampusRm { index } => {
            outcome_text(portal.remove_campus(index), &format!("no campus at {index}"))
        }
        AdminCommand::CampusSet {
            campus,
            slot,
            value,
        } => {
            let slot = SlotKey::parse(&slot).map_err(|e| e.to_string())?;
            outcome_text(
                portal.set_campus_slot(&campus, slot, &value),
                &format!("no campus '{campus}'"),
            )
        }
        AdminCommand::LogoSet { file } => {
            let bytes = fs::read(&file)
                .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
            let logo = data_uri_from_bytes(media_type_for_path(&file), &bytes)
                .map_err(|e| e.to_string())?;
            portal.set_logo(Some(logo)).map_err(portal_error)?;
            Ok("OK".to_string())
        }
        AdminCommand::LogoClear => {
            portal.set_logo(None).map_err(portal_error)?;
            Ok("OK".to_string())
        }
        AdminCommand::Draft {
            kind,
            topic,
            recipient,
        } => {
            let form = portal.view_mut().memo_form_mut();
            form.kind = DocumentKind::parse(&kind).map_err(|e| e.to_string())?;
            form.topic = topic;
            form.recipient = recipient;
            portal.draft_memo().map_err(portal_error)
        }
    }
}

fn render_directory<P, G>(portal: &Portal<P, G>, category: CounselorCategory) -> String
where
    P: KeyValuePort,
    G: GenerationProvider,
{
    match category {
        CounselorCategory::Ipgm => portal
            .counselors()
            .iter()
            .filter(|c| c.category == CounselorCategory::Ipgm)
            .map(|c| format!("{}\t{}\t{}", c.id, c.name, c.role.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        CounselorCategory::Ipgk => portal
            .campuses()
            .iter()
            .enumerate()
            .map(|(i, campus)| {
                let open = SlotKey::all()
                    .iter()
                    .filter(|slot| !campus.counselors.is_assigned(**slot))
                    .count();
                if open == 0 {
                    format!("{i}\t{}", campus.name)
                } else {
                    format!("{i}\t{}\t({open} unassigned)", campus.name)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn outcome_text(result: Result<EditOutcome, PortalError>, miss: &str) -> Result<String, String> {
    match result.map_err(portal_error)? {
        EditOutcome::Applied => Ok("OK".to_string()),
        EditOutcome::Unchanged => Ok(format!("UNCHANGED: {miss}")),
    }
}

fn portal_error(err: PortalError) -> String {
    match err {
        PortalError::NotAuthenticated => "admin access denied".to_string(),
        other => other.to_string(),
    }
}
