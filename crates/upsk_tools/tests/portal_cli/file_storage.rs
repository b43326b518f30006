#![forbid(unsafe_code)]

use std::fs;

use clap::Parser;
use tempfile::TempDir;
use upsk_engines::{GeminiProvider, GenerationProviderConfig, TextGenerationGateway};
use upsk_os::{AdminGate, Portal};
use upsk_storage::FileKeyValue;
use upsk_tools::portal_cli::{execute_portal_command, Cli};

const FIXTURE: &str = r#"{"candidates":[{"content":{"parts":[{"text":"MEMO"},{"text":" RASMI"}]}}]}"#;

fn open(dir: &TempDir) -> Portal<FileKeyValue, GeminiProvider> {
    let provider = GeminiProvider::new(GenerationProviderConfig::offline_fixture(FIXTURE));
    Portal::start(
        FileKeyValue::for_path(dir.path().join("portal_storage.json")),
        AdminGate::new("pw"),
        TextGenerationGateway::new(provider, "m"),
    )
}

fn run(portal: &mut Portal<FileKeyValue, GeminiProvider>, args: &[&str]) -> Result<String, String> {
    let cli = Cli::try_parse_from(std::iter::once("upsk").chain(args.iter().copied()))
        .map_err(|e| e.to_string())?;
    execute_portal_command(portal, cli.command)
}

#[test]
fn at_portal_cli_file_01_admin_edits_survive_restart() {
    let dir = TempDir::new().unwrap();
    let mut portal = open(&dir);
    assert!(portal.login("pw"));
    assert_eq!(run(&mut portal, &["admin", "rename", "ipgm-2", "Encik Rahman"]).unwrap(), "OK");
    assert_eq!(run(&mut portal, &["admin", "campus-add", "  IPGK Baharu  "]).unwrap(), "OK");
    assert_eq!(run(&mut portal, &["admin", "campus-rm", "0"]).unwrap(), "OK");
    drop(portal);

    let mut portal = open(&dir);
    assert!(!portal.view().is_authenticated());
    assert_eq!(portal.counselors()[1].name, "Encik Rahman");
    assert_eq!(portal.campuses().len(), 28);
    assert_eq!(portal.campuses()[0].name, "IPGK Bahasa Antarabangsa");
    assert_eq!(portal.campuses()[27].name, "IPGK Baharu");
    assert!(run(&mut portal, &["campus", "IPGK Baharu"])
        .unwrap()
        .contains("[Nama Pegawai]"));
}

#[test]
fn at_portal_cli_file_02_logo_file_is_stored_as_data_uri() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("logo.png");
    fs::write(&image, b"\x89PNG").unwrap();

    let mut portal = open(&dir);
    portal.login("pw");
    let image_arg = image.to_str().unwrap();
    assert_eq!(run(&mut portal, &["admin", "logo-set", image_arg]).unwrap(), "OK");
    drop(portal);

    let mut portal = open(&dir);
    assert_eq!(
        portal.logo().map(|l| l.as_str()),
        Some("data:image/png;base64,iVBORw==")
    );
    portal.login("pw");
    run(&mut portal, &["admin", "logo-clear"]).unwrap();
    let portal = portal.reload();
    assert!(portal.logo().is_none());
}

#[test]
fn at_portal_cli_file_03_draft_joins_candidate_parts() {
    let dir = TempDir::new().unwrap();
    let mut portal = open(&dir);
    assert_eq!(
        run(&mut portal, &["admin", "draft", "surat", "--topic", "Cuti"]).unwrap_err(),
        "admin access denied"
    );
    portal.login("pw");
    assert_eq!(
        run(&mut portal, &["admin", "draft", "surat", "--topic", "Cuti"]).unwrap(),
        "MEMO RASMI"
    );
    assert!(!dir.path().join("portal_storage.json").exists());
}
