use std::path::PathBuf;

use deckdoc_engine::{load_document, save_document, Document, ProtectionState, SaveFormat};
use deckdoc_ops::{dispatch, ErrorKind, Report};
use deckdoc_params::ParamBag;
use serde_json::json;
use tempfile::TempDir;

fn write_deck(dir: &TempDir, name: &str, doc: &Document) -> PathBuf {
    let path = dir.path().join(name);
    save_document(doc, &path, SaveFormat::Json).expect("write fixture");
    path
}

fn bag(value: serde_json::Value) -> ParamBag {
    ParamBag::from_value(value).expect("params are an object")
}

#[test]
fn protect_defaults_to_read_only_and_persists() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());

    let report = dispatch(
        "protection.protect",
        &bag(json!({"path": path.to_str().unwrap(), "password": "s3cret"})),
    )
    .expect("protect succeeds");
    assert!(report.render().contains("ReadOnly"));

    let saved = load_document(&path).expect("reload");
    assert_eq!(saved.protection.state, ProtectionState::ReadOnly);
    assert_eq!(saved.protection.password.as_deref(), Some("s3cret"));
}

#[test]
fn blank_password_reads_as_missing() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());

    let err = dispatch(
        "protection.protect",
        &bag(json!({"path": path.to_str().unwrap(), "password": "   "})),
    )
    .expect_err("blank password is rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("password"));
}

#[test]
fn no_protection_type_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());

    let err = dispatch(
        "protection.protect",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "password": "pw",
            "type": "NoProtection",
        })),
    )
    .expect_err("NoProtection cannot be applied");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("unprotect"));
}

#[test]
fn wrong_password_leaves_protection_in_place() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());
    let params = json!({"path": path.to_str().unwrap(), "password": "right"});
    dispatch("protection.protect", &bag(params)).expect("protect");

    let err = dispatch(
        "protection.unprotect",
        &bag(json!({"path": path.to_str().unwrap(), "password": "wrong"})),
    )
    .expect_err("wrong password fails");
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let saved = load_document(&path).expect("reload");
    assert_eq!(saved.protection.state, ProtectionState::ReadOnly);
}

#[test]
fn unprotect_names_the_previous_state() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());
    dispatch(
        "protection.protect",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "password": "pw",
            "type": "AllowOnlyComments",
        })),
    )
    .expect("protect");

    let report = dispatch(
        "protection.unprotect",
        &bag(json!({"path": path.to_str().unwrap(), "password": "pw"})),
    )
    .expect("unprotect succeeds");
    assert!(report.render().contains("AllowOnlyComments"));

    let saved = load_document(&path).expect("reload");
    assert_eq!(saved.protection.state, ProtectionState::NoProtection);
    assert_eq!(saved.protection.password, None);
}

#[test]
fn unprotecting_an_unprotected_document_is_a_no_op() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());

    // No password needed: nothing to check against.
    let report = dispatch(
        "protection.unprotect",
        &bag(json!({"path": path.to_str().unwrap()})),
    )
    .expect("no-op succeeds");
    assert!(report.render().contains("not protected"));

    // With an explicit outputPath the unchanged document is still copied.
    let copy = dir.path().join("copy.json");
    dispatch(
        "protection.unprotect",
        &bag(json!({
            "path": path.to_str().unwrap(),
            "outputPath": copy.to_str().unwrap(),
        })),
    )
    .expect("copying no-op succeeds");
    assert!(copy.is_file());
}

#[test]
fn get_reports_the_current_state() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_deck(&dir, "deck.json", &Document::default());

    let report = dispatch(
        "protection.get",
        &bag(json!({"path": path.to_str().unwrap()})),
    )
    .expect("get succeeds");
    let Report::Json(value) = report else {
        panic!("protection.get returns JSON");
    };
    assert_eq!(value["state"], "NoProtection");
    assert_eq!(value["protected"], false);
}
