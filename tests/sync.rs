mod common;

use std::fs;

use aideon_contacts::SyncError;
use aideon_contacts::directory::{Call, DryRun, MemoryDirectory};
use aideon_contacts::io::csv_read;
use aideon_contacts::model::RemoteContact;
use aideon_contacts::reconcile::ReconcileOptions;
use aideon_contacts::sync;
use tempfile::tempdir;

use common::{csv_text, row, short_row};

const T: &str = "2023/01/01 10:00";

#[test]
fn reader_skips_header_and_keeps_short_rows() {
    let text = csv_text(&[row("1", T), short_row("2", T, 5)]);
    let records = csv_read::read_records_from(text.as_bytes()).expect("CSV parsed");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].raw_id(), Some("1"));
    assert_eq!(records[0].modified_at(), Some(T));
    assert_eq!(records[1].len(), 5);
}

#[test]
fn reader_handles_quoted_fields() {
    let text = "id,name,note,record,modified\n0,\"Doe, Jane\",\"line one\nline two\",7,2023/01/01 10:00\n";
    let records = csv_read::read_records_from(text.as_bytes()).expect("CSV parsed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].field(1), Some("Doe, Jane"));
    assert_eq!(records[0].field(2), Some("line one\nline two"));
    assert_eq!(records[0].raw_id(), Some("7"));
}

#[test]
fn sync_file_reconciles_csv_on_disk() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("contacts.csv");
    fs::write(&input, csv_text(&[row("1", T), row("2", T)])).expect("CSV written");

    let mut directory = MemoryDirectory::new();
    directory.insert_synced("2", T);
    directory.insert_synced("3", T);

    let summary = sync::sync_file(&input, &mut directory, ReconcileOptions::default())
        .expect("sync succeeds");

    assert_eq!(summary.created(), 1);
    assert_eq!(summary.deleted(), 1);
    assert_eq!(summary.unchanged(), 1);
    assert!(directory.find_by_key("1").is_some());
    assert!(directory.find_by_key("3").is_none());
}

#[test]
fn sync_file_requires_existing_input() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("missing.csv");

    let error = sync::sync_file(&input, MemoryDirectory::new(), ReconcileOptions::default())
        .expect_err("missing input");
    assert!(matches!(error, SyncError::MissingInput(path) if path == input));
}

#[test]
fn dry_run_decides_but_sends_nothing() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("contacts.csv");
    fs::write(&input, csv_text(&[row("1", T)])).expect("CSV written");

    let mut directory = MemoryDirectory::new();
    directory.insert_synced("5", T);
    let mut dry_run = DryRun::new(&mut directory);

    let summary = sync::sync_file(&input, &mut dry_run, ReconcileOptions::default())
        .expect("dry run succeeds");

    assert_eq!(summary.created(), 1);
    assert_eq!(summary.deleted(), 1);
    assert_eq!(dry_run.suppressed(), 2);
    assert_eq!(directory.calls(), &[Call::ListAll]);
    assert_eq!(directory.contacts().len(), 1);
}

#[test]
fn listings_number_their_lines() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("contacts.csv");
    fs::write(&input, csv_text(&[row("1", T), row("2", T)])).expect("CSV written");

    let local = sync::list_local(&input).expect("local listing");
    assert_eq!(local.len(), 2);
    assert!(local[1].starts_with("no.2 "));

    let mut directory = MemoryDirectory::new();
    assert_eq!(
        sync::list_remote(&mut directory).expect("remote listing"),
        vec!["No connections found.".to_string()]
    );

    directory.insert(RemoteContact::new("people/c1").with_display_name("Jane Doe"));
    directory.insert(RemoteContact::new("people/c2"));
    assert_eq!(
        sync::list_remote(&mut directory).expect("remote listing"),
        vec![
            "no.1 Jane Doe people/c1".to_string(),
            "no.2 - people/c2".to_string(),
        ]
    );
}
