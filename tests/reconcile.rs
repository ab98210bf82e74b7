mod common;

use aideon_contacts::config::UpdateMode;
use aideon_contacts::directory::{Call, MemoryDirectory};
use aideon_contacts::mapping::ColumnLayout;
use aideon_contacts::model::{ExternalId, RemoteContact};
use aideon_contacts::reconcile::{Outcome, ReconcileOptions, Reconciler};

use common::{row, short_row};

const EARLY: &str = "2023/01/01 09:00:00";
const T: &str = "2023/01/01 10:00:00";
const LATE: &str = "2023/01/02 08:30";

fn body_of(record: &aideon_contacts::model::LocalRecord) -> aideon_contacts::model::ContactBody {
    ColumnLayout::default()
        .contact_body(record)
        .expect("well-formed row")
}

#[test]
fn end_to_end_scenario_issues_expected_calls() {
    let local = vec![row("1", T), row("2", T), row("3", T)];
    let mut directory = MemoryDirectory::new();
    let remote_2 = directory.insert_synced("2", EARLY);
    let _remote_3 = directory.insert_synced("3", LATE);
    let remote_4 = directory.insert_synced("4", T);

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert_eq!(
        directory.mutations(),
        vec![
            &Call::Delete(remote_2),
            &Call::Create(body_of(&local[1])),
            &Call::Delete(remote_4),
            &Call::Create(body_of(&local[0])),
        ]
    );
    assert_eq!(summary.created(), 1);
    assert_eq!(summary.updated(), 1);
    assert_eq!(summary.deleted(), 1);
    assert_eq!(summary.unchanged(), 1);
    assert!(summary.outcomes.contains(&Outcome::Unchanged { id: ExternalId(3) }));
}

#[test]
fn listing_happens_once_per_run() {
    let mut directory = MemoryDirectory::new();
    Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&[row("1", T)])
        .expect("reconciliation succeeds");

    let listings = directory
        .calls()
        .iter()
        .filter(|call| matches!(call, Call::ListAll))
        .count();
    assert_eq!(listings, 1);
}

#[test]
fn minute_precision_timestamps_compare_equal_to_seconds() {
    let local = vec![row("9", "2023/01/01 10:00")];
    let mut directory = MemoryDirectory::new();
    directory.insert_synced("9", "2023/01/01 10:00:00");

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert!(directory.mutations().is_empty());
    assert!(!summary.has_changes());
}

#[test]
fn second_run_with_unchanged_file_is_a_no_op() {
    let local = vec![row("1", T), row("2", "2023/03/04 05:06"), row("3", LATE)];
    let mut directory = MemoryDirectory::new();
    directory.insert_synced("2", EARLY);
    directory.insert_synced("8", T);

    let first = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("first run");
    assert!(first.has_changes());

    directory.clear_calls();
    let second = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("second run");

    assert!(directory.mutations().is_empty());
    assert_eq!(second.unchanged(), 3);
}

#[test]
fn short_local_row_is_reported_and_skipped() {
    let local = vec![short_row("5", T, 10), row("6", T)];
    let mut directory = MemoryDirectory::new();

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("malformed rows do not abort the run");

    assert_eq!(directory.mutations(), vec![&Call::Create(body_of(&local[1]))]);
    assert!(summary.outcomes.contains(&Outcome::SkippedMalformed {
        id: Some("5".into()),
        fields: 10,
        required: 67,
    }));
}

#[test]
fn short_local_row_never_deletes_its_remote_copy() {
    let local = vec![short_row("7", LATE, 20)];
    let mut directory = MemoryDirectory::new();
    directory.insert_synced("7", EARLY);

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert!(directory.mutations().is_empty());
    assert!(directory.find_by_key("7").is_some());
    assert_eq!(summary.malformed(), 1);
}

#[test]
fn corrupted_remote_key_is_deleted() {
    let mut directory = MemoryDirectory::new();
    directory.insert(RemoteContact::new("people/corrupt").with_user_defined("abc", T));

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&[])
        .expect("reconciliation succeeds");

    assert_eq!(
        directory.mutations(),
        vec![&Call::Delete("people/corrupt".into())]
    );
    assert_eq!(summary.corrupted(), 1);
}

#[test]
fn remote_contact_without_key_is_left_alone() {
    let mut directory = MemoryDirectory::new();
    directory.insert(RemoteContact::new("people/manual").with_display_name("Someone"));

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&[row("1", T)])
        .expect("reconciliation succeeds");

    assert!(
        !directory
            .mutations()
            .contains(&&Call::Delete("people/manual".into()))
    );
    assert!(summary.outcomes.contains(&Outcome::SkippedUnkeyed {
        resource_name: "people/manual".into(),
        display_name: Some("Someone".into()),
    }));
}

#[test]
fn local_row_without_numeric_id_is_never_uploaded() {
    let local = vec![row("x12", T), row("", T), row("-3", T)];
    let mut directory = MemoryDirectory::new();

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert!(directory.mutations().is_empty());
    assert_eq!(summary.skipped(), 3);
}

#[test]
fn unparseable_timestamp_forces_replacement() {
    let local = vec![row("4", T)];
    let mut directory = MemoryDirectory::new();
    let remote = directory.insert_synced("4", "not a date");

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert_eq!(
        directory.mutations(),
        vec![&Call::Delete(remote), &Call::Create(body_of(&local[0]))]
    );
    assert_eq!(summary.updated(), 1);
}

#[test]
fn newer_remote_copy_is_kept() {
    let local = vec![row("4", EARLY)];
    let mut directory = MemoryDirectory::new();
    directory.insert_synced("4", T);

    Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert!(directory.mutations().is_empty());
}

#[test]
fn duplicate_remote_keys_keep_only_the_first() {
    let local = vec![row("2", T)];
    let mut directory = MemoryDirectory::new();
    directory.insert_synced("2", T);
    let duplicate = directory.insert_synced("2", T);

    Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    assert_eq!(directory.mutations(), vec![&Call::Delete(duplicate)]);
    assert_eq!(directory.contacts().len(), 1);
}

#[test]
fn local_only_rows_upload_in_id_order() {
    let local = vec![row("30", T), row("4", T), row("12", T)];
    let mut directory = MemoryDirectory::new();

    let summary = Reconciler::new(&mut directory, ReconcileOptions::default())
        .run(&local)
        .expect("reconciliation succeeds");

    let created: Vec<ExternalId> = summary
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            Outcome::Created { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(created, vec![ExternalId(4), ExternalId(12), ExternalId(30)]);
}

#[test]
fn in_place_mode_updates_without_deleting() {
    let local = vec![row("2", LATE)];
    let mut directory = MemoryDirectory::new();
    let remote = directory.insert_synced("2", EARLY);
    directory.clear_calls();
    // Seeded contacts have no etag, so the first run falls back to replace.
    let options = ReconcileOptions {
        update_mode: UpdateMode::InPlace,
        ..ReconcileOptions::default()
    };
    Reconciler::new(&mut directory, options)
        .run(&local)
        .expect("first run");
    assert_eq!(directory.mutations()[0], &Call::Delete(remote));

    let newer = vec![row("2", "2024/01/01 00:00")];
    directory.clear_calls();
    let summary = Reconciler::new(&mut directory, options)
        .run(&newer)
        .expect("second run");

    let mutations = directory.mutations();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(mutations[0], Call::Update { .. }));
    assert!(matches!(
        summary.outcomes[0],
        Outcome::Updated { in_place: true, .. }
    ));
    assert_eq!(
        directory
            .find_by_key("2")
            .and_then(|contact| contact.user_defined.as_ref())
            .map(|pair| pair.value.as_str()),
        Some("2024/01/01 00:00")
    );
}
