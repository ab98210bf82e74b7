#![allow(dead_code)]

use aideon_contacts::mapping::ColumnLayout;
use aideon_contacts::model::LocalRecord;

/// Width of a well-formed address book row.
pub const ROW_WIDTH: usize = 67;

/// A full-width address book row with the given identifier and timestamp.
pub fn row(id: &str, modified: &str) -> LocalRecord {
    let layout = ColumnLayout::default();
    let mut fields = vec![String::new(); ROW_WIDTH];
    fields[layout.given_name] = format!("Given{id}");
    fields[layout.family_name] = format!("Family{id}");
    fields[layout.email_work] = format!("{id}@work.example");
    fields[layout.phone_mobile] = format!("090-0000-{id:0>4}");
    fields[layout.org_name] = "Acme".into();
    fields[layout.department] = "Sales".into();
    fields[ROW_WIDTH - 2] = id.to_string();
    fields[ROW_WIDTH - 1] = modified.to_string();
    LocalRecord::new(fields)
}

/// A row too short to build a contact body from.
pub fn short_row(id: &str, modified: &str, width: usize) -> LocalRecord {
    let mut fields = vec!["x".to_string(); width.saturating_sub(2)];
    fields.push(id.to_string());
    fields.push(modified.to_string());
    LocalRecord::new(fields)
}

/// CSV text of a header line followed by `rows`.
pub fn csv_text(rows: &[LocalRecord]) -> String {
    let header: Vec<String> = (0..ROW_WIDTH).map(|i| format!("col{i}")).collect();
    let mut text = header.join(",");
    text.push('\n');
    for record in rows {
        text.push_str(&record.fields().join(","));
        text.push('\n');
    }
    text
}
