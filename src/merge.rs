//! Extending the input table with the detected events.
//!
//! Each result contributes at most one row per event column. A row belongs to
//! exactly one dialog and is recorded at most once per kind, so two results
//! claiming the same cell means the scan broke an invariant; that is an error,
//! never an overwrite.

use crate::dialog::DialogId;
use crate::fact::FactKind;
use crate::result::DialogResult;
use crate::table::Table;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::Write;

/// The input table plus one nullable column per [`FactKind`].
#[derive(Debug, Clone)]
pub struct ExtendedTable {
    headers: csv::StringRecord,
    rows: Vec<(csv::StringRecord, [Option<String>; 4])>,
}

impl ExtendedTable {
    /// Header names of the added columns, in order.
    pub fn event_columns() -> [&'static str; 4] {
        FactKind::ALL.map(FactKind::column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of the `kind` column at `row`, if any.
    pub fn event(&self, row: usize, kind: FactKind) -> Option<&str> {
        self.rows.get(row)?.1[kind.index()].as_deref()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = self.headers.clone();
        for column in Self::event_columns() {
            header.push_field(column);
        }
        wtr.write_record(&header)?;

        for (record, events) in &self.rows {
            let mut out = record.clone();
            for value in events {
                out.push_field(value.as_deref().unwrap_or_default());
            }
            wtr.write_record(&out)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Left-join the results onto `table` by row.
pub fn extend_table(table: &Table, results: &[DialogResult]) -> Result<ExtendedTable> {
    let mut columns: [BTreeMap<usize, (String, &DialogId)>; 4] = Default::default();

    for result in results {
        for kind in FactKind::ALL {
            let Some((row, value)) = result.column_value(kind) else {
                continue;
            };
            if row >= table.len() {
                return Err(Error::RowOutOfRange { row, rows: table.len() });
            }
            match columns[kind.index()].entry(row) {
                Entry::Vacant(slot) => {
                    slot.insert((value, &result.dialog_id));
                }
                Entry::Occupied(taken) => {
                    return Err(Error::MergeKeyCollision {
                        column: kind.column(),
                        row,
                        first: taken.get().1.clone(),
                        second: result.dialog_id.clone(),
                    });
                }
            }
        }
    }

    let rows = table
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let events = FactKind::ALL.map(|kind| columns[kind.index()].remove(&row).map(|(value, _)| value));
            (record.clone(), events)
        })
        .collect();

    Ok(ExtendedTable { headers: table.headers().clone(), rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{Role, Utterance};
    use crate::result::{CompanyMention, Detection, Introduction};

    fn table() -> Table {
        Table::from_utterances(vec![
            Utterance::new(0, 1u64, Role::Manager, "Здравствуйте, меня зовут Иван"),
            Utterance::new(1, 1u64, Role::Manager, "до свидания"),
            Utterance::new(2, 2u64, Role::Manager, "компания Ромашка"),
        ])
        .unwrap()
    }

    fn first_dialog() -> DialogResult {
        DialogResult {
            greeting: Some(Detection { row: 0, text: "здравствуйте".into() }),
            introduce: Some(Introduction { row: 0, text: "меня зовут Иван".into(), first: "иван".into(), second: None }),
            bye: Some(Detection { row: 1, text: "до свидания".into() }),
            greet_and_bye: true,
            ..DialogResult::new(1u64.into())
        }
    }

    #[test]
    fn joins_values_by_row() {
        let second = DialogResult {
            company: Some(CompanyMention { row: 2, name: "Ромашка".into() }),
            ..DialogResult::new(2u64.into())
        };
        let extended = extend_table(&table(), &[second, first_dialog()]).unwrap();

        assert_eq!(extended.len(), 3);
        assert_eq!(extended.event(0, FactKind::Greeting), Some("здравствуйте"));
        assert_eq!(extended.event(0, FactKind::Introduce), Some("Иван"));
        assert_eq!(extended.event(0, FactKind::Bye), None);
        assert_eq!(extended.event(1, FactKind::Bye), Some("до свидания"));
        assert_eq!(extended.event(2, FactKind::Company), Some("Ромашка"));

        let mut out = Vec::new();
        extended.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("dlg_id,role,text,greeting,manager,company,bye"));
        assert_eq!(lines.next(), Some("1,manager,\"Здравствуйте, меня зовут Иван\",здравствуйте,Иван,,"));
    }

    #[test]
    fn same_cell_from_two_dialogs_is_a_collision() {
        let mut other = first_dialog();
        other.dialog_id = 2u64.into();
        other.introduce = None;
        other.bye = None;

        let err = extend_table(&table(), &[first_dialog(), other]).unwrap_err();
        match err {
            Error::MergeKeyCollision { column, row, first, second } => {
                assert_eq!((column, row), ("greeting", 0));
                assert_eq!(first, DialogId::from(1u64));
                assert_eq!(second, DialogId::from(2u64));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rows_outside_the_table_are_rejected() {
        let stray = DialogResult { bye: Some(Detection { row: 9, text: "удачи".into() }), ..DialogResult::new(3u64.into()) };
        assert!(matches!(extend_table(&table(), &[stray]), Err(Error::RowOutOfRange { row: 9, rows: 3 })));
    }
}
