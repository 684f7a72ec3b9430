//! Input table: CSV loading and the utterance view over it.

use crate::dialog::{Dialog, DialogId, Utterance, group_dialogs, parse_role};
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Names of the columns the scanner needs. Every other column is carried
/// through to the extended table untouched.
#[derive(Debug, Clone)]
pub struct ColumnNames {
    pub dialog_id: String,
    pub role: String,
    pub text: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames { dialog_id: "dlg_id".to_string(), role: "role".to_string(), text: "text".to_string() }
    }
}

/// The loaded table: raw records (for the merge) plus the parsed utterances.
///
/// `utterances[i].row == i` for every row.
#[derive(Debug, Clone)]
pub struct Table {
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
    utterances: Vec<Utterance>,
}

impl Table {
    pub fn from_path(path: impl AsRef<Path>, columns: &ColumnNames) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, columns)
    }

    pub fn from_reader<R: Read>(reader: R, columns: &ColumnNames) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(false).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let column = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        let id_col = column(&columns.dialog_id)?;
        let role_col = column(&columns.role)?;
        let text_col = column(&columns.text)?;

        let mut records = Vec::new();
        let mut utterances = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let field = |col: usize| record.get(col).unwrap_or_default();
            utterances.push(Utterance {
                row,
                dialog_id: DialogId::new(field(id_col)),
                role: parse_role(row, field(role_col))?,
                text: field(text_col).to_string(),
            });
            records.push(record);
        }

        if utterances.is_empty() {
            return Err(Error::EmptyTable);
        }
        tracing::debug!(rows = utterances.len(), "loaded input table");

        Ok(Table { headers, records, utterances })
    }

    /// Build a table directly from utterances. Rows are renumbered by
    /// position and the table gets the default column layout.
    pub fn from_utterances(utterances: impl IntoIterator<Item = Utterance>) -> Result<Self> {
        let columns = ColumnNames::default();
        let headers = csv::StringRecord::from(vec![columns.dialog_id, columns.role, columns.text]);
        let mut records = Vec::new();
        let mut rows = Vec::new();

        for (row, mut utterance) in utterances.into_iter().enumerate() {
            utterance.row = row;
            records.push(csv::StringRecord::from(vec![
                utterance.dialog_id.as_str(),
                utterance.role.as_str(),
                utterance.text.as_str(),
            ]));
            rows.push(utterance);
        }

        if rows.is_empty() {
            return Err(Error::EmptyTable);
        }
        Ok(Table { headers, records, utterances: rows })
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn headers(&self) -> &csv::StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[csv::StringRecord] {
        &self.records
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    /// Dialogs in order of first appearance.
    pub fn dialogs(&self) -> Vec<Dialog<'_>> {
        group_dialogs(&self.utterances)
    }

    /// Exchange the manager and client labels of every utterance.
    ///
    /// Some exports label the two sides the other way round; the caller
    /// decides when this applies. The raw records keep their original labels.
    pub fn swap_roles(&mut self) {
        for utterance in &mut self.utterances {
            utterance.role = utterance.role.swapped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Role;

    const CSV: &str = "dlg_id,line_n,role,text\n\
                       0,0,client,Алло\n\
                       0,1,manager,Здравствуйте\n\
                       1,0,manager,\"Добрый день, компания Ромашка\"\n";

    #[test]
    fn loads_required_columns_and_keeps_others() {
        let table = Table::from_reader(CSV.as_bytes(), &ColumnNames::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers().len(), 4);
        assert_eq!(&table.records()[2][1], "0");

        let u = &table.utterances()[2];
        assert_eq!(u.row, 2);
        assert_eq!(u.dialog_id, DialogId::from(1u64));
        assert_eq!(u.role, Role::Manager);
        assert_eq!(u.text, "Добрый день, компания Ромашка");
        assert_eq!(table.dialogs().len(), 2);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = Table::from_reader("dlg_id,text\n1,привет\n".as_bytes(), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "role"));
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = Table::from_reader("dlg_id,role,text\n".as_bytes(), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }

    #[test]
    fn unknown_role_names_the_row() {
        let err =
            Table::from_reader("dlg_id,role,text\n1,manager,a\n1,robot,b\n".as_bytes(), &ColumnNames::default())
                .unwrap_err();
        assert!(matches!(err, Error::UnknownRole { row: 1, ref role } if role == "robot"));
    }

    #[test]
    fn swap_roles_relabels_utterances_only() {
        let mut table = Table::from_reader(CSV.as_bytes(), &ColumnNames::default()).unwrap();
        table.swap_roles();
        assert_eq!(table.utterances()[0].role, Role::Manager);
        assert_eq!(table.utterances()[1].role, Role::Client);
        assert_eq!(&table.records()[0][2], "client");
    }
}
