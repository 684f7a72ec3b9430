//! Persisting scan results.
//!
//! Each file is written to a temporary file next to its destination and
//! renamed into place once complete, so an interrupted write never leaves a
//! truncated file behind.

use crate::merge::ExtendedTable;
use crate::result::{DialogRecord, DialogResult};
use crate::{Error, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn stage<F>(path: &Path, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(tmp)
}

fn persist<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    stage(path, write)?.persist(path).map_err(|e| Error::Io(e.error))?;
    tracing::debug!(path = %path.display(), "written");
    Ok(())
}

fn write_records<W: Write>(w: &mut W, results: &[DialogResult]) -> Result<()> {
    let mut records: Vec<DialogRecord> = results.iter().map(DialogResult::to_record).collect();
    records.sort_by(|a, b| a.dlg_id.cmp(&b.dlg_id));

    serde_json::to_writer_pretty(&mut *w, &records)?;
    writeln!(w)?;
    Ok(())
}

/// Write the results as a pretty-printed JSON array of [`DialogRecord`]s,
/// sorted by dialog id.
pub fn write_results_json(path: impl AsRef<Path>, results: &[DialogResult]) -> Result<()> {
    persist(path.as_ref(), |w| write_records(w, results))
}

/// Write the extended table as CSV.
pub fn write_extended_csv(path: impl AsRef<Path>, table: &ExtendedTable) -> Result<()> {
    persist(path.as_ref(), |w| table.write_csv(w))
}

/// Write the results JSON and the extended CSV together.
///
/// Both files are fully written to temporary files before either is moved
/// into place. If the second move fails the first file is removed again, so a
/// failed call leaves neither output behind.
pub fn write_outputs(
    results_path: impl AsRef<Path>,
    results: &[DialogResult],
    extended_path: impl AsRef<Path>,
    table: &ExtendedTable,
) -> Result<()> {
    let (results_path, extended_path) = (results_path.as_ref(), extended_path.as_ref());

    let json = stage(results_path, |w| write_records(w, results))?;
    let csv = stage(extended_path, |w| table.write_csv(w))?;

    json.persist(results_path).map_err(|e| Error::Io(e.error))?;
    if let Err(e) = csv.persist(extended_path) {
        if let Err(cleanup) = std::fs::remove_file(results_path) {
            tracing::warn!(path = %results_path.display(), error = %cleanup, "could not remove results file");
        }
        return Err(Error::Io(e.error));
    }

    tracing::debug!(results = %results_path.display(), extended = %extended_path.display(), "written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::DialogId;
    use crate::dialog::{Role, Utterance};
    use crate::merge::extend_table;
    use crate::result::Detection;
    use crate::table::Table;

    fn extended() -> ExtendedTable {
        let table = Table::from_utterances(vec![Utterance::new(0, 1u64, Role::Manager, "Здравствуйте")]).unwrap();
        extend_table(&table, &[]).unwrap()
    }

    #[test]
    fn json_records_are_sorted_and_sparse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialogs.json");

        let mut second = DialogResult::new(DialogId::from(10u64));
        second.greeting = Some(Detection { row: 0, text: "привет".into() });
        let first = DialogResult::new(DialogId::from(2u64));

        write_results_json(&path, &[second, first]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records[0]["dlg_id"], 2);
        assert_eq!(records[1]["dlg_id"], 10);
        assert_eq!(records[1]["greeting_row"], 0);
        assert!(records[0].get("greeting_row").is_none());
        assert_eq!(records[0]["greet_and_bye"], false);
    }

    #[test]
    fn outputs_are_written_together() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("dialogs.json");
        let csv = dir.path().join("extended.csv");

        write_outputs(&json, &[DialogResult::new(DialogId::from(1u64))], &csv, &extended()).unwrap();

        assert!(json.exists());
        assert!(std::fs::read_to_string(&csv).unwrap().starts_with("dlg_id,role,text,greeting,manager,company,bye"));
    }

    #[test]
    fn failed_csv_write_leaves_no_json() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("dialogs.json");
        let csv = dir.path().join("missing").join("extended.csv");

        let err = write_outputs(&json, &[DialogResult::new(DialogId::from(1u64))], &csv, &extended()).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(!json.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let err = persist(&path, |_| Err(Error::EmptyTable)).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
