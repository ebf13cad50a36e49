use std::fs::{self, File, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

fn data_err(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Typed flat-file table: comma-delimited rows under a fixed header.
///
/// Rows are field-name-keyed through serde rename attributes; the header
/// row is written from the row struct on first append. A missing file
/// reads as the empty table.
pub struct Table<T> {
    path: PathBuf,
    _row: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Table<T> {
    /// Handle only; no I/O until the first `load`/`append`/`rewrite`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bulk read of all rows. A file that does not exist yet yields `[]`.
    pub fn load(&self) -> io::Result<Vec<T>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut reader = csv::Reader::from_reader(file);
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row.map_err(data_err)?);
        }
        Ok(rows)
    }

    /// Append one row, writing the header first when the file is new.
    /// Flushes and fsyncs before returning.
    pub fn append(&self, row: &T) -> io::Result<()> {
        let write_header = match fs::metadata(&self.path) {
            Ok(m) => m.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(e),
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(row).map_err(data_err)?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())?
            .sync_all()
    }

    /// Replace the whole table: write a temp file, fsync, atomic rename.
    /// Deletes and updates go through here so readers never observe a
    /// half-written table.
    pub fn rewrite(&self, rows: &[T]) -> io::Result<()> {
        let tmp_path = self.path.with_extension("csv.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = csv::Writer::from_writer(file);
        for row in rows {
            writer.serialize(row).map_err(data_err)?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())?
            .sync_all()?;
        fs::rename(&tmp_path, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Row {
        #[serde(rename = "ID")]
        id: u64,
        #[serde(rename = "Name")]
        name: String,
    }

    fn tmp_table(name: &str) -> Table<Row> {
        let dir = std::env::temp_dir().join("carbnb_test_store");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        Table::new(path)
    }

    #[test]
    fn load_missing_file_is_empty() {
        let table = tmp_table("missing.csv");
        assert!(table.load().unwrap().is_empty());
    }

    #[test]
    fn append_and_load() {
        let table = tmp_table("append.csv");
        let rows = vec![
            Row { id: 0, name: "first".into() },
            Row { id: 1, name: "second".into() },
        ];
        for r in &rows {
            table.append(r).unwrap();
        }
        assert_eq!(table.load().unwrap(), rows);
    }

    #[test]
    fn header_written_once() {
        let table = tmp_table("header.csv");
        table.append(&Row { id: 0, name: "a".into() }).unwrap();
        table.append(&Row { id: 1, name: "b".into() }).unwrap();
        let text = fs::read_to_string(table.path()).unwrap();
        assert_eq!(text.matches("ID,Name").count(), 1);
    }

    #[test]
    fn rewrite_replaces_contents() {
        let table = tmp_table("rewrite.csv");
        table.append(&Row { id: 0, name: "old".into() }).unwrap();
        table.append(&Row { id: 1, name: "gone".into() }).unwrap();

        let kept = vec![Row { id: 0, name: "old".into() }];
        table.rewrite(&kept).unwrap();
        assert_eq!(table.load().unwrap(), kept);
    }

    #[test]
    fn rewrite_empty_then_append() {
        let table = tmp_table("rewrite_empty.csv");
        table.append(&Row { id: 0, name: "x".into() }).unwrap();
        table.rewrite(&[]).unwrap();
        assert!(table.load().unwrap().is_empty());

        // Header comes back with the next append
        table.append(&Row { id: 1, name: "y".into() }).unwrap();
        assert_eq!(table.load().unwrap().len(), 1);
    }
}
