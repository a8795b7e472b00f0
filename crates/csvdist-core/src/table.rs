//! CSV table: lenient load, column lookup, serialization and atomic write

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Header row plus data rows. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Decode CSV bytes; the first record becomes the header.
    ///
    /// Returns `Ok(None)` when the input holds no records at all.
    /// Cells that are not valid UTF-8 are decoded lossily (U+FFFD).
    pub fn parse(bytes: &[u8]) -> Result<Option<Self>, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut lossy_cells = 0usize;
        let mut decode = |rec: csv::ByteRecord| -> Vec<String> {
            rec.iter()
                .map(|field| match std::str::from_utf8(field) {
                    Ok(s) => s.to_string(),
                    Err(_) => {
                        lossy_cells += 1;
                        String::from_utf8_lossy(field).into_owned()
                    }
                })
                .collect()
        };

        let mut records = reader.byte_records();
        let Some(first) = records.next() else {
            return Ok(None);
        };
        let header = decode(first?);

        let mut rows = Vec::new();
        for rec in records {
            rows.push(decode(rec?));
        }

        if lossy_cells > 0 {
            log::warn!("{lossy_cells} cells are not valid UTF-8; invalid bytes replaced");
        }
        Ok(Some(Self { header, rows }))
    }

    /// Zero-based index of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Encode header then rows as CSV text (`\n` line endings).
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

/// Resolve `path` against `base_dir` when it is relative.
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Read and parse the table at `path`.
pub fn read_table(path: &Path) -> Result<Table, PipelineError> {
    let bytes = fs::read(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Table::parse(&bytes)?.ok_or_else(|| PipelineError::EmptyInput(path.to_path_buf()))
}

/// Write `table` to `path` via a sibling tmp file and rename.
///
/// An existing target keeps its permissions, and a symlinked target is
/// written through to the file it points at. Returns the number of bytes
/// written.
pub fn write_table(table: &Table, path: &Path) -> Result<usize, PipelineError> {
    let write_err = |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    let bytes = table
        .to_csv()
        .map_err(|e| write_err(std::io::Error::other(e)))?;

    // Nonexistent targets fail to canonicalize and are written as given
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let existing = fs::metadata(&target).ok().map(|m| m.permissions());

    let tmp_path = tmp_path_for(&target);
    let result = fs::write(&tmp_path, &bytes)
        .and_then(|()| match existing {
            Some(perms) => fs::set_permissions(&tmp_path, perms),
            None => Ok(()),
        })
        .and_then(|()| fs::rename(&tmp_path, &target));
    if let Err(e) = result {
        // Best effort; the original error is what matters
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }
    Ok(bytes.len())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(text: &str) -> Table {
        Table::parse(text.as_bytes()).unwrap().unwrap()
    }

    #[test]
    fn first_record_is_header() {
        let t = parse("Name,From,To\nA,London,Paris\n");
        assert_eq!(t.header, vec!["Name", "From", "To"]);
        assert_eq!(t.rows, vec![vec!["A", "London", "Paris"]]);
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let t = parse("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(t.rows[0], vec!["1"]);
        assert_eq!(t.rows[1].len(), 4);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let t = parse("From,To\n\"Leeds, UK\",York\n");
        assert_eq!(t.rows[0][0], "Leeds, UK");
    }

    #[test]
    fn empty_input_has_no_table() {
        assert!(Table::parse(b"").unwrap().is_none());
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let t = Table::parse(b"Name,From,To\nA,Z\xfcrich,Paris\nB,London,Paris\n")
            .unwrap()
            .unwrap();
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][1], "Z\u{FFFD}rich");
        assert_eq!(t.rows[1], vec!["B", "London", "Paris"]);
    }

    #[test]
    fn column_index_is_exact_match() {
        let t = parse("Name,From,To\n");
        assert_eq!(t.column_index("From"), Some(1));
        assert_eq!(t.column_index("from"), None);
        assert_eq!(t.column_index("Via"), None);
    }

    #[test]
    fn to_csv_quotes_when_needed_and_keeps_ragged_rows() {
        let t = Table {
            header: vec!["From".into(), "To".into()],
            rows: vec![vec!["Leeds, UK".into(), "York".into()], vec!["X".into()]],
        };
        let out = String::from_utf8(t.to_csv().unwrap()).unwrap();
        assert_eq!(out, "From,To\n\"Leeds, UK\",York\nX\n");
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let base = Path::new("/opt/tool");
        assert_eq!(
            resolve_path(Path::new("data.csv"), base),
            PathBuf::from("/opt/tool/data.csv")
        );
        assert_eq!(
            resolve_path(Path::new("/tmp/data.csv"), base),
            PathBuf::from("/tmp/data.csv")
        );
    }

    #[test]
    fn read_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = read_table(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
    }

    #[test]
    fn read_empty_file_is_empty_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            read_table(&path).unwrap_err(),
            PipelineError::EmptyInput(_)
        ));
    }

    #[test]
    fn write_replaces_file_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, b"old contents").unwrap();

        let t = parse("a,b\n1,2\n");
        let n = write_table(&t, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
        assert_eq!(n, 8);
        assert!(!dir.path().join("out.csv.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trips.csv");
        fs::write(&path, b"a\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_table(&parse("a,b\n1,2\n"), &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn write_through_symlink_keeps_link() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.csv");
        let link = dir.path().join("link.csv");
        fs::write(&real, b"a\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_table(&parse("a,b\n1,2\n"), &link).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn write_into_missing_dir_is_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_table(&parse("a\n"), &path).unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
    }
}
