//! Append-only result dataset with fallback paths.
//!
//! The dataset is a CSV file with a fixed header. Every append reads the whole
//! table, adds one row, and writes the whole table back through a temporary
//! file that is renamed over the original. When the active file
//! cannot be read, or cannot be written because of a permission failure, the
//! store diverts to a new timestamped file next to it and keeps using that
//! file for the rest of its lifetime.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::grade::Grade;
use crate::model::{EvaluationRecord, SimilarityScore};

/// Column headers, in file order.
pub const COLUMNS: [&str; 6] = [
    "Student Name",
    "Subject Name",
    "Prebuilt Answer",
    "Student Answer",
    "Similarity Score (%)",
    "Grade",
];

/// File stem of the canonical dataset.
pub const DATASET_STEM: &str = "evaluation_results";

/// File extension of dataset files.
pub const DATASET_EXTENSION: &str = "csv";

/// Resolve `~/Documents/evaluation_results.csv`.
pub fn default_dataset_path() -> Option<PathBuf> {
    home_dir().map(|home| {
        home.join("Documents")
            .join(format!("{DATASET_STEM}.{DATASET_EXTENSION}"))
    })
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// One dataset row. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Student Name")]
    pub student_name: String,
    #[serde(rename = "Subject Name")]
    pub subject_name: String,
    #[serde(rename = "Prebuilt Answer")]
    pub reference_text: String,
    #[serde(rename = "Student Answer")]
    pub candidate_text: String,
    #[serde(rename = "Similarity Score (%)")]
    pub score: f64,
    #[serde(rename = "Grade")]
    pub grade: Grade,
}

impl From<&EvaluationRecord> for ResultRow {
    fn from(record: &EvaluationRecord) -> Self {
        Self {
            student_name: record.student_name().to_string(),
            subject_name: record.subject_name().to_string(),
            reference_text: record.reference_text().to_string(),
            candidate_text: record.candidate_text().to_string(),
            score: record.score().value(),
            grade: record.grade(),
        }
    }
}

/// An ordered, in-memory copy of a whole dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row at the end.
    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse CSV bytes. The header must match [`COLUMNS`] exactly.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(|e| e.to_string())?;
        if headers.iter().ne(COLUMNS.iter().copied()) {
            return Err(format!(
                "unexpected header: [{}]",
                headers.iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let rows = reader
            .deserialize::<ResultRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?;

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| !(SimilarityScore::MIN..=SimilarityScore::MAX).contains(&row.score))
        {
            return Err(format!(
                "record {}: score {} is outside 0..=100",
                i + 1,
                row.score
            ));
        }

        Ok(Self { rows })
    }

    /// Encode the whole table, header included, as CSV bytes.
    pub fn to_csv(&self) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record(COLUMNS)
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        for row in &self.rows {
            writer
                .serialize(row)
                .map_err(|e| StoreError::Encode(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| StoreError::Encode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// File access
// ---------------------------------------------------------------------------

/// Whole-file access to dataset tables.
pub trait TableIo: Send + Sync {
    /// Whether a dataset file is present at `path`.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Load the full table at `path`. Any failure is reported as
    /// [`StoreError::Corrupt`].
    fn read(&self, path: &Path) -> Result<ResultTable, StoreError>;

    /// Replace the file at `path` with `table`.
    fn write(&self, path: &Path, table: &ResultTable) -> Result<(), StoreError>;
}

/// CSV files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableIo;

impl TableIo for CsvTableIo {
    fn read(&self, path: &Path) -> Result<ResultTable, StoreError> {
        let bytes = std::fs::read(path).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        ResultTable::from_csv(&bytes).map_err(|reason| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn write(&self, path: &Path, table: &ResultTable) -> Result<(), StoreError> {
        let bytes = table.to_csv()?;
        replace_file(path, |file| file.write_all(&bytes))
    }
}

/// Replace `path` with whatever `fill` writes, all or nothing.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over `path`; a failure at any step leaves `path` as it was.
fn replace_file(
    path: &Path,
    fill: impl FnOnce(&mut std::fs::File) -> std::io::Result<()>,
) -> Result<(), StoreError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::from_write(parent.to_path_buf(), e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| StoreError::from_write(path.to_path_buf(), e))?;
    fill(tmp.as_file_mut())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StoreError::from_write(path.to_path_buf(), e))?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| StoreError::from_write(path.to_path_buf(), e))?;
    }
    // Renaming over a file another program holds open fails with
    // PermissionDenied on Windows, which maps to `Locked`.
    tmp.persist(path)
        .map_err(|e| StoreError::from_write(path.to_path_buf(), e.error))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Why a record landed somewhere other than the file the store was using.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diversion {
    /// The previous file could not be loaded; the new file holds only the
    /// new record.
    Corrupt { abandoned: PathBuf, reason: String },
    /// The previous file could not be written; the new file holds the full
    /// table.
    Locked { abandoned: PathBuf, reason: String },
}

impl Diversion {
    pub fn abandoned(&self) -> &Path {
        match self {
            Diversion::Corrupt { abandoned, .. } | Diversion::Locked { abandoned, .. } => abandoned,
        }
    }
}

impl fmt::Display for Diversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diversion::Corrupt { abandoned, reason } => {
                write!(f, "{} could not be read ({reason})", abandoned.display())
            }
            Diversion::Locked { abandoned, reason } => {
                write!(f, "{} could not be written ({reason})", abandoned.display())
            }
        }
    }
}

/// Where a record ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLocation {
    /// The file that now contains the record.
    pub path: PathBuf,
    /// Set when `path` is a fallback file created by this append.
    pub diversion: Option<Diversion>,
}

impl PersistedLocation {
    pub fn is_fallback(&self) -> bool {
        self.diversion.is_some()
    }
}

/// Owner of the on-disk dataset and every fallback decision.
pub struct ResultStore {
    canonical: PathBuf,
    active: PathBuf,
    io: Box<dyn TableIo>,
}

impl ResultStore {
    /// A store writing CSV to `canonical`.
    pub fn new(canonical: impl Into<PathBuf>) -> Self {
        Self::with_io(canonical, Box::new(CsvTableIo))
    }

    /// A store writing `evaluation_results.csv` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(
            dir.as_ref()
                .join(format!("{DATASET_STEM}.{DATASET_EXTENSION}")),
        )
    }

    pub fn with_io(canonical: impl Into<PathBuf>, io: Box<dyn TableIo>) -> Self {
        let canonical = canonical.into();
        Self {
            active: canonical.clone(),
            canonical,
            io,
        }
    }

    /// The well-known dataset path this store started with.
    pub fn canonical_path(&self) -> &Path {
        &self.canonical
    }

    /// The path the next append will target first.
    pub fn active_path(&self) -> &Path {
        &self.active
    }

    /// Load the full table at `path`.
    pub fn load(&self, path: &Path) -> Result<ResultTable, StoreError> {
        self.io.read(path)
    }

    /// Append one record, diverting to a fallback file when needed.
    ///
    /// On success the returned path always contains the record. An error
    /// means no file accepted it.
    pub fn append(&mut self, record: &EvaluationRecord) -> Result<PersistedLocation, StoreError> {
        let mut diversion = None;

        let (mut path, mut table) = if self.io.exists(&self.active) {
            match self.io.read(&self.active) {
                Ok(table) => (self.active.clone(), table),
                Err(e) => {
                    let fallback = self.fallback_path();
                    tracing::warn!(
                        "cannot load {}, starting a new dataset at {}: {e}",
                        self.active.display(),
                        fallback.display()
                    );
                    diversion = Some(Diversion::Corrupt {
                        abandoned: self.active.clone(),
                        reason: e.to_string(),
                    });
                    (fallback, ResultTable::new())
                }
            }
        } else {
            (self.active.clone(), ResultTable::new())
        };

        table.push(ResultRow::from(record));

        match self.io.write(&path, &table) {
            Ok(()) => {}
            Err(e) if e.is_locked() => {
                let fallback = self.fallback_path_avoiding(&path);
                tracing::warn!(
                    "cannot write {}, saving {} rows to {}: {e}",
                    path.display(),
                    table.len(),
                    fallback.display()
                );
                self.io.write(&fallback, &table)?;
                // A corrupt active file is the root cause; keep reporting it.
                if diversion.is_none() {
                    diversion = Some(Diversion::Locked {
                        abandoned: path,
                        reason: e.to_string(),
                    });
                }
                path = fallback;
            }
            Err(e) => return Err(e),
        }

        tracing::info!("saved evaluation ({} rows) to {}", table.len(), path.display());
        self.active = path.clone();

        Ok(PersistedLocation { path, diversion })
    }

    /// A fresh `<stem>_<YYYYMMDDHHMMSS>.<ext>` path beside the canonical
    /// dataset. A numeric suffix keeps it unique within the same second.
    fn fallback_path(&self) -> PathBuf {
        self.fallback_path_avoiding(&self.canonical)
    }

    /// Like [`fallback_path`](Self::fallback_path), but never returns
    /// `taken`, even when no file exists there yet.
    fn fallback_path_avoiding(&self, taken: &Path) -> PathBuf {
        let dir = self.canonical.parent().unwrap_or_else(|| Path::new(""));
        let stem = self
            .canonical
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DATASET_STEM);
        let ext = self
            .canonical
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or(DATASET_EXTENSION);
        let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");

        let mut candidate = dir.join(format!("{stem}_{timestamp}.{ext}"));
        let mut n = 1u32;
        while candidate == taken || self.io.exists(&candidate) {
            candidate = dir.join(format!("{stem}_{timestamp}_{n}.{ext}"));
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn record(student: &str, score: f64, grade: Grade) -> EvaluationRecord {
        EvaluationRecord::new(
            student,
            "Biology",
            "The mitochondria is the powerhouse of the cell.",
            "Mitochondria is powerhouse of cell.",
            SimilarityScore::new(score),
            grade,
        )
    }

    /// CSV on disk, but writes to selected paths fail as if the file were
    /// held open by another program.
    struct LockingIo {
        locked: Mutex<HashSet<PathBuf>>,
    }

    impl LockingIo {
        fn locking(paths: &[&Path]) -> Self {
            Self {
                locked: Mutex::new(paths.iter().map(|p| p.to_path_buf()).collect()),
            }
        }
    }

    impl TableIo for LockingIo {
        fn read(&self, path: &Path) -> Result<ResultTable, StoreError> {
            CsvTableIo.read(path)
        }

        fn write(&self, path: &Path, table: &ResultTable) -> Result<(), StoreError> {
            if self.locked.lock().unwrap().contains(path) {
                return Err(StoreError::from_write(
                    path.to_path_buf(),
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ));
            }
            CsvTableIo.write(path, table)
        }
    }

    /// `evaluation_results_<YYYYMMDDHHMMSS>[_<n>].csv`
    fn assert_fallback_name(path: &Path) {
        let name = path.file_name().unwrap().to_str().unwrap();
        let middle = name
            .strip_prefix("evaluation_results_")
            .and_then(|rest| rest.strip_suffix(".csv"))
            .unwrap_or_else(|| panic!("unexpected fallback name {name}"));
        let (timestamp, suffix) = match middle.split_once('_') {
            Some((timestamp, n)) => (timestamp, Some(n)),
            None => (middle, None),
        };
        assert_eq!(timestamp.len(), 14, "{name}");
        assert!(timestamp.bytes().all(|b| b.is_ascii_digit()), "{name}");
        if let Some(n) = suffix {
            assert!(!n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()), "{name}");
        }
    }

    /// Writes through the real temp-file path, but the disk fills up
    /// halfway through the content.
    struct FullDiskIo;

    impl TableIo for FullDiskIo {
        fn read(&self, path: &Path) -> Result<ResultTable, StoreError> {
            CsvTableIo.read(path)
        }

        fn write(&self, path: &Path, table: &ResultTable) -> Result<(), StoreError> {
            let bytes = table.to_csv()?;
            replace_file(path, |file| {
                file.write_all(&bytes[..bytes.len() / 2])?;
                Err(std::io::Error::other("no space left on device"))
            })
        }
    }

    /// The first write fails with a permission error, whatever the path.
    #[derive(Clone, Default)]
    struct FirstWriteLockedIo {
        attempts: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl TableIo for FirstWriteLockedIo {
        fn read(&self, path: &Path) -> Result<ResultTable, StoreError> {
            CsvTableIo.read(path)
        }

        fn write(&self, path: &Path, table: &ResultTable) -> Result<(), StoreError> {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(path.to_path_buf());
            if attempts.len() == 1 {
                return Err(StoreError::from_write(
                    path.to_path_buf(),
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ));
            }
            CsvTableIo.write(path, table)
        }
    }

    #[test]
    fn default_path_is_under_documents() {
        if let Some(path) = default_dataset_path() {
            assert!(path.ends_with("Documents/evaluation_results.csv"));
        }
    }

    #[test]
    fn first_append_creates_canonical_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::in_dir(dir.path());

        let location = store.append(&record("Ada", 95.0, Grade::Excellent)).unwrap();
        assert_eq!(location.path, dir.path().join("evaluation_results.csv"));
        assert!(!location.is_fallback());

        let content = std::fs::read_to_string(&location.path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "Student Name,Subject Name,Prebuilt Answer,Student Answer,Similarity Score (%),Grade"
        );
    }

    #[test]
    fn appends_keep_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::in_dir(dir.path());

        let names = ["Ada", "Grace", "Alan", "Ada"];
        for name in names {
            store.append(&record(name, 60.0, Grade::Average)).unwrap();
        }

        let table = store.load(store.canonical_path()).unwrap();
        assert_eq!(table.len(), names.len());
        let stored: Vec<&str> = table.rows().iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(stored, names);
    }

    #[test]
    fn rows_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::in_dir(dir.path());
        let original = EvaluationRecord::new(
            "O'Brien, Pat",
            "Physics",
            "Line one\nLine \"two\"",
            "",
            SimilarityScore::new(0.0),
            Grade::VeryPoor,
        );
        store.append(&original).unwrap();

        let table = store.load(store.canonical_path()).unwrap();
        assert_eq!(table.rows(), &[ResultRow::from(&original)]);
    }

    #[test]
    fn corrupt_file_diverts_to_new_dataset_with_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");
        std::fs::write(&canonical, "not,a,dataset\n\u{0}\u{1}garbage").unwrap();

        let mut store = ResultStore::new(&canonical);
        let location = store.append(&record("Ada", 40.0, Grade::Poor)).unwrap();

        assert_ne!(location.path, canonical);
        assert!(matches!(location.diversion, Some(Diversion::Corrupt { .. })));
        assert_fallback_name(&location.path);

        let table = CsvTableIo.read(&location.path).unwrap();
        assert_eq!(table.len(), 1);

        // The corrupt file is left untouched.
        let untouched = std::fs::read(&canonical).unwrap();
        assert_eq!(untouched, b"not,a,dataset\n\x00\x01garbage");
    }

    #[test]
    fn later_appends_follow_the_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");
        std::fs::write(&canonical, "").unwrap();

        let mut store = ResultStore::new(&canonical);
        let first = store.append(&record("Ada", 40.0, Grade::Poor)).unwrap();
        let second = store.append(&record("Grace", 80.0, Grade::Good)).unwrap();

        assert!(first.is_fallback());
        assert!(!second.is_fallback());
        assert_eq!(first.path, second.path);
        assert_eq!(store.active_path(), first.path);
        assert_eq!(CsvTableIo.read(&second.path).unwrap().len(), 2);
    }

    #[test]
    fn wrong_header_counts_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");
        std::fs::write(&canonical, "Name,Score\nAda,10\n").unwrap();

        let err = CsvTableIo.read(&canonical).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(err.to_string().contains("unexpected header"));
    }

    #[test]
    fn unknown_grade_counts_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");
        std::fs::write(
            &canonical,
            format!("{}\nAda,Bio,a,b,10.0,Outstanding\n", COLUMNS.join(",")),
        )
        .unwrap();

        assert!(matches!(
            CsvTableIo.read(&canonical),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn locked_file_diverts_full_table() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");

        let mut seed = ResultStore::new(&canonical);
        seed.append(&record("Ada", 95.0, Grade::Excellent)).unwrap();
        seed.append(&record("Grace", 80.0, Grade::Good)).unwrap();

        let mut store =
            ResultStore::with_io(&canonical, Box::new(LockingIo::locking(&[canonical.as_path()])));
        let location = store.append(&record("Alan", 20.0, Grade::VeryPoor)).unwrap();

        assert_ne!(location.path, canonical);
        match &location.diversion {
            Some(Diversion::Locked { abandoned, .. }) => assert_eq!(abandoned, &canonical),
            other => panic!("expected a lock diversion, got {other:?}"),
        }

        let fallback = CsvTableIo.read(&location.path).unwrap();
        let names: Vec<&str> = fallback.rows().iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, ["Ada", "Grace", "Alan"]);

        // Canonical file still holds the two original rows.
        assert_eq!(CsvTableIo.read(&canonical).unwrap().len(), 2);

        let next = store.append(&record("Barbara", 55.0, Grade::Average)).unwrap();
        assert_eq!(next.path, location.path);
        assert_eq!(CsvTableIo.read(&next.path).unwrap().len(), 4);
    }

    #[test]
    fn fails_when_fallback_is_also_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");

        /// Every write fails with a permission error.
        struct ReadOnlyIo;
        impl TableIo for ReadOnlyIo {
            fn read(&self, path: &Path) -> Result<ResultTable, StoreError> {
                CsvTableIo.read(path)
            }
            fn write(&self, path: &Path, _: &ResultTable) -> Result<(), StoreError> {
                Err(StoreError::from_write(
                    path.to_path_buf(),
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ))
            }
        }

        let mut store = ResultStore::with_io(&canonical, Box::new(ReadOnlyIo));
        let err = store.append(&record("Ada", 10.0, Grade::VeryPoor)).unwrap_err();
        assert!(err.is_locked());
        assert_eq!(store.active_path(), canonical);
    }

    #[test]
    fn fallback_names_are_unique_within_a_second() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_dir(dir.path());

        let first = store.fallback_path();
        std::fs::write(&first, "taken").unwrap();
        let second = store.fallback_path();

        assert_ne!(first, second);
        assert!(!second.exists());
        assert_fallback_name(&first);
        assert_fallback_name(&second);
    }

    #[test]
    fn interrupted_write_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");

        let mut seed = ResultStore::new(&canonical);
        for name in ["Ada", "Grace", "Alan"] {
            seed.append(&record(name, 60.0, Grade::Average)).unwrap();
        }
        let before = std::fs::read(&canonical).unwrap();

        let mut store = ResultStore::with_io(&canonical, Box::new(FullDiskIo));
        let err = store.append(&record("Barbara", 55.0, Grade::Average)).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!err.is_locked());
        assert_eq!(store.active_path(), canonical);

        assert_eq!(std::fs::read(&canonical).unwrap(), before);
        let names: Vec<String> = CsvTableIo
            .read(&canonical)
            .unwrap()
            .rows()
            .iter()
            .map(|r| r.student_name.clone())
            .collect();
        assert_eq!(names, ["Ada", "Grace", "Alan"]);

        // No temp file is left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn replace_file_swaps_content_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("evaluation_results.csv");

        replace_file(&path, |file| file.write_all(b"first")).unwrap();
        replace_file(&path, |file| file.write_all(b"second")).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        let err = replace_file(&path, |file| {
            file.write_all(b"thi")?;
            Err(std::io::Error::other("interrupted"))
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn corrupt_then_locked_keeps_the_corrupt_reason() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");
        std::fs::write(&canonical, "Name,Mark\n").unwrap();

        let io = FirstWriteLockedIo::default();
        let mut store = ResultStore::with_io(&canonical, Box::new(io.clone()));
        let location = store.append(&record("Ada", 40.0, Grade::Poor)).unwrap();

        match &location.diversion {
            Some(Diversion::Corrupt { abandoned, .. }) => assert_eq!(abandoned, &canonical),
            other => panic!("expected a corrupt diversion, got {other:?}"),
        }

        let attempts = io.attempts.lock().unwrap().clone();
        assert_eq!(attempts.len(), 2);
        assert_ne!(attempts[0], attempts[1]);
        assert!(!attempts.contains(&canonical));
        assert_eq!(location.path, attempts[1]);
        assert_fallback_name(&attempts[0]);
        assert_fallback_name(&attempts[1]);

        assert_eq!(CsvTableIo.read(&location.path).unwrap().len(), 1);
        assert_eq!(std::fs::read_to_string(&canonical).unwrap(), "Name,Mark\n");
    }

    #[test]
    fn out_of_range_score_counts_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("evaluation_results.csv");
        std::fs::write(
            &canonical,
            format!(
                "{}\nAda,Bio,a,b,80.0,Good\nGrace,Bio,a,b,150.0,Excellent\n",
                COLUMNS.join(",")
            ),
        )
        .unwrap();

        let err = CsvTableIo.read(&canonical).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(err.to_string().contains("record 2"), "{err}");
    }
}
