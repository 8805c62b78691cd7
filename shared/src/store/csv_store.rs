//! CSV-backed record store
//!
//! Keeps `assigned.csv`, `pending.csv` and `store.lock` inside one directory.
//! Header cells are trimmed and upper-cased on read, so hand-edited exports
//! with `Name`/` phone ` style headers load the same as files written here.
//! Appends follow the header already in the file, so older exports with fewer
//! or reordered columns stay aligned.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{RecordStore, StoreGuard};
use crate::errors::{SharedError, SharedResult};
use crate::process_debug;
use crate::types::{ProcessId, Record, ASSIGNED_COLUMNS, PENDING_COLUMNS};

const ASSIGNED_FILE: &str = "assigned.csv";
const PENDING_FILE: &str = "pending.csv";
const LOCK_FILE: &str = "store.lock";

pub struct CsvRecordStore {
    /// Directory holding both record files
    base_dir: PathBuf,
}

impl CsvRecordStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn assigned_path(&self) -> PathBuf {
        self.base_dir.join(ASSIGNED_FILE)
    }

    fn pending_path(&self) -> PathBuf {
        self.base_dir.join(PENDING_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.base_dir.join(LOCK_FILE)
    }

    async fn ensure_dir(&self) -> SharedResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| SharedError::store("create directory", self.base_dir.display().to_string(), e))
    }

    async fn read_records(path: &Path) -> SharedResult<Vec<Record>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SharedError::store("read", path.display().to_string(), e)),
        };
        parse_records(&bytes)
    }

    /// Append one row in the column order of the file's existing header
    ///
    /// A missing or empty file gets `columns` as its header first. Cells for
    /// columns the file lacks are not written.
    async fn append_row(&self, path: &Path, columns: &[&str], record: &Record) -> SharedResult<()> {
        self.ensure_dir().await?;

        let mut rows = Vec::with_capacity(2);
        match read_header(path).await? {
            Some(header) => {
                let header: Vec<&str> = header.iter().map(String::as_str).collect();
                rows.push(record.row(&header));
            }
            None => {
                rows.push(columns.to_vec());
                rows.push(record.row(columns));
            }
        }
        let bytes = encode_rows(&rows)?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| SharedError::store("open for append", path.display().to_string(), e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| SharedError::store("append", path.display().to_string(), e))?;
        file.sync_data()
            .await
            .map_err(|e| SharedError::store("sync", path.display().to_string(), e))?;
        Ok(())
    }
}

/// Normalized header of an existing file, or `None` when there is no header yet
async fn read_header(path: &Path) -> SharedResult<Option<Vec<String>>> {
    let file = match fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SharedError::store("open", path.display().to_string(), e)),
    };

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .await
        .map_err(|e| SharedError::store("read header", path.display().to_string(), e))?;
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let header = match reader.records().next() {
        Some(row) => row?.iter().map(|h| h.trim().to_uppercase()).collect(),
        None => return Ok(None),
    };
    Ok(Some(header))
}

/// Read a standalone CSV roster; a missing file is an error here
pub async fn read_csv_file(path: &Path) -> SharedResult<Vec<Record>> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| SharedError::store("read", path.display().to_string(), e))?;
    parse_records(&bytes)
}

/// Write `records` to `path` with `columns` as the header, replacing any existing file
pub async fn write_csv_file(path: &Path, columns: &[&str], records: &[Record]) -> SharedResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SharedError::store("create directory", parent.display().to_string(), e))?;
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(columns.to_vec());
    rows.extend(records.iter().map(|record| record.row(columns)));
    let bytes = encode_rows(&rows)?;

    fs::write(path, bytes)
        .await
        .map_err(|e| SharedError::store("write", path.display().to_string(), e))
}

/// Parse CSV bytes into records, normalizing header names
fn parse_records(bytes: &[u8]) -> SharedResult<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_uppercase())
        .collect();
    reader.set_headers(headers.clone());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(row.deserialize::<Record>(Some(&headers))?);
    }
    Ok(records)
}

fn encode_rows(rows: &[Vec<&str>]) -> SharedResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SharedError::store("encode", "<buffer>", e.error()))
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn read_assigned(&self) -> SharedResult<Vec<Record>> {
        Self::read_records(&self.assigned_path()).await
    }

    async fn read_pending(&self) -> SharedResult<Vec<Record>> {
        Self::read_records(&self.pending_path()).await
    }

    async fn append_assigned(&self, record: &Record) -> SharedResult<()> {
        self.append_row(&self.assigned_path(), ASSIGNED_COLUMNS, record).await
    }

    async fn append_pending(&self, record: &Record) -> SharedResult<()> {
        self.append_row(&self.pending_path(), PENDING_COLUMNS, record).await
    }

    async fn clear_pending(&self) -> SharedResult<()> {
        self.ensure_dir().await?;
        let path = self.pending_path();
        fs::write(&path, b"")
            .await
            .map_err(|e| SharedError::store("clear", path.display().to_string(), e))?;
        process_debug!(ProcessId::current(), "🧹 Cleared pending records at {}", path.display());
        Ok(())
    }

    async fn append_pending_header(&self) -> SharedResult<()> {
        self.ensure_dir().await?;
        let path = self.pending_path();
        let bytes = encode_rows(&[PENDING_COLUMNS.to_vec()])?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| SharedError::store("open for append", path.display().to_string(), e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| SharedError::store("append header", path.display().to_string(), e))?;
        file.sync_data()
            .await
            .map_err(|e| SharedError::store("sync", path.display().to_string(), e))?;
        Ok(())
    }

    async fn lock(&self) -> SharedResult<StoreGuard> {
        self.ensure_dir().await?;
        StoreGuard::acquire_file(self.lock_path()).await
    }
}
