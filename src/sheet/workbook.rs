use super::SheetMode;
use crate::config::WorkbookConfig;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// One CSV sheet held in memory. Every row is padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width.max(row.len()), String::new());
        }
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn read_from<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let rows = rdr
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;
        Ok(Self::new(name, headers, rows))
    }

    /// Loads a sheet named after the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::read_from(name, File::open(path)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes a sibling temp file, then renames it over `path`, so the
    /// workbook is never left half-written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = temp_path(path);
        let written = File::create(&tmp)
            .map_err(Error::from)
            .and_then(|file| {
                self.write_to(&file)?;
                file.sync_all()?;
                Ok(())
            });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, or `""` outside the sheet.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if let Some(cells) = self.rows.get_mut(row) {
            if col >= cells.len() {
                cells.resize(col + 1, String::new());
            }
            cells[col] = value.into();
        }
    }

    /// Inserts an empty column before `at` (clamped to the width), shifting the
    /// rest right. Returns the new column's index.
    pub fn insert_column(&mut self, at: usize, name: impl Into<String>) -> usize {
        let at = at.min(self.headers.len());
        self.headers.insert(at, name.into());
        for row in &mut self.rows {
            let pos = at.min(row.len());
            row.insert(pos, String::new());
        }
        at
    }

    /// Index of `name`, appending an empty column when it is missing.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        let at = self.headers.len();
        self.insert_column(at, name)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Sheets to process, with the path each one is saved back to.
pub fn load_sheets(cfg: &WorkbookConfig) -> Result<Vec<(PathBuf, Sheet)>> {
    match cfg.mode {
        SheetMode::SingleSheet => {
            if cfg.path.is_dir() {
                return Err(Error::InvalidSheetPath(cfg.path.clone()));
            }
            Ok(vec![(cfg.path.clone(), Sheet::load(&cfg.path)?)])
        }
        SheetMode::SheetPerOrder => {
            if !cfg.path.is_dir() {
                return Err(Error::InvalidSheetPath(cfg.path.clone()));
            }
            let mut paths = fs::read_dir(&cfg.path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()?;
            paths.retain(|p| {
                p.is_file()
                    && p.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            });
            paths.sort();

            paths
                .into_iter()
                .map(|path| {
                    let sheet = Sheet::load(&path)?;
                    Ok((path, sheet))
                })
                .collect()
        }
    }
}
