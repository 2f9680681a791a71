//! C0401 export file writer
//!
//! Writes export records to `{root}/cxnvol/{segment}/C0401-{date}-{segment}.csv`.
//! The file is assembled under a `.partial` name and renamed into place only
//! once the `Finish` trailer is flushed, so the final path either holds a
//! complete file or is left as it was.

use crate::core::verification::calculate_file_checksum;
use crate::domain::{
    ExportRecord, ExtractionDate, InvexError, Result, SegmentCode, EXPORT_COLUMNS, TRAILER_MARKER,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Directory under the output root holding all C0401 exports
pub const EXPORT_FAMILY_DIR: &str = "cxnvol";

/// File name prefix of the export
pub const FILE_PREFIX: &str = "C0401";

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Final path of the export file
    pub path: PathBuf,

    /// Lines written, header and trailer included
    pub lines: usize,

    /// SHA-256 of the file contents
    pub checksum: String,
}

/// Writes export files below a configured root directory
#[derive(Debug, Clone)]
pub struct ExportWriter {
    root: PathBuf,
}

impl ExportWriter {
    /// Create a writer for the given output root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a segment's exports
    pub fn output_dir(&self, segment: &SegmentCode) -> PathBuf {
        self.root.join(EXPORT_FAMILY_DIR).join(segment.as_str())
    }

    /// File name for a segment and date
    ///
    /// # Examples
    ///
    /// ```
    /// use invex::core::export::writer::ExportWriter;
    /// use invex::domain::{ExtractionDate, SegmentCode};
    ///
    /// let segment = SegmentCode::new("LP").unwrap();
    /// let date = ExtractionDate::parse("20240131").unwrap();
    /// assert_eq!(ExportWriter::file_name(&segment, date), "C0401-20240131-LP.csv");
    /// ```
    pub fn file_name(segment: &SegmentCode, date: ExtractionDate) -> String {
        format!("{FILE_PREFIX}-{date}-{segment}.csv")
    }

    /// Full path of the export file for a segment and date
    pub fn output_path(&self, segment: &SegmentCode, date: ExtractionDate) -> PathBuf {
        self.output_dir(segment)
            .join(Self::file_name(segment, date))
    }

    /// Write records to the export file for `segment` and `date`
    ///
    /// An existing file for the same segment and date is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`InvexError::Filesystem`] if the directory cannot be created,
    /// any part of the file cannot be written or checksummed, or the rename
    /// fails. The final path is not touched in that case.
    pub fn write(
        &self,
        segment: &SegmentCode,
        date: ExtractionDate,
        records: &[ExportRecord],
    ) -> Result<WrittenFile> {
        let dir = self.output_dir(segment);
        fs::create_dir_all(&dir).map_err(|e| InvexError::filesystem(&dir, e))?;

        let path = dir.join(Self::file_name(segment, date));
        let partial = partial_path(&path);

        let committed = write_records(&partial, records)
            .and_then(|()| calculate_file_checksum(&partial))
            .and_then(|checksum| {
                fs::rename(&partial, &path)
                    .map(|()| checksum)
                    .map_err(|e| InvexError::filesystem(&path, e))
            });
        let checksum = match committed {
            Ok(checksum) => checksum,
            Err(e) => {
                discard_partial(&partial);
                return Err(e);
            }
        };

        let lines = records.len() + 2;
        tracing::debug!(path = %path.display(), lines, "Export file written");

        Ok(WrittenFile {
            path,
            lines,
            checksum,
        })
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn discard_partial(partial: &Path) {
    match fs::remove_file(partial) {
        Ok(()) => tracing::warn!(path = %partial.display(), "Removed partial export file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %partial.display(),
            error = %e,
            "Failed to remove partial export file, delete it before ingesting"
        ),
    }
}

fn write_records(path: &Path, records: &[ExportRecord]) -> Result<()> {
    let fs_err = |e: &dyn std::fmt::Display| InvexError::filesystem(path, e);

    let file = File::create(path).map_err(|e| fs_err(&e))?;

    // The trailer has one field, so rows are not all the same width
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    writer.write_record(EXPORT_COLUMNS).map_err(|e| fs_err(&e))?;
    for record in records {
        writer.write_record(record.fields()).map_err(|e| fs_err(&e))?;
    }
    writer.write_record([TRAILER_MARKER]).map_err(|e| fs_err(&e))?;

    let file = writer.into_inner().map_err(|e| fs_err(e.error()))?;
    file.sync_all().map_err(|e| fs_err(&e))?;

    Ok(())
}
