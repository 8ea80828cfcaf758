//! Byte Source Module
//! In-memory, named byte buffer that uploaded files are wrapped in.

use std::path::Path;

/// File family a source dispatches to, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text (csv, tsv, txt) that needs separator/encoding detection.
    Delimited,
    /// Self-describing workbook (xlsx, xls, xlsm, ods).
    Spreadsheet,
    Unknown,
}

/// A named upload, fully buffered in memory.
///
/// Detection needs several passes over the same prefix, so the whole file is
/// held as one buffer and every probe is a plain slice. There is no live
/// stream to reseek.
#[derive(Debug, Clone)]
pub struct ByteSource {
    name: String,
    bytes: Vec<u8>,
}

impl ByteSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Prefix of at most `limit` bytes, for detection probes.
    pub fn sample(&self, limit: usize) -> &[u8] {
        &self.bytes[..self.bytes.len().min(limit)]
    }

    /// Classify by extension (case-insensitive).
    pub fn format(&self) -> FileFormat {
        let ext = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv" | "tsv" | "txt") => FileFormat::Delimited,
            Some("xlsx" | "xls" | "xlsm" | "ods") => FileFormat::Spreadsheet,
            _ => FileFormat::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ByteSource::new("sales.csv", Vec::new()).format(),
            FileFormat::Delimited
        );
        assert_eq!(
            ByteSource::new("Report.XLSX", Vec::new()).format(),
            FileFormat::Spreadsheet
        );
        assert_eq!(
            ByteSource::new("notes.pdf", Vec::new()).format(),
            FileFormat::Unknown
        );
        assert_eq!(
            ByteSource::new("no_extension", Vec::new()).format(),
            FileFormat::Unknown
        );
    }

    #[test]
    fn sample_is_bounded() {
        let src = ByteSource::new("x.csv", vec![b'a'; 10]);
        assert_eq!(src.sample(4).len(), 4);
        assert_eq!(src.sample(100).len(), 10);
    }
}
