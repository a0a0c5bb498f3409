//! Opens a log source as a stream of decoded text lines.
//!
//! Sources are plain text or gzip-compressed. Gzip is recognized by the
//! `1f 8b` magic bytes or a `.gz` extension; the magic wins, so a gzip
//! file with the wrong name still decodes. Lines with invalid UTF-8 are
//! decoded lossily rather than aborting the run.
//!
//! Copyright (c) 2026 CIPS Corps. All rights reserved.

use crate::{SentryError, SentryResult};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Lazy line iterator over a log source.
///
/// Owns the underlying file handle; dropping the iterator closes it on
/// every exit path. Memory use is one line at a time regardless of file
/// size.
pub struct LogLines {
    source: LineSource,
    compressed: bool,
}

enum LineSource {
    Plain(BufReader<File>),
    Gzip(BufReader<GzDecoder<File>>),
}

/// Open `path` as a decoded line stream, decompressing if necessary.
pub fn open_lines(path: &Path) -> SentryResult<LogLines> {
    let mut file = File::open(path)
        .map_err(|e| SentryError::Read(format!("{}: {}", path.display(), e)))?;

    let compressed = sniff_gzip(&mut file)? || has_gz_extension(path);
    log::debug!(
        "Opened {} ({})",
        path.display(),
        if compressed { "gzip" } else { "plain text" },
    );

    let source = if compressed {
        LineSource::Gzip(BufReader::new(GzDecoder::new(file)))
    } else {
        LineSource::Plain(BufReader::new(file))
    };
    Ok(LogLines { source, compressed })
}

/// Check the first two bytes for the gzip magic, then rewind.
fn sniff_gzip(file: &mut File) -> SentryResult<bool> {
    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    file.seek(SeekFrom::Start(0))?;
    Ok(filled == magic.len() && magic == GZIP_MAGIC)
}

fn has_gz_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

impl LogLines {
    /// Read the next raw line into `buf`, byte-wise so invalid UTF-8 does
    /// not abort the stream.
    fn read_raw(&mut self, buf: &mut Vec<u8>) -> std::io::Result<usize> {
        match &mut self.source {
            LineSource::Plain(r) => r.read_until(b'\n', buf),
            LineSource::Gzip(r) => r.read_until(b'\n', buf),
        }
    }
}

impl Iterator for LogLines {
    type Item = SentryResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.read_raw(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                Some(Ok(line.trim_end_matches(['\n', '\r']).to_string()))
            }
            Err(e) if self.compressed => {
                // A read error mid-stream on a gzip source means the
                // stream itself is bad. Report it as such and stop.
                Some(Err(SentryError::Decompress(e.to_string())))
            }
            Err(e) => Some(Err(SentryError::Io(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn test_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("logsentry_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_gzip(path: &Path, content: &str) {
        let file = File::create(path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(content.as_bytes()).unwrap();
        enc.finish().unwrap();
    }

    #[test]
    fn test_plain_file_lines() {
        let dir = test_dir("reader_plain");
        let path = dir.join("auth.log");
        std::fs::write(&path, "first line\nsecond line\n").unwrap();

        let lines: Vec<String> = open_lines(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["first line", "second line"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_gzip_file_lines() {
        let dir = test_dir("reader_gzip");
        let path = dir.join("auth.log.gz");
        write_gzip(&path, "compressed one\ncompressed two\n");

        let lines: Vec<String> = open_lines(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["compressed one", "compressed two"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_gzip_detected_by_magic_without_extension() {
        let dir = test_dir("reader_magic");
        let path = dir.join("auth.log");
        write_gzip(&path, "hidden gzip\n");

        let lines: Vec<String> = open_lines(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["hidden gzip"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = open_lines(Path::new("/nonexistent/logsentry/auth.log"));
        assert!(matches!(result, Err(SentryError::Read(_))));
    }

    #[test]
    fn test_corrupt_gzip_yields_decompress_error() {
        let dir = test_dir("reader_corrupt");
        let path = dir.join("broken.gz");
        // Valid magic, garbage body.
        std::fs::write(&path, [0x1f, 0x8b, 0xff, 0x00, 0x12, 0x34]).unwrap();

        let result: Result<Vec<String>, _> = open_lines(&path).unwrap().collect();
        assert!(matches!(result, Err(SentryError::Decompress(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_crlf_and_blank_lines_preserved_in_count() {
        let dir = test_dir("reader_crlf");
        let path = dir.join("auth.log");
        std::fs::write(&path, "one\r\n\r\nthree\n").unwrap();

        let lines: Vec<String> = open_lines(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "", "three"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_utf8_decoded_lossily() {
        let dir = test_dir("reader_utf8");
        let path = dir.join("auth.log");
        std::fs::write(&path, b"good line\nbad \xff\xfe byte\n").unwrap();

        let lines: Vec<String> = open_lines(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "good line");
        assert!(lines[1].starts_with("bad "));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
