//! File-backed token stream
//!
//! Replays a dataset file as a real-time feed: `.txt` files yield
//! whitespace-separated tokens line by line; `.csv` files yield the
//! whitespace-split words of one named column, with the header row resolving
//! the column index. Reading is lazy so arbitrarily large files stream in
//! constant memory.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::common::{SimulationError, SketchError};

#[derive(Debug)]
enum Format {
    /// Whitespace tokens of every line
    Text,
    /// Whitespace tokens of the column at this index
    Csv { field_index: usize },
}

/// Lazy token stream over a `.txt` or `.csv` dataset file
///
/// # Examples
/// ```no_run
/// use sketchbench::stream::FileTokenStream;
/// use std::path::Path;
/// use std::time::Duration;
///
/// let stream =
///     FileTokenStream::open(Path::new("datasets/words.txt"), None, Duration::ZERO).unwrap();
/// for token in stream {
///     println!("{}", token.unwrap());
/// }
/// ```
#[derive(Debug)]
pub struct FileTokenStream {
    lines: Lines<BufReader<File>>,
    pending: VecDeque<String>,
    format: Format,
    sleep_time: Duration,
}

impl FileTokenStream {
    /// Opens a dataset file and prepares the tokenizer
    ///
    /// CSV files require `field`, the name of the column to stream; the
    /// header row is consumed here to resolve it.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for an unsupported extension, a missing
    /// CSV field name, or a field absent from the header; I/O failures
    /// propagate as `SimulationError::Io`.
    pub fn open(
        path: &Path,
        field: Option<&str>,
        sleep_time: Duration,
    ) -> Result<Self, SimulationError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();

        let format = match extension.as_str() {
            "txt" => Format::Text,
            "csv" => {
                let field = field.ok_or_else(|| SketchError::InvalidParameter {
                    param: "field".to_string(),
                    value: "<missing>".to_string(),
                    constraint: "must name a CSV column".to_string(),
                })?;
                let header = lines.next().transpose()?.unwrap_or_default();
                let field_index = header
                    .split(',')
                    .position(|column| column.trim() == field)
                    .ok_or_else(|| SketchError::InvalidParameter {
                        param: "field".to_string(),
                        value: field.to_string(),
                        constraint: format!("not found in CSV header '{}'", header),
                    })?;
                Format::Csv { field_index }
            }
            other => {
                return Err(SketchError::InvalidParameter {
                    param: "dataset".to_string(),
                    value: path.display().to_string(),
                    constraint: format!("unsupported file type '.{}'", other),
                }
                .into())
            }
        };

        Ok(FileTokenStream {
            lines,
            pending: VecDeque::new(),
            format,
            sleep_time,
        })
    }

    /// Tokenizes one line into the pending queue
    fn refill(&mut self, line: &str) {
        match &self.format {
            Format::Text => {
                self.pending
                    .extend(line.split_whitespace().map(str::to_string));
            }
            Format::Csv { field_index } => {
                if let Some(value) = line.split(',').nth(*field_index) {
                    self.pending
                        .extend(value.split_whitespace().map(str::to_string));
                }
            }
        }
    }
}

impl Iterator for FileTokenStream {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                if !self.sleep_time.is_zero() {
                    thread::sleep(self.sleep_time);
                }
                return Some(Ok(token));
            }
            match self.lines.next()? {
                Ok(line) => self.refill(&line),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_txt_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.txt", "alpha beta\ngamma\n");
        let tokens: Vec<String> = FileTokenStream::open(&path, None, Duration::ZERO)
            .unwrap()
            .map(|token| token.unwrap())
            .collect();
        assert_eq!(tokens, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_csv_field_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "data.csv",
            "id,text\n1,hello world\n2,hello again\n",
        );
        let tokens: Vec<String> = FileTokenStream::open(&path, Some("text"), Duration::ZERO)
            .unwrap()
            .map(|token| token.unwrap())
            .collect();
        assert_eq!(tokens, vec!["hello", "world", "hello", "again"]);
    }

    #[test]
    fn test_csv_without_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.csv", "id,text\n");
        assert!(FileTokenStream::open(&path, None, Duration::ZERO).is_err());
    }

    #[test]
    fn test_csv_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.csv", "id,text\n");
        assert!(FileTokenStream::open(&path, Some("body"), Duration::ZERO).is_err());
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "data.parquet", "");
        let err = FileTokenStream::open(&path, None, Duration::ZERO).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Sketch(SketchError::InvalidParameter { .. })
        ));
    }
}
