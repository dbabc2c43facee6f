use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::Path,
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Cannot serialize to JSON (dest='{0}'): {1}")]
        SerializeToJson(PathBuf, #[source] serde_json::Error),

        #[error("Cannot deserialize from JSON (src='{0}'): {1}")]
        DeserializeFromJson(PathBuf, #[source] serde_json::Error),

        #[error("Cannot deserialize from JSON (src='{0}', line={1}): {2}")]
        DeserializeJsonLine(PathBuf, usize, #[source] serde_json::Error),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn read_json_with_deserialize<P, T>(filepath: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let filepath = filepath.as_ref();
    let f = File::open(filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.to_owned(), e))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| Error::DeserializeFromJson(filepath.to_owned(), e))
}

/// Append `data` as a single JSON line, creating the file (and its parent dirs) if needed.
#[must_use]
pub fn append_json_line_with_mkdir<P, T>(filepath: P, data: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let filepath = filepath.as_ref();
    let mut line = serde_json::to_string(data)
        .map_err(|e| Error::SerializeToJson(filepath.to_owned(), e))?;
    line.push('\n');

    if let Some(dir) = filepath.parent() {
        self::mkdir_all(dir)?;
    }
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(filepath)
        .map_err(|e| Error::SingleIO("Cannot open file for appending", filepath.to_owned(), e))?;

    // one write_all per record so that a line is never split by another appender
    f.write_all(line.as_bytes())
        .map_err(|e| Error::SingleIO("Cannot append to file", filepath.to_owned(), e))
}

/// Read every non-blank line of a JSON-lines file.
/// A missing file reads as empty.
#[must_use]
pub fn read_json_lines<P, T>(filepath: P) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let filepath = filepath.as_ref();
    let f = match File::open(filepath) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::SingleIO("Cannot read file", filepath.to_owned(), e)),
    };

    let mut res = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line =
            line.map_err(|e| Error::SingleIO("Cannot read file", filepath.to_owned(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let data = serde_json::from_str(&line)
            .map_err(|e| Error::DeserializeJsonLine(filepath.to_owned(), i + 1, e))?;
        res.push(data);
    }
    Ok(res)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Rec {
        n: u32,
        s: String,
    }

    #[test]
    fn append_then_read_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/records.jsonl");

        append_json_line_with_mkdir(&path, &Rec { n: 1, s: "a\nb".into() }).unwrap();
        append_json_line_with_mkdir(&path, &Rec { n: 2, s: "".into() }).unwrap();

        let recs: Vec<Rec> = read_json_lines(&path).unwrap();
        assert_eq!(
            recs,
            vec![Rec { n: 1, s: "a\nb".into() }, Rec { n: 2, s: "".into() }]
        );
    }

    #[test]
    fn missing_json_lines_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let recs: Vec<Rec> = read_json_lines(dir.path().join("nope.jsonl")).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn broken_json_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        write(&path, "{\"n\":1,\"s\":\"x\"}\n\n{oops\n").unwrap();

        let err = read_json_lines::<_, Rec>(&path).unwrap_err();
        assert!(matches!(err, Error::DeserializeJsonLine(_, 3, _)), "{:?}", err);
    }
}
