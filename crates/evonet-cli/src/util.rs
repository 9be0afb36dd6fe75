use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use serde::{Serialize, de::DeserializeOwned};

/// Writes `value` as pretty JSON to `path`, or to stdout when no path was
/// given.
pub fn save_report<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            write_report(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write report to {}", path.display()))
        }
        None => write_report(io::stdout().lock(), value).context("Failed to write report to stdout"),
    }
}

/// Pretty JSON followed by a newline, flushed before returning.
fn write_report<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Loads a JSON config file. `what` names the file in error messages.
pub fn load_json<T>(what: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file =
        File::open(path).with_context(|| format!("Failed to open {what}: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {what}: {}", path.display()))
}
