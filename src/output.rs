// Persisting parsed documents: `<stem>.json` next to the input or inside a
// chosen output directory.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the JSON for `input` goes: `<out_dir>/<stem>.json` when an output
/// directory is given, `<input dir>/<stem>.json` otherwise.
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    let mut name = stem;
    name.push(".json");

    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Write `value` as four-space indented UTF-8 JSON. Non-ASCII text is kept
/// as-is. Missing parent directories are created.
pub fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let fail = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(fail)?;
            info!(dir = %parent.display(), "created output directory");
        }
    }

    let file = File::create(path).map_err(fail)?;
    let mut writer = BufWriter::new(file);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .map_err(|e| fail(std::io::Error::from(e)))?;
    writer.flush().map_err(fail)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_next_to_input() {
        assert_eq!(
            output_path(Path::new("/docs/report.pdf"), None),
            PathBuf::from("/docs/report.json")
        );
    }

    #[test]
    fn output_in_designated_dir() {
        assert_eq!(
            output_path(Path::new("/docs/q3.final.xlsx"), Some(Path::new("/tmp/out"))),
            PathBuf::from("/tmp/out/q3.final.json")
        );
    }

    #[test]
    fn writes_pretty_unescaped_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let value = json!({"pages": 3, "text": "안녕하세요"});

        write_json(&path, &value).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n    \"pages\": 3,\n    \"text\": \"안녕하세요\"\n}"
        );
        let reparsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn rewriting_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let value = json!({"z": [1, 2], "a": {"nested": true}, "m": null});

        write_json(&path, &value).unwrap();
        let first = fs::read(&path).unwrap();
        write_json(&path, &value).unwrap();
        assert_eq!(first, fs::read(&path).unwrap());
    }

    #[test]
    fn unwritable_target_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let path = dir.path().join("report.json");
        fs::create_dir(&path).unwrap();

        let err = write_json(&path, &json!({})).unwrap_err();
        assert!(matches!(err, Error::OutputWrite { .. }));
    }
}
