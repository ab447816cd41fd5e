use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

const TMP_SUFFIX: &str = "tmp";

/// Writes `data` to `path` by staging it in a sibling temp file and renaming.
///
/// A failed write leaves any previous file at `path` untouched.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    fs::rename(&tmp, path)
}

/// Appends a single line to `path`, creating the file on first use.
pub fn append_line(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{line}")
}

pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tmp_path_keeps_original_extension() {
        let tmp = tmp_path(Path::new("/data/state.json"));
        assert_eq!(tmp, PathBuf::from("/data/state.json.tmp"));
    }

    #[test]
    fn failed_write_preserves_previous_contents() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        write_atomic(&path, "{\"v\":1}").expect("first write");

        fs::create_dir_all(tmp_path(&path)).expect("block temp file");
        assert!(write_atomic(&path, "{\"v\":2}").is_err());
        assert_eq!(fs::read_to_string(&path).expect("read"), "{\"v\":1}");
    }

    #[test]
    fn append_line_accumulates() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("log.jsonl");
        append_line(&path, "a").expect("append");
        append_line(&path, "b").expect("append");
        assert_eq!(fs::read_to_string(&path).expect("read"), "a\nb\n");
    }
}
