// src/output.rs
//! Atomic JSON publishing: serialize to a sibling `.tmp` file, then rename
//! over the target. A failed run leaves the previous artifact intact.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value).context("serializing output json")?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    fs::write(&tmp, &body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} over {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_and_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data.json");

        write_json_atomic(&target, &json!({"v": 1})).unwrap();
        write_json_atomic(&target, &json!({"v": 2})).unwrap();

        let got: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(got["v"], 2);
        // No stray temp file left behind.
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn failure_leaves_previous_file_intact() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data.json");
        write_json_atomic(&target, &json!({"v": 1})).unwrap();

        // Writing into a missing directory fails before the rename.
        let bad = dir.path().join("missing").join("data.json");
        assert!(write_json_atomic(&bad, &json!({"v": 2})).is_err());

        let got: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(got["v"], 1);
    }
}
