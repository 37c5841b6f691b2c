// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::copy;
use std::path::PathBuf;

use tempfile::TempDir;
use tempfile::tempdir;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Copies the deck files and configuration in `./test` into a fresh temporary
/// directory. The directory is deleted when the returned guard is dropped.
pub fn create_tmp_copy_of_test_directory() -> Fallible<(TempDir, String)> {
    let source: PathBuf = PathBuf::from("./test").canonicalize()?;
    let guard: TempDir = tempdir()?;
    let target: PathBuf = guard.path().canonicalize()?;
    for entry in source.read_dir()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if let Some(file_name) = path.file_name() {
                if file_name != "leitcards.db" {
                    let target_path = target.join(file_name);
                    copy(&path, &target_path)?;
                }
            }
        }
    }
    let target = target
        .to_str()
        .ok_or_else(|| ErrorReport::new("invalid path"))?
        .to_string();
    Ok((guard, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_copy_of_test_directory() -> Fallible<()> {
        let (_guard, dir) = create_tmp_copy_of_test_directory()?;
        assert!(PathBuf::from(&dir).join("geography.json").exists());
        assert!(!PathBuf::from(&dir).join("leitcards.db").exists());
        Ok(())
    }
}
