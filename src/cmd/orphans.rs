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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

/// Prints the IDs of progress records whose card is in no deck.
pub fn list_orphans(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, Timestamp::now())?;
    for id in coll.orphans()? {
        println!("{id}");
    }
    Ok(())
}

/// Deletes progress records, and their review history, whose card is in no
/// deck.
pub fn delete_orphans(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, Timestamp::now())?;
    let orphans = coll.orphans()?;
    for id in &orphans {
        coll.db.delete_progress(id)?;
        log::debug!("Deleted orphan {id}");
    }
    println!("Deleted {} orphaned record(s).", orphans.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::remove_file;
    use std::path::PathBuf;

    use super::*;
    use crate::helper::create_tmp_copy_of_test_directory;
    use crate::types::outcome::Outcome;
    use crate::types::review::Review;

    #[test]
    fn test_delete_orphans() -> Fallible<()> {
        let (_guard, dir) = create_tmp_copy_of_test_directory()?;
        let now = Timestamp::now();
        let coll = Collection::new(Some(dir.clone()), now)?;
        let reviews: Vec<Review> = coll
            .cards
            .iter()
            .map(|card| Review::new(card.progress.clone(), Outcome::Incorrect, now))
            .collect();
        coll.db.save_session(now, now, &reviews)?;
        list_orphans(Some(dir.clone()))?;
        remove_file(PathBuf::from(&dir).join("browser-export.json"))?;
        delete_orphans(Some(dir.clone()))?;
        let coll = Collection::new(Some(dir), Timestamp::now())?;
        assert!(coll.orphans()?.is_empty());
        assert_eq!(coll.db.card_ids()?.len(), 3);
        Ok(())
    }
}
