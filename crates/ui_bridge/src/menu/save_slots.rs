use std::path::{Path, PathBuf};

use crate::viewmodel::SaveSlotEntry;

pub const SAVE_SLOT_COUNT: i32 = 10;

pub fn save_slot_path(game_root: &Path, slot: i32, extension: &str) -> PathBuf {
    game_root
        .join("Save")
        .join(format!("Save{slot}.{extension}"))
}

pub fn is_valid_slot(slot: i32) -> bool {
    (0..SAVE_SLOT_COUNT).contains(&slot)
}

/// Builds the fixed slot list from what exists on disk. Without a game root
/// every slot is reported empty.
pub fn scan_save_slots(game_root: Option<&Path>, extension: &str) -> Vec<SaveSlotEntry> {
    (0..SAVE_SLOT_COUNT)
        .map(|index| {
            let has_data =
                game_root.is_some_and(|root| save_slot_path(root, index, extension).is_file());
            let description = if has_data {
                format!("Save {index}")
            } else {
                format!("Slot {index}")
            };
            SaveSlotEntry {
                index,
                description,
                has_data,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn existing_files_mark_their_slot() {
        let temp = TempDir::new().expect("tempdir");
        let save_dir = temp.path().join("Save");
        fs::create_dir_all(&save_dir).expect("mkdir");
        fs::write(save_dir.join("Save2.usa"), b"x").expect("write");
        fs::write(save_dir.join("Save5.uss"), b"x").expect("write");

        let slots = scan_save_slots(Some(temp.path()), "usa");
        assert_eq!(slots.len(), 10);
        assert!(slots[2].has_data);
        assert_eq!(slots[2].description, "Save 2");
        assert!(!slots[5].has_data);
        assert_eq!(slots[5].description, "Slot 5");
        assert_eq!(slots.iter().filter(|slot| slot.has_data).count(), 1);
    }

    #[test]
    fn missing_root_reports_all_empty() {
        let slots = scan_save_slots(None, "usa");
        assert_eq!(slots.len(), 10);
        assert!(slots.iter().all(|slot| !slot.has_data));
        assert_eq!(slots[9].index, 9);
    }

    #[test]
    fn slot_range_is_zero_to_nine() {
        assert!(is_valid_slot(0));
        assert!(is_valid_slot(9));
        assert!(!is_valid_slot(10));
        assert!(!is_valid_slot(-1));
    }
}
