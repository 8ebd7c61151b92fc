//! RON data loader
//!
//! Loads game content from external RON files, with fallback to hardcoded
//! defaults. A file that parses but fails validation is treated the same
//! as a missing file; the session must never start on content that can
//! dangle a reference mid-play.

use std::fs;
use std::path::Path;

use super::dialogues::{default_dialogue_scripts, DialogueCatalog, DialogueScript};
use super::quizzes::{default_quiz_banks, QuizBank, QuizCatalog};
use super::realms::{default_realms, RealmCatalog, RealmDef};

/// Manages all external game content
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Quiz banks
    pub quizzes: QuizCatalog,
    /// Dialogue scripts
    pub dialogues: DialogueCatalog,
    /// Realm definitions
    pub realms: RealmCatalog,
}

impl DataManager {
    /// Create a new DataManager, loading from files or using defaults
    pub fn new() -> Self {
        Self::load_from(Path::new("assets/data"))
    }

    /// Load content from `base_path`, file by file. Each file falls back
    /// to its defaults independently, then the assembled set is
    /// cross-checked; a broken reference between files drops the whole
    /// set back to defaults.
    pub fn load_from(base_path: &Path) -> Self {
        let manager = Self {
            quizzes: Self::load_quizzes(base_path),
            dialogues: Self::load_dialogues(base_path),
            realms: Self::load_realms(base_path),
        };
        if let Err(e) = manager.validate_references() {
            eprintln!("Warning: game data is inconsistent: {}. Using defaults.", e);
            return Self::default();
        }
        manager
    }

    /// Load quiz banks from RON file
    fn load_quizzes(base_path: &Path) -> QuizCatalog {
        let path = base_path.join("quizzes.ron");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str::<QuizCatalog>(&content) {
                    Ok(catalog) => match catalog.validate() {
                        Ok(()) => return catalog,
                        Err(e) => eprintln!("Warning: quizzes.ron invalid: {}", e),
                    },
                    Err(e) => eprintln!("Warning: Failed to parse quizzes.ron: {}", e),
                },
                Err(e) => eprintln!("Warning: Failed to read quizzes.ron: {}", e),
            }
        }
        default_quiz_banks()
    }

    /// Load dialogue scripts from RON file
    fn load_dialogues(base_path: &Path) -> DialogueCatalog {
        let path = base_path.join("dialogues.ron");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str::<DialogueCatalog>(&content) {
                    Ok(catalog) => match catalog.validate() {
                        Ok(()) => return catalog,
                        Err(e) => eprintln!("Warning: dialogues.ron invalid: {}", e),
                    },
                    Err(e) => eprintln!("Warning: Failed to parse dialogues.ron: {}", e),
                },
                Err(e) => eprintln!("Warning: Failed to read dialogues.ron: {}", e),
            }
        }
        default_dialogue_scripts()
    }

    /// Load realm definitions from RON file
    fn load_realms(base_path: &Path) -> RealmCatalog {
        let path = base_path.join("realms.ron");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str::<RealmCatalog>(&content) {
                    Ok(catalog) if !catalog.is_empty() => return catalog,
                    Ok(_) => eprintln!("Warning: realms.ron defines no realms"),
                    Err(e) => eprintln!("Warning: Failed to parse realms.ron: {}", e),
                },
                Err(e) => eprintln!("Warning: Failed to read realms.ron: {}", e),
            }
        }
        default_realms()
    }

    /// Check that every id referenced by a realm resolves.
    pub fn validate_references(&self) -> Result<(), String> {
        for (index, realm) in self.realms.realms.iter().enumerate() {
            for npc in &realm.npcs {
                if self.dialogues.find(&npc.script).is_none() {
                    return Err(format!(
                        "realm {} '{}' references unknown dialogue script '{}'",
                        index, realm.name, npc.script
                    ));
                }
            }
            for foe in &realm.foes {
                if self.quizzes.find(&foe.quiz).is_none() {
                    return Err(format!(
                        "realm {} '{}' references unknown quiz bank '{}'",
                        index, realm.name, foe.quiz
                    ));
                }
            }
        }
        Ok(())
    }

    /// Get a quiz bank by id
    pub fn quiz_bank(&self, id: &str) -> Option<&QuizBank> {
        self.quizzes.find(id)
    }

    /// Get a dialogue script by id
    pub fn dialogue_script(&self, id: &str) -> Option<&DialogueScript> {
        self.dialogues.find(id)
    }

    /// Get a realm definition by index
    pub fn realm(&self, index: usize) -> Option<&RealmDef> {
        self.realms.get(index)
    }

    pub fn realm_count(&self) -> usize {
        self.realms.len()
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            quizzes: default_quiz_banks(),
            dialogues: default_dialogue_scripts(),
            realms: default_realms(),
        }
    }
}

/// Export all default content to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> Result<(), String> {
    if !base_path.exists() {
        fs::create_dir_all(base_path)
            .map_err(|e| format!("Failed to create {}: {}", base_path.display(), e))?;
    }

    let pretty = ron::ser::PrettyConfig::default();

    let quizzes = default_quiz_banks();
    let quizzes_ron = ron::ser::to_string_pretty(&quizzes, pretty.clone())
        .map_err(|e| format!("Failed to serialize quizzes: {}", e))?;
    fs::write(base_path.join("quizzes.ron"), quizzes_ron)
        .map_err(|e| format!("Failed to write quizzes.ron: {}", e))?;

    let dialogues = default_dialogue_scripts();
    let dialogues_ron = ron::ser::to_string_pretty(&dialogues, pretty.clone())
        .map_err(|e| format!("Failed to serialize dialogues: {}", e))?;
    fs::write(base_path.join("dialogues.ron"), dialogues_ron)
        .map_err(|e| format!("Failed to write dialogues.ron: {}", e))?;

    let realms = default_realms();
    let realms_ron = ron::ser::to_string_pretty(&realms, pretty)
        .map_err(|e| format!("Failed to serialize realms: {}", e))?;
    fs::write(base_path.join("realms.ron"), realms_ron)
        .map_err(|e| format!("Failed to write realms.ron: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cross_reference_cleanly() {
        let manager = DataManager::default();
        assert!(manager.validate_references().is_ok());
        assert_eq!(manager.realm_count(), 3);
        assert!(manager.quiz_bank("arcade-lore").is_some());
        assert!(manager.dialogue_script("beach-greeter").is_some());
    }

    #[test]
    fn test_export_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        export_default_data(dir.path()).unwrap();
        assert!(dir.path().join("quizzes.ron").exists());
        assert!(dir.path().join("dialogues.ron").exists());
        assert!(dir.path().join("realms.ron").exists());

        let manager = DataManager::load_from(dir.path());
        assert_eq!(manager.quizzes, default_quiz_banks());
        assert_eq!(manager.dialogues, default_dialogue_scripts());
        assert_eq!(manager.realms, default_realms());
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let manager = DataManager::load_from(Path::new("no/such/dir"));
        assert_eq!(manager.realm_count(), 3);
    }

    #[test]
    fn test_unparseable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("quizzes.ron"), "(banks: [oops").unwrap();
        let manager = DataManager::load_from(dir.path());
        assert_eq!(manager.quizzes, default_quiz_banks());
    }

    #[test]
    fn test_invalid_quiz_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        // Parses fine but the answer key is out of range.
        let bad = r#"(banks: [(id: "broken", topic: "x", questions: [(prompt: "p", options: ["a", "b"], answer: 7, explanation: "e")])])"#;
        fs::write(dir.path().join("quizzes.ron"), bad).unwrap();
        let manager = DataManager::load_from(dir.path());
        assert!(manager.quiz_bank("broken").is_none());
        assert!(manager.quiz_bank("synth-basics").is_some());
    }

    #[test]
    fn test_broken_cross_reference_drops_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let orphan = r#"(realms: [(name: "Orphan", sky: "void", spawn: (x: 0.0, y: 0.0, z: 0.0), npc_origin: (x: 0.0, y: 0.0, z: 0.0), foe_origin: (x: 0.0, y: 0.0, z: 0.0), spacing: 2.0, npcs: [], foes: [(name: "Lost", quiz: "no-such-bank")])])"#;
        fs::write(dir.path().join("realms.ron"), orphan).unwrap();
        let manager = DataManager::load_from(dir.path());
        assert_eq!(manager.realms, default_realms());
    }
}
