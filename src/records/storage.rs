use super::types::Ledger;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default ledger file path (~/.config/gpa-bro/courses.json)
pub fn get_ledger_path() -> PathBuf {
    crate::config::get_config_dir().join("courses.json")
}

/// Load the course ledger from a JSON file
///
/// If the file doesn't exist, returns a new empty ledger.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    if !path.exists() {
        return Ok(Ledger::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open course file at {}", path.display()))?;

    let ledger: Ledger = serde_json::from_reader(file).context("Failed to load course file")?;

    // Version check
    if ledger.version != 1 {
        anyhow::bail!("Unsupported course file version: {}", ledger.version);
    }

    Ok(ledger)
}

/// Save the course ledger to a JSON file atomically
///
/// Uses atomic-write-file to ensure the file is never left in a corrupted state.
/// Creates the parent directory if it doesn't exist.
pub fn save_ledger(path: &Path, ledger: &Ledger) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, ledger).context("Failed to serialize course file")?;

    file.commit().context("Failed to save course file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::types::Term;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("gpa_bro_test_missing.json");
        // Ensure it doesn't exist
        let _ = std::fs::remove_file(&temp_path);

        let ledger = load_ledger(&temp_path).unwrap();
        assert_eq!(ledger.version, 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("gpa_bro_test_roundtrip.json");
        // Ensure clean state
        let _ = std::fs::remove_file(&temp_path);

        let mut ledger = Ledger::new();
        let calc = ledger.add_course("Calculus".to_string(), 87.5, 5.0, Term::Past);
        let phys = ledger.add_course("Physics".to_string(), 61.0, 3.0, Term::Current);

        save_ledger(&temp_path, &ledger).unwrap();
        let loaded = load_ledger(&temp_path).unwrap();

        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.course(calc).unwrap().grade, 87.5);
        assert_eq!(loaded.course(phys).unwrap().term, Term::Current);
        assert_eq!(loaded.next_id, ledger.next_id);

        // Cleanup
        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let temp_path = env::temp_dir().join("gpa_bro_test_version.json");
        std::fs::write(
            &temp_path,
            r#"{"version": 9, "next_id": 1, "courses": []}"#,
        )
        .unwrap();

        let result = load_ledger(&temp_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported course file version"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
