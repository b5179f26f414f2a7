use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::Result,
    ledger::Ledger,
    utils::{app_data_dir, ensure_dir, write_atomic},
};

use super::StorageBackend;

const USERS_DIR: &str = "users";

/// Whole-file JSON persistence: one `<user>.json` document per user under
/// the data directory. Every save rewrites the full document through a temp
/// file and rename.
#[derive(Clone)]
pub struct JsonStorage {
    users_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        let users_dir = base.join(USERS_DIR);
        ensure_dir(&users_dir)?;
        Ok(Self { users_dir })
    }

    pub fn user_path(&self, user: &str) -> PathBuf {
        self.users_dir.join(format!("{}.json", canonical_name(user)))
    }

    pub fn load_from_path(path: &Path) -> Result<Ledger> {
        if !path.exists() {
            return Ok(Ledger::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self, user: &str) -> Result<Ledger> {
        Self::load_from_path(&self.user_path(user))
    }

    fn save(&self, user: &str, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&self.user_path(user), &json)?;
        Ok(())
    }
}

/// Slugs a user name into a safe file stem.
fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "default".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Statement, Transaction};
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn missing_user_loads_empty_ledger() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = storage.load("nobody").expect("load");
        assert!(ledger.statements.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut ledger = Ledger::default();
        ledger.upsert_statement(Statement::new(
            6,
            2024,
            vec![Transaction {
                date: "02 JUN".into(),
                description: "Uber Trip".into(),
                amount: 25.0,
                category: "Transporte".into(),
            }],
        ));
        storage.save("maria", &ledger).expect("save");

        let loaded = storage.load("maria").expect("load");
        assert_eq!(loaded.statements.len(), 1);
        assert_eq!(
            loaded.statement(6, 2024).unwrap().transactions[0].description,
            "Uber Trip"
        );
    }

    #[test]
    fn user_names_are_slugged() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage
            .user_path("Maria Silva!")
            .ends_with("maria_silva_.json"));
        assert!(storage.user_path("  ").ends_with("default.json"));
    }
}
