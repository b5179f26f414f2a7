mod common;

use std::fs;
use std::path::Path;

use fatura_core::{
    ledger::{Ledger, RawTransaction, Statement, Transaction},
    service::FaturaService,
    storage::{JsonStorage, StorageBackend},
};
use tempfile::tempdir;

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn data_survives_reopening_the_service() {
    let (service, base) = common::setup_env("duda");
    service
        .add_statement(6, 2024, vec![RawTransaction::new("02 JUN", "Uber Trip", 24.9)])
        .unwrap();
    service.add_fixed_expense("Aluguel", 2000.0, "Outros").unwrap();
    drop(service);

    let reopened = FaturaService::open(Some(base), "duda").unwrap();
    let statement = reopened.statement(6, 2024).unwrap().expect("stored statement");
    assert_eq!(statement.transactions[0].category, "Transporte");
    assert!(reopened.is_fixed_expense("Aluguel", 2000.0).unwrap());
}

#[test]
fn users_are_isolated_by_file() {
    let (service, base) = common::setup_env("duda");
    service
        .add_statement(6, 2024, vec![RawTransaction::new("02 JUN", "Uber Trip", 24.9)])
        .unwrap();

    let other = FaturaService::open(Some(base.clone()), "edu").unwrap();
    assert!(other.statement(6, 2024).unwrap().is_none());

    let storage = JsonStorage::new(Some(base)).unwrap();
    assert!(storage.user_path("duda").exists());
    assert!(!storage.user_path("edu").exists());
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();

    let mut ledger = Ledger::default();
    ledger.upsert_statement(Statement::new(
        6,
        2024,
        vec![Transaction {
            date: "02 JUN".into(),
            description: "Uber Trip".into(),
            amount: 24.9,
            category: "Transporte".into(),
        }],
    ));
    storage.save("duda", &ledger).expect("initial save");

    let path = storage.user_path("duda");
    let original = fs::read_to_string(&path).expect("read original file");

    // Create directory that collides with the temp file name to force File::create to fail.
    let tmp_path = tmp_path_for(&path);
    fs::create_dir_all(&tmp_path).unwrap();

    // Mutate the ledger so new JSON would differ if the save succeeded.
    ledger.upsert_statement(Statement::new(7, 2024, Vec::new()));
    let result = storage.save("duda", &ledger);
    assert!(
        result.is_err(),
        "expected save to fail when temp path is a directory"
    );

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(
        current, original,
        "failed save must leave the previous document intact"
    );
}

#[test]
fn rule_and_config_changes_persist_across_instances() {
    let (service, base) = common::setup_env("duda");
    service.add_category("Viagens").unwrap();
    service.add_user_rule("airbnb", "Viagens").unwrap();
    drop(service);

    let reopened = FaturaService::open(Some(base), "duda").unwrap();
    assert_eq!(reopened.classify("Airbnb Hospedagem").unwrap(), "Viagens");
}
