#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use fatura_core::service::FaturaService;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a service backed by a unique directory, returning the base path so
/// tests can reopen the same data or poke at the files directly.
pub fn setup_env(user: &str) -> (FaturaService, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let service = FaturaService::open(Some(base.clone()), user).expect("open service for temp dir");
    (service, base)
}

pub fn setup_service(user: &str) -> FaturaService {
    setup_env(user).0
}
