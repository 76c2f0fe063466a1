#![allow(dead_code)]

use rand::Rng;
use rand::distributions::Alphanumeric;
use storefront::application::session::SessionController;
use storefront::infrastructure::sqlite::SqliteStore;

/// Random alphanumeric string of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `count` distinct (username, password) pairs.
pub fn generate_credentials(count: usize) -> Vec<(String, String)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let username = format!("user{i}_{}", random_token(rng.gen_range(1..12)));
            let password = random_token(rng.gen_range(0..24));
            (username, password)
        })
        .collect()
}

/// Controller over a fresh in-memory SQLite database, plus a handle on it.
pub fn sqlite_controller() -> (SessionController, SqliteStore) {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory SQLite");
    let controller =
        SessionController::with_stores(Box::new(store.clone()), Box::new(store.clone()));
    (controller, store)
}
