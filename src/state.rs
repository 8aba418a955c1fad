use crate::db::Storage;

pub struct AppState {
    pub storage: Storage,
}
