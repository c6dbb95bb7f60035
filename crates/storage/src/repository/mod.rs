pub mod sessions;

pub use sessions::PgSessionStore;
