pub mod diesel;
pub mod models;
pub mod schema;

pub use self::diesel::DbStore;
