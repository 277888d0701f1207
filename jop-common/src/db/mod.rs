//! Database access layer shared by the catalog services

pub mod init;
pub mod models;
pub mod readonly;

pub use init::init_database;
pub use readonly::connect_readonly;
