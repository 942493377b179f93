//! growbook keeps a grow diary: seed breeders, their strains, growlogs and
//! dated growlog entries, stored in SQLite, MySQL or PostgreSQL.

pub mod cli;
pub mod config;
pub mod db;
