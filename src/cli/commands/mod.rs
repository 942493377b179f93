pub mod breeder;
pub mod config;
pub mod db;
pub mod engines;
pub mod entry;
pub mod growlog;
pub mod strain;



#[cfg(test)]
#[path = "growlog_test.rs"]
mod growlog_test;
