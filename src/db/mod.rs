pub mod connection;
pub mod storage;
