pub mod auth;
pub mod enrichment;
pub mod storage;
