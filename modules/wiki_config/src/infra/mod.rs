//! Infrastructure layer - backing stores

pub mod storage;
