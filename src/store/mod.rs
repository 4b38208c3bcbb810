//! Persistent storage in kdb.sqlite
//!
//! All interaction with SQLite goes through [`Kdb`]. The rest of the crate
//! treats the database as an object with one method per record operation.

pub mod kdb;
pub mod records;

pub use kdb::Kdb;
pub use records::{BibleRec, BookRec, BridgeRec, ChapterRec, VerseItemRec};

use std::fmt;
use thiserror::Error;

/// Kind of record operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Open,
    CreateTable,
    CreateRecord,
    ReadRecord,
    UpdateRecord,
    DeleteRecord,
    Transaction,
    Close,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreOp::Open => "cannot open database",
            StoreOp::CreateTable => "cannot create table",
            StoreOp::CreateRecord => "cannot create record",
            StoreOp::ReadRecord => "cannot read record",
            StoreOp::UpdateRecord => "cannot update record",
            StoreOp::DeleteRecord => "cannot delete record",
            StoreOp::Transaction => "transaction failed",
            StoreOp::Close => "cannot close database",
        };
        f.write_str(s)
    }
}

/// SQLite failure together with the operation being attempted
#[derive(Error, Debug)]
#[error("{op}: {source}")]
pub struct StoreError {
    pub op: StoreOp,
    #[source]
    pub source: rusqlite::Error,
}

impl StoreError {
    pub fn new(op: StoreOp, source: rusqlite::Error) -> Self {
        Self { op, source }
    }
}

/// Result type of [`Kdb`] record operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
