mod error;
mod repl;
mod storage;
pub mod view;

pub use error::{Result, RosterError};
pub use repl::*;
pub use storage::{
    FileSeed, FileStorage, InlineSeed, MemoryStorage, RecordStore, SeedSource, Storage, Student,
    StudentFields, StudentPatch, STORAGE_KEY,
};
