pub mod record;
pub mod seed;
pub mod slot;
pub mod store;

pub use record::{parse_skills, Student, StudentFields, StudentPatch};
pub use seed::{FileSeed, InlineSeed, SeedSource};
pub use slot::{FileStorage, MemoryStorage, Storage};
pub use store::RecordStore;

/// Storage key holding the JSON encoded student list
pub const STORAGE_KEY: &str = "students";
