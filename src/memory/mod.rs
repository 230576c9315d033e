//! Cross-run memory of recurring parties

pub mod persistence;
pub mod store;

pub use persistence::{
    decode, encode, flush_store, load_store, BlobStore, DirectoryBlobStore, InMemoryBlobStore,
    MemoryLimits,
};
pub use store::{PartyMemory, RecurringStore};
