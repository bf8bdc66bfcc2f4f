mod store;

pub use store::IMemoryStore;
