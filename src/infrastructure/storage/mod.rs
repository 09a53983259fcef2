pub mod memory;

pub use memory::InMemoryCredentialStore;
