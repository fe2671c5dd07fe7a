pub mod file_lock;
pub mod json_file_repo;
pub mod memory_repo;

pub use file_lock::LockConfig;
pub use json_file_repo::JsonFilePostRepository;
pub use memory_repo::InMemoryPostRepository;
