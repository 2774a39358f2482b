mod shared_dir_store;

pub use shared_dir_store::SharedDirStore;
