pub mod artifact_store;

pub use artifact_store::{artifact_path, read_artifact, write_artifact};
