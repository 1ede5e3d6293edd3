pub mod drop_gate;
pub mod file_set;
pub mod metadata;

pub use drop_gate::{is_dicom_file, DropGate};
pub use file_set::FileSet;
pub use metadata::{InstanceMetadata, MetadataStatus};
