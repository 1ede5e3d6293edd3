use thiserror::Error;

/// Failures surfaced by the decode and metadata passes.
///
/// The two passes fail independently: a `Decode` error leaves the metadata
/// panel untouched, and a `Parse` error does not prevent the image from being
/// shown. Variants keep their source rendered as text so the whole error is
/// `Clone` and can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("failed to open DICOM file: {0}")]
    Open(String),
    #[error("failed to decode pixel data: {0}")]
    Decode(String),
    #[error("file contains no image frames")]
    EmptyImage,
    #[error("failed to read file: {0}")]
    Read(String),
    #[error("not a valid DICOM data set: {0}")]
    Parse(String),
}
