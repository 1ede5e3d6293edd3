use crate::error::PipelineError;
use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::{from_reader, DefaultDicomObject};
use std::fs;
use std::path::Path;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8] = b"DICM";

/// The fixed set of display fields projected from a DICOM data set.
///
/// Every field is optional: a missing or empty tag maps to `None`, never to
/// an error. The record is fully recomputed each time the current file
/// changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceMetadata {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub patient_birth_date: Option<String>,
    pub patient_sex: Option<String>,
    pub study_date: Option<String>,
    pub study_description: Option<String>,
    pub modality: Option<String>,
    pub series_description: Option<String>,
    pub instance_number: Option<String>,
}

impl InstanceMetadata {
    /// Parses a raw byte stream as DICOM and projects the display fields.
    ///
    /// Fails only when the stream is not a well-formed DICOM file at all.
    pub fn extract(bytes: &[u8]) -> Result<Self, PipelineError> {
        let object = from_reader(strip_preamble(bytes))
            .map_err(|err| PipelineError::Parse(err.to_string()))?;

        Ok(Self {
            patient_name: tag_string(&object, tags::PATIENT_NAME),
            patient_id: tag_string(&object, tags::PATIENT_ID),
            patient_birth_date: tag_string(&object, tags::PATIENT_BIRTH_DATE),
            patient_sex: tag_string(&object, tags::PATIENT_SEX),
            study_date: tag_string(&object, tags::STUDY_DATE),
            study_description: tag_string(&object, tags::STUDY_DESCRIPTION),
            modality: tag_string(&object, tags::MODALITY),
            series_description: tag_string(&object, tags::SERIES_DESCRIPTION),
            instance_number: tag_string(&object, tags::INSTANCE_NUMBER),
        })
    }

    /// Labeled fields in display order for the metadata panel.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("Patient Name", self.patient_name.as_deref()),
            ("Patient ID", self.patient_id.as_deref()),
            ("Birth Date", self.patient_birth_date.as_deref()),
            ("Sex", self.patient_sex.as_deref()),
            ("Study Date", self.study_date.as_deref()),
            ("Study Description", self.study_description.as_deref()),
            ("Modality", self.modality.as_deref()),
            ("Series Description", self.series_description.as_deref()),
            ("Instance Number", self.instance_number.as_deref()),
        ]
    }
}

/// Outcome of the metadata pass for the file currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetadataStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Unavailable(PipelineError),
}

/// Reads the raw bytes of `path` and extracts its metadata.
///
/// This is the second, independent read pass over the current file; the
/// display pass decodes pixel data separately and neither blocks the other.
pub fn read_instance_metadata(path: &Path) -> Result<InstanceMetadata, PipelineError> {
    log::info!("Reading metadata from {}", path.display());
    let bytes = fs::read(path).map_err(|err| PipelineError::Read(err.to_string()))?;
    InstanceMetadata::extract(&bytes)
}

/// Drops the 128-byte preamble when present, leaving the `DICM` magic.
fn strip_preamble(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= PREAMBLE_LEN + MAGIC.len()
        && &bytes[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC
    {
        &bytes[PREAMBLE_LEN..]
    } else {
        bytes
    }
}

fn tag_string(object: &DefaultDicomObject, tag: Tag) -> Option<String> {
    object
        .element_opt(tag)
        .ok()
        .flatten()
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
