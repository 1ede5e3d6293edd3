use crate::error::PipelineError;
use dicom::object::open_file;
use dicom::pixeldata::{DecodedPixelData, PhotometricInterpretation, PixelDecoder};
use iced::widget::image::Handle;
use std::path::Path;

/// A window/level transform over raw monochrome samples.
///
/// `apply` follows the DICOM linear VOI function: samples below the window
/// map to black, samples above to white, and the span in between is mapped
/// linearly onto 0..=255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLevel {
    pub center: f32,
    pub width: f32,
}

impl WindowLevel {
    pub fn from_range(min: u16, max: u16) -> Self {
        Self {
            center: (f32::from(min) + f32::from(max)) / 2.0,
            width: (f32::from(max) - f32::from(min)).max(1.0),
        }
    }

    pub fn apply(&self, value: f32) -> u8 {
        if self.width <= 1.0 {
            return if value < self.center { 0 } else { 255 };
        }

        let half = (self.width - 1.0) / 2.0;
        if value <= self.center - 0.5 - half {
            0
        } else if value > self.center - 0.5 + half {
            255
        } else {
            let normalized = (value - (self.center - 0.5)) / (self.width - 1.0) + 0.5;
            (normalized * 255.0).clamp(0.0, 255.0).round() as u8
        }
    }

    /// Adjusts the window from a pointer drag: horizontal motion widens or
    /// narrows, vertical motion raises or lowers the center. Sensitivity
    /// scales with the current width so deep 16-bit ranges stay usable.
    pub fn adjust(&mut self, dx: f32, dy: f32) {
        let rate = (self.width / 255.0).max(1.0);
        self.width = (self.width + dx * rate).max(1.0);
        self.center += dy * rate;
    }
}

/// First frame of a decoded file, kept in a form that can be re-rendered.
///
/// Monochrome frames retain their raw samples so window/level changes only
/// recompute the RGBA buffer; color frames are converted once and re-used.
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub width: u32,
    pub height: u32,
    pub pixels: FramePixels,
    pub initial_window: Option<WindowLevel>,
}

#[derive(Debug, Clone)]
pub enum FramePixels {
    Monochrome { samples: Vec<u16>, invert: bool },
    Color { rgba: Vec<u8> },
}

impl DisplayImage {
    pub fn render(&self, window: Option<WindowLevel>) -> Handle {
        match &self.pixels {
            FramePixels::Monochrome { samples, invert } => {
                let window = window
                    .or(self.initial_window)
                    .unwrap_or(WindowLevel::from_range(0, u16::MAX));
                Handle::from_rgba(
                    self.width,
                    self.height,
                    windowed_rgba(samples, *invert, window),
                )
            }
            FramePixels::Color { rgba } => {
                Handle::from_rgba(self.width, self.height, rgba.clone())
            }
        }
    }
}

/// Decode-for-display pass: opens the file, decodes pixel data, and prepares
/// the first frame. Runs independently of the metadata pass over the same
/// file.
pub fn decode_for_display(path: &Path) -> Result<DisplayImage, PipelineError> {
    log::info!("Decoding DICOM image: {}", path.display());
    let object = open_file(path).map_err(|err| {
        log::error!("{}: failed to open DICOM file ({err})", path.display());
        PipelineError::Open(err.to_string())
    })?;

    let decoded = object
        .decode_pixel_data()
        .map_err(|err| PipelineError::Decode(err.to_string()))?;

    if decoded.number_of_frames() == 0 {
        return Err(PipelineError::EmptyImage);
    }

    first_frame(&decoded)
}

fn first_frame(decoded: &DecodedPixelData<'_>) -> Result<DisplayImage, PipelineError> {
    let width = decoded.columns();
    let height = decoded.rows();

    if decoded.photometric_interpretation().is_monochrome() {
        let invert = matches!(
            decoded.photometric_interpretation(),
            PhotometricInterpretation::Monochrome1
        );
        let samples: Vec<u16> = if decoded.bits_allocated() <= 8 {
            decoded
                .to_vec_frame::<u8>(0)
                .map_err(|err| PipelineError::Decode(err.to_string()))?
                .into_iter()
                .map(u16::from)
                .collect()
        } else {
            decoded
                .to_vec_frame::<u16>(0)
                .map_err(|err| PipelineError::Decode(err.to_string()))?
        };

        let (min, max) = min_max(&samples).unwrap_or((0, 0));
        Ok(DisplayImage {
            width,
            height,
            pixels: FramePixels::Monochrome { samples, invert },
            initial_window: Some(WindowLevel::from_range(min, max)),
        })
    } else {
        let image = decoded
            .to_dynamic_image(0)
            .map_err(|err| PipelineError::Decode(err.to_string()))?;
        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(DisplayImage {
            width,
            height,
            pixels: FramePixels::Color {
                rgba: rgba.into_raw(),
            },
            initial_window: None,
        })
    }
}

fn windowed_rgba(samples: &[u16], invert: bool, window: WindowLevel) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(samples.len() * 4);
    for &sample in samples {
        let mut gray = window.apply(f32::from(sample));
        if invert {
            gray = 255 - gray;
        }
        rgba.extend_from_slice(&[gray, gray, gray, 255]);
    }
    rgba
}

fn min_max(values: &[u16]) -> Option<(u16, u16)> {
    values.iter().copied().fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::{DataElement, PrimitiveValue, VR};
    use dicom::dictionary_std::{tags, uids};
    use dicom::object::{FileMetaTableBuilder, InMemDicomObject};

    #[test]
    fn full_range_window_passes_extremes_through() {
        let window = WindowLevel::from_range(0, 255);
        assert_eq!(window.apply(0.0), 0);
        assert_eq!(window.apply(255.0), 255);
        assert_eq!(window.apply(127.0), 128);
    }

    #[test]
    fn narrow_window_clips_out_of_range_samples() {
        let window = WindowLevel {
            center: 100.0,
            width: 20.0,
        };
        assert_eq!(window.apply(0.0), 0);
        assert_eq!(window.apply(89.0), 0);
        assert_eq!(window.apply(110.0), 255);
        assert_eq!(window.apply(4000.0), 255);
    }

    #[test]
    fn degenerate_window_acts_as_threshold() {
        let window = WindowLevel {
            center: 50.0,
            width: 1.0,
        };
        assert_eq!(window.apply(49.0), 0);
        assert_eq!(window.apply(51.0), 255);
    }

    #[test]
    fn adjust_never_collapses_the_width() {
        let mut window = WindowLevel {
            center: 10.0,
            width: 5.0,
        };
        window.adjust(-1000.0, 0.0);
        assert_eq!(window.width, 1.0);
    }

    #[test]
    fn monochrome1_is_inverted() {
        let rgba = windowed_rgba(&[0, 255], true, WindowLevel::from_range(0, 255));
        assert_eq!(&rgba[..4], &[255, 255, 255, 255]);
        assert_eq!(&rgba[4..], &[0, 0, 0, 255]);
    }

    #[test]
    fn windowing_maps_samples_linearly() {
        let rgba = windowed_rgba(&[0, 85, 170, 255], false, WindowLevel::from_range(0, 255));
        assert_eq!(rgba.len(), 16);
        assert_eq!(rgba[0], 0);
        assert_eq!(rgba[15], 255);
        // Gray channels agree and alpha is opaque.
        assert_eq!(rgba[4], rgba[5]);
        assert_eq!(rgba[7], 255);
    }

    fn write_monochrome_fixture(path: &std::path::Path) {
        let sop_instance = "1.2.826.0.1.3680043.2.1125.7";
        let mut object = InMemDicomObject::new_empty();
        object.put(DataElement::new(
            tags::SOP_CLASS_UID,
            VR::UI,
            PrimitiveValue::from(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
        ));
        object.put(DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from(sop_instance),
        ));
        object.put(DataElement::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("MONOCHROME2"),
        ));
        object.put(DataElement::new(
            tags::SAMPLES_PER_PIXEL,
            VR::US,
            PrimitiveValue::from(1_u16),
        ));
        object.put(DataElement::new(
            tags::ROWS,
            VR::US,
            PrimitiveValue::from(2_u16),
        ));
        object.put(DataElement::new(
            tags::COLUMNS,
            VR::US,
            PrimitiveValue::from(2_u16),
        ));
        object.put(DataElement::new(
            tags::BITS_ALLOCATED,
            VR::US,
            PrimitiveValue::from(8_u16),
        ));
        object.put(DataElement::new(
            tags::BITS_STORED,
            VR::US,
            PrimitiveValue::from(8_u16),
        ));
        object.put(DataElement::new(
            tags::HIGH_BIT,
            VR::US,
            PrimitiveValue::from(7_u16),
        ));
        object.put(DataElement::new(
            tags::PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(0_u16),
        ));
        object.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OB,
            PrimitiveValue::from(vec![0_u8, 85, 170, 255]),
        ));

        let meta = FileMetaTableBuilder::new()
            .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
            .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
            .media_storage_sop_instance_uid(sop_instance);
        object
            .with_meta(meta)
            .expect("file meta")
            .write_to_file(path)
            .expect("write fixture");
    }

    #[test]
    fn decodes_a_monochrome_file_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mono.dcm");
        write_monochrome_fixture(&path);

        let image = decode_for_display(&path).expect("decode");
        assert_eq!((image.width, image.height), (2, 2));
        let window = image.initial_window.expect("monochrome window");
        assert_eq!(window.width, 255.0);
        match &image.pixels {
            FramePixels::Monochrome { samples, invert } => {
                assert_eq!(samples, &[0, 85, 170, 255]);
                assert!(!invert);
            }
            FramePixels::Color { .. } => panic!("expected monochrome pixels"),
        }
    }

    #[test]
    fn decode_of_a_missing_file_is_an_open_error() {
        let err = decode_for_display(std::path::Path::new("/nonexistent/x.dcm")).unwrap_err();
        assert!(matches!(err, PipelineError::Open(_)));
    }
}
