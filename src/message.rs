use crate::error::PipelineError;
use crate::image_pipeline::DisplayImage;
use crate::model::InstanceMetadata;
use crate::viewport::Tool;
use iced::widget::scrollable::AbsoluteOffset;
use iced::Point;
use std::path::PathBuf;

/// User intents and pipeline completions consumed by [`crate::app::App`].
///
/// Pipeline completions carry the file-set generation they were dispatched
/// under; the update loop drops any whose generation no longer matches.
#[derive(Debug, Clone)]
pub enum Message {
    PickFiles,
    FilesPicked(Vec<PathBuf>),
    FileHovered(PathBuf),
    HoverCleared,
    FileDropped(PathBuf),
    Next,
    Previous,
    ImageDecoded {
        generation: u64,
        result: Result<DisplayImage, PipelineError>,
    },
    MetadataParsed {
        generation: u64,
        path: PathBuf,
        result: Result<InstanceMetadata, PipelineError>,
    },
    ActivateTool(Tool),
    ResetView,
    PointerPressed,
    PointerMoved(Point),
    PointerReleased,
    PointerExited,
    ViewportScrolled(AbsoluteOffset),
}
