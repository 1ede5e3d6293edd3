use crate::error::PipelineError;
use crate::message::Message;
use crate::viewport::Viewport;
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{column, container, mouse_area, scrollable, text, Image};
use iced::{ContentFit, Element, Length};

/// Identifier of the image scrollable so pan drags can reposition it.
pub fn viewport_scroll_id() -> scrollable::Id {
    scrollable::Id::new("image-viewport")
}

/// The image surface: a scrollable holding the rendered frame at its zoomed
/// size, wrapped in a mouse area that feeds tool drags to the update loop.
pub fn image_panel<'a>(
    viewport: &'a Viewport,
    loading: bool,
    error: Option<&'a PipelineError>,
) -> Element<'a, Message> {
    if let Some(handle) = viewport.handle() {
        let (width, height) = viewport.scaled_size().unwrap_or((0.0, 0.0));
        let image = Image::new(handle.clone())
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Fill);

        let surface = scrollable(image)
            .id(viewport_scroll_id())
            .direction(Direction::Both {
                vertical: Scrollbar::new(),
                horizontal: Scrollbar::new(),
            })
            .on_scroll(|view| Message::ViewportScrolled(view.absolute_offset()))
            .width(Length::Fill)
            .height(Length::Fill);

        mouse_area(surface)
            .on_press(Message::PointerPressed)
            .on_release(Message::PointerReleased)
            .on_move(Message::PointerMoved)
            .on_exit(Message::PointerExited)
            .into()
    } else if let Some(error) = error {
        container(
            column![
                text("Unable to display this image").size(18),
                text(error.to_string()).size(14),
            ]
            .spacing(8),
        )
        .center(Length::Fill)
        .into()
    } else if loading {
        container(text("Decoding image…")).center(Length::Fill).into()
    } else {
        container(text("Drop DICOM files (.dcm) anywhere in this window to begin"))
            .center(Length::Fill)
            .into()
    }
}
