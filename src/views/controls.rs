use crate::message::Message;
use crate::model::FileSet;
use crate::viewport::{Tool, Viewport};
use iced::widget::{button, column, row, text};
use iced::{Alignment, Element};

/// "Image i of n" counter plus Previous/Next, disabled at the edges.
pub fn navigation_bar(file_set: &FileSet) -> Element<'_, Message> {
    let position = file_set
        .current_index()
        .map(|index| index + 1)
        .unwrap_or(0);
    let counter = text(format!("Image {position} of {}", file_set.len())).size(14);

    let at_first = file_set.current_index() == Some(0);
    let at_last = file_set
        .current_index()
        .is_some_and(|index| index + 1 == file_set.len());

    let previous = button(text("Previous").size(14))
        .on_press_maybe((!at_first).then_some(Message::Previous));
    let next = button(text("Next").size(14)).on_press_maybe((!at_last).then_some(Message::Next));

    column![counter, row![previous, next].spacing(8)]
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
}

/// Tool selector plus view reset. The active tool is highlighted; presses
/// while no image is enabled fall through as no-ops in the update loop.
pub fn tool_bar(viewport: &Viewport) -> Element<'_, Message> {
    let tool_button = |tool: Tool| {
        let is_active = viewport.active_tool() == Some(tool);
        button(text(tool.label()).size(14))
            .style(if is_active {
                button::primary
            } else {
                button::secondary
            })
            .on_press(Message::ActivateTool(tool))
    };

    row![
        tool_button(Tool::WindowLevel),
        tool_button(Tool::Pan),
        tool_button(Tool::Zoom),
        button(text("Reset").size(14))
            .style(button::secondary)
            .on_press(Message::ResetView),
    ]
    .spacing(8)
    .into()
}
