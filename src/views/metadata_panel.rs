use crate::message::Message;
use crate::model::{InstanceMetadata, MetadataStatus};
use iced::widget::text::Wrapping;
use iced::widget::{column, row, scrollable, text};
use iced::{Element, Length};

pub fn metadata_panel<'a>(
    status: &'a MetadataStatus,
    metadata: Option<&'a InstanceMetadata>,
    have_files: bool,
) -> Element<'a, Message> {
    let body: Element<'a, Message> = match status {
        MetadataStatus::Idle => {
            if have_files {
                text("Waiting for the current file").into()
            } else {
                text("Drop DICOM files to view patient and study details").into()
            }
        }
        MetadataStatus::Loading => text("Reading metadata…").into(),
        MetadataStatus::Unavailable(error) => column![
            text("Metadata unavailable"),
            text(error.to_string()).size(13),
        ]
        .spacing(4)
        .into(),
        MetadataStatus::Ready => match metadata {
            Some(metadata) => {
                let mut table = column![];
                for (label, value) in metadata.fields() {
                    table = table.push(
                        row![
                            text(label).size(14).width(Length::FillPortion(2)),
                            text(value.unwrap_or("—").to_string())
                                .size(14)
                                .width(Length::FillPortion(3))
                                .wrapping(Wrapping::Word),
                        ]
                        .spacing(12),
                    );
                }
                scrollable(table.spacing(6)).into()
            }
            None => text("Metadata unavailable").into(),
        },
    };

    column![text("DICOM Metadata").size(18), body].spacing(12).into()
}
