use crate::error::PipelineError;
use crate::image_pipeline;
use crate::message::Message;
use crate::model::metadata::read_instance_metadata;
use crate::model::{is_dicom_file, DropGate, FileSet, InstanceMetadata, MetadataStatus};
use crate::viewport::{DragEffect, Viewport};
use crate::views::{image_panel, metadata_panel, navigation_bar, tool_bar, viewport_scroll_id};
use iced::widget::{button, column, container, row, scrollable};
use iced::{application, event, window, Element, Event, Length, Point, Subscription, Task, Theme};
use rfd::AsyncFileDialog;
use std::collections::HashMap;
use std::path::PathBuf;

const APP_TITLE: &str = "Dcmscope";

pub fn run() -> iced::Result {
    init_logging();

    application(APP_TITLE, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .run()
}

/// One-time process setup. Safe to call more than once; repeated calls are
/// no-ops because `try_init` refuses to install a second logger.
fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();
}

#[derive(Default)]
pub struct App {
    file_set: FileSet,
    drop_gate: DropGate,
    viewport: Viewport,
    loading_image: bool,
    image_error: Option<PipelineError>,
    metadata_status: MetadataStatus,
    metadata_store: HashMap<PathBuf, InstanceMetadata>,
    cursor: Option<Point>,
    drag_anchor: Option<Point>,
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles => Task::perform(
                async {
                    match AsyncFileDialog::new()
                        .add_filter("DICOM", &["dcm", "dicom"])
                        .pick_files()
                        .await
                    {
                        Some(handles) => handles
                            .into_iter()
                            .map(|handle| handle.path().to_path_buf())
                            .collect(),
                        None => Vec::new(),
                    }
                },
                Message::FilesPicked,
            ),
            Message::FilesPicked(paths) => {
                let accepted: Vec<PathBuf> =
                    paths.into_iter().filter(|path| is_dicom_file(path)).collect();
                self.load_set(accepted)
            }
            Message::FileHovered(path) => {
                log::debug!("File hovering over window: {}", path.display());
                self.drop_gate.file_hovered();
                Task::none()
            }
            Message::HoverCleared => {
                self.drop_gate.hover_cleared();
                Task::none()
            }
            Message::FileDropped(path) => match self.drop_gate.file_dropped(path) {
                Some(batch) => self.load_set(batch),
                None => Task::none(),
            },
            Message::Next => {
                if self.file_set.next() {
                    self.show_current()
                } else {
                    Task::none()
                }
            }
            Message::Previous => {
                if self.file_set.previous() {
                    self.show_current()
                } else {
                    Task::none()
                }
            }
            Message::ImageDecoded { generation, result } => {
                if generation != self.file_set.generation() {
                    log::debug!("Discarding stale image decode (generation {generation})");
                    return Task::none();
                }
                self.loading_image = false;
                match result {
                    Ok(image) => {
                        self.image_error = None;
                        self.viewport.enable(image);
                    }
                    Err(error) => {
                        log::warn!("Image decode failed: {error}");
                        self.image_error = Some(error);
                    }
                }
                Task::none()
            }
            Message::MetadataParsed {
                generation,
                path,
                result,
            } => {
                if generation != self.file_set.generation() {
                    log::debug!("Discarding stale metadata (generation {generation})");
                    return Task::none();
                }
                match result {
                    Ok(metadata) => {
                        // Single mapping keyed by file, updated in place.
                        self.metadata_store.insert(path, metadata);
                        self.metadata_status = MetadataStatus::Ready;
                    }
                    Err(error) => {
                        log::warn!("Metadata extraction failed: {error}");
                        self.metadata_status = MetadataStatus::Unavailable(error);
                    }
                }
                Task::none()
            }
            Message::ActivateTool(tool) => {
                if !self.viewport.activate(tool) {
                    log::debug!("Ignoring tool activation: no enabled viewport");
                }
                Task::none()
            }
            Message::ResetView => {
                if self.viewport.reset_view() {
                    scrollable::scroll_to(
                        viewport_scroll_id(),
                        scrollable::AbsoluteOffset::default(),
                    )
                } else {
                    Task::none()
                }
            }
            Message::PointerPressed => {
                if self.viewport.is_enabled() && self.viewport.active_tool().is_some() {
                    self.drag_anchor = self.cursor;
                }
                Task::none()
            }
            Message::PointerMoved(position) => {
                self.cursor = Some(position);
                let Some(anchor) = self.drag_anchor else {
                    return Task::none();
                };
                self.drag_anchor = Some(position);
                let dx = position.x - anchor.x;
                let dy = position.y - anchor.y;
                match self.viewport.drag(dx, dy) {
                    DragEffect::ScrollTo(offset) => {
                        scrollable::scroll_to(viewport_scroll_id(), offset)
                    }
                    DragEffect::Applied | DragEffect::Ignored => Task::none(),
                }
            }
            Message::PointerReleased | Message::PointerExited => {
                self.drag_anchor = None;
                Task::none()
            }
            Message::ViewportScrolled(offset) => {
                self.viewport.set_scroll_offset(offset);
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let pick_button = button("Import DICOM Files").on_press(Message::PickFiles);

        let current_metadata = self
            .file_set
            .current_path()
            .and_then(|path| self.metadata_store.get(path));
        let mut sidebar = column![
            pick_button,
            metadata_panel(
                &self.metadata_status,
                current_metadata,
                !self.file_set.is_empty(),
            ),
        ]
        .spacing(16);

        if !self.file_set.is_empty() {
            sidebar = sidebar.push(navigation_bar(&self.file_set));
        }

        let stage = column![
            tool_bar(&self.viewport),
            image_panel(&self.viewport, self.loading_image, self.image_error.as_ref()),
        ]
        .spacing(12);

        row![
            container(sidebar)
                .padding(16)
                .width(Length::FillPortion(2))
                .height(Length::Fill),
            container(stage)
                .padding(16)
                .width(Length::FillPortion(5))
                .height(Length::Fill),
        ]
        .spacing(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(path)) => Some(Message::FileHovered(path)),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::HoverCleared),
            _ => None,
        })
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Replaces the file set with `paths` and starts the pipeline for its
    /// first file. Empty batches never reach the store.
    fn load_set(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        if self.file_set.load(paths) {
            self.show_current()
        } else {
            Task::none()
        }
    }

    /// Tears the viewport down and dispatches the two independent passes for
    /// the current file, both tagged with the live generation.
    fn show_current(&mut self) -> Task<Message> {
        let Some(path) = self.file_set.current_path() else {
            return Task::none();
        };
        let path = path.to_path_buf();
        let generation = self.file_set.generation();

        self.viewport.disable();
        self.loading_image = true;
        self.image_error = None;
        self.metadata_status = MetadataStatus::Loading;

        let decode_path = path.clone();
        let decode = Task::perform(
            async move { image_pipeline::decode_for_display(&decode_path) },
            move |result| Message::ImageDecoded { generation, result },
        );

        let parse = Task::perform(
            async move {
                let result = read_instance_metadata(&path);
                (path, result)
            },
            move |(path, result)| Message::MetadataParsed {
                generation,
                path,
                result,
            },
        );

        Task::batch([decode, parse])
    }
}
