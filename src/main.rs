mod app;
mod error;
mod image_pipeline;
mod message;
mod model;
mod viewport;
mod views;

pub fn main() -> iced::Result {
    app::run()
}
