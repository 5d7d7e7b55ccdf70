pub mod app;
pub mod behaviors;
pub mod document;
pub mod event;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod scroll;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use document::Document;
pub use layout::DocumentLayout;
pub use theme::Theme;
