mod document_view;
mod status_bar;

pub use document_view::DocumentViewWidget;
pub use status_bar::StatusBarWidget;
