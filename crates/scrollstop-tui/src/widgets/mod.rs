pub mod canvas;
pub mod header;
mod page;
mod popup;
mod status_bar;
mod transition;

pub use header::HeaderWidget;
pub use page::PageWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
pub use transition::TransitionWidget;
