pub mod screen;
pub mod timeline;
pub mod tui;
pub mod widgets;

pub use screen::Screen;
pub use timeline::TimelineQuery;
pub use widgets::Selection;
