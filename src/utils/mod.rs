pub mod browser;
pub mod color;
pub mod format;

pub use browser::open_browser;
pub use color::{severity_color, sync_state_color};
pub use format::{encode_path_segment, format_lag, format_lag_label, format_number, format_percent};
