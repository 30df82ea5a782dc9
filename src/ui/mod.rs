pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    error, header, info, is_quiet, muted, section, status, success, summary_row, warn,
};
pub use progress::{finish_summary, Spinner};
pub use table::TableBuilder;
pub use theme::{theme, Theme};
