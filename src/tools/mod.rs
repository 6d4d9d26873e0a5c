mod ffprobe_info;
mod font_loader;
mod path_validator;
mod time_format;
mod video_scanner;

pub use ffprobe_info::{DurationProbe, FfprobeDurationProbe};
pub use font_loader::load_label_font;
pub use path_validator::validate_directory_exists;
pub use time_format::format_timestamp;
pub use video_scanner::{VideoFileInfo, scan_video_files};
