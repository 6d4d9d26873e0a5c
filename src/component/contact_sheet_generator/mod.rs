//! 影片預覽圖生成元件
//!
//! 五階段流程：
//! A. 取得影片長度（ffprobe）
//! B. 等距取樣擷取時間點
//! C. 平行擷取單幀影像（有數量上限的解碼程序池）
//! D. 由首張成功幀計算畫布幾何
//! E. 合成標題、縮圖與時間戳為單一預覽圖

mod compositor;
mod error;
mod frame_extractor;
mod frame_sampler;
mod layout_engine;
mod main;
mod pipeline;

pub use compositor::compose;
pub use error::{ExtractError, SheetError};
pub use frame_extractor::{FfmpegFrameDecoder, FrameBuffer, FrameDecoder, extract_frames};
pub use frame_sampler::sample_timestamps;
pub use layout_engine::{CanvasGeometry, cell_origin, compute_geometry};
pub use main::{ContactSheetGenerator, GenerationResult};
pub use pipeline::{default_output_path, generate_contact_sheet};
