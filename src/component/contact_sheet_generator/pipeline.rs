use super::compositor::compose;
use super::error::SheetError;
use super::frame_extractor::{FrameDecoder, extract_frames};
use super::frame_sampler::sample_timestamps;
use super::layout_engine::compute_geometry;
use crate::config::ContactSheetSettings;
use crate::tools::{DurationProbe, load_label_font};
use image::RgbImage;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 單支影片的預覽圖生成管線
///
/// 流程：Probe → Sample → Extract（平行）→ Layout → Compose。
/// 擷取階段等待所有幀完成（成功或失敗）後才進入佈局；
/// 只有單幀擷取失敗會被局部吸收（該格留白），
/// 其餘任何階段的錯誤對整次生成都是致命的。
///
/// 回傳實際寫入的輸出路徑。
pub fn generate_contact_sheet(
    probe: &dyn DurationProbe,
    decoder: &dyn FrameDecoder,
    video_path: &Path,
    output_path: Option<&Path>,
    settings: &ContactSheetSettings,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<PathBuf, SheetError> {
    validate_settings(settings)?;

    let duration = probe
        .duration_seconds(video_path)
        .map_err(|e| SheetError::Probe(format!("{e:#}")))?;

    let timestamps = sample_timestamps(duration, settings.rows, settings.cols);
    debug!(
        "取樣 {} 個時間點（影片長度 {duration:.1}s）: {}",
        timestamps.len(),
        video_path.display()
    );

    let results = extract_frames(
        decoder,
        video_path,
        &timestamps,
        settings.concurrency_limit,
        shutdown_signal,
    )?;

    let success_count = results.iter().filter(|r| r.is_ok()).count();
    info!(
        "幀擷取完成: 成功 {success_count}, 失敗 {}: {}",
        results.len() - success_count,
        video_path.display()
    );

    // 解碼影像位元串；無法解碼的幀視同擷取失敗，該格留白
    let frames: Vec<(f64, Option<RgbImage>)> = timestamps
        .iter()
        .zip(results)
        .map(|(&timestamp, result)| {
            let image = match result {
                Ok(buffer) => match image::load_from_memory(&buffer.data) {
                    Ok(decoded) => Some(decoded.to_rgb8()),
                    Err(e) => {
                        warn!("幀 {timestamp:.0}s 影像解碼失敗: {e}");
                        None
                    }
                },
                Err(e) => {
                    warn!("幀 {timestamp:.0}s 擷取失敗: {e}");
                    None
                }
            };
            (timestamp, image)
        })
        .collect();

    let (first_width, first_height) = frames
        .iter()
        .find_map(|(_, image)| image.as_ref())
        .map(|image| (image.width(), image.height()))
        .ok_or(SheetError::NoFramesAvailable)?;

    let geometry = compute_geometry(
        first_width,
        first_height,
        settings.output_width,
        settings.rows,
        settings.cols,
        settings.with_timestamp,
    );
    debug!(
        "畫布幾何: {}x{}, 格子 {}x{}",
        geometry.canvas_width, geometry.canvas_height, geometry.cell_width, geometry.cell_height
    );

    let output_path =
        output_path.map_or_else(|| default_output_path(video_path), Path::to_path_buf);
    let title = video_path
        .file_name()
        .map_or_else(|| "video".to_string(), |n| n.to_string_lossy().to_string());
    let font = load_label_font(settings.font_path.as_deref());

    compose(
        &frames,
        &geometry,
        &title,
        settings.cols,
        settings.with_timestamp,
        font.as_ref(),
        &output_path,
    )?;

    info!("預覽圖已建立: {}", output_path.display());
    Ok(output_path)
}

/// 預設輸出路徑：與影片同目錄的 `<檔名>.jpg`（含原副檔名）
#[must_use]
pub fn default_output_path(video_path: &Path) -> PathBuf {
    let mut name = video_path
        .file_name()
        .map_or_else(|| OsString::from("video"), ToOwned::to_owned);
    name.push(".jpg");
    video_path.with_file_name(name)
}

fn validate_settings(settings: &ContactSheetSettings) -> Result<(), SheetError> {
    if settings.rows == 0 || settings.cols == 0 {
        return Err(SheetError::InvalidOptions(format!(
            "rows 與 cols 必須至少為 1（收到 {}x{}）",
            settings.rows, settings.cols
        )));
    }
    if settings.output_width == 0 {
        return Err(SheetError::InvalidOptions(
            "output_width 必須至少為 1".to_string(),
        ));
    }
    if settings.concurrency_limit == 0 {
        return Err(SheetError::InvalidOptions(
            "concurrency_limit 必須至少為 1".to_string(),
        ));
    }
    Ok(())
}
