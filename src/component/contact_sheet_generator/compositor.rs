use super::error::SheetError;
use super::layout_engine::{CanvasGeometry, cell_origin};
use crate::tools::format_timestamp;
use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use log::debug;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 畫布背景色（白）
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// 標籤文字顏色（黑）
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const JPEG_QUALITY: u8 = 90;

/// 將幀、標題與時間戳合成為單一預覽圖並寫入檔案
///
/// 幀依列優先順序放入網格；擷取失敗的格子保留背景色，
/// 部分失敗不會中斷整張合成。
/// 寫檔採「暫存檔 + 改名」，失敗時不殘留不完整的輸出。
pub fn compose(
    frames: &[(f64, Option<RgbImage>)],
    geometry: &CanvasGeometry,
    title: &str,
    cols: u32,
    with_timestamp: bool,
    font: Option<&FontVec>,
    output_path: &Path,
) -> Result<(), SheetError> {
    let mut canvas = RgbImage::from_pixel(
        geometry.canvas_width,
        geometry.canvas_height,
        BACKGROUND,
    );

    if let Some(font) = font {
        draw_centered_text(
            &mut canvas,
            font,
            title,
            geometry.title_font_size,
            0,
            0,
            geometry.canvas_width,
            geometry.title_bar_height,
        );
    }

    for (index, (timestamp, frame)) in frames.iter().enumerate() {
        let Some(frame) = frame else {
            continue;
        };

        let (left, top) = cell_origin(geometry, index, cols);

        let cell = imageops::resize(
            frame,
            geometry.cell_width,
            geometry.cell_height,
            imageops::FilterType::Triangle,
        );
        imageops::replace(&mut canvas, &cell, i64::from(left), i64::from(top));

        if with_timestamp && let Some(font) = font {
            draw_centered_text(
                &mut canvas,
                font,
                &format_timestamp(*timestamp),
                geometry.timestamp_font_size,
                left,
                top + geometry.cell_height,
                geometry.cell_width,
                geometry.timestamp_label_height,
            );
        }
    }

    write_jpeg_atomically(&canvas, output_path)
}

/// 在帶狀區域內水平置中繪製單行文字
#[allow(clippy::too_many_arguments)]
fn draw_centered_text(
    canvas: &mut RgbImage,
    font: &FontVec,
    text: &str,
    font_size: u32,
    band_left: u32,
    band_top: u32,
    band_width: u32,
    band_height: u32,
) {
    if text.is_empty() || font_size == 0 || band_height == 0 {
        return;
    }

    let scale = PxScale::from(font_size as f32);
    let (text_width, text_height) = text_size(scale, font, text);

    let x = band_left as i32 + (band_width as i32 - text_width as i32) / 2;
    let y = band_top as i32 + (band_height as i32 - text_height as i32) / 2;

    draw_text_mut(
        canvas,
        TEXT_COLOR,
        x.max(band_left as i32),
        y.max(band_top as i32),
        scale,
        font,
        text,
    );
}

fn write_jpeg_atomically(canvas: &RgbImage, output_path: &Path) -> Result<(), SheetError> {
    let temp_path = temp_path_for(output_path);

    let result = write_jpeg(canvas, &temp_path).and_then(|()| {
        fs::rename(&temp_path, output_path).map_err(|e| SheetError::CompositeIo {
            path: output_path.to_path_buf(),
            message: e.to_string(),
        })
    });

    if result.is_err() && temp_path.exists() {
        let _ = fs::remove_file(&temp_path);
    } else if result.is_ok() {
        debug!("預覽圖已寫入: {}", output_path.display());
    }

    result
}

fn write_jpeg(canvas: &RgbImage, path: &Path) -> Result<(), SheetError> {
    let io_error = |message: String| SheetError::CompositeIo {
        path: path.to_path_buf(),
        message,
    };

    let file = fs::File::create(path).map_err(|e| io_error(e.to_string()))?;
    let mut writer = std::io::BufWriter::new(file);

    let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    canvas
        .write_with_encoder(encoder)
        .map_err(|e| io_error(e.to_string()))?;

    writer.flush().map_err(|e| io_error(e.to_string()))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("contact_sheet.jpg"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
