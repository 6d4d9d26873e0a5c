/// 標籤帶狀區域的上下留白（像素）
const LABEL_PADDING: u32 = 10;

/// 預覽圖畫布幾何
///
/// 由首張成功擷取幀的原始解析度與輸出寬度一次算出，之後不再變動
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub cell_width: u32,
    pub cell_height: u32,
    pub title_bar_height: u32,
    pub timestamp_label_height: u32,
    pub row_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub title_font_size: u32,
    pub timestamp_font_size: u32,
}

/// 計算畫布幾何
///
/// 所有格子共用同一尺寸；只有首張幀的長寬比會影響 cell_height，
/// 後續幀即使解析度不同也會縮放至相同格子（與舊版行為一致）。
/// 字型大小隨縮放比例調整，任何輸出寬度下標籤都保持可讀。
#[must_use]
pub fn compute_geometry(
    first_frame_width: u32,
    first_frame_height: u32,
    output_width: u32,
    rows: u32,
    cols: u32,
    with_timestamp: bool,
) -> CanvasGeometry {
    let cell_width = (f64::from(output_width) / f64::from(cols)).round() as u32;
    let scale_ratio = f64::from(cell_width) / f64::from(first_frame_width.max(1));
    let cell_height = (scale_ratio * f64::from(first_frame_height)).round() as u32;

    let title_font_size = (scale_ratio * 72.0).round() as u32;
    let timestamp_font_size = (scale_ratio * 48.0).round() as u32;

    let title_bar_height = title_font_size + LABEL_PADDING;
    let timestamp_label_height = if with_timestamp {
        timestamp_font_size + LABEL_PADDING
    } else {
        0
    };
    let row_height = cell_height + timestamp_label_height;

    CanvasGeometry {
        cell_width,
        cell_height,
        title_bar_height,
        timestamp_label_height,
        row_height,
        canvas_width: cell_width * cols,
        canvas_height: rows * row_height + title_bar_height,
        title_font_size,
        timestamp_font_size,
    }
}

/// 依索引取得格子左上角座標（列優先順序：index -> (index / cols, index % cols)）
#[must_use]
pub fn cell_origin(geometry: &CanvasGeometry, index: usize, cols: u32) -> (u32, u32) {
    let row = index as u32 / cols;
    let col = index as u32 % cols;
    (
        col * geometry.cell_width,
        row * geometry.row_height + geometry.title_bar_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_width_equals_cells() {
        let geometry = compute_geometry(1920, 1080, 2048, 4, 4, true);
        assert_eq!(geometry.canvas_width, geometry.cell_width * 4);
        assert_eq!(geometry.cell_width, 512);
    }

    #[test]
    fn test_cell_preserves_first_frame_aspect_ratio() {
        let geometry = compute_geometry(1920, 1080, 2048, 4, 4, true);

        let cell_ratio = f64::from(geometry.cell_height) / f64::from(geometry.cell_width);
        let frame_ratio = 1080.0 / 1920.0;
        assert!((cell_ratio - frame_ratio).abs() < 0.01);
    }

    #[test]
    fn test_font_sizes_scale_with_output_width() {
        // cell_width 640 / 原始寬 1280 -> scale 0.5
        let geometry = compute_geometry(1280, 720, 1920, 2, 3, true);
        assert_eq!(geometry.cell_width, 640);
        assert_eq!(geometry.title_font_size, 36);
        assert_eq!(geometry.timestamp_font_size, 24);
        assert_eq!(geometry.title_bar_height, 46);
    }

    #[test]
    fn test_canvas_height_with_and_without_timestamp() {
        let with = compute_geometry(1280, 720, 1280, 3, 2, true);
        let without = compute_geometry(1280, 720, 1280, 3, 2, false);

        assert_eq!(with.timestamp_label_height, with.timestamp_font_size + 10);
        assert_eq!(without.timestamp_label_height, 0);
        assert_eq!(without.row_height, without.cell_height);
        assert_eq!(
            with.canvas_height,
            3 * with.row_height + with.title_bar_height
        );
        assert_eq!(
            with.canvas_height - without.canvas_height,
            3 * with.timestamp_label_height
        );
    }

    #[test]
    fn test_geometry_deterministic() {
        let a = compute_geometry(854, 480, 2048, 4, 4, true);
        let b = compute_geometry(854, 480, 2048, 4, 4, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cell_origin_row_major() {
        let geometry = compute_geometry(640, 360, 1920, 3, 3, false);

        assert_eq!(cell_origin(&geometry, 0, 3), (0, geometry.title_bar_height));
        assert_eq!(
            cell_origin(&geometry, 2, 3),
            (2 * geometry.cell_width, geometry.title_bar_height)
        );
        assert_eq!(
            cell_origin(&geometry, 4, 3),
            (
                geometry.cell_width,
                geometry.row_height + geometry.title_bar_height
            )
        );
        assert_eq!(
            cell_origin(&geometry, 8, 3),
            (
                2 * geometry.cell_width,
                2 * geometry.row_height + geometry.title_bar_height
            )
        );
    }
}
