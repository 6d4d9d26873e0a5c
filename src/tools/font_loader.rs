use ab_glyph::FontVec;
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 常見系統字型位置（依序嘗試）
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// 載入標題與時間戳使用的標籤字型
///
/// 優先使用設定中指定的字型檔，否則依序嘗試常見系統字型。
/// 找不到字型時回傳 None，預覽圖仍會生成，只是不含文字標籤。
#[must_use]
pub fn load_label_font(font_path: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = font_path {
        match load_font_file(path) {
            Ok(font) => return Some(font),
            Err(e) => warn!("無法載入指定字型 {}: {e:#}", path.display()),
        }
    }

    for candidate in FONT_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists()
            && let Ok(font) = load_font_file(path)
        {
            return Some(font);
        }
    }

    warn!("找不到可用字型，預覽圖將不含文字標籤");
    None
}

fn load_font_file(path: &Path) -> Result<FontVec> {
    let bytes =
        fs::read(path).with_context(|| format!("無法讀取字型檔: {}", path.display()))?;
    FontVec::try_from_vec(bytes).with_context(|| format!("無法解析字型檔: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_font_file_missing() {
        assert!(load_font_file(Path::new("/nonexistent/font.ttf")).is_err());
    }

    #[test]
    fn test_load_label_font_invalid_path_falls_back() {
        // 指定路徑無效時不應 panic，最多回傳 None 或系統字型
        let _ = load_label_font(Some(Path::new("/nonexistent/font.ttf")));
    }
}
