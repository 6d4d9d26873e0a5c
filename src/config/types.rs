use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const MAX_RECENT_PATHS: usize = 5;

/// 預覽圖生成設定
///
/// 取代舊版全域可變設定物件，由呼叫端明確傳入管線
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSheetSettings {
    /// 網格列數
    pub rows: u32,
    /// 網格欄數
    pub cols: u32,
    /// 輸出圖片寬度（像素）
    pub output_width: u32,
    /// 同時執行的解碼程序數量上限
    pub concurrency_limit: usize,
    /// 是否在每格下方顯示擷取時間戳
    pub with_timestamp: bool,
    /// 單幀解碼逾時（秒）
    pub extract_timeout_secs: u64,
    /// 標籤字型檔路徑，未指定時嘗試常見系統字型
    pub font_path: Option<PathBuf>,
}

impl Default for ContactSheetSettings {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            output_width: 2048,
            concurrency_limit: 3,
            with_timestamp: true,
            extract_timeout_secs: 30,
            font_path: None,
        }
    }
}

/// 使用者設定（settings.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub contact_sheet: ContactSheetSettings,
    pub video_extensions: Vec<String>,
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            contact_sheet: ContactSheetSettings::default(),
            video_extensions: [
                ".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm", ".ts", ".m2ts",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            recent_paths: Vec::new(),
        }
    }
}

impl UserSettings {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_extensions
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
