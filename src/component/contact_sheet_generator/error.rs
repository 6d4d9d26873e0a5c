use std::path::PathBuf;
use thiserror::Error;

/// 單一幀擷取失敗
///
/// 局部錯誤：該格留白，不中斷其他幀，也不會讓整次生成失敗
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("無法啟動解碼程序: {0}")]
    Spawn(String),

    #[error("解碼程序異常結束: {0}")]
    Exit(String),

    #[error("解碼逾時（超過 {0} 秒）")]
    Timeout(u64),

    #[error("解碼程序未輸出任何影像資料")]
    Empty,

    #[error("操作已取消")]
    Cancelled,
}

/// 整次預覽圖生成的致命錯誤
///
/// 任何一項發生時該支影片的生成即告失敗，但不影響批次中的其他影片
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("無效的生成參數: {0}")]
    InvalidOptions(String),

    #[error("無法取得影片長度: {0}")]
    Probe(String),

    #[error("所有幀皆擷取失敗，無法產生預覽圖")]
    NoFramesAvailable,

    #[error("無法寫入預覽圖 {path}: {message}")]
    CompositeIo { path: PathBuf, message: String },
}
