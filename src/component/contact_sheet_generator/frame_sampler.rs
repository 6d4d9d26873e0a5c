/// 計算擷取時間點
///
/// 將影片長度等分為 rows * cols 段，取每段起點（秒數無條件捨去）。
/// 時間點依最終網格位置排列（由左至右、由上至下），
/// 相同輸入永遠產生相同序列。
#[must_use]
pub fn sample_timestamps(duration_seconds: f64, rows: u32, cols: u32) -> Vec<f64> {
    let total_frames = (rows as usize) * (cols as usize);
    if total_frames == 0 {
        return Vec::new();
    }

    let interval = duration_seconds.max(0.0) / total_frames as f64;

    (0..total_frames)
        .map(|i| (i as f64 * interval).floor())
        .collect()
}
