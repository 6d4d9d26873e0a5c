use super::error::{ExtractError, SheetError};
use log::{debug, warn};
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 子程序結束狀態的輪詢間隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 已擷取的單幀影像資料（PNG 位元串）
///
/// 建立後不再變動，由擷取工作交棒給合成階段
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub timestamp_seconds: f64,
    pub data: Vec<u8>,
}

/// 單幀解碼介面
///
/// 生產環境由 [`FfmpegFrameDecoder`] 實作；
/// 測試以替身注入完成時間抖動與指定幀的失敗
pub trait FrameDecoder: Sync {
    fn decode_frame(
        &self,
        video_path: &Path,
        timestamp_seconds: f64,
    ) -> Result<Vec<u8>, ExtractError>;
}

/// 以 ffmpeg 子程序解碼單幀，PNG 編碼輸出至 stdout
///
/// 兩段式 seek：
/// 1. `-ss` 在 `-i` 前：快速跳轉到最近的關鍵幀
/// 2. `-ss` 在 `-i` 後：精準解碼到目標時間點
pub struct FfmpegFrameDecoder {
    timeout: Duration,
}

impl FfmpegFrameDecoder {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl FrameDecoder for FfmpegFrameDecoder {
    fn decode_frame(
        &self,
        video_path: &Path,
        timestamp_seconds: f64,
    ) -> Result<Vec<u8>, ExtractError> {
        let t0 = (timestamp_seconds - SEEK_MARGIN).max(0.0);
        let delta = timestamp_seconds - t0;

        debug!(
            "擷取幀: timestamp={timestamp_seconds:.2}s, seek={t0:.3}s+{delta:.3}s, {}",
            video_path.display()
        );

        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
        ];

        if t0 > 0.0 {
            args.push("-ss".to_string());
            args.push(format!("{t0:.3}"));
        }

        args.push("-i".to_string());
        args.push(video_path.to_string_lossy().to_string());

        if delta > 0.0 {
            args.push("-ss".to_string());
            args.push(format!("{delta:.3}"));
        }

        args.extend(
            [
                "-frames:v",
                "1",
                "-an",
                "-sn",
                "-dn",
                "-threads",
                "1",
                "-f",
                "image2pipe",
                "-vcodec",
                "png",
                "pipe:1",
            ]
            .map(ToString::to_string),
        );

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExtractError::Spawn(e.to_string()))?;

        // stdout 由獨立執行緒讀取，避免管線填滿造成子程序卡死
        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ExtractError::Spawn("無法取得子程序輸出管線".to_string()));
        };
        let reader = thread::spawn(move || {
            let mut data = Vec::new();
            stdout.read_to_end(&mut data).map(|_| data)
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(
                            "解碼逾時，終止子程序: {} @ {timestamp_seconds:.2}s",
                            video_path.display()
                        );
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ExtractError::Timeout(self.timeout.as_secs()));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ExtractError::Exit(e.to_string()));
                }
            }
        };

        let data = match reader.join() {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => return Err(ExtractError::Exit(format!("讀取輸出失敗: {e}"))),
            Err(_) => return Err(ExtractError::Exit("輸出讀取執行緒異常".to_string())),
        };

        if !status.success() {
            let mut stderr_text = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_string(&mut stderr_text);
            }
            let message = if stderr_text.trim().is_empty() {
                status.to_string()
            } else {
                stderr_text.trim().to_string()
            };
            return Err(ExtractError::Exit(message));
        }

        if data.is_empty() {
            return Err(ExtractError::Empty);
        }

        Ok(data)
    }
}

/// 平行擷取多個時間點的單幀影像
///
/// 以固定大小的執行緒池限制同時執行的解碼程序數量；
/// 額外的請求排隊等候，隨執行中的解碼完成逐一放行。
/// 輸出的第 i 個結果永遠對應第 i 個輸入時間點，與完成順序無關
/// （下游的網格擺放依位置索引，不依時間戳）。
/// 單幀失敗記錄在對應位置的結果中，不影響其他幀。
pub fn extract_frames(
    decoder: &dyn FrameDecoder,
    video_path: &Path,
    timestamps: &[f64],
    concurrency_limit: usize,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<Vec<Result<FrameBuffer, ExtractError>>, SheetError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency_limit.max(1))
        .build()
        .map_err(|e| SheetError::InvalidOptions(format!("無法建立擷取執行緒池: {e}")))?;

    Ok(pool.install(|| {
        timestamps
            .par_iter()
            .map(|&timestamp| {
                if shutdown_signal.load(Ordering::SeqCst) {
                    return Err(ExtractError::Cancelled);
                }

                decoder
                    .decode_frame(video_path, timestamp)
                    .map(|data| FrameBuffer {
                        timestamp_seconds: timestamp,
                        data,
                    })
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// 測試替身：回傳時間戳編碼成的位元串，完成時間帶抖動
    struct JitterDecoder {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_timestamps: Vec<f64>,
    }

    impl JitterDecoder {
        fn new(fail_timestamps: Vec<f64>) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail_timestamps,
            }
        }
    }

    impl FrameDecoder for JitterDecoder {
        fn decode_frame(
            &self,
            _video_path: &Path,
            timestamp_seconds: f64,
        ) -> Result<Vec<u8>, ExtractError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            // 完成順序抖動：不同幀睡不同時間
            let jitter_ms = 10 + (timestamp_seconds as u64 * 7) % 40;
            thread::sleep(Duration::from_millis(jitter_ms));

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self
                .fail_timestamps
                .iter()
                .any(|&f| (f - timestamp_seconds).abs() < 1e-9)
            {
                return Err(ExtractError::Exit("模擬解碼失敗".to_string()));
            }

            Ok(format!("frame@{timestamp_seconds}").into_bytes())
        }
    }

    fn no_shutdown() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn test_extract_preserves_input_order() {
        let decoder = JitterDecoder::new(Vec::new());
        let timestamps: Vec<f64> = (0..12).map(|i| f64::from(i) * 5.0).collect();

        let results = extract_frames(
            &decoder,
            Path::new("/test/video.mp4"),
            &timestamps,
            4,
            &no_shutdown(),
        )
        .unwrap();

        assert_eq!(results.len(), timestamps.len());
        for (i, result) in results.iter().enumerate() {
            let buffer = result.as_ref().unwrap();
            assert!((buffer.timestamp_seconds - timestamps[i]).abs() < 1e-9);
            assert_eq!(buffer.data, format!("frame@{}", timestamps[i]).into_bytes());
        }
    }

    #[test]
    fn test_extract_respects_concurrency_limit() {
        let decoder = JitterDecoder::new(Vec::new());
        let timestamps: Vec<f64> = (0..16).map(f64::from).collect();

        extract_frames(
            &decoder,
            Path::new("/test/video.mp4"),
            &timestamps,
            3,
            &no_shutdown(),
        )
        .unwrap();

        assert!(decoder.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_extract_isolates_per_frame_failures() {
        let decoder = JitterDecoder::new(vec![10.0, 25.0]);
        let timestamps = vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0];

        let results = extract_frames(
            &decoder,
            Path::new("/test/video.mp4"),
            &timestamps,
            2,
            &no_shutdown(),
        )
        .unwrap();

        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
        assert!(results[3].is_ok());
        assert!(results[4].is_ok());
        assert!(results[5].is_err());
    }

    #[test]
    fn test_extract_cancelled_by_shutdown_signal() {
        let decoder = JitterDecoder::new(Vec::new());
        let shutdown = Arc::new(AtomicBool::new(true));

        let results = extract_frames(
            &decoder,
            Path::new("/test/video.mp4"),
            &[0.0, 1.0, 2.0],
            2,
            &shutdown,
        )
        .unwrap();

        assert!(
            results
                .iter()
                .all(|r| matches!(r, Err(ExtractError::Cancelled)))
        );
    }

    #[test]
    fn test_extract_empty_timestamps() {
        let decoder = JitterDecoder::new(Vec::new());
        let results = extract_frames(
            &decoder,
            Path::new("/test/video.mp4"),
            &[],
            3,
            &no_shutdown(),
        )
        .unwrap();
        assert!(results.is_empty());
    }
}
