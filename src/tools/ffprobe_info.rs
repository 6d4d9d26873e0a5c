use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// 影片長度探測介面
///
/// 生產環境由 [`FfprobeDurationProbe`] 實作，測試以替身注入固定長度
pub trait DurationProbe: Sync {
    fn duration_seconds(&self, path: &Path) -> Result<f64>;
}

/// 使用 ffprobe 取得影片長度
pub struct FfprobeDurationProbe;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

impl DurationProbe for FfprobeDurationProbe {
    fn duration_seconds(&self, path: &Path) -> Result<f64> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffprobe 執行失敗: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_duration(&stdout).with_context(|| format!("無法取得影片長度: {}", path.display()))
    }
}

/// 解析 ffprobe JSON 輸出中的影片長度
///
/// 優先從 format 取得，其次從視訊串流
fn parse_duration(json: &str) -> Result<f64> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let duration = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or_else(|| {
            probe.streams.as_ref().and_then(|streams| {
                streams
                    .iter()
                    .find(|s| s.codec_type.as_deref() == Some("video"))
                    .and_then(|s| s.duration.as_ref())
            })
        })
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| anyhow::anyhow!("輸出中沒有影片長度欄位"))?;

    if !duration.is_finite() || duration < 0.0 {
        bail!("影片長度無效: {duration}");
    }

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_from_format() {
        let json = r#"{"format":{"duration":"90.5"},"streams":[]}"#;
        assert!((parse_duration(json).unwrap() - 90.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_from_video_stream() {
        let json = r#"{
            "streams": [
                {"codec_type": "audio", "duration": "10.0"},
                {"codec_type": "video", "duration": "42.25"}
            ]
        }"#;
        assert!((parse_duration(json).unwrap() - 42.25).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_missing() {
        assert!(parse_duration(r#"{"format":{},"streams":[]}"#).is_err());
        assert!(parse_duration("not json").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_negative() {
        let json = r#"{"format":{"duration":"-3.0"}}"#;
        assert!(parse_duration(json).is_err());
    }
}
