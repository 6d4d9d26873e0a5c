use super::frame_extractor::FfmpegFrameDecoder;
use super::pipeline::generate_contact_sheet;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{FfprobeDurationProbe, scan_video_files, validate_directory_exists};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 批次生成結果
#[derive(Debug)]
pub struct GenerationResult {
    pub total_videos: usize,
    pub successful: usize,
    pub failed: usize,
}

/// 預覽圖生成器
///
/// 掃描資料夾內的影片檔案，為每支影片產生一張網格預覽圖。
/// 單支影片失敗只記錄並計數，不中斷批次。
pub struct ContactSheetGenerator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ContactSheetGenerator {
    #[must_use]
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    /// 執行批次生成
    ///
    /// `input_path` 為 None 時以互動方式詢問資料夾路徑
    pub fn run(&mut self, input_path: Option<&str>) -> Result<GenerationResult> {
        println!("{}", style("=== 影片預覽圖生成 ===").cyan().bold());

        let input = match input_path {
            Some(path) => path.trim().to_string(),
            None => self.prompt_input_path()?,
        };
        let input_dir = PathBuf::from(&input);
        validate_directory_exists(&input_dir)?;

        println!("{}", style("掃描影片檔案中...").dim());
        let video_files = scan_video_files(&input_dir, &self.config.settings)?;

        if video_files.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(GenerationResult {
                total_videos: 0,
                successful: 0,
                failed: 0,
            });
        }

        println!(
            "{}",
            style(format!(
                "找到 {} 個影片檔案，依檔案大小排序（由小到大）",
                video_files.len()
            ))
            .green()
        );

        self.remember_input_path(&input);

        let result = self.process_videos(&video_files);
        self.print_summary(&result);

        Ok(result)
    }

    fn prompt_input_path(&self) -> Result<String> {
        let mut prompt = Input::<String>::new().with_prompt("請輸入影片資料夾路徑");
        if let Some(recent) = self.config.settings.recent_paths.first() {
            prompt = prompt.default(recent.clone());
        }
        let path: String = prompt.interact_text()?;
        Ok(path.trim().to_string())
    }

    fn remember_input_path(&mut self, path: &str) {
        add_recent_path(&mut self.config.settings, path);
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存設定: {e:#}");
        }
    }

    fn process_videos(&self, videos: &[crate::tools::VideoFileInfo]) -> GenerationResult {
        let settings = &self.config.settings.contact_sheet;
        let probe = FfprobeDurationProbe;
        let decoder = FfmpegFrameDecoder::new(Duration::from_secs(settings.extract_timeout_secs));

        let progress_bar = ProgressBar::new(videos.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message("生成預覽圖中...");

        let mut successful = 0;
        let mut failed = 0;

        for video in videos {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                break;
            }

            let video_name = video
                .path
                .file_name()
                .map_or_else(|| "?".to_string(), |n| n.to_string_lossy().to_string());

            match generate_contact_sheet(
                &probe,
                &decoder,
                &video.path,
                None,
                settings,
                &self.shutdown_signal,
            ) {
                Ok(output_path) => {
                    progress_bar.println(format!(
                        "  {} {video_name} -> {}",
                        style("✓").green(),
                        output_path.display()
                    ));
                    successful += 1;
                }
                Err(e) => {
                    error!("處理影片失敗 {video_name}: {e}");
                    progress_bar.println(format!("  {} {video_name}: {e}", style("✗").red()));
                    failed += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        GenerationResult {
            total_videos: videos.len(),
            successful,
            failed,
        }
    }

    fn print_summary(&self, result: &GenerationResult) {
        println!();
        println!("{}", style("=== 預覽圖生成摘要 ===").cyan().bold());
        println!("  總計: {} 個影片", result.total_videos);
        println!("  成功: {} 個", style(result.successful).green());

        if result.failed > 0 {
            println!("  失敗: {} 個", style(result.failed).red());
        }

        info!(
            "預覽圖生成完成 - 成功: {}, 失敗: {}",
            result.successful, result.failed
        );
    }
}
