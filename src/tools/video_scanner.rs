use crate::config::UserSettings;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 遞迴掃描資料夾內的影片檔案，依檔案大小由小到大排序
pub fn scan_video_files(directory: &Path, settings: &UserSettings) -> Result<Vec<VideoFileInfo>> {
    let mut video_files: Vec<VideoFileInfo> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| settings.is_video_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    video_files.sort_by_key(|file| file.size);
    Ok(video_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_video_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.mp4"), vec![0u8; 300]).unwrap();
        fs::write(dir.path().join("small.mkv"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("note.txt"), b"not a video").unwrap();

        let settings = UserSettings::default();
        let files = scan_video_files(dir.path(), &settings).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].path.ends_with("small.mkv"));
        assert!(files[1].path.ends_with("big.mp4"));
        assert!(files[0].size <= files[1].size);
    }

    #[test]
    fn test_scan_video_files_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = UserSettings::default();
        let files = scan_video_files(dir.path(), &settings).unwrap();
        assert!(files.is_empty());
    }
}
