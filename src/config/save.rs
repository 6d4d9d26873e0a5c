use crate::config::load::SETTINGS_FILE;
use crate::config::types::{MAX_RECENT_PATHS, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    let path = Path::new(SETTINGS_FILE);
    let content = serde_json::to_string_pretty(settings).context("無法序列化設定")?;

    fs::write(path, content).with_context(|| format!("無法寫入設定檔: {}", path.display()))?;

    Ok(())
}

/// 更新最近使用的路徑
/// 將新路徑加入最前面，去重並限制數量
pub fn add_recent_path(settings: &mut UserSettings, path: &str) {
    settings.recent_paths.retain(|p| p != path);
    settings.recent_paths.insert(0, path.to_string());
    settings.recent_paths.truncate(MAX_RECENT_PATHS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_recent_path_dedup_and_limit() {
        let mut settings = UserSettings::default();

        for i in 0..8 {
            add_recent_path(&mut settings, &format!("/videos/{i}"));
        }
        assert_eq!(settings.recent_paths.len(), MAX_RECENT_PATHS);
        assert_eq!(settings.recent_paths[0], "/videos/7");

        // 重複路徑應移到最前面而非新增
        add_recent_path(&mut settings, "/videos/5");
        assert_eq!(settings.recent_paths[0], "/videos/5");
        assert_eq!(
            settings.recent_paths.iter().filter(|p| *p == "/videos/5").count(),
            1
        );
    }
}
