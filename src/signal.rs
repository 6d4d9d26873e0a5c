use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 建立 Ctrl-C 中斷旗標
///
/// 擷取工作與批次迴圈都會輪詢這個旗標，收到訊號後安全收尾
#[must_use]
pub fn setup_shutdown_signal() -> Arc<AtomicBool> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        eprintln!("\n收到中斷訊號，完成目前工作後停止...");
    })
    .expect("無法設定 Ctrl-C 處理器");

    shutdown_signal
}
