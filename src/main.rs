use anyhow::Result;
use console::style;
use log::warn;
use video_contact_sheet::component::contact_sheet_generator::ContactSheetGenerator;
use video_contact_sheet::config::Config;
use video_contact_sheet::init;
use video_contact_sheet::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();
    let shutdown_signal = setup_shutdown_signal();
    let config = Config::new()?;

    // 資料夾路徑可由第一個參數指定，未指定時互動詢問
    let input_arg = std::env::args().nth(1);

    let mut generator = ContactSheetGenerator::new(config, shutdown_signal);
    match generator.run(input_arg.as_deref()) {
        Ok(result) => {
            if result.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            warn!("程式錯誤: {e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            std::process::exit(1);
        }
    }
}
