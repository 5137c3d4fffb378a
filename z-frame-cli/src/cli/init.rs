use super::AnyResult;
use z_frame::Settings;

#[derive(clap::Args)]
pub(super) struct InitCfg {
    /// Output path of the settings (in RON format)
    file: std::path::PathBuf,
    /// Use the factory limits of the wheelchair
    #[clap(long)]
    reset: bool,
}

pub(super) fn init(cfg: InitCfg) -> AnyResult {
    let InitCfg { mut file, reset } = cfg;
    let ext = file.extension().and_then(std::ffi::OsStr::to_str);
    if !matches!(ext, Some("ron")) {
        file.set_extension("ron");
    }
    let settings = if reset { Settings::reset() } else { Settings::default() };
    let s = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default())?;
    std::fs::write(&file, s)?;
    println!("Write to: {}", file.display());
    Ok(())
}
