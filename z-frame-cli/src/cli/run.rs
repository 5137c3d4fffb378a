use super::{logger::Logger, AnyResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use z_frame::{csv::dump_csv, Input, Settings, Sim};

#[derive(clap::Args)]
pub(super) struct RunCfg {
    /// Input scripts (in RON format)
    #[clap(required = true)]
    scripts: Vec<PathBuf>,
    /// Settings file (in RON format), default to the built-in settings
    #[clap(long)]
    settings: Option<PathBuf>,
    /// Dump the recorded samples beside each script (in CSV format)
    #[clap(long)]
    csv: bool,
    /// Ticks per second
    #[clap(long, default_value_t = 60.)]
    fps: f64,
}

/// Input events keyed by their tick.
#[derive(serde::Deserialize)]
struct Script {
    ticks: u64,
    #[serde(default)]
    events: Vec<(u64, Input)>,
}

#[derive(serde::Serialize)]
struct Report {
    ticks: u64,
    time: f64,
    driver: &'static str,
    angles: [f64; 3],
    seat_pan: f64,
    at_limit: [bool; 3],
    samples: usize,
    ignored: usize,
    failed: usize,
    binding: Option<String>,
}

pub(super) fn run(cfg: RunCfg) -> AnyResult {
    let RunCfg { scripts, settings, csv, fps } = cfg;
    if fps.is_nan() || fps <= 0. {
        return Err(format!("invalid fps: {fps}").into());
    }
    let settings = match settings {
        Some(path) => ron::de::from_reader(std::fs::File::open(path)?)?,
        None => Settings::default(),
    };
    println!("fps={fps}, csv={csv}");
    let mut failed = 0;
    for path in scripts {
        if let Err(e) = replay(&path, settings, fps, csv) {
            eprintln!("[{}] {e}", path.display());
            failed += 1;
        }
    }
    if failed > 0 {
        Err(format!("{failed} script(s) failed").into())
    } else {
        Ok(())
    }
}

fn replay(path: &Path, settings: Settings, fps: f64, csv: bool) -> AnyResult {
    let Script { ticks, mut events } = ron::de::from_reader(std::fs::File::open(path)?)?;
    events.sort_by_key(|(tick, _)| *tick);
    let title = path.file_stem().and_then(OsStr::to_str).unwrap_or("script");
    const STYLE: &str = "[{prefix}] {elapsed_precise} {wide_bar} {pos}/{len} {msg}";
    let pb = ProgressBar::new(ticks);
    pb.set_style(ProgressStyle::with_template(STYLE)?);
    pb.set_prefix(title.to_string());
    let dt = 1000. / fps;
    let mut sim = Sim::with_settings(settings);
    let mut events = events.into_iter().peekable();
    let (mut ignored, mut failed) = (0, 0);
    for tick in 0..ticks {
        while let Some((_, input)) = events.next_if(|(t, _)| *t <= tick) {
            match sim.handle(input) {
                Ok(true) => (),
                Ok(false) => ignored += 1,
                Err(e) => {
                    pb.println(format!("[{title}] tick {tick}: {e}"));
                    failed += 1;
                }
            }
        }
        if let Err(e) = sim.tick(tick as f64 * dt) {
            pb.println(format!("[{title}] tick {tick}: {e}"));
            failed += 1;
        }
        pb.set_message(sim.driver().name());
        pb.inc(1);
    }
    pb.finish_and_clear();
    // Events after the last tick are never played
    ignored += events.count();
    let angles = *sim.angles();
    let report = Report {
        ticks,
        time: ticks.saturating_sub(1) as f64 * dt,
        driver: sim.driver().name(),
        angles: angles.into(),
        seat_pan: angles.seat_pan(),
        at_limit: sim.at_limit(),
        samples: sim.samples().len(),
        ignored,
        failed,
        binding: sim.binding().map(|b| format!("{}={}", b.target, b.formula)),
    };
    let mut log = Logger::new(std::io::stdout().lock());
    log.top_title(title)?;
    log.log(report)?;
    log.title("pose")?;
    log.log(sim.pose())?;
    log.title("rules")?;
    log.log(sim.rules())?;
    log.flush()?;
    if csv {
        let out = path.with_extension("csv");
        std::fs::write(&out, dump_csv(sim.samples())?)?;
        println!("Samples to: {}", out.display());
    }
    Ok(())
}
