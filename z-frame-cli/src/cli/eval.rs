use super::AnyResult;
use z_frame::{formula::Formula, Angles};

#[derive(clap::Args)]
pub(super) struct EvalCfg {
    /// Formula over angle1, angle2 and angle3
    formula: String,
    /// Middle link angle
    #[clap(long, default_value_t = Angles::default().a1, allow_negative_numbers = true)]
    angle1: f64,
    /// Seat-pan angle
    #[clap(long, default_value_t = Angles::default().a2, allow_negative_numbers = true)]
    angle2: f64,
    /// Backrest angle
    #[clap(long, default_value_t = Angles::default().a3, allow_negative_numbers = true)]
    angle3: f64,
}

pub(super) fn eval(cfg: EvalCfg) -> AnyResult {
    let EvalCfg { formula, angle1, angle2, angle3 } = cfg;
    let f = Formula::parse(&formula)?;
    let v = f.eval(&Angles::new(angle1, angle2, angle3))?;
    println!("angle1={angle1}, angle2={angle2}, angle3={angle3}");
    println!("{f} = {v}");
    Ok(())
}
