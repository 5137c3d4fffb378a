mod eval;
mod init;
mod logger;
mod run;

const APP_NAME: &str = env!("CARGO_BIN_NAME");

type AnyResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(clap::Parser)]
#[clap(name = APP_NAME, version, author, about)]
pub(crate) struct Entry {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Replay input scripts without a view
    Run(run::RunCfg),
    /// Evaluate a formula with the given angles
    Eval(eval::EvalCfg),
    /// Write the default settings file
    Init(init::InitCfg),
}

impl Entry {
    pub(crate) fn main() {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        register_panic_hook();
        let res = match entry.cmd {
            Cmd::Run(cfg) => run::run(cfg),
            Cmd::Eval(cfg) => eval::eval(cfg),
            Cmd::Init(cfg) => init::init(cfg),
        };
        if let Err(e) = res {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn register_panic_hook() {
    // Print panic messages without stack trace
    std::panic::set_hook(Box::new(|info| {
        match info.payload().downcast_ref::<&str>() {
            Some(s) => eprintln!("{s}"),
            None => eprintln!("{info}"),
        }
        std::process::exit(1);
    }));
}
