use std::io;

use dispmode::cli::{run, Command, Opt};
use dispmode::SystemDisplaySettings;
use structopt::StructOpt;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opt = Opt::from_args();

    let command = Command::from_args(&opt.args);
    log::debug!("{:?}", command);

    let api = SystemDisplaySettings::new();
    run(&api, &command, &mut io::stdout().lock())?;

    Ok(())
}
