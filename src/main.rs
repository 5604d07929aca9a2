use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{self, format_err, Context};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use qcutils::interfaces::cli::{log_heading, Cli, Command};
use qcutils::interfaces::input::Input;
use qcutils::interfaces::InputHandle;
use qcutils::io::{read_qcutils_yaml, write_qcutils_yaml};

/// Configures `log4rs` so that the `qcutils-output` logger writes to the standard output and,
/// if an output stem is given, to `<stem>.out`. All other log records at warning level or above
/// go to the standard error.
fn setup_logging(output: Option<&Path>) -> Result<(), anyhow::Error> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
        .build();
    let mut config_builder = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut output_appenders = vec!["stdout"];

    if let Some(stem) = output {
        let mut filename = OsString::from(stem.as_os_str());
        filename.push(".out");
        let filename = PathBuf::from(filename);
        let output_file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .append(false)
            .build(&filename)
            .with_context(|| format!("Unable to create output file `{}`", filename.display()))?;
        config_builder =
            config_builder.appender(Appender::builder().build("output_file", Box::new(output_file)));
        output_appenders.push("output_file");
    }

    let config = config_builder
        .logger(
            Logger::builder()
                .appenders(output_appenders)
                .additive(false)
                .build("qcutils-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .map_err(|err| format_err!(err))?;
    log4rs::init_config(config).map_err(|err| format_err!(err))?;
    Ok(())
}

/// Reads a YAML input file and runs every section it specifies.
fn run(config: &Path) -> Result<(), anyhow::Error> {
    let inp = read_qcutils_yaml::<Input, _>(config)
        .with_context(|| format!("Unable to read input file `{}`", config.display()))?;
    inp.handle()
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { config, output } => {
            if let Err(err) = setup_logging(output.as_deref()) {
                eprintln!("Error: {err:?}");
                process::exit(1);
            }
            log_heading();
            if let Err(err) = run(&config) {
                log::error!(target: "qcutils-output", "Error: {err:?}");
                process::exit(1);
            }
        }
        Command::Template { name } => {
            if let Err(err) = write_qcutils_yaml(&name, &Input::default()) {
                eprintln!("Error: {err:?}");
                process::exit(1);
            }
            println!(
                "Input template written to {}.",
                name.with_extension("yml").display()
            );
        }
    }
}
