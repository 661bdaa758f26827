use crate::commands::{enable_logging_arg, parse_strategy, print_outcome, print_pool, strategy_arg};
use crate::{init_logging, AdmissionStrategy, EpochFile, TxHandler};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct AdmitCliOptions {
    epoch: PathBuf,
    next_epoch: Option<PathBuf>,
    strategy: AdmissionStrategy,
    enable_logging: bool,
}

impl AdmitCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            epoch: matches
                .value_of("epoch")
                .map(PathBuf::from)
                .ok_or("Missing epoch file")?,
            next_epoch: matches.value_of("next_epoch").map(PathBuf::from),
            strategy: parse_strategy(matches)?,
            enable_logging: matches.is_present("enable_logging"),
        })
    }
}

pub fn admit_command() -> Command<'static> {
    Command::new("admit")
        .version("0.1")
        .about("Runs one epoch: admits a batch of transactions against a UTXO pool.")
        .arg(
            Arg::new("epoch")
                .short('e')
                .long("epoch")
                .value_name("FILE")
                .help("JSON file holding the starting pool and the candidate transactions.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("next_epoch")
                .long("next_epoch")
                .value_name("FILE")
                .help("If set, the resulting pool is written here as the next epoch's file.")
                .takes_value(true)
                .required(false),
        )
        .arg(strategy_arg())
        .arg(enable_logging_arg())
}

pub fn run_admit_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = AdmitCliOptions::parse(matches)?;
    init_logging(options.enable_logging);

    let (pool, candidates) = EpochFile::read(&options.epoch)?.into_epoch()?;
    let mut handler = TxHandler::new(&pool);
    let outcome = handler.run_epoch(&candidates, options.strategy);

    print_outcome(&outcome, options.strategy);
    print_pool(handler.pool());

    if let Some(next_epoch) = &options.next_epoch {
        EpochFile::from_epoch(handler.pool(), &[]).write(next_epoch)?;
        println!("Wrote the next epoch to: {}", next_epoch.display());
    }
    Ok(())
}
