pub mod admit_command;
pub mod demo_command;
pub mod keygen_command;
pub mod sign_command;

pub use self::{admit_command::*, demo_command::*, keygen_command::*, sign_command::*};

use crate::{AdmissionStrategy, EpochOutcome, UtxoPool};
use clap::{Arg, ArgMatches};
use std::error::Error;

fn strategy_arg() -> Arg<'static> {
    Arg::new("strategy")
        .long("strategy")
        .value_name("STRATEGY")
        .help("How to choose among valid transactions: first-valid or highest-fee.")
        .takes_value(true)
        .required(false)
        .default_value("first-valid")
}

fn parse_strategy(matches: &ArgMatches) -> Result<AdmissionStrategy, Box<dyn Error>> {
    // Always present since `strategy_arg` has a default value.
    let strategy = matches.value_of("strategy").ok_or("Missing strategy")?;
    Ok(strategy.parse::<AdmissionStrategy>()?)
}

fn enable_logging_arg() -> Arg<'static> {
    Arg::new("enable_logging")
        .long("enable_logging")
        .help("If set, every accepted and rejected transaction is logged.")
        .takes_value(false)
        .required(false)
}

fn print_outcome(outcome: &EpochOutcome, strategy: AdmissionStrategy) {
    println!(
        "Accepted {} transaction(s) using {}:",
        outcome.accepted.len(),
        strategy
    );
    for transaction in &outcome.accepted {
        println!("  {}", transaction.id());
    }
    println!("Rejected {} transaction(s):", outcome.rejected.len());
    for (transaction, reason) in &outcome.rejected {
        println!("  {}: {}", transaction.id(), reason);
    }
}

fn print_pool(pool: &UtxoPool) {
    let mut utxos = pool.utxos().collect::<Vec<_>>();
    utxos.sort_by_key(|(utxo, _)| **utxo);
    println!("Pool holds {} UTXO(s):", utxos.len());
    for (utxo, output) in utxos {
        println!("  {} -> {}", utxo, output);
    }
}
