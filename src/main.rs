use clap::Command;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("utxoledger")
        .about("UTXO ledger transaction admission tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(utxoledger_lib::commands::admit_command())
        .subcommand(utxoledger_lib::commands::demo_command())
        .subcommand(utxoledger_lib::commands::keygen_command())
        .subcommand(utxoledger_lib::commands::sign_command())
        .get_matches();

    match matches.subcommand() {
        Some(("admit", matches)) => utxoledger_lib::commands::run_admit_command(matches),
        Some(("demo", matches)) => utxoledger_lib::commands::run_demo_command(matches),
        Some(("keygen", matches)) => utxoledger_lib::commands::run_keygen_command(matches),
        Some(("sign", matches)) => utxoledger_lib::commands::run_sign_command(matches),
        _ => unreachable!("clap reports help when no subcommand is given"),
    }
}
