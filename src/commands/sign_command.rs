use crate::{EpochFile, Keypair, Transaction, TransactionError, UtxoPool};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct SignCliOptions {
    epoch: PathBuf,
    secret: String,
    output: Option<PathBuf>,
}

impl SignCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            epoch: matches
                .value_of("epoch")
                .map(PathBuf::from)
                .ok_or("Missing epoch file")?,
            secret: matches
                .value_of("secret")
                .map(str::to_string)
                .ok_or("Missing secret key")?,
            output: matches.value_of("output").map(PathBuf::from),
        })
    }
}

pub fn sign_command() -> Command<'static> {
    Command::new("sign")
        .version("0.1")
        .about("Signs every input of an epoch file that spends a pool UTXO owned by the key.")
        .arg(
            Arg::new("epoch")
                .short('e')
                .long("epoch")
                .value_name("FILE")
                .help("JSON epoch file whose candidate transactions are signed.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("secret")
                .long("secret")
                .value_name("HEX")
                .help("Hex-encoded ed25519 secret key, as printed by keygen.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the signed epoch. Defaults to overwriting the input file.")
                .takes_value(true)
                .required(false),
        )
}

pub fn run_sign_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SignCliOptions::parse(matches)?;
    let keypair = Keypair::from_secret_hex(&options.secret)?;

    let (pool, mut transactions) = EpochFile::read(&options.epoch)?.into_epoch()?;
    let signed = sign_owned_inputs(&pool, &mut transactions, &keypair)?;

    let output = options.output.as_ref().unwrap_or(&options.epoch);
    EpochFile::from_epoch(&pool, &transactions).write(output)?;
    println!(
        "Signed {} input(s) for {}, wrote: {}",
        signed,
        keypair.public_key(),
        output.display()
    );
    Ok(())
}

/// Signs each input that claims a UTXO in `pool` owned by `keypair`, returning how many.
///
/// Signing changes a transaction's id, so a chained transaction has to be built against
/// its parent after the parent is fully signed.
fn sign_owned_inputs(
    pool: &UtxoPool,
    transactions: &mut [Transaction],
    keypair: &Keypair,
) -> Result<usize, TransactionError> {
    let public_key = keypair.public_key();
    let mut signed = 0;
    for transaction in transactions.iter_mut() {
        let owned = transaction
            .inputs()
            .iter()
            .enumerate()
            .filter(|(_, input)| {
                pool.get_output(&input.utxo())
                    .map_or(false, |output| *output.owner() == public_key)
            })
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        for index in owned {
            transaction.sign_input(index, keypair)?;
            signed += 1;
        }
    }
    Ok(signed)
}
