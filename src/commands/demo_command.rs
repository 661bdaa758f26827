use crate::commands::{enable_logging_arg, parse_strategy, print_outcome, print_pool, strategy_arg};
use crate::{
    init_logging, AdmissionStrategy, Amount, EpochFile, Keypair, OutputIndex, Sha256, Transaction,
    TransactionError, TransactionId, TransactionInput, TransactionOutput, TxHandler, Utxo,
    UtxoPool,
};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct DemoCliOptions {
    output: Option<PathBuf>,
    strategy: AdmissionStrategy,
    enable_logging: bool,
}

impl DemoCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            output: matches.value_of("output").map(PathBuf::from),
            strategy: parse_strategy(matches)?,
            enable_logging: matches.is_present("enable_logging"),
        })
    }
}

pub fn demo_command() -> Command<'static> {
    Command::new("demo")
        .version("0.1")
        .about("Admits a sample batch with a double-spend and a chained transaction.")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("If set, the sample epoch is written here so it can be replayed with admit.")
                .takes_value(true)
                .required(false),
        )
        .arg(strategy_arg())
        .arg(enable_logging_arg())
}

pub fn run_demo_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = DemoCliOptions::parse(matches)?;
    init_logging(options.enable_logging);

    let (pool, candidates) = sample_epoch()?;
    if let Some(output) = &options.output {
        EpochFile::from_epoch(&pool, &candidates).write(output)?;
        println!("Wrote the sample epoch to: {}", output.display());
    }

    print_pool(&pool);
    let mut handler = TxHandler::new(&pool);
    let outcome = handler.run_epoch(&candidates, options.strategy);
    print_outcome(&outcome, options.strategy);
    print_pool(handler.pool());
    Ok(())
}

/// Alice owns 10 coins. The batch holds, in order:
///   - Bob paying Carol 5 out of what Alice sends him, listed before Alice's payment,
///   - Alice paying Bob 7 and keeping 3 as change,
///   - Alice paying Carol 3 out of the same coins, a double-spend.
fn sample_epoch() -> Result<(UtxoPool, Vec<Transaction>), TransactionError> {
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let carol = Keypair::generate();

    let genesis = TransactionId::new(Sha256::digest(b"genesis"));
    let pool = vec![(
        Utxo::new(genesis, OutputIndex::new(0)),
        TransactionOutput::new(Amount::new(10), alice.public_key()),
    )]
    .into_iter()
    .collect::<UtxoPool>();

    let mut alice_to_bob = Transaction::new(
        vec![TransactionInput::new(genesis, OutputIndex::new(0))],
        vec![
            TransactionOutput::new(Amount::new(7), bob.public_key()),
            TransactionOutput::new(Amount::new(3), alice.public_key()),
        ],
    )?;
    alice_to_bob.sign_input(0, &alice)?;

    let mut alice_to_carol = Transaction::new(
        vec![TransactionInput::new(genesis, OutputIndex::new(0))],
        vec![TransactionOutput::new(Amount::new(3), carol.public_key())],
    )?;
    alice_to_carol.sign_input(0, &alice)?;

    let mut bob_to_carol = Transaction::new(
        vec![TransactionInput::new(*alice_to_bob.id(), OutputIndex::new(0))],
        vec![
            TransactionOutput::new(Amount::new(5), carol.public_key()),
            TransactionOutput::new(Amount::new(1), bob.public_key()),
        ],
    )?;
    bob_to_carol.sign_input(0, &bob)?;

    Ok((pool, vec![bob_to_carol, alice_to_bob, alice_to_carol]))
}
