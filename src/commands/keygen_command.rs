use crate::Keypair;
use clap::{ArgMatches, Command};
use std::error::Error;

pub fn keygen_command() -> Command<'static> {
    Command::new("keygen")
        .version("0.1")
        .about("Generates an ed25519 key pair for owning and spending outputs.")
}

pub fn run_keygen_command(_matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let keypair = Keypair::generate();
    println!("secret: {}", keypair.secret_hex());
    println!("public: {}", keypair.public_key());
    Ok(())
}
