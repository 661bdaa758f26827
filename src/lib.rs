pub mod amount;
pub mod commands;
pub mod epoch_file;
pub mod error;
pub mod hash;
pub mod logging;
pub mod public_key;
pub mod signature;
#[cfg(test)]
mod test_fixtures;
pub mod transaction;
pub mod tx_handler;
pub mod utxo_pool;
pub mod validation;

pub use self::{
    amount::*, epoch_file::*, error::*, hash::*, logging::*, public_key::*, signature::*,
    transaction::*, tx_handler::*, utxo_pool::*, validation::*,
};
