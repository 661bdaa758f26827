use crate::{Amount, Utxo};
use thiserror::Error;

/// The reason a transaction is not valid against the current pool.
///
/// A rejection is an expected outcome of validation, not a failure of the system.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Rejection {
    #[error("Input {input_index} claims UTXO {utxo} which is not in the pool")]
    MissingUtxo { input_index: usize, utxo: Utxo },

    #[error("Input {input_index} spending UTXO {utxo} carries no signature")]
    MissingSignature { input_index: usize, utxo: Utxo },

    #[error("Input {input_index} signature does not match the owner of UTXO {utxo}")]
    InvalidSignature { input_index: usize, utxo: Utxo },

    #[error("Input {input_index} claims UTXO {utxo} which an earlier input already claims")]
    DoubleSpend { input_index: usize, utxo: Utxo },

    #[error("Output {output_index} has negative amount: {amount}")]
    NegativeOutput { output_index: usize, amount: Amount },

    #[error("Outputs total {outputs} exceeds inputs total {inputs}")]
    Overspend { inputs: Amount, outputs: Amount },

    #[error("Sum of {0} amounts overflows")]
    ValueOverflow(&'static str),
}

/// Misuse of the transaction construction API.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Input index {index} is out of range for a transaction with {num_inputs} inputs")]
    InputIndexOutOfRange { index: usize, num_inputs: usize },

    #[error("A transaction cannot have {0} outputs, at most u32::MAX are addressable")]
    TooManyOutputs(usize),

    #[error("Failed to encode transaction: {0}")]
    Encoding(#[from] bincode::Error),
}
