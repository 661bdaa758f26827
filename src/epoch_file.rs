use crate::{
    Amount, OutputIndex, PublicKey, Signature, Transaction, TransactionError, TransactionId,
    TransactionInput, TransactionOutput, Utxo, UtxoPool,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpochFileError {
    #[error("Failed to access epoch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed epoch file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} in epoch file: {reason}")]
    Field { field: &'static str, reason: String },

    #[error("UTXO {0} is listed more than once in the epoch pool")]
    DuplicateUtxo(Utxo),

    #[error("UTXO {utxo} in the epoch pool has negative amount: {amount}")]
    NegativeUtxoAmount { utxo: Utxo, amount: Amount },

    #[error("Invalid transaction in epoch file: {0}")]
    Transaction(#[from] TransactionError),
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct PoolEntry {
    pub tx_id: String,
    pub output_index: u32,
    pub amount: i64,
    pub owner: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct InputEntry {
    pub tx_id: String,
    pub output_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct OutputEntry {
    pub amount: i64,
    pub owner: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct TransactionEntry {
    pub inputs: Vec<InputEntry>,
    pub outputs: Vec<OutputEntry>,
}

/// The JSON form of one epoch: the pool it starts from and the candidate transactions.
/// Ids, keys and signatures are hex-encoded.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct EpochFile {
    pub pool: Vec<PoolEntry>,
    pub transactions: Vec<TransactionEntry>,
}

impl EpochFile {
    pub fn read(path: &Path) -> Result<Self, EpochFileError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), EpochFileError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn from_epoch(pool: &UtxoPool, transactions: &[Transaction]) -> Self {
        let mut pool = pool
            .utxos()
            .map(|(utxo, output)| PoolEntry {
                tx_id: utxo.tx_id().to_hex(),
                output_index: utxo.output_index().value(),
                amount: output.amount().value(),
                owner: output.owner().to_hex(),
            })
            .collect::<Vec<_>>();
        // Pool iteration order is arbitrary; sort so the file is reproducible.
        pool.sort_by(|a, b| (&a.tx_id, a.output_index).cmp(&(&b.tx_id, b.output_index)));

        let transactions = transactions
            .iter()
            .map(|transaction| TransactionEntry {
                inputs: transaction
                    .inputs()
                    .iter()
                    .map(|input| InputEntry {
                        tx_id: input.utxo_id().to_hex(),
                        output_index: input.output_index().value(),
                        signature: input.signature().map(Signature::to_hex),
                    })
                    .collect(),
                outputs: transaction
                    .outputs()
                    .iter()
                    .map(|output| OutputEntry {
                        amount: output.amount().value(),
                        owner: output.owner().to_hex(),
                    })
                    .collect(),
            })
            .collect();

        Self { pool, transactions }
    }

    /// Decodes the pool and the candidate transactions, in file order.
    ///
    /// Each UTXO may appear in the pool only once and never with a negative amount.
    pub fn into_epoch(self) -> Result<(UtxoPool, Vec<Transaction>), EpochFileError> {
        let mut pool = UtxoPool::new();
        for entry in self.pool {
            let utxo = Utxo::new(
                parse_field("tx_id", &entry.tx_id, TransactionId::from_hex)?,
                OutputIndex::new(entry.output_index),
            );
            let amount = Amount::new(entry.amount);
            if amount.is_negative() {
                return Err(EpochFileError::NegativeUtxoAmount { utxo, amount });
            }
            if pool.contains(&utxo) {
                return Err(EpochFileError::DuplicateUtxo(utxo));
            }
            let owner = parse_field("owner", &entry.owner, PublicKey::from_hex)?;
            pool.add_utxo(utxo, TransactionOutput::new(amount, owner));
        }

        let transactions = self
            .transactions
            .into_iter()
            .map(TransactionEntry::into_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((pool, transactions))
    }
}

impl TransactionEntry {
    fn into_transaction(self) -> Result<Transaction, EpochFileError> {
        let inputs = self
            .inputs
            .into_iter()
            .map(|entry| -> Result<TransactionInput, EpochFileError> {
                let input = TransactionInput::new(
                    parse_field("input tx_id", &entry.tx_id, TransactionId::from_hex)?,
                    OutputIndex::new(entry.output_index),
                );
                match entry.signature {
                    Some(signature) => Ok(input.with_signature(parse_field(
                        "signature",
                        &signature,
                        Signature::from_hex,
                    )?)),
                    None => Ok(input),
                }
            })
            .collect::<Result<Vec<_>, EpochFileError>>()?;
        let outputs = self
            .outputs
            .into_iter()
            .map(|entry| -> Result<TransactionOutput, EpochFileError> {
                Ok(TransactionOutput::new(
                    Amount::new(entry.amount),
                    parse_field("output owner", &entry.owner, PublicKey::from_hex)?,
                ))
            })
            .collect::<Result<Vec<_>, EpochFileError>>()?;
        Ok(Transaction::new(inputs, outputs)?)
    }
}

fn parse_field<T>(
    field: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, EpochFileError> {
    parse(value).map_err(|reason| EpochFileError::Field { field, reason })
}
