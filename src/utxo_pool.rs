use crate::{OutputIndex, Transaction, TransactionId, TransactionOutput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Identifies one spendable output by the transaction that created it and its position there.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct Utxo {
    tx_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub const fn new(tx_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            tx_id,
            output_index,
        }
    }

    pub fn tx_id(&self) -> &TransactionId {
        &self.tx_id
    }

    pub fn output_index(&self) -> OutputIndex {
        self.output_index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.output_index)
    }
}

/// A pool of unspent transaction outputs.
///
/// Cloning the pool is the defensive copy handed to an epoch.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction ID and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Adds the output as spendable under `utxo`, replacing any previous entry.
    pub fn add_utxo(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    pub fn remove_utxo(&mut self, utxo: &Utxo) -> Option<TransactionOutput> {
        self.utxos.remove(utxo)
    }

    pub fn get_output(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// All spendable outputs, in no particular order.
    pub fn utxos(&self) -> impl Iterator<Item = (&Utxo, &TransactionOutput)> {
        self.utxos.iter()
    }

    /// Applies an accepted transaction: every spent UTXO is removed before any created one is
    /// added, so a transaction can never observe its own outputs.
    pub fn apply(&mut self, transaction: &Transaction) {
        for utxo in transaction.spent_utxos() {
            self.remove_utxo(&utxo);
        }
        for (utxo, output) in transaction.created_utxos() {
            self.add_utxo(utxo, output.clone());
        }
    }
}

impl FromIterator<(Utxo, TransactionOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (Utxo, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
