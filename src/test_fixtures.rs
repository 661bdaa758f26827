//! Deterministic keys and transactions shared by the unit tests.

use crate::{
    Amount, Keypair, OutputIndex, Sha256, Transaction, TransactionId, TransactionInput,
    TransactionOutput, Utxo, UtxoPool,
};

pub(crate) const ALICE: u8 = 1;
pub(crate) const BOB: u8 = 2;
pub(crate) const CAROL: u8 = 3;

pub(crate) fn key(owner: u8) -> Keypair {
    Keypair::from_secret_bytes(&[owner; 32])
}

/// A pool holding the outputs of a single genesis transaction, one per `(owner, amount)` pair.
pub(crate) fn genesis_pool(outputs: &[(u8, i64)]) -> (UtxoPool, TransactionId) {
    let genesis = TransactionId::new(Sha256::digest(b"genesis"));
    let pool = outputs
        .iter()
        .enumerate()
        .map(|(index, (owner, amount))| {
            (
                Utxo::new(genesis, OutputIndex::new(index as u32)),
                TransactionOutput::new(Amount::new(*amount), key(*owner).public_key()),
            )
        })
        .collect();
    (pool, genesis)
}

/// A transaction spending `(source, output index, signer)` inputs into `(amount, owner)` outputs.
pub(crate) fn spend(inputs: &[(TransactionId, u32, u8)], outputs: &[(i64, u8)]) -> Transaction {
    let mut transaction = Transaction::new(
        inputs
            .iter()
            .map(|(source, index, _)| TransactionInput::new(*source, OutputIndex::new(*index)))
            .collect(),
        outputs
            .iter()
            .map(|(amount, owner)| {
                TransactionOutput::new(Amount::new(*amount), key(*owner).public_key())
            })
            .collect(),
    )
    .unwrap();
    for (index, (_, _, signer)) in inputs.iter().enumerate() {
        transaction.sign_input(index, &key(*signer)).unwrap();
    }
    transaction
}
