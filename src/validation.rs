use crate::{
    Amount, Ed25519Verifier, PublicKey, Rejection, SignatureVerifier, Transaction,
    TransactionInput, TransactionOutput, UtxoPool,
};
use std::collections::HashSet;

/// Checks a single transaction against a snapshot of the UTXO pool.
///
/// A transaction is valid iff:
///   - every input claims a UTXO that is in the pool,
///   - every input carries a signature, by the owner of the claimed output, over that input's
///     signable payload,
///   - no UTXO is claimed by more than one input,
///   - no output has a negative amount,
///   - the inputs are worth at least as much as the outputs.
///
/// Validation never modifies the pool.
#[derive(Debug, Default, Clone)]
pub struct TxValidator<V = Ed25519Verifier> {
    verifier: V,
}

impl TxValidator<Ed25519Verifier> {
    pub fn new() -> Self {
        Self::with_verifier(Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> TxValidator<V> {
    pub fn with_verifier(verifier: V) -> Self {
        Self { verifier }
    }

    pub fn is_valid_tx(&self, pool: &UtxoPool, transaction: &Transaction) -> bool {
        self.validate(pool, transaction).is_ok()
    }

    /// Returns the transaction fee if the transaction is valid, or the first rule it breaks.
    pub fn validate(
        &self,
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<Amount, Rejection> {
        let inputs_total = self.validate_inputs(pool, transaction)?;
        let outputs_total = Self::validate_outputs(transaction)?;
        Self::validate_inputs_cover_outputs(inputs_total, outputs_total)
    }

    /// Scans the inputs once, in order, and returns the total value they claim.
    fn validate_inputs(
        &self,
        pool: &UtxoPool,
        transaction: &Transaction,
    ) -> Result<Amount, Rejection> {
        let mut claimed = HashSet::with_capacity(transaction.inputs().len());
        let mut amounts = Vec::with_capacity(transaction.inputs().len());
        for (input_index, input) in transaction.inputs().iter().enumerate() {
            let utxo = input.utxo();
            if !claimed.insert(utxo) {
                return Err(Rejection::DoubleSpend { input_index, utxo });
            }
            let output = pool
                .get_output(&utxo)
                .ok_or(Rejection::MissingUtxo { input_index, utxo })?;
            self.validate_signature(transaction, input_index, input, output.owner())?;
            amounts.push(output.amount());
        }
        Amount::checked_sum(amounts).ok_or(Rejection::ValueOverflow("input"))
    }

    fn validate_signature(
        &self,
        transaction: &Transaction,
        input_index: usize,
        input: &TransactionInput,
        owner: &PublicKey,
    ) -> Result<(), Rejection> {
        let utxo = input.utxo();
        let (signature, payload) = input
            .signature()
            .zip(transaction.signable_payload(input_index))
            .ok_or(Rejection::MissingSignature { input_index, utxo })?;
        if self.verifier.verify(owner, payload, signature) {
            Ok(())
        } else {
            Err(Rejection::InvalidSignature { input_index, utxo })
        }
    }

    /// Scans the outputs once and returns their total value.
    fn validate_outputs(transaction: &Transaction) -> Result<Amount, Rejection> {
        for (output_index, output) in transaction.outputs().iter().enumerate() {
            let amount = output.amount();
            if amount.is_negative() {
                return Err(Rejection::NegativeOutput {
                    output_index,
                    amount,
                });
            }
        }
        Amount::checked_sum(transaction.outputs().iter().map(TransactionOutput::amount))
            .ok_or(Rejection::ValueOverflow("output"))
    }

    fn validate_inputs_cover_outputs(
        inputs: Amount,
        outputs: Amount,
    ) -> Result<Amount, Rejection> {
        if inputs >= outputs {
            Ok(inputs - outputs)
        } else {
            Err(Rejection::Overspend { inputs, outputs })
        }
    }
}
