use crate::{Amount, Keypair, PublicKey, Sha256, Signature, TransactionError, Utxo};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the fully encoded transaction, signatures included.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub const fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        Sha256::from_hex(s).map(Self)
    }
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionInput {
    // 32 bytes. A pointer to the transaction containing the UTXO to be spent.
    utxo_id: TransactionId,
    // 4 bytes. The number of UTXO to be spent, the first one is 0.
    output_index: OutputIndex,
    // Proves that the owner of the referenced output authorised this transaction.
    // Absent until the input is signed.
    signature: Option<Signature>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.utxo_id, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            utxo_id,
            output_index,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn utxo_id(&self) -> &TransactionId {
        &self.utxo_id
    }

    pub fn output_index(&self) -> OutputIndex {
        self.output_index
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// The unspent output this input claims.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.utxo_id, self.output_index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TransactionOutput {
    amount: Amount,
    // Only the holder of the matching secret key can spend this output.
    owner: PublicKey,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.amount, self.owner)
    }
}

impl TransactionOutput {
    pub fn new(amount: Amount, owner: PublicKey) -> Self {
        Self { amount, owner }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }
}

/// Selects which canonical byte encoding of a transaction to produce.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Encoding {
    /// Every field, signatures included. The transaction id is computed over this encoding.
    Full,
    /// The message signed by the given input: its index followed by every field except the
    /// signatures. Leaving all signatures out lets the inputs be signed in any order.
    SignableFor(usize),
}

#[derive(Serialize)]
struct EncodedInput<'a> {
    utxo_id: &'a TransactionId,
    output_index: OutputIndex,
    signature: Option<&'a Signature>,
}

#[derive(Serialize)]
struct EncodedTransaction<'a> {
    signing_input: Option<u64>,
    inputs: Vec<EncodedInput<'a>>,
    outputs: &'a [TransactionOutput],
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    // Signable payload of each input, in input order.
    // Signatures are never part of a payload, so these do not change once constructed.
    signable_payloads: Vec<Vec<u8>>,
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, TransactionError> {
        Self::output_count(outputs.len())?;
        let signable_payloads = (0..inputs.len())
            .map(|index| Self::encode_parts(&inputs, &outputs, Encoding::SignableFor(index)))
            .collect::<Result<Vec<_>, _>>()?;
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
            signable_payloads,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// The UTXOs claimed by this transaction's inputs, in input order.
    pub fn spent_utxos(&self) -> impl Iterator<Item = Utxo> + '_ {
        self.inputs.iter().map(TransactionInput::utxo)
    }

    /// The UTXOs this transaction creates once accepted, paired with their outputs.
    pub fn created_utxos(&self) -> impl Iterator<Item = (Utxo, &TransactionOutput)> + '_ {
        // The constructor caps the output count, so the indices never wrap.
        (0..)
            .zip(self.outputs.iter())
            .map(move |(index, output)| (Utxo::new(self.id, OutputIndex::new(index)), output))
    }

    /// The message that the signature of input `index` must cover.
    pub fn signable_payload(&self, index: usize) -> Option<&[u8]> {
        self.signable_payloads.get(index).map(Vec::as_slice)
    }

    pub fn encode(&self, encoding: Encoding) -> Result<Vec<u8>, TransactionError> {
        Self::encode_parts(&self.inputs, &self.outputs, encoding)
    }

    /// Attaches `signature` to input `index`. The id is recomputed since it covers signatures.
    pub fn set_signature(
        &mut self,
        index: usize,
        signature: Signature,
    ) -> Result<(), TransactionError> {
        let num_inputs = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputIndexOutOfRange { index, num_inputs })?;
        input.signature = Some(signature);
        self.id = Self::hash_transaction_data(&self.inputs, &self.outputs)?;
        Ok(())
    }

    /// Signs input `index` with `keypair`, which should own the UTXO that the input claims.
    pub fn sign_input(&mut self, index: usize, keypair: &Keypair) -> Result<(), TransactionError> {
        let signature = match self.signable_payload(index) {
            Some(payload) => keypair.sign(payload),
            None => {
                return Err(TransactionError::InputIndexOutOfRange {
                    index,
                    num_inputs: self.inputs.len(),
                })
            }
        };
        self.set_signature(index, signature)
    }

    /// Every output must be addressable by an `OutputIndex`.
    fn output_count(num_outputs: usize) -> Result<u32, TransactionError> {
        u32::try_from(num_outputs).map_err(|_| TransactionError::TooManyOutputs(num_outputs))
    }

    fn encode_parts(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
        encoding: Encoding,
    ) -> Result<Vec<u8>, TransactionError> {
        let signing_input = match encoding {
            Encoding::Full => None,
            Encoding::SignableFor(index) if index < inputs.len() => Some(index as u64),
            Encoding::SignableFor(index) => {
                return Err(TransactionError::InputIndexOutOfRange {
                    index,
                    num_inputs: inputs.len(),
                })
            }
        };
        let encoded = EncodedTransaction {
            signing_input,
            inputs: inputs
                .iter()
                .map(|input| EncodedInput {
                    utxo_id: &input.utxo_id,
                    output_index: input.output_index,
                    signature: match encoding {
                        Encoding::Full => input.signature.as_ref(),
                        Encoding::SignableFor(_) => None,
                    },
                })
                .collect(),
            outputs,
        };
        Ok(bincode::serialize(&encoded)?)
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> Result<TransactionId, TransactionError> {
        let data = Self::encode_parts(inputs, outputs, Encoding::Full)?;
        Ok(TransactionId(Sha256::double_digest(&data)))
    }
}
