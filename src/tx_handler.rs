use crate::{
    Amount, Ed25519Verifier, Rejection, SignatureVerifier, Transaction, TxValidator, UtxoPool,
};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{debug, info};

/// Decides which pending transaction an epoch accepts next.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AdmissionStrategy {
    /// Accept the first transaction, in the current order of the pending list, that is valid
    /// against the current pool, then restart from the head of the list.
    ///
    /// The result is maximal but not maximum: when transactions conflict, the one listed first
    /// wins even if a different choice would have admitted more of the batch.
    FirstValid,
    /// Accept the valid transaction paying the largest fee, the earliest one on ties.
    HighestFee,
}

impl Default for AdmissionStrategy {
    fn default() -> Self {
        Self::FirstValid
    }
}

impl FromStr for AdmissionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-valid" => Ok(Self::FirstValid),
            "highest-fee" => Ok(Self::HighestFee),
            unknown => Err(format!("Unknown AdmissionStrategy: {}", unknown)),
        }
    }
}

impl Display for AdmissionStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstValid => write!(f, "first-valid"),
            Self::HighestFee => write!(f, "highest-fee"),
        }
    }
}

/// What an epoch did with its candidate transactions.
#[derive(Debug, Clone)]
pub struct EpochOutcome {
    /// Accepted transactions, in acceptance order.
    pub accepted: Vec<Transaction>,
    /// Rejected transactions, in their order in the batch, with the rule each one breaks
    /// against the final pool.
    pub rejected: Vec<(Transaction, Rejection)>,
}

/// Admits batches of transactions into the ledger.
///
/// The handler owns its UTXO pool exclusively. Every accepted transaction is applied to the pool
/// before the next one is considered, so transactions in one batch may spend each other's
/// outputs.
pub struct TxHandler<V = Ed25519Verifier> {
    pool: UtxoPool,
    validator: TxValidator<V>,
}

impl TxHandler<Ed25519Verifier> {
    /// Creates a handler over a copy of `pool`. The caller's pool is never modified.
    pub fn new(pool: &UtxoPool) -> Self {
        Self::with_verifier(pool, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> TxHandler<V> {
    pub fn with_verifier(pool: &UtxoPool, verifier: V) -> Self {
        Self {
            pool: pool.clone(),
            validator: TxValidator::with_verifier(verifier),
        }
    }

    /// The current set of spendable outputs.
    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    /// Hands the pool over, e.g. to the handler of the next epoch.
    pub fn into_pool(self) -> UtxoPool {
        self.pool
    }

    pub fn is_valid_tx(&self, transaction: &Transaction) -> bool {
        self.validator.is_valid_tx(&self.pool, transaction)
    }

    /// Runs one epoch with [`AdmissionStrategy::FirstValid`] and returns the accepted
    /// transactions in acceptance order.
    pub fn handle_txs(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        self.run_epoch(candidates, AdmissionStrategy::FirstValid)
            .accepted
    }

    /// Runs one epoch: repeatedly picks a transaction that is valid against the current pool,
    /// accepts it and applies it to the pool, until no pending transaction is valid.
    pub fn run_epoch(
        &mut self,
        candidates: &[Transaction],
        strategy: AdmissionStrategy,
    ) -> EpochOutcome {
        let mut pending = candidates.iter().collect::<Vec<&Transaction>>();
        let mut accepted = Vec::new();

        // Each pass accepts exactly one transaction or ends the epoch.
        while let Some(position) = self.select(&pending, strategy) {
            let transaction = pending.remove(position);
            self.pool.apply(transaction);
            debug!(id = %transaction.id(), %strategy, "accepted transaction");
            accepted.push(transaction.clone());
        }

        let rejected = pending
            .into_iter()
            .filter_map(|transaction| {
                self.validator
                    .validate(&self.pool, transaction)
                    .err()
                    .map(|reason| (transaction.clone(), reason))
            })
            .collect::<Vec<_>>();
        for (transaction, reason) in &rejected {
            debug!(id = %transaction.id(), %reason, "rejected transaction");
        }

        info!(
            candidates = candidates.len(),
            accepted = accepted.len(),
            rejected = rejected.len(),
            utxos = self.pool.len(),
            %strategy,
            "epoch processed"
        );
        EpochOutcome { accepted, rejected }
    }

    /// Returns the position in `pending` of the transaction to accept next.
    fn select(&self, pending: &[&Transaction], strategy: AdmissionStrategy) -> Option<usize> {
        match strategy {
            AdmissionStrategy::FirstValid => self.first_valid(pending),
            AdmissionStrategy::HighestFee => self.highest_fee(pending),
        }
    }

    fn first_valid(&self, pending: &[&Transaction]) -> Option<usize> {
        pending
            .iter()
            .position(|transaction| self.validator.is_valid_tx(&self.pool, transaction))
    }

    fn highest_fee(&self, pending: &[&Transaction]) -> Option<usize> {
        pending
            .iter()
            .enumerate()
            .filter_map(|(position, transaction)| {
                self.validator
                    .validate(&self.pool, transaction)
                    .ok()
                    .map(|fee| (position, fee))
            })
            .fold(None, |best: Option<(usize, Amount)>, (position, fee)| match best {
                Some((_, best_fee)) if best_fee >= fee => best,
                _ => Some((position, fee)),
            })
            .map(|(position, _)| position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::*;
    use crate::{OutputIndex, Utxo};
    use std::collections::HashSet;

    #[test]
    fn double_spend_first_listed_wins() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let tx1 = spend(&[(genesis, 0, ALICE)], &[(7, BOB)]);
        let tx2 = spend(&[(genesis, 0, ALICE)], &[(3, CAROL)]);

        let mut handler = TxHandler::new(&pool);
        let accepted = handler.handle_txs(&[tx1.clone(), tx2.clone()]);

        assert_eq!(accepted, vec![tx1.clone()]);
        let genesis_utxo = Utxo::new(genesis, OutputIndex::new(0));
        assert!(!handler.pool().contains(&genesis_utxo));
        assert!(handler
            .pool()
            .contains(&Utxo::new(*tx1.id(), OutputIndex::new(0))));
        assert_eq!(handler.pool().len(), 1);

        // Swapping the order flips the winner.
        let mut handler = TxHandler::new(&pool);
        assert_eq!(handler.handle_txs(&[tx2.clone(), tx1]), vec![tx2.clone()]);
        assert!(handler
            .pool()
            .contains(&Utxo::new(*tx2.id(), OutputIndex::new(0))));
    }

    #[test]
    fn loser_of_a_conflict_would_have_been_valid_alone() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let tx1 = spend(&[(genesis, 0, ALICE)], &[(7, BOB)]);
        let tx2 = spend(&[(genesis, 0, ALICE)], &[(3, CAROL)]);

        assert!(TxHandler::new(&pool).is_valid_tx(&tx2));
        let outcome = TxHandler::new(&pool).run_epoch(&[tx1, tx2.clone()], Default::default());
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].0, tx2);
        assert!(matches!(
            outcome.rejected[0].1,
            Rejection::MissingUtxo { .. }
        ));
    }

    #[test]
    fn scan_restarts_from_the_head_after_each_acceptance() {
        // b and c both spend a's output. Once a is accepted the scan starts over at b,
        // so b takes the output before c is ever reconsidered.
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let a = spend(&[(genesis, 0, ALICE)], &[(10, BOB)]);
        let b = spend(&[(*a.id(), 0, BOB)], &[(10, CAROL)]);
        let c = spend(&[(*a.id(), 0, BOB)], &[(9, ALICE)]);

        let outcome = TxHandler::new(&pool).run_epoch(
            &[b.clone(), a.clone(), c.clone()],
            AdmissionStrategy::FirstValid,
        );
        assert_eq!(outcome.accepted, vec![a, b]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].0, c);
    }

    #[test]
    fn maximal_not_maximum() {
        // tx_a spends both outputs; tx_b and tx_c each spend one of them.
        // Accepting tx_a first shuts out the two-transaction alternative.
        let (pool, genesis) = genesis_pool(&[(ALICE, 5), (BOB, 5)]);
        let tx_a = spend(&[(genesis, 0, ALICE), (genesis, 1, BOB)], &[(10, CAROL)]);
        let tx_b = spend(&[(genesis, 0, ALICE)], &[(5, CAROL)]);
        let tx_c = spend(&[(genesis, 1, BOB)], &[(5, CAROL)]);

        let accepted = TxHandler::new(&pool).handle_txs(&[tx_a.clone(), tx_b, tx_c]);
        assert_eq!(accepted, vec![tx_a]);
    }

    #[test]
    fn chained_transaction_listed_first_is_accepted_after_its_parent() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let parent = spend(&[(genesis, 0, ALICE)], &[(6, BOB), (4, ALICE)]);
        let child = spend(&[(*parent.id(), 0, BOB)], &[(6, CAROL)]);

        let mut handler = TxHandler::new(&pool);
        assert!(!handler.is_valid_tx(&child));
        let accepted = handler.handle_txs(&[child.clone(), parent.clone()]);

        assert_eq!(accepted, vec![parent.clone(), child.clone()]);
        assert!(!handler
            .pool()
            .contains(&Utxo::new(*parent.id(), OutputIndex::new(0))));
        assert!(handler
            .pool()
            .contains(&Utxo::new(*parent.id(), OutputIndex::new(1))));
        assert!(handler
            .pool()
            .contains(&Utxo::new(*child.id(), OutputIndex::new(0))));
    }

    #[test]
    fn orphan_without_parent_is_rejected() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let parent = spend(&[(genesis, 0, ALICE)], &[(10, BOB)]);
        let child = spend(&[(*parent.id(), 0, BOB)], &[(10, CAROL)]);

        let mut handler = TxHandler::new(&pool);
        assert!(handler.handle_txs(&[child]).is_empty());
        assert_eq!(handler.into_pool(), pool);
    }

    #[test]
    fn caller_pool_is_not_modified() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let snapshot = pool.clone();
        let mut handler = TxHandler::new(&pool);
        handler.handle_txs(&[spend(&[(genesis, 0, ALICE)], &[(10, BOB)])]);

        assert_eq!(pool, snapshot);
        assert_ne!(handler.pool(), &snapshot);
    }

    #[test]
    fn invalid_transactions_never_enter_the_pool() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let negative = spend(&[(genesis, 0, ALICE)], &[(11, BOB), (-1, CAROL)]);
        let overspend = spend(&[(genesis, 0, ALICE)], &[(11, BOB)]);
        let forged = spend(&[(genesis, 0, BOB)], &[(1, BOB)]);

        let mut handler = TxHandler::new(&pool);
        let outcome = handler.run_epoch(
            &[negative, overspend, forged],
            AdmissionStrategy::FirstValid,
        );
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 3);
        assert_eq!(handler.pool(), &pool);
    }

    #[test]
    fn accepted_batch_is_consistent() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10), (BOB, 8), (CAROL, 3)]);
        let a = spend(&[(genesis, 0, ALICE)], &[(9, BOB)]);
        let b = spend(&[(genesis, 1, BOB), (*a.id(), 0, BOB)], &[(16, CAROL)]);
        let conflicting_b = spend(&[(genesis, 1, BOB)], &[(8, ALICE)]);
        let c = spend(&[(genesis, 2, CAROL)], &[(1, ALICE), (2, BOB)]);
        let d = spend(&[(*b.id(), 0, CAROL), (*c.id(), 1, BOB)], &[(18, ALICE)]);
        let batch = vec![d, conflicting_b, b, c, a];

        let mut handler = TxHandler::new(&pool);
        let accepted = handler.handle_txs(&batch);

        // Replay to check conservation at acceptance time and disjoint spends.
        let validator = TxValidator::new();
        let mut replay = pool.clone();
        let mut spent = HashSet::new();
        for transaction in &accepted {
            assert!(validator.validate(&replay, transaction).is_ok());
            for utxo in transaction.spent_utxos() {
                assert!(spent.insert(utxo), "{} spent twice", utxo);
            }
            replay.apply(transaction);
        }
        assert_eq!(&replay, handler.pool());

        for transaction in &accepted {
            for utxo in transaction.spent_utxos() {
                assert!(!handler.pool().contains(&utxo));
            }
            for (utxo, output) in transaction.created_utxos() {
                let created_and_unspent = handler.pool().get_output(&utxo) == Some(output);
                let spent_later = spent.contains(&utxo);
                assert!(created_and_unspent || spent_later);
            }
        }
        // conflicting_b is listed before b, so it takes BOB's genesis output and b never fits.
        assert_eq!(accepted.len(), 3);
    }

    #[test]
    fn highest_fee_prefers_richer_conflicting_transaction() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let low_fee = spend(&[(genesis, 0, ALICE)], &[(9, BOB)]);
        let high_fee = spend(&[(genesis, 0, ALICE)], &[(2, CAROL)]);

        let outcome = TxHandler::new(&pool).run_epoch(
            &[low_fee.clone(), high_fee.clone()],
            AdmissionStrategy::HighestFee,
        );
        assert_eq!(outcome.accepted, vec![high_fee.clone()]);
        assert_eq!(outcome.rejected[0].0, low_fee);

        // The default strategy keeps first-listed order regardless of fees.
        let accepted = TxHandler::new(&pool).handle_txs(&[low_fee.clone(), high_fee]);
        assert_eq!(accepted, vec![low_fee]);
    }

    #[test]
    fn highest_fee_breaks_ties_by_order() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let first = spend(&[(genesis, 0, ALICE)], &[(5, BOB)]);
        let second = spend(&[(genesis, 0, ALICE)], &[(5, CAROL)]);

        let outcome = TxHandler::new(&pool)
            .run_epoch(&[first.clone(), second], AdmissionStrategy::HighestFee);
        assert_eq!(outcome.accepted, vec![first]);
    }

    #[test]
    fn highest_fee_still_chains() {
        let (pool, genesis) = genesis_pool(&[(ALICE, 10)]);
        let parent = spend(&[(genesis, 0, ALICE)], &[(9, BOB)]);
        let child = spend(&[(*parent.id(), 0, BOB)], &[(1, CAROL)]);

        let outcome = TxHandler::new(&pool).run_epoch(
            &[child.clone(), parent.clone()],
            AdmissionStrategy::HighestFee,
        );
        assert_eq!(outcome.accepted, vec![parent, child]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn strategy_parses_from_cli_text() {
        assert_eq!(
            "first-valid".parse::<AdmissionStrategy>(),
            Ok(AdmissionStrategy::FirstValid)
        );
        assert_eq!(
            "Highest-Fee".parse::<AdmissionStrategy>(),
            Ok(AdmissionStrategy::HighestFee)
        );
        assert!("max-weight".parse::<AdmissionStrategy>().is_err());
        assert_eq!(AdmissionStrategy::HighestFee.to_string(), "highest-fee");
    }
}
