use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use utxoledger_lib::{
    AdmissionStrategy, Amount, Keypair, OutputIndex, Sha256, Transaction, TransactionId,
    TransactionInput, TransactionOutput, TxHandler, Utxo, UtxoPool,
};

/// A pool with one genesis output and a chain of `length` transactions, each spending the
/// previous one's output, listed in reverse so that every pass has to scan to the end.
/// Every link also has a double-spending twin that should be rejected.
fn create_epoch(length: usize) -> (UtxoPool, Vec<Transaction>) {
    let owner = Keypair::from_secret_bytes(&[1; 32]);
    let genesis = TransactionId::new(Sha256::digest(b"genesis"));
    let pool = vec![(
        Utxo::new(genesis, OutputIndex::new(0)),
        TransactionOutput::new(Amount::new(length as i64 * 2), owner.public_key()),
    )]
    .into_iter()
    .collect::<UtxoPool>();

    let mut transactions = Vec::with_capacity(length * 2);
    let mut source = genesis;
    for link in 0..length {
        let amount = Amount::new((length * 2 - link - 1) as i64);
        let spend = |amount: Amount| {
            let mut transaction = Transaction::new(
                vec![TransactionInput::new(source, OutputIndex::new(0))],
                vec![TransactionOutput::new(amount, owner.public_key())],
            )
            .unwrap();
            transaction.sign_input(0, &owner).unwrap();
            transaction
        };
        let next = spend(amount);
        let twin = spend(Amount::new(0));
        source = *next.id();
        // Reversed below, so each link ends up listed ahead of its twin.
        transactions.push(twin);
        transactions.push(next);
    }
    transactions.reverse();
    (pool, transactions)
}

fn handle_txs_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Admission");
    for length in [8, 32, 64].iter() {
        let (pool, transactions) = create_epoch(*length);
        for strategy in [AdmissionStrategy::FirstValid, AdmissionStrategy::HighestFee].iter() {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), length),
                &transactions,
                |b, transactions| {
                    b.iter_batched(
                        || TxHandler::new(&pool),
                        |mut handler| black_box(handler.run_epoch(transactions, *strategy)),
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, handle_txs_benchmark);

criterion_main!(benches);
