mod support;

use std::sync::Barrier;
use std::thread;

use rikiddo::domain::{ActorId, MarketHandle, MarketSpec};
use support::assertions::assert_sums_to_one;
use support::market::named_outcomes;

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 25;

#[test]
fn concurrent_trades_keep_the_book_and_value_consistent() {
    let handle = MarketHandle::open(MarketSpec::new(named_outcomes(3)).with_initial_liquidity(5.0))
        .expect("open market");
    let barrier = Barrier::new(THREADS);

    let flows: Vec<(usize, f64)> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let handle = handle.clone();
                let barrier = &barrier;
                scope.spawn(move || {
                    let actor = ActorId::new(format!("trader-{t}"));
                    let mut committed = 0;
                    let mut net = 0.0;
                    barrier.wait();
                    for i in 0..OPS_PER_THREAD {
                        let outcome = (t + i) % 3;
                        let payment = 0.01 + 0.001 * i as f64;
                        let shares = handle.buy(&actor, payment, outcome).expect("buy");
                        committed += 1;
                        net += payment;

                        if i % 3 == 0 {
                            if let Ok(proceeds) = handle.sell(&actor, shares / 2.0, outcome) {
                                committed += 1;
                                net -= proceeds;
                            }
                        }
                    }
                    (committed, net)
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .collect()
    });

    let committed: usize = flows.iter().map(|(c, _)| c).sum();
    let net: f64 = flows.iter().map(|(_, n)| n).sum();

    let market = handle.read();
    assert_eq!(market.book().len(), 3 + committed);
    assert_eq!(market.history().len(), 1 + committed);
    assert!((market.market_value() - (5.0 + net)).abs() < 1e-9);
    assert_sums_to_one(market.probabilities());

    let seqs: Vec<usize> = market.book().entries().iter().map(|e| e.seq).collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn readers_see_consistent_snapshots_during_writes() {
    let handle = MarketHandle::open(MarketSpec::new(named_outcomes(2))).expect("open market");

    thread::scope(|scope| {
        let writer = handle.clone();
        scope.spawn(move || {
            let actor = ActorId::from("writer");
            for i in 0..200 {
                writer.buy(&actor, 0.01, i % 2).expect("buy");
            }
        });

        for _ in 0..2 {
            let reader = handle.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    assert_sums_to_one(&reader.probabilities());
                    let summary = reader.summary();
                    assert_eq!(summary.book_entries, 2 + summary.trades);
                }
            });
        }
    });

    assert_eq!(handle.book().len(), 202);
}
