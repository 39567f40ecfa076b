use std::{num::NonZeroUsize, sync::Arc, thread};

use kv_server::{
    Handler, KvClient, LocalClient, Request, Response, ServerBuilder, ServerHandle, ServerSpec,
    service::{ModeSpec, OptimizerSpec},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::{sync::Barrier, task::JoinSet};

const DIM: usize = 100;

async fn run_worker(
    rank: usize,
    client: LocalClient,
    barrier: Arc<Barrier>,
) -> kv_server::client::Result<Vec<f32>> {
    if rank == 0 {
        client.push(0, vec![0.; DIM]).await?;
    }

    barrier.wait().await;
    client.push(0, vec![1.; DIM]).await?;
    client.pull(0).await
}

async fn run_cluster(mode: ModeSpec, workers: usize) -> Vec<Vec<f32>> {
    let spec = ServerSpec::new(mode, NonZeroUsize::new(workers).unwrap(), OptimizerSpec::PlainSum);
    let handle = ServerHandle::new(ServerBuilder::new().build(spec).unwrap());
    let barrier = Arc::new(Barrier::new(workers));

    let mut tasks = JoinSet::new();
    for rank in 0..workers {
        let client = LocalClient::new(handle.clone());
        tasks.spawn(run_worker(rank, client, Arc::clone(&barrier)));
    }

    let mut pulled = Vec::new();
    while let Some(res) = tasks.join_next().await {
        pulled.push(res.unwrap().unwrap());
    }

    pulled
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_workers_pull_the_whole_round() {
    const WORKERS: usize = 4;

    for params in run_cluster(ModeSpec::Sync, WORKERS).await {
        assert_eq!(params, vec![WORKERS as f32; DIM]);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn async_workers_see_their_own_push() {
    const WORKERS: usize = 4;

    for params in run_cluster(ModeSpec::Async, WORKERS).await {
        assert!(params.iter().all(|&p| (1.0..=WORKERS as f32).contains(&p)));
    }
}

#[test]
fn concurrent_async_pushes_sum_exactly() {
    const THREADS: u64 = 8;
    const PUSHES: usize = 200;
    const KEYS: u64 = 5;
    const LEN: usize = 3;

    let mut spec = ServerSpec::new(ModeSpec::Async, NonZeroUsize::MIN, OptimizerSpec::PlainSum);
    spec.shards = NonZeroUsize::new(2).unwrap();
    let handler: Box<dyn Handler<u64>> = ServerBuilder::new().build(spec).unwrap();

    for key in 0..KEYS {
        handler.handle(Request::push(key, vec![0.; LEN], 0));
    }

    let totals = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|seed| {
                let handler = handler.as_ref();
                s.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let mut totals = vec![[0.; LEN]; KEYS as usize];

                    for _ in 0..PUSHES {
                        let key = rng.random_range(0..KEYS);
                        let grad: Vec<f32> = (0..LEN).map(|_| rng.random_range(-8..=8) as f32).collect();

                        for (t, g) in totals[key as usize].iter_mut().zip(&grad) {
                            *t += g;
                        }

                        let replies = handler.handle(Request::push(key, grad, seed));
                        assert_eq!(replies.len(), 1);
                        assert_eq!(replies[0].res, Ok(Response::Ack { key }));
                    }

                    totals
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .fold(vec![[0.; LEN]; KEYS as usize], |mut acc, totals| {
                for (a, t) in acc.iter_mut().zip(totals) {
                    a.iter_mut().zip(t).for_each(|(a, t)| *a += t);
                }
                acc
            })
    });

    for key in 0..KEYS {
        let replies = handler.handle(Request::pull(key, 0));
        let Ok(Response::Values { values, .. }) = &replies[0].res else {
            panic!("unexpected pull result {:?}", replies[0].res);
        };
        assert_eq!(values.as_slice(), totals[key as usize]);
    }
}

#[test]
fn batch_matches_sequential() {
    let spec = ServerSpec::new(ModeSpec::Sync, NonZeroUsize::new(2).unwrap(), OptimizerSpec::PlainSum);
    let batched: Box<dyn Handler<usize>> = ServerBuilder::new().build(spec.clone()).unwrap();
    let sequential: Box<dyn Handler<usize>> = ServerBuilder::new().build(spec).unwrap();

    let reqs: Vec<_> = (0..40)
        .map(|i| Request::push((i % 7) as u64, vec![i as f32, 1.], i))
        .collect();

    let mut from_batch: Vec<_> = batched.handle_batch(reqs.clone()).into_iter().map(|r| (r.to, r.res)).collect();
    let mut from_seq: Vec<_> = reqs
        .into_iter()
        .flat_map(|req| sequential.handle(req))
        .map(|r| (r.to, r.res))
        .collect();

    from_batch.sort_by_key(|(to, _)| *to);
    from_seq.sort_by_key(|(to, _)| *to);
    assert_eq!(from_batch, from_seq);

    for key in 0..7 {
        let a = batched.handle(Request::pull(key, 0)).remove(0).res;
        let b = sequential.handle(Request::pull(key, 0)).remove(0).res;
        assert_eq!(a, b);
    }
}
