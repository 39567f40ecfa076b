use std::{env, fs, io, num::NonZeroUsize, sync::Arc};

use kv_server::{
    Key, KvClient, LocalClient, ServerBuilder, ServerHandle, ServerSpec,
    service::{ModeSpec, OptimizerSpec},
};
use log::{debug, info};
use tokio::{sync::Barrier, task::JoinSet};

const KEY: Key = 0;
const DEFAULT_DIM: usize = 100;
const DEFAULT_WORKERS: NonZeroUsize = NonZeroUsize::new(2).unwrap();

/// Reads the server spec from the json file at `KV_SPEC`, a synchronous plain
/// sum server for two workers is used if it isn't set.
fn load_spec() -> io::Result<ServerSpec> {
    match env::var("KV_SPEC") {
        Ok(path) => {
            let json = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        Err(_) => Ok(ServerSpec::new(
            ModeSpec::Sync,
            DEFAULT_WORKERS,
            OptimizerSpec::PlainSum,
        )),
    }
}

fn load_dim() -> io::Result<usize> {
    match env::var("KV_DIM") {
        Ok(dim) => dim.parse().map_err(io::Error::other),
        Err(_) => Ok(DEFAULT_DIM),
    }
}

/// Rank 0 seeds the key with zeros, then every worker pushes a gradient of ones
/// and compares the pulled parameters against the amount of workers.
async fn run_worker(
    rank: usize,
    workers: usize,
    dim: usize,
    client: LocalClient,
    barrier: Arc<Barrier>,
) -> io::Result<()> {
    if rank == 0 {
        client.push(KEY, vec![0.; dim]).await?;
    }

    barrier.wait().await;

    client.push(KEY, vec![1.; dim]).await?;
    let params = client.pull(KEY).await?;

    let expected = workers as f32;
    let err: f32 = params.iter().map(|p| (p - expected).abs()).sum();
    info!(rank = rank; "error: {err}");

    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let spec = load_spec()?;
    let dim = load_dim()?;
    let workers = spec.workers.get();
    debug!("loaded spec {spec:?}");

    let handler = ServerBuilder::new().build(spec)?;
    let handle = ServerHandle::new(handler);
    let barrier = Arc::new(Barrier::new(workers));

    let mut tasks = JoinSet::new();
    for rank in 0..workers {
        let client = LocalClient::new(handle.clone());
        tasks.spawn(run_worker(rank, workers, dim, client, Arc::clone(&barrier)));
    }

    while let Some(res) = tasks.join_next().await {
        res.map_err(io::Error::other)??;
    }

    info!("all workers finished");
    Ok(())
}
