use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::engine::EvaluationLoop;

/// Repeat runs every `every` until `shutdown` resolves.
///
/// The first run starts immediately. Runs never overlap: a run that outlasts
/// the period delays the next one and missed ticks are skipped. A failed run
/// is logged and the loop carries on. Returns the number of runs started.
pub async fn run_periodically<F>(evaluator: &EvaluationLoop, every: Duration, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    info!(every_secs = every.as_secs_f64(), "watch loop started");

    let mut runs = 0u64;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(runs, "shutdown requested; watch loop stopped");
                return runs;
            }
            _ = ticker.tick() => {
                runs += 1;
                if let Err(e) = evaluator.run_once(Utc::now()).await {
                    error!(error = %e, "run failed");
                }
            }
        }
    }
}
