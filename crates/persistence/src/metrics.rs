//! Query latency histograms and connection pool gauges.
//!
//! Every repository method wraps its statement in a [`QueryTimer`]. Pool
//! gauges are refreshed by the readiness check.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::{Duration, Instant};

const QUERY_DURATION: &str = "database_query_duration_seconds";

fn record_query_duration(query: &'static str, elapsed: Duration) {
    histogram!(QUERY_DURATION, "query" => query).record(elapsed.as_secs_f64());
}

/// Publishes active, idle and total connection counts of the pool.
pub fn record_pool_metrics(pool: &PgPool) {
    let total = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(total.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(total as f64);
}

/// Measures one named query from construction until [`QueryTimer::record`].
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(self.query, self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_keeps_query_name() {
        let timer = QueryTimer::new("find_task_by_id");
        assert_eq!(timer.query, "find_task_by_id");
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        QueryTimer::new("list_tasks").record();
    }
}
