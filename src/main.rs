use std::time::Duration;

use floatlog::{config, metrics, pipeline, sink::OutputSink, Config, Metrics};

fn main() {
    let started = chrono::Local::now().naive_local();

    let config = Config::load(config::CONFIG_FILE);

    let level = config
        .as_ref()
        .map(|c| c.tracing_level())
        .unwrap_or(tracing::Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Loading Config {:?}", e);
            return;
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    tracing::info!(item = %config.item.market_hash_name(), "Starting");

    runtime.block_on(collect(config, started));
}

async fn collect(config: Config, started: chrono::NaiveDateTime) {
    let registry = prometheus::Registry::new();
    let metrics = match Metrics::new(&registry) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Registering Metrics {:?}", e);
            return;
        }
    };

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let req_client = match builder.build() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Building HTTP Client {:?}", e);
            return;
        }
    };

    let market = match floatlog::steam::Client::new(req_client.clone(), &config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Creating Market Client {:?}", e);
            return;
        }
    };
    let inspector = match floatlog::inspect::Client::new(req_client, &config.float_url) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Creating Inspect Client {:?}", e);
            return;
        }
    };

    let (mut sink, path) = match OutputSink::create(&config.output_dir, &config.item, &started).await
    {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Opening Output {:?}", e);
            return;
        }
    };
    tracing::info!(path = %path.display(), "Writing listings");

    let start_time = std::time::Instant::now();

    tokio::select! {
        result = pipeline::run(&config, &market, &inspector, &mut sink, &metrics) => {
            match result {
                Ok(state) => {
                    tracing::info!(pages = state.total_pages, "Done");
                }
                Err(e) => {
                    tracing::error!("Collecting Listings {:?}", e);
                }
            }
        }
        _ = interrupted(tokio::signal::ctrl_c()) => {
            tracing::warn!("Interrupted, closing output");
        }
    }

    let lines = sink.lines();
    if let Err(e) = sink.close().await {
        tracing::error!("Closing Output {:?}", e);
    }

    tracing::info!(
        lines,
        failed_pages = metrics.pages_failed.get(),
        failure_rate = metrics.failure_rate(),
        "Collecting took {:?}",
        start_time.elapsed()
    );
    tracing::debug!("Metrics\n{}", metrics::encode(&registry));
}

/// Resolves once `signal` fires. Never resolves if the handler could not be
/// installed, so the run carries on without interrupt support.
async fn interrupted(signal: impl std::future::Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::warn!("Listening for ctrl-c {:?}", e);
        futures::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signal_error_does_not_interrupt() {
        let failed = std::future::ready(Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no signal support",
        )));

        let interrupted_first = tokio::select! {
            biased;
            _ = interrupted(failed) => true,
            _ = tokio::task::yield_now() => false,
        };

        assert!(!interrupted_first);
    }

    #[tokio::test]
    async fn signal_interrupts() {
        let interrupted_first = tokio::select! {
            biased;
            _ = interrupted(std::future::ready(Ok(()))) => true,
            _ = tokio::task::yield_now() => false,
        };

        assert!(interrupted_first);
    }
}
