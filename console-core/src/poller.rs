/**
 * POLLER - Fetch planifié réutilisable, annulable avec la page
 *
 * RÔLE :
 * Unique utilitaire de rafraîchissement périodique : {endpoint, intervalle,
 * on_success, on_error}. Remplace les timers dupliqués page par page.
 *
 * FONCTIONNEMENT :
 * - fetch immédiat à t=0 puis à chaque frontière d'intervalle (30s par défaut)
 * - pas de retry ni de backoff : un tick en échec attend le suivant
 * - `PollHandle` = jeton d'annulation ; cancel() ou drop() arrête les ticks
 *   futurs ET abandonne un fetch en vol (aucun callback après démontage)
 */

use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ConsoleError;
use crate::loader::Loader;
use crate::source::{fetch, DataSource, Endpoint};
use crate::state::Shared;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Poignée de désabonnement d'un poller
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Annule puis attend la fin effective de la tâche
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        // la tâche sort d'elle-même au prochain point de suspension
        let _ = (&mut self.task).await;
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_loop<R, F, Fut, H>(label: String, every: Duration, mut tick: F, mut handle: H) -> PollHandle
where
    R: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = R> + Send + 'static,
    H: FnMut(R) + Send + 'static,
{
    let cancel = CancellationToken::new();
    let child = cancel.clone();

    let task = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!("poller started for {} (every {:?})", label, every);

        loop {
            tokio::select! {
                _ = child.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let output = tokio::select! {
                _ = child.cancelled() => break,
                output = tick() => output,
            };
            handle(output);
        }

        debug!("poller stopped for {}", label);
    });

    PollHandle { cancel, task }
}

/// Re-fetch `endpoint` toutes les `every` tant que la poignée vit
pub fn spawn_polling<T, S, E>(
    source: Arc<dyn DataSource>,
    endpoint: Endpoint,
    every: Duration,
    mut on_success: S,
    mut on_error: E,
) -> PollHandle
where
    T: DeserializeOwned + Send + 'static,
    S: FnMut(T) + Send + 'static,
    E: FnMut(ConsoleError) + Send + 'static,
{
    let label = endpoint.to_string();
    spawn_loop(
        label.clone(),
        every,
        move || {
            let source = source.clone();
            let endpoint = endpoint.clone();
            async move { fetch::<T>(source.as_ref(), &endpoint).await }
        },
        move |result| match result {
            Ok(data) => on_success(data),
            Err(e) => {
                warn!("poll of {} failed: {}", label, e);
                on_error(e)
            }
        },
    )
}

/// Poller lié à un loader partagé : jeton par tick, seule la dernière réponse gagne.
/// `changed` est notifié à chaque commit pour les vues qui se redessinent.
pub fn poll_into<R, T, M>(
    loader: Shared<Loader<T>>,
    source: Arc<dyn DataSource>,
    endpoint: Endpoint,
    every: Duration,
    map: M,
    changed: Arc<Notify>,
) -> PollHandle
where
    R: DeserializeOwned + Send + 'static,
    T: Send + 'static,
    M: Fn(R) -> T + Send + 'static,
{
    let label = endpoint.to_string();
    let sink = loader.clone();
    spawn_loop(
        label,
        every,
        move || {
            let token = loader.lock().begin();
            let source = source.clone();
            let endpoint = endpoint.clone();
            async move { (token, fetch::<R>(source.as_ref(), &endpoint).await) }
        },
        move |(token, result)| {
            if sink.lock().commit(token, result.map(&map)) {
                changed.notify_one();
            }
        },
    )
}

/// Chargement unique au montage, avec conversion de la réponse
pub async fn load_mapped<R, T, M>(
    loader: &Shared<Loader<T>>,
    source: &dyn DataSource,
    endpoint: &Endpoint,
    map: M,
) -> bool
where
    R: DeserializeOwned,
    M: FnOnce(R) -> T,
{
    let token = loader.lock().begin();
    let result = fetch::<R>(source, endpoint).await.map(map);
    if let Err(e) = &result {
        warn!("load of {} failed: {}", endpoint, e);
    }
    loader.lock().commit(token, result)
}

pub async fn load_into<T: DeserializeOwned>(
    loader: &Shared<Loader<T>>,
    source: &dyn DataSource,
    endpoint: &Endpoint,
) -> bool {
    load_mapped(loader, source, endpoint, |data: T| data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusSnapshot;
    use crate::source::FixtureSource;
    use crate::state::new_state;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_cadence_and_stop_on_drop() {
        let fixtures = Arc::new(FixtureSource::demo(Utc::now()));
        let source: Arc<dyn DataSource> = fixtures.clone();
        let successes = Arc::new(AtomicUsize::new(0));
        let counter = successes.clone();

        let handle = spawn_polling::<StatusSnapshot, _, _>(
            source,
            Endpoint::AdminStatus,
            DEFAULT_POLL_INTERVAL,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |_| {},
        );

        // t=0, 30, 60, 90
        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(fixtures.call_count(&Endpoint::AdminStatus), 4);
        assert_eq!(successes.load(Ordering::SeqCst), 4);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fixtures.call_count(&Endpoint::AdminStatus), 4);
        assert_eq!(successes.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_waits_for_next() {
        let fixtures = Arc::new(FixtureSource::new("t").with_failure(&Endpoint::Status, "offline"));
        let source: Arc<dyn DataSource> = fixtures.clone();
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = errors.clone();

        let handle = spawn_polling::<StatusSnapshot, _, _>(
            source,
            Endpoint::Status,
            DEFAULT_POLL_INTERVAL,
            |_| {},
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        // pas de retry entre deux ticks
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(errors.load(Ordering::SeqCst), 2);

        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_into_loader() {
        let fixtures = Arc::new(FixtureSource::demo(Utc::now()));
        let loader = new_state(Loader::<StatusSnapshot>::new());

        let handle = poll_into(
            loader.clone(),
            fixtures.clone(),
            Endpoint::Status,
            DEFAULT_POLL_INTERVAL,
            |s: StatusSnapshot| s,
            Arc::new(Notify::new()),
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(loader.lock().data().map(|s| s.status.as_str()), Some("healthy"));

        fixtures.set_failure(&Endpoint::Status, "gateway timeout");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(loader.lock().state().error(), Some("gateway timeout"));
        assert!(loader.lock().data().is_none());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_load_once() {
        let fixtures = FixtureSource::demo(Utc::now());
        let loader = new_state(Loader::<StatusSnapshot>::new());
        assert!(load_into(&loader, &fixtures, &Endpoint::AdminMetrics).await);
        assert_eq!(loader.lock().data().unwrap().history.len(), 24);
    }
}
