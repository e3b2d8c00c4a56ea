use std::sync::Arc;

use tokio::sync::watch;

use crate::state::{AsyncState, StateCell};

use super::{WeatherClient, WeatherSnapshot};

/// Drives weather fetches and publishes the outcome.
#[derive(Debug)]
pub struct WeatherDataStore {
    client: Arc<dyn WeatherClient>,
    state: StateCell<WeatherSnapshot>,
}

impl WeatherDataStore {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self {
            client,
            state: StateCell::new(),
        }
    }

    pub fn state(&self) -> AsyncState<WeatherSnapshot> {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<AsyncState<WeatherSnapshot>> {
        self.state.subscribe()
    }

    /// Fetch and map one forecast.
    ///
    /// Returns `false` without touching the network when a fetch is already
    /// in flight or the store has been closed. There is no automatic retry;
    /// call again to refresh.
    pub async fn fetch(&self) -> bool {
        let Some(ticket) = self.state.begin() else {
            if self.state.is_closed() {
                tracing::debug!("weather store closed, ignoring fetch");
            } else {
                tracing::debug!("weather fetch already in flight, ignoring");
            }
            return false;
        };
        tracing::debug!("weather fetch started");

        let outcome = self
            .client
            .fetch_forecast()
            .await
            .and_then(WeatherSnapshot::try_from);

        let applied = match outcome {
            Ok(snapshot) => {
                tracing::info!(
                    current = snapshot.current_temperature(),
                    hours = snapshot.hourly().len(),
                    "weather fetch succeeded"
                );
                self.state.succeed(ticket, snapshot)
            }
            Err(err) => {
                tracing::warn!(error = %err, "weather fetch failed");
                self.state
                    .fail(ticket, format!("Failed to load weather data: {err}"))
            }
        };

        if !applied {
            tracing::debug!("weather store closed before the response arrived");
        }
        true
    }

    /// Detach from the screen. Responses still in flight are dropped.
    pub fn close(&self) {
        self.state.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::weather::model::{CurrentBlock, ForecastPayload, HourlyBlock};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Debug)]
    struct MockClient {
        calls: AtomicUsize,
        results: Mutex<Vec<Result<ForecastPayload, ClientError>>>,
        entered: Notify,
        release: Option<Notify>,
    }

    impl MockClient {
        fn new(results: Vec<Result<ForecastPayload, ClientError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                results: Mutex::new(results),
                entered: Notify::new(),
                release: None,
            }
        }

        fn gated(results: Vec<Result<ForecastPayload, ClientError>>) -> Self {
            Self {
                release: Some(Notify::new()),
                ..Self::new(results)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherClient for MockClient {
        async fn fetch_forecast(&self) -> Result<ForecastPayload, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            if let Some(release) = &self.release {
                release.notified().await;
            }
            self.results.lock().unwrap().remove(0)
        }
    }

    fn sample_payload() -> ForecastPayload {
        ForecastPayload {
            current: CurrentBlock {
                temperature_2m: 21.7,
            },
            hourly: HourlyBlock {
                time: vec![
                    "2024-01-01T00:00:00".to_string(),
                    "2024-01-01T01:00:00".to_string(),
                ],
                temperature_2m: vec![20.1, 19.8],
            },
        }
    }

    fn timeout() -> ClientError {
        ClientError::Network("request timed out".to_string())
    }

    #[tokio::test]
    async fn fetch_success_publishes_snapshot() {
        let client = Arc::new(MockClient::new(vec![Ok(sample_payload())]));
        let store = WeatherDataStore::new(client.clone());
        assert_eq!(store.state(), AsyncState::Idle);

        assert!(store.fetch().await);

        let state = store.state();
        let snapshot = state.value().expect("success state");
        assert_eq!(snapshot.current_temperature(), 21.7);
        assert_eq!(snapshot.hourly().len(), 2);
        assert_eq!(snapshot.hourly()[0].temperature, 20.1);
        assert_eq!(snapshot.hourly()[1].temperature, 19.8);
        assert!(snapshot.hourly()[0].time < snapshot.hourly()[1].time);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn timeout_fails_then_retry_is_accepted() {
        let client = Arc::new(MockClient::new(vec![Err(timeout()), Ok(sample_payload())]));
        let store = WeatherDataStore::new(client.clone());

        store.fetch().await;
        let state = store.state();
        let message = state.error().expect("failure state");
        assert!(!message.is_empty());
        assert!(message.contains("timed out"));

        assert!(store.fetch().await);
        assert!(store.state().value().is_some());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn decode_error_becomes_failure() {
        let client = Arc::new(MockClient::new(vec![Err(ClientError::Decode(
            "expected value".to_string(),
        ))]));
        let store = WeatherDataStore::new(client);

        store.fetch().await;
        assert!(
            store
                .state()
                .error()
                .is_some_and(|m| m.starts_with("Failed to load weather data"))
        );
    }

    #[tokio::test]
    async fn fetch_while_loading_is_a_noop() {
        let client = Arc::new(MockClient::gated(vec![Ok(sample_payload())]));
        let store = Arc::new(WeatherDataStore::new(client.clone()));

        let background = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch().await })
        };
        client.entered.notified().await;

        assert!(store.state().is_loading());
        assert!(!store.fetch().await);
        assert!(store.state().is_loading());
        assert_eq!(client.calls(), 1);

        if let Some(release) = &client.release {
            release.notify_one();
        }
        assert!(background.await.unwrap());
        assert!(store.state().value().is_some());
    }

    #[tokio::test]
    async fn response_after_close_is_ignored() {
        let client = Arc::new(MockClient::gated(vec![Ok(sample_payload())]));
        let store = Arc::new(WeatherDataStore::new(client.clone()));

        let background = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch().await })
        };
        client.entered.notified().await;

        store.close();
        if let Some(release) = &client.release {
            release.notify_one();
        }
        background.await.unwrap();

        assert!(store.state().is_loading());
        assert!(!store.fetch().await);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_after_close_is_rejected() {
        let client = Arc::new(MockClient::new(vec![Ok(sample_payload())]));
        let store = WeatherDataStore::new(client.clone());

        store.close();

        assert!(!store.fetch().await);
        assert_eq!(store.state(), AsyncState::Idle);
        assert!(store.state.is_closed());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn observers_are_notified() {
        let client = Arc::new(MockClient::new(vec![Ok(sample_payload())]));
        let store = WeatherDataStore::new(client);
        let mut rx = store.subscribe();

        store.fetch().await;

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().value().is_some());
    }
}
