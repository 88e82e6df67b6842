//! ConverterInteractor unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use converter_types::{
        ConversionQuery, ConversionValue, Currency, CurrencyConversion, ErrorCategory,
        InteractorError, NetworkError, NetworkingError, ServerErrorPayload,
        TITLE_FAILED_TO_CONVERT, TITLE_NETWORKING_ISSUE,
    };

    use crate::ConverterInteractor;

    type Responder = Box<dyn Fn(ConversionQuery) -> Result<ConversionValue, NetworkError> + Send + Sync>;

    /// In-memory converter that records every query it receives.
    pub struct MockConverter {
        calls: Mutex<Vec<ConversionQuery>>,
        finished: AtomicUsize,
        latency: Duration,
        responder: Responder,
    }

    impl MockConverter {
        pub fn responding(
            responder: impl Fn(ConversionQuery) -> Result<ConversionValue, NetworkError>
            + Send
            + Sync
            + 'static,
        ) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                finished: AtomicUsize::new(0),
                latency: Duration::ZERO,
                responder: Box::new(responder),
            }
        }

        /// Converts at a fixed rate into the query's target currency.
        pub fn with_rate(rate: f64) -> Self {
            Self::responding(move |query| Ok(ConversionValue::new(query.amount * rate, query.to)))
        }

        /// Always answers with `value` in the query's target currency.
        pub fn returning(value: f64) -> Self {
            Self::responding(move |query| Ok(ConversionValue::new(value, query.to)))
        }

        pub fn failing(err: NetworkError) -> Self {
            Self::responding(move |_| Err(err.clone()))
        }

        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn calls(&self) -> Vec<ConversionQuery> {
            self.calls.lock().unwrap().clone()
        }

        /// Number of calls that ran to completion without being aborted.
        pub fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CurrencyConversion for MockConverter {
        async fn get_conversion(
            &self,
            query: ConversionQuery,
        ) -> Result<ConversionValue, NetworkError> {
            self.calls.lock().unwrap().push(query);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            (self.responder)(query)
        }
    }

    pub fn unprocessable(description: &str) -> NetworkError {
        NetworkError::BadResponseCode {
            status: 422,
            payload: Some(ServerErrorPayload {
                error: "invalid_parameters".into(),
                error_description: Some(description.into()),
            }),
        }
    }

    fn slow_interactor(latency: Duration) -> Arc<ConverterInteractor<MockConverter>> {
        Arc::new(ConverterInteractor::new(
            MockConverter::with_rate(2.0).with_latency(latency),
        ))
    }

    #[tokio::test]
    async fn test_same_currency_never_dispatches() {
        let interactor = ConverterInteractor::new(MockConverter::with_rate(2.0));

        let result = interactor.convert(10.0, Currency::USD, Currency::USD).await;

        assert_eq!(result, Err(InteractorError::SameCurrency));
        assert!(interactor.converter().calls().is_empty());
        assert!(!interactor.is_pending());
    }

    #[tokio::test]
    async fn test_convert_returns_value() {
        let interactor = ConverterInteractor::new(MockConverter::with_rate(2.0));

        let result = interactor.convert(100.0, Currency::USD, Currency::EUR).await;

        assert_eq!(result, Ok(200.0));
        assert_eq!(
            interactor.converter().calls(),
            vec![ConversionQuery::new(100.0, Currency::USD, Currency::EUR)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_flag_tracks_outstanding_request() {
        let interactor = slow_interactor(Duration::from_secs(1));
        let mut pending = interactor.pending();
        assert!(!*pending.borrow_and_update());

        let background = Arc::clone(&interactor);
        let task =
            tokio::spawn(async move { background.convert(1.0, Currency::USD, Currency::EUR).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(interactor.is_pending());
        assert!(pending.has_changed().unwrap());

        assert_eq!(task.await.unwrap(), Ok(2.0));
        assert!(!interactor.is_pending());
    }

    #[tokio::test]
    async fn test_api_failure_is_translated() {
        let interactor = ConverterInteractor::new(MockConverter::failing(unprocessable(
            "Can not parse amount or currency ABCDEFG",
        )));

        let err = interactor
            .convert(1.0, Currency::USD, Currency::EUR)
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Protocol);
        assert_eq!(
            err.title_and_details(),
            (
                TITLE_FAILED_TO_CONVERT.to_string(),
                "Can not parse amount or currency ABCDEFG".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_timeout_is_translated() {
        let interactor = ConverterInteractor::new(MockConverter::failing(NetworkError::from(
            NetworkingError::RequestTimeout,
        )));

        let err = interactor
            .convert(1.0, Currency::USD, Currency::EUR)
            .await
            .unwrap_err();

        assert_eq!(err.title_and_details().0, TITLE_NETWORKING_ISSUE);
        assert!(err.alert().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_conversion_supersedes_previous() {
        let interactor = slow_interactor(Duration::from_secs(1));

        let background = Arc::clone(&interactor);
        let first =
            tokio::spawn(async move { background.convert(1.0, Currency::USD, Currency::EUR).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = interactor.convert(2.0, Currency::USD, Currency::EUR).await;

        assert_eq!(second, Ok(4.0));
        assert_eq!(first.await.unwrap(), Err(InteractorError::Cancelled));
        assert_eq!(interactor.converter().calls().len(), 2);
        assert!(!interactor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_resolves_outstanding_conversion() {
        let interactor = slow_interactor(Duration::from_secs(5));

        let background = Arc::clone(&interactor);
        let task =
            tokio::spawn(async move { background.convert(1.0, Currency::USD, Currency::EUR).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(interactor.is_pending());

        interactor.cancel();

        assert_eq!(task.await.unwrap(), Err(InteractorError::Cancelled));
        assert!(!interactor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_leaves_following_conversion_pending() {
        let interactor = slow_interactor(Duration::from_secs(5));

        let background = Arc::clone(&interactor);
        let first =
            tokio::spawn(async move { background.convert(1.0, Currency::USD, Currency::EUR).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        interactor.cancel();

        let background = Arc::clone(&interactor);
        let second =
            tokio::spawn(async move { background.convert(2.0, Currency::USD, Currency::EUR).await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(interactor.is_pending());
        assert_eq!(first.await.unwrap(), Err(InteractorError::Cancelled));
        assert_eq!(second.await.unwrap(), Ok(4.0));
        assert!(!interactor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_caller_aborts_outstanding_conversion() {
        let interactor = slow_interactor(Duration::from_secs(5));

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            interactor.convert(1.0, Currency::USD, Currency::EUR),
        )
        .await;
        assert!(outcome.is_err());
        assert!(!interactor.is_pending());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(interactor.converter().calls().len(), 1);
        assert_eq!(interactor.converter().finished(), 0);
    }

    #[tokio::test]
    async fn test_cancel_without_outstanding_conversion_is_noop() {
        let interactor = ConverterInteractor::new(MockConverter::with_rate(2.0));

        interactor.cancel();

        assert!(!interactor.is_pending());
        assert_eq!(
            interactor.convert(3.0, Currency::GBP, Currency::JPY).await,
            Ok(6.0)
        );
    }

    #[tokio::test]
    async fn test_interactors_can_share_a_converter() {
        let converter = Arc::new(MockConverter::with_rate(2.0));
        let first = ConverterInteractor::from_arc(Arc::clone(&converter));
        let second = ConverterInteractor::from_arc(Arc::clone(&converter));

        first.convert(1.0, Currency::USD, Currency::EUR).await.unwrap();
        second.convert(1.0, Currency::EUR, Currency::USD).await.unwrap();

        assert_eq!(converter.calls().len(), 2);
    }
}
