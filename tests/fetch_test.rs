//! Integration tests for the fetch engine.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use tokio_util::sync::CancellationToken;

use common::{engines, media_item, StubProvider};
use galleria::error::Error;
use galleria::fetch::{FetchOperation, FetchOutcome, FetchRequest};
use galleria::model::{ProviderCapability, ProviderName};
use galleria::provider::ProviderError;

fn name(raw: &str) -> ProviderName {
    ProviderName::new(raw).unwrap()
}

#[tokio::test]
async fn capability_gate_blocks_before_any_adapter_call() {
    let flickr = Arc::new(StubProvider::new(
        "flickr",
        &[ProviderCapability::FetchLatest],
    ));
    let (fetcher, _, _) = engines(vec![flickr.clone()]);

    let err = fetcher
        .fetch_by_tags("flickr", &["sunset".to_string()], &FetchRequest::new())
        .await
        .unwrap_err();

    assert_matches!(
        err,
        Error::CapabilityNotSupported {
            capability: ProviderCapability::FetchByTags,
            ..
        }
    );
    assert_eq!(flickr.fetch_calls(), 0);
}

#[tokio::test]
async fn unknown_provider_is_not_found() {
    let (fetcher, _, _) = engines(vec![Arc::new(StubProvider::new(
        "deviantart",
        &[ProviderCapability::FetchLatest],
    ))]);

    let err = fetcher
        .fetch_latest("nosuch", &FetchRequest::new())
        .await
        .unwrap_err();
    assert_matches!(err, Error::ProviderNotFound { .. });

    // A name that cannot normalize cannot be registered either.
    let err = fetcher
        .fetch_latest("???", &FetchRequest::new())
        .await
        .unwrap_err();
    assert_matches!(err, Error::ProviderNotFound { .. });
}

#[tokio::test]
async fn repeated_fetch_within_ttl_hits_cache_once() {
    let provider = Arc::new(
        StubProvider::new("deviantart", &[ProviderCapability::FetchLatest]).with_items(vec![
            media_item("deviantart", "https://da.example/a.jpg", "A"),
        ]),
    );
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    let first = fetcher
        .fetch_latest("deviantart", &FetchRequest::new())
        .await
        .unwrap();
    let second = fetcher
        .fetch_latest("deviantart", &FetchRequest::new())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.fetch_calls(), 1);
}

#[tokio::test]
async fn distinct_parameters_do_not_share_cache_entries() {
    let provider = Arc::new(StubProvider::new(
        "deviantart",
        &[ProviderCapability::FetchLatest],
    ));
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    fetcher
        .fetch_latest("deviantart", &FetchRequest::new().with_limit(10))
        .await
        .unwrap();
    fetcher
        .fetch_latest("deviantart", &FetchRequest::new().with_limit(20))
        .await
        .unwrap();
    fetcher
        .fetch_latest(
            "deviantart",
            &FetchRequest::new().with_limit(10).with_cursor("page2"),
        )
        .await
        .unwrap();

    assert_eq!(provider.fetch_calls(), 3);
}

#[tokio::test]
async fn tag_order_does_not_bypass_the_cache() {
    let provider = Arc::new(StubProvider::new(
        "deviantart",
        &[ProviderCapability::FetchByTags],
    ));
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    fetcher
        .fetch_by_tags(
            "deviantart",
            &["Sunset".to_string(), "beach".to_string()],
            &FetchRequest::new(),
        )
        .await
        .unwrap();
    fetcher
        .fetch_by_tags(
            "deviantart",
            &["beach".to_string(), "sunset".to_string()],
            &FetchRequest::new(),
        )
        .await
        .unwrap();

    assert_eq!(provider.fetch_calls(), 1);
}

#[tokio::test]
async fn transient_failure_retries_up_to_cap() {
    let provider = Arc::new(
        StubProvider::new("deviantart", &[ProviderCapability::FetchLatest])
            .failing_fetch(ProviderError::unavailable("503")),
    );
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    let err = fetcher
        .fetch_latest("deviantart", &FetchRequest::new())
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert_eq!(provider.fetch_calls(), 3);
}

#[tokio::test]
async fn rejected_fails_immediately_without_retry() {
    let provider = Arc::new(
        StubProvider::new("deviantart", &[ProviderCapability::FetchLatest])
            .failing_fetch(ProviderError::rejected("bad credentials")),
    );
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    let err = fetcher
        .fetch_latest("deviantart", &FetchRequest::new())
        .await
        .unwrap_err();

    assert!(!err.is_transient());
    assert_eq!(provider.fetch_calls(), 1);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let provider = Arc::new(
        StubProvider::new("deviantart", &[ProviderCapability::FetchLatest])
            .fail_first(2)
            .with_items(vec![media_item(
                "deviantart",
                "https://da.example/a.jpg",
                "A",
            )]),
    );
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    let page = fetcher
        .fetch_latest("deviantart", &FetchRequest::new())
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(provider.fetch_calls(), 3);
}

#[tokio::test]
async fn fan_out_merges_in_registry_order_and_reports_failures() {
    let alpha = Arc::new(
        StubProvider::new("alpha", &[ProviderCapability::FetchLatest])
            .with_items(vec![media_item("alpha", "https://alpha.example/1.jpg", "a1")])
            .with_cursor("alpha-next"),
    );
    let broken = Arc::new(
        StubProvider::new("broken", &[ProviderCapability::FetchLatest])
            .failing_fetch(ProviderError::unavailable("connect refused")),
    );
    let zeta = Arc::new(
        StubProvider::new("zeta", &[ProviderCapability::FetchLatest]).with_items(vec![
            media_item("zeta", "https://zeta.example/1.jpg", "z1"),
            media_item("zeta", "https://zeta.example/2.jpg", "z2"),
        ]),
    );
    let (fetcher, _, _) = engines(vec![alpha.clone(), broken.clone(), zeta.clone()]);

    let result = fetcher
        .fetch_from_all(
            &FetchOperation::Latest,
            &FetchRequest::new(),
            &CancellationToken::new(),
        )
        .await;

    // Merged items follow registry order: alpha's page, then zeta's.
    let urls: Vec<&str> = result.media.iter().map(|m| m.url()).collect();
    assert_eq!(
        urls,
        vec![
            "https://alpha.example/1.jpg",
            "https://zeta.example/1.jpg",
            "https://zeta.example/2.jpg",
        ]
    );

    assert_eq!(result.outcomes.len(), 3);
    assert_matches!(
        result.outcomes.get(&name("alpha")),
        Some(FetchOutcome::Fetched {
            items: 1,
            next_cursor: Some(cursor),
        }) if cursor == "alpha-next"
    );
    assert_matches!(
        result.outcomes.get(&name("broken")),
        Some(FetchOutcome::Failed(err)) if err.is_transient()
    );
    assert_matches!(
        result.outcomes.get(&name("zeta")),
        Some(FetchOutcome::Fetched {
            items: 2,
            next_cursor: None,
        })
    );

    assert!(!result.is_complete());
    assert_eq!(result.failures().count(), 1);
    // The failing provider burned exactly its retry budget, no more.
    assert_eq!(broken.fetch_calls(), 3);
}

#[tokio::test]
async fn fan_out_only_reaches_providers_declaring_the_capability() {
    let tagged = Arc::new(StubProvider::new(
        "tagged",
        &[ProviderCapability::FetchByTags],
    ));
    let latest_only = Arc::new(StubProvider::new(
        "latestonly",
        &[ProviderCapability::FetchLatest],
    ));
    let (fetcher, _, _) = engines(vec![tagged.clone(), latest_only.clone()]);

    let result = fetcher
        .fetch_from_all(
            &FetchOperation::ByTags(vec!["art".to_string()]),
            &FetchRequest::new(),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(result.outcomes.len(), 1);
    assert!(result.outcomes.contains_key(&name("tagged")));
    assert_eq!(latest_only.fetch_calls(), 0);
}

#[tokio::test]
async fn fan_out_over_empty_registry_is_empty() {
    let (fetcher, _, _) = engines(Vec::new());

    let result = fetcher
        .fetch_from_all(
            &FetchOperation::Latest,
            &FetchRequest::new(),
            &CancellationToken::new(),
        )
        .await;

    assert!(result.media.is_empty());
    assert!(result.outcomes.is_empty());
    assert!(result.is_complete());
}

#[tokio::test]
async fn cancellation_abandons_in_flight_providers() {
    let slowpoke = Arc::new(
        StubProvider::new("slowpoke", &[ProviderCapability::FetchLatest])
            .slow(Duration::from_secs(30))
            .with_items(vec![media_item(
                "slowpoke",
                "https://slow.example/1.jpg",
                "s1",
            )]),
    );
    let (fetcher, _, _) = engines(vec![slowpoke.clone()]);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = fetcher
        .fetch_from_all(&FetchOperation::Latest, &FetchRequest::new(), &cancel)
        .await;

    assert!(result.media.is_empty());
    assert_matches!(
        result.outcomes.get(&name("slowpoke")),
        Some(FetchOutcome::Cancelled)
    );
}

#[tokio::test]
async fn pre_cancelled_token_short_circuits_without_adapter_calls() {
    let provider = Arc::new(StubProvider::new(
        "deviantart",
        &[ProviderCapability::FetchLatest],
    ));
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = fetcher
        .fetch_from_all(&FetchOperation::Latest, &FetchRequest::new(), &cancel)
        .await;

    assert_matches!(
        result.outcomes.get(&name("deviantart")),
        Some(FetchOutcome::Cancelled)
    );
    assert_eq!(provider.fetch_calls(), 0);
}

#[tokio::test]
async fn provider_info_is_served_from_the_metadata_cache() {
    let provider = Arc::new(StubProvider::new(
        "deviantart",
        &[ProviderCapability::FetchLatest],
    ));
    let (fetcher, _, _) = engines(vec![provider.clone()]);

    let first = fetcher.provider_info("deviantart").unwrap();
    let calls_after_first = provider.info_calls();
    let second = fetcher.provider_info("Deviant Art").unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.info_calls(), calls_after_first);
}
