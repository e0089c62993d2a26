use qrispay::domain::ledger::{LedgerAccount, LedgerEntry};
use qrispay::domain::ports::{
    ImagePublisher, ImagePublisherBox, LedgerClient, LedgerClientBox, MarkSource, MarkSourceBox,
};
use qrispay::infrastructure::in_memory::{InMemoryLedger, InMemoryPublisher, StaticMarkSource};

mod common;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let mark_source: MarkSourceBox = Box::new(StaticMarkSource::new(common::mark_png(8, 8)));
    let publisher: ImagePublisherBox = Box::new(InMemoryPublisher::new("https://img.test"));
    let ledger = InMemoryLedger::new();
    let account = LedgerAccount::new("OK1", "key");
    ledger
        .record(
            &account,
            LedgerEntry {
                amount: Some("10000".to_string()),
                ..Default::default()
            },
        )
        .await;
    let ledger: LedgerClientBox = Box::new(ledger);

    // Verify Send + Sync by spawning tasks
    let mark_handle = tokio::spawn(async move { mark_source.fetch("logo").await.unwrap() });
    let publish_handle = tokio::spawn(async move {
        publisher
            .publish(vec![1, 2, 3], "qris-00.png")
            .await
            .unwrap()
    });
    let ledger_handle = tokio::spawn(async move { ledger.mutations(&account).await.unwrap() });

    assert_eq!(mark_handle.await.unwrap(), common::mark_png(8, 8));
    assert_eq!(
        publish_handle.await.unwrap().url,
        "https://img.test/qris-00.png"
    );
    assert_eq!(ledger_handle.await.unwrap().len(), 1);
}
