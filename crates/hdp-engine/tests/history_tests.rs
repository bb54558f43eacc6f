// Integration tests for history listing through the engine

use chrono::{Duration, TimeZone, Utc};
use hdp_core::clock::SteppingClock;
use hdp_core::errors::ExErrorKind;
use hdp_core::ids::{AccountId, DatasetId, TopicId};
use hdp_engine::commands::{history, publish_csv, PublishContext};
use hdp_engine::{Ledger, Services};
use hdp_ledger::{LedgerPublisher, MockLedger, OperatorIdentity};
use hdp_store::StorageKind;
use std::fs;
use tempfile::TempDir;

const TOPIC: TopicId = TopicId::new(0, 0, 77);

fn services(dir: &TempDir) -> Services {
    let clock = || {
        SteppingClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Duration::seconds(1),
        )
    };
    Services::new(
        Ledger::Mock(MockLedger::with_clock(Box::new(clock()))),
        Box::new(clock()),
        StorageKind::Local,
        dir.path().join("store"),
    )
}

#[test]
fn test_n_publishes_yield_n_records_in_order() {
    // Given: one dataset published 4 times, with another dataset in between
    let dir = TempDir::new().unwrap();
    let services = services(&dir);
    let op = OperatorIdentity::new(AccountId::new(0, 0, 2), "");
    let ctx = PublishContext {
        services: &services,
        operator: &op,
        topic_id: TOPIC,
    };

    let mut dataset_id = None;
    for n in 0..4 {
        let path = dir.path().join(format!("v{n}.csv"));
        fs::write(&path, format!("id\n{n}\n")).unwrap();
        let published = publish_csv(&ctx, &path, dataset_id).unwrap();
        dataset_id = Some(published.dataset_id);

        if n == 1 {
            let other = dir.path().join("other.csv");
            fs::write(&other, "x\n1\n").unwrap();
            publish_csv(&ctx, &other, None).unwrap();
        }
    }
    let dataset_id = dataset_id.unwrap();

    // When: we list its history
    let records = history(&services, TOPIC, dataset_id).unwrap();

    // Then: exactly 4 records, ascending in ledger order and by version
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.message.dataset_id == dataset_id));
    assert!(records
        .windows(2)
        .all(|w| w[0].anchor.sequence_number < w[1].anchor.sequence_number));
    assert!(records
        .windows(2)
        .all(|w| w[0].message.version.as_str() < w[1].message.version.as_str()));
}

#[test]
fn test_empty_history_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir);
    let op = OperatorIdentity::new(AccountId::new(0, 0, 2), "");
    let Ledger::Mock(mock) = &services.ledger else {
        unreachable!()
    };
    let topic = mock.create_topic("t", &op).unwrap();

    let records = history(&services, topic, DatasetId::new()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_unknown_topic_is_topic_not_found() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir);

    let err = history(&services, TopicId::new(0, 0, 404), DatasetId::new()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::TopicNotFound);
    assert_eq!(err.exit_code(), 3);
}
