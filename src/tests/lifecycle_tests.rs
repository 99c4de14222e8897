use super::{StubRateFetcher, TestOrchestrator, create_test_orchestrator, make_event, make_expense};
use crate::core::errors::SplitLedgerError;
use crate::core::models::{EventStatus, SettlementStatus};
use crate::infrastructure::storage::{EventStore, SettlementStore, in_memory::InMemoryStore};

/// One event, one 100.0 debt from B to A, plan already generated.
async fn seed_single_settlement() -> (TestOrchestrator, InMemoryStore, String) {
    let (orchestrator, store) = create_test_orchestrator(StubRateFetcher::new());
    store.save_event(make_event("ev1", "admin")).await;
    store
        .save_expense(make_expense("e1", "ev1", "A", 100.0, &[("B", 100.0)]))
        .await;

    let plan = orchestrator.generate_settlement("ev1", "admin").await.unwrap();
    let id = plan.settlements[0].id.clone();
    (orchestrator, store, id)
}

#[tokio::test]
async fn payer_initiates_a_pending_settlement() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    let updated = orchestrator.initiate_settlement(&id, "B").await.unwrap();
    assert_eq!(updated.status, SettlementStatus::Initiated);
}

#[tokio::test]
async fn only_the_payer_may_initiate() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    let err = orchestrator.initiate_settlement(&id, "A").await.unwrap_err();
    assert!(matches!(err, SplitLedgerError::Forbidden(actor) if actor == "A"));
}

#[tokio::test]
async fn initiating_twice_is_an_invalid_state() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    orchestrator.initiate_settlement(&id, "B").await.unwrap();
    let err = orchestrator.initiate_settlement(&id, "B").await.unwrap_err();
    assert!(matches!(err, SplitLedgerError::InvalidStatus { .. }));
}

#[tokio::test]
async fn payee_approval_completes_and_settles_the_event() {
    let (orchestrator, store, id) = seed_single_settlement().await;

    orchestrator.initiate_settlement(&id, "B").await.unwrap();
    let updated = orchestrator.approve_settlement(&id, "A").await.unwrap();

    assert_eq!(updated.status, SettlementStatus::Completed);
    let event = EventStore::get(&store, "ev1").await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Settled);
}

#[tokio::test]
async fn only_the_payee_may_approve() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    orchestrator.initiate_settlement(&id, "B").await.unwrap();
    let err = orchestrator.approve_settlement(&id, "B").await.unwrap_err();
    assert!(matches!(err, SplitLedgerError::Forbidden(_)));
}

#[tokio::test]
async fn approving_a_non_initiated_settlement_is_rejected() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    let err = orchestrator.approve_settlement(&id, "A").await.unwrap_err();
    assert!(matches!(err, SplitLedgerError::InvalidStatus { .. }));
}

#[tokio::test]
async fn event_stays_in_payment_until_every_settlement_completes() {
    let (orchestrator, store) = create_test_orchestrator(StubRateFetcher::new());
    store.save_event(make_event("ev1", "admin")).await;
    store
        .save_expense(make_expense("e1", "ev1", "A", 200.0, &[("B", 100.0), ("C", 100.0)]))
        .await;
    let plan = orchestrator.generate_settlement("ev1", "admin").await.unwrap();
    assert_eq!(plan.total_transactions, 2);

    for settlement in &plan.settlements {
        orchestrator
            .initiate_settlement(&settlement.id, &settlement.from_user_id)
            .await
            .unwrap();
    }

    orchestrator
        .approve_settlement(&plan.settlements[0].id, "A")
        .await
        .unwrap();
    let event = EventStore::get(&store, "ev1").await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Payment);

    orchestrator
        .approve_settlement(&plan.settlements[1].id, "A")
        .await
        .unwrap();
    let event = EventStore::get(&store, "ev1").await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Settled);
}

#[tokio::test]
async fn payee_rejection_returns_the_settlement_to_pending() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    orchestrator.initiate_settlement(&id, "B").await.unwrap();
    let updated = orchestrator
        .reject_settlement(&id, "A", "wrong reference number".to_string(), false)
        .await
        .unwrap();

    assert_eq!(updated.status, SettlementStatus::Pending);
    assert_eq!(updated.remarks.as_deref(), Some("wrong reference number"));

    // The payer can resubmit.
    let resubmitted = orchestrator.initiate_settlement(&id, "B").await.unwrap();
    assert_eq!(resubmitted.status, SettlementStatus::Initiated);
}

#[tokio::test]
async fn payee_rejection_can_mark_the_settlement_failed() {
    let (orchestrator, _store, id) = seed_single_settlement().await;

    orchestrator.initiate_settlement(&id, "B").await.unwrap();
    let updated = orchestrator
        .reject_settlement(&id, "A", "payment bounced".to_string(), true)
        .await
        .unwrap();

    assert_eq!(updated.status, SettlementStatus::Failed);
}

#[tokio::test]
async fn event_deletion_terminates_open_settlements_only() {
    let (orchestrator, store) = create_test_orchestrator(StubRateFetcher::new());
    store.save_event(make_event("ev1", "admin")).await;
    store
        .save_expense(make_expense("e1", "ev1", "A", 200.0, &[("B", 100.0), ("C", 100.0)]))
        .await;
    let plan = orchestrator.generate_settlement("ev1", "admin").await.unwrap();

    // Complete one of the two, then terminate the rest.
    let first = &plan.settlements[0];
    orchestrator
        .initiate_settlement(&first.id, &first.from_user_id)
        .await
        .unwrap();
    orchestrator.approve_settlement(&first.id, "A").await.unwrap();

    let terminated = orchestrator.handle_event_deleted("ev1").await.unwrap();
    assert_eq!(terminated, 1);

    let settlements = store.list_by_event("ev1").await.unwrap();
    let completed = settlements.iter().filter(|s| s.status == SettlementStatus::Completed).count();
    let dead = settlements.iter().filter(|s| s.status == SettlementStatus::Terminated).count();
    assert_eq!(completed, 1);
    assert_eq!(dead, 1);
}
