use coachbill::application::directory::StudentDirectory;
use coachbill::application::ledger::PaymentLedger;
use coachbill::application::sequencer::InvoiceSequencer;
use coachbill::application::workflow::BillingWorkflow;
use coachbill::domain::receipt::BillingForm;
use coachbill::infrastructure::in_memory::{
    InMemoryCounterStore, InMemoryPaymentStore, InMemoryStudentStore,
};
use coachbill::infrastructure::sqlite::SqliteStore;
use tempfile::tempdir;

fn in_memory_workflow() -> BillingWorkflow {
    BillingWorkflow::new(
        StudentDirectory::new(Box::new(InMemoryStudentStore::new())),
        PaymentLedger::new(Box::new(InMemoryPaymentStore::new())),
        InvoiceSequencer::new(Box::new(InMemoryCounterStore::new())),
    )
}

fn sqlite_workflow(store: SqliteStore) -> BillingWorkflow {
    BillingWorkflow::new(
        StudentDirectory::new(Box::new(store.clone())),
        PaymentLedger::new(Box::new(store.clone())),
        InvoiceSequencer::new(Box::new(store)),
    )
}

fn form(email: &str, phone: &str, paid: i64, date: &str) -> BillingForm {
    BillingForm {
        name: "Test Student".into(),
        email: email.into(),
        phone: phone.into(),
        course: "Data Science".into(),
        invoice_date: date.into(),
        fee: 10000,
        discount: 1000,
        paid_amount: paid,
        total_installments: 4,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_invoice_ids_strictly_ascending_over_distinct_receipts() {
    let wf = in_memory_workflow();

    let mut ids = Vec::new();
    for day in 1..=6 {
        let receipt = wf
            .issue_receipt(form(
                "s@example.com",
                "9876543210",
                1000,
                &format!("2025-01-{day:02}"),
            ))
            .await
            .unwrap();
        ids.push(receipt.invoice.as_str().to_string());
    }

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped, ids, "ids must be distinct and ascending");
    assert_eq!(ids[0], "ACT-025-R-001");
    assert_eq!(ids[5], "ACT-025-R-006");
}

#[tokio::test]
async fn test_ledger_total_reconciles_under_interleaving() {
    let wf = in_memory_workflow();

    // Two students, payments interleaved.
    for (email, phone, paid, date) in [
        ("a@example.com", "9000000001", 2000, "2025-01-10"),
        ("b@example.com", "9000000002", 500, "2025-01-10"),
        ("a@example.com", "9000000001", 3000, "2025-02-10"),
        ("b@example.com", "9000000002", 700, "2025-02-10"),
        ("a@example.com", "9000000001", 1000, "2025-03-10"),
    ] {
        wf.issue_receipt(form(email, phone, paid, date)).await.unwrap();
    }

    let a = wf.search("a@example.com").await.unwrap();
    let b = wf.search("b@example.com").await.unwrap();
    assert_eq!(a.total_paid, 6000);
    assert_eq!(b.total_paid, 1200);
    // Three of four installments recorded for a, two for b.
    assert_eq!(a.next_installment, "4");
    assert_eq!(b.next_installment, "3");
}

#[tokio::test]
async fn test_caller_running_total_and_ledger_total_reconcile() {
    let wf = in_memory_workflow();

    let first = wf
        .issue_receipt(form("s@example.com", "9876543210", 3000, "2025-01-10"))
        .await
        .unwrap();
    assert_eq!(first.balance, (10000 - 1000) - 3000);

    // The caller carries the running total forward; the ledger agrees.
    let ledger_total = wf.search("s@example.com").await.unwrap().total_paid;
    assert_eq!(ledger_total, 3000);

    let mut second = form("s@example.com", "9876543210", 2000, "2025-02-10");
    second.already_paid = ledger_total;
    let receipt = wf.issue_receipt(second).await.unwrap();
    assert_eq!(receipt.balance, (10000 - 1000) - (3000 + 2000));
    assert_eq!(wf.search("s@example.com").await.unwrap().total_paid, 5000);
}

#[tokio::test]
async fn test_duplicate_suppression_on_sqlite_backend() {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("billing.db")).unwrap();
    let wf = sqlite_workflow(store);

    let first = wf
        .issue_receipt(form("s@example.com", "9876543210", 2000, "2025-01-10"))
        .await
        .unwrap();
    let replay = wf
        .issue_receipt(form("s@example.com", "9876543210", 2000, "2025-01-10"))
        .await
        .unwrap();

    assert!(replay.duplicate);
    assert_eq!(first.invoice, replay.invoice);
    assert_eq!(wf.search("s@example.com").await.unwrap().total_paid, 2000);
}

#[tokio::test]
async fn test_reset_clears_sqlite_state() {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("billing.db")).unwrap();
    let wf = sqlite_workflow(store);

    wf.issue_receipt(form("s@example.com", "9876543210", 2000, "2025-01-10"))
        .await
        .unwrap();
    wf.reset().await.unwrap();

    assert!(wf.search("s@example.com").await.is_err());
    let receipt = wf
        .issue_receipt(form("s@example.com", "9876543210", 2000, "2025-01-10"))
        .await
        .unwrap();
    assert_eq!(receipt.invoice.as_str(), "ACT-025-R-001");
}

#[tokio::test]
async fn test_fuzzy_search_picks_lowest_id_among_matches() {
    let wf = in_memory_workflow();
    wf.issue_receipt(form("asha.rao@example.com", "9000000001", 100, "2025-01-10"))
        .await
        .unwrap();
    wf.issue_receipt(form("asha.iyer@example.com", "9000000002", 100, "2025-01-10"))
        .await
        .unwrap();

    let summary = wf.search("asha").await.unwrap();
    assert_eq!(summary.student.email, "asha.rao@example.com");
}
