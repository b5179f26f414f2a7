mod common;

use chrono::NaiveDate;
use fatura_core::ledger::RawTransaction;

#[test]
fn statement_markers_project_future_installments() {
    let service = common::setup_service("carla");
    service
        .add_statement(
            3,
            2024,
            vec![RawTransaction::new("12 MAR", "Store Purchase 3/12", 50.0)],
        )
        .unwrap();

    let future = service.future_installments(4, 2024).unwrap();

    // installment 4 is the fourth month of the run that started in March
    let june = future.get(&(2024, 6)).expect("june bucket");
    assert_eq!(june.len(), 1);
    assert_eq!(june[0].number, 4);
    assert_eq!(june[0].amount, 50.0);
    assert_eq!(june[0].total_installments, 12);

    // the run ends with installment 12 in February 2025
    assert!(future.contains_key(&(2025, 2)));
    assert!(!future.contains_key(&(2025, 3)));
}

#[test]
fn sighted_installments_leave_the_projection() {
    let service = common::setup_service("carla");
    service
        .add_statement(
            3,
            2024,
            vec![RawTransaction::new("12 MAR", "Store Purchase 3/12", 50.0)],
        )
        .unwrap();
    service
        .add_statement(
            6,
            2024,
            vec![RawTransaction::new("12 JUN", "Store Purchase 6/12", 50.0)],
        )
        .unwrap();

    let future = service.future_installments(4, 2024).unwrap();
    let numbers: Vec<u32> = future.values().flatten().map(|o| o.number).collect();
    assert!(numbers.contains(&4));
    assert!(numbers.contains(&5));
    assert!(!numbers.contains(&6));
}

#[test]
fn registered_purchase_schedules_monthly_and_tracks_payment() {
    let service = common::setup_service("carla");
    let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    service
        .add_installment_purchase("Notebook", 1200.0, 12, start)
        .unwrap();

    let june = service.installments_for_month(6, 2024).unwrap();
    assert_eq!(june.len(), 1);
    assert_eq!(june[0].description, "Notebook");
    assert_eq!(june[0].number, 4);
    assert_eq!(june[0].amount, 100.0);
    assert!(!june[0].paid);

    service.mark_installment_paid("Notebook", 4).unwrap();
    let june = service.installments_for_month(6, 2024).unwrap();
    assert!(june[0].paid);
}

#[test]
fn removing_a_purchase_clears_its_schedule() {
    let service = common::setup_service("carla");
    let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    service
        .add_installment_purchase("Notebook", 1200.0, 12, start)
        .unwrap();
    service
        .remove_installment_purchase("Notebook", 1200.0, start)
        .unwrap();

    assert!(service.installments_for_month(6, 2024).unwrap().is_empty());
}
