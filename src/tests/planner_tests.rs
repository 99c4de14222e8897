use super::make_group;
use crate::core::group_resolver::GroupResolver;
use crate::core::models::{Balance, EntityType};
use crate::core::planner::plan_settlements;

fn user_balance(id: &str, amount: f64) -> Balance {
    Balance {
        entity_id: id.to_string(),
        entity_type: EntityType::User,
        amount,
    }
}

fn group_balance(id: &str, amount: f64) -> Balance {
    Balance {
        entity_id: id.to_string(),
        entity_type: EntityType::Group,
        amount,
    }
}

#[test]
fn single_debtor_single_creditor_yields_one_transaction() {
    let balances = vec![user_balance("A", 100.0), user_balance("B", -100.0)];
    let resolver = GroupResolver::new(&[]);

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    assert_eq!(plan.total_transactions, 1);
    let s = &plan.settlements[0];
    assert_eq!(s.from.entity_id, "B");
    assert_eq!(s.to.entity_id, "A");
    assert_eq!(s.amount, 100.0);
    assert_eq!(s.currency, "USD");
}

#[test]
fn one_creditor_two_debtors_yields_two_transactions() {
    let balances = vec![
        user_balance("A", 200.0),
        group_balance("g1", -120.0),
        user_balance("C", -80.0),
    ];
    let resolver = GroupResolver::new(&[]);

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    assert_eq!(plan.total_transactions, 2);
    assert_eq!(plan.total_amount, 200.0);
    // Larger debtor is matched first.
    assert_eq!(plan.settlements[0].from.entity_id, "g1");
    assert_eq!(plan.settlements[0].amount, 120.0);
    assert_eq!(plan.settlements[1].from.entity_id, "C");
    assert_eq!(plan.settlements[1].amount, 80.0);
}

#[test]
fn all_remainders_settle_to_zero() {
    let balances = vec![
        user_balance("A", 90.0),
        user_balance("B", 35.5),
        user_balance("C", -60.0),
        user_balance("D", -40.25),
        user_balance("E", -25.25),
    ];
    let resolver = GroupResolver::new(&[]);

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    // Each party's paid/received total matches their balance.
    for balance in &balances {
        let sent: f64 = plan
            .settlements
            .iter()
            .filter(|s| s.from.entity_id == balance.entity_id)
            .map(|s| s.amount)
            .sum();
        let received: f64 = plan
            .settlements
            .iter()
            .filter(|s| s.to.entity_id == balance.entity_id)
            .map(|s| s.amount)
            .sum();
        assert!((balance.amount - (received - sent)).abs() <= 0.02);
    }
}

#[test]
fn ties_keep_input_order() {
    let balances = vec![
        user_balance("A", 50.0),
        user_balance("B", 50.0),
        user_balance("C", -50.0),
        user_balance("D", -50.0),
    ];
    let resolver = GroupResolver::new(&[]);

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    assert_eq!(plan.total_transactions, 2);
    assert_eq!(plan.settlements[0].from.entity_id, "C");
    assert_eq!(plan.settlements[0].to.entity_id, "A");
    assert_eq!(plan.settlements[1].from.entity_id, "D");
    assert_eq!(plan.settlements[1].to.entity_id, "B");
}

#[test]
fn group_settlements_resolve_to_designated_payer() {
    let group = make_group("g1", "ev1", &["U1", "U2"], "U2");
    let resolver = GroupResolver::new(&[group]);
    let balances = vec![group_balance("g1", -40.0), user_balance("U3", 40.0)];

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    assert_eq!(plan.settlements[0].from_user_id, "U2");
    assert_eq!(plan.settlements[0].to_user_id, "U3");
}

#[test]
fn unknown_group_falls_back_to_entity_id() {
    let resolver = GroupResolver::new(&[]);
    let balances = vec![group_balance("ghost", -10.0), user_balance("A", 10.0)];

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    assert_eq!(plan.settlements[0].from_user_id, "ghost");
}

#[test]
fn amounts_just_above_tolerance_still_settle() {
    let balances = vec![user_balance("A", 0.02), user_balance("B", -0.02)];
    let resolver = GroupResolver::new(&[]);

    let plan = plan_settlements(&balances, "ev1", "USD", &resolver);

    assert_eq!(plan.total_transactions, 1);
    assert_eq!(plan.settlements[0].amount, 0.02);

    let empty = plan_settlements(&[], "ev1", "USD", &resolver);
    assert_eq!(empty.total_transactions, 0);
    assert_eq!(empty.total_amount, 0.0);
}
