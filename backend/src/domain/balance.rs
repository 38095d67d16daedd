//! Balance derivation for the ledger.
//!
//! Balances are never persisted. They are recomputed from the full
//! transaction history on every read, so there is no cached value that can
//! go stale when a transaction is appended. Both functions here are pure:
//! they take snapshots of the stores as plain slices and return fresh values.

use shared::{BalanceStatus, Dashboard, Member, MemberBalance, Transaction};
use std::cmp::Ordering;

/// Compute a member's derived balance from a transaction history.
///
/// `transactions` may contain entries for other members; only those whose
/// `member_id` matches are aggregated. Input ordering does not matter.
/// Total over its input domain: a member with zero transactions yields
/// balance 0, status `Settled` and no last transaction date.
pub fn compute_balance(member: &Member, transactions: &[Transaction]) -> MemberBalance {
    let mut total_given = 0.0;
    let mut total_received = 0.0;
    let mut last_transaction: Option<&Transaction> = None;

    for transaction in transactions.iter().filter(|t| t.member_id == member.id) {
        match transaction.direction {
            shared::TransactionDirection::Given => total_given += transaction.amount,
            shared::TransactionDirection::Received => total_received += transaction.amount,
        }

        // Most recent by calendar date; same-day ties go to the entry
        // created later. Both fields sort correctly as strings.
        last_transaction = match last_transaction {
            None => Some(transaction),
            Some(current) => {
                if (&transaction.date, &transaction.created_at)
                    > (&current.date, &current.created_at)
                {
                    Some(transaction)
                } else {
                    Some(current)
                }
            }
        };
    }

    let balance = total_given - total_received;

    // Exact-zero means settled; amounts are taken as exact, no epsilon.
    let status = if balance > 0.0 {
        BalanceStatus::Due
    } else if balance < 0.0 {
        BalanceStatus::Credit
    } else {
        BalanceStatus::Settled
    };

    MemberBalance {
        member: member.clone(),
        total_given,
        total_received,
        balance,
        status,
        last_transaction_date: last_transaction.map(|t| t.date.clone()),
    }
}

/// Build the dashboard view: per-member balances filtered by a search query,
/// sorted by settlement status, with due/credit totals.
///
/// The query matches case-insensitively against member names and
/// case-sensitively against phone numbers; an empty query matches everything.
/// Totals are computed over the filtered list, so they track the search box.
pub fn build_dashboard(
    members: &[Member],
    transactions: &[Transaction],
    search_query: &str,
) -> Dashboard {
    let query_lower = search_query.to_lowercase();

    let mut rows: Vec<MemberBalance> = members
        .iter()
        .map(|member| compute_balance(member, transactions))
        .filter(|row| {
            row.member.name.to_lowercase().contains(&query_lower)
                || row
                    .member
                    .phone
                    .as_deref()
                    .map_or(false, |phone| phone.contains(search_query))
        })
        .collect();

    // Due members first, then credit, then settled; within a status bucket,
    // descending by raw balance. Descending raw balance puts the smallest
    // credit first within the credit bucket, which is intentional. The sort
    // is stable, so exact ties keep their input order.
    rows.sort_by(|a, b| {
        a.status
            .sort_priority()
            .cmp(&b.status.sort_priority())
            .then_with(|| b.balance.partial_cmp(&a.balance).unwrap_or(Ordering::Equal))
    });

    let total_due = rows
        .iter()
        .filter(|row| row.status == BalanceStatus::Due)
        .map(|row| row.balance.abs())
        .sum();

    let total_credit = rows
        .iter()
        .filter(|row| row.status == BalanceStatus::Credit)
        .map(|row| row.balance.abs())
        .sum();

    Dashboard {
        members: rows,
        total_due,
        total_credit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TransactionDirection;

    fn test_member(id: &str, name: &str, phone: Option<&str>) -> Member {
        Member {
            id: id.to_string(),
            user_id: "user::1".to_string(),
            name: name.to_string(),
            phone: phone.map(|p| p.to_string()),
            created_at: "2025-01-01T10:00:00+00:00".to_string(),
        }
    }

    fn test_transaction(
        member_id: &str,
        direction: TransactionDirection,
        amount: f64,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: Transaction::generate_id(direction, 1702516122000),
            member_id: member_id.to_string(),
            user_id: "user::1".to_string(),
            direction,
            amount,
            note: None,
            date: date.to_string(),
            created_at: format!("{}T10:00:00+00:00", date),
        }
    }

    #[test]
    fn test_balance_is_given_minus_received() {
        let member = test_member("member::1", "Ravi", None);
        let transactions = vec![
            test_transaction("member::1", TransactionDirection::Given, 500.0, "2025-01-10"),
            test_transaction("member::1", TransactionDirection::Received, 200.0, "2025-01-15"),
        ];

        let result = compute_balance(&member, &transactions);
        assert_eq!(result.total_given, 500.0);
        assert_eq!(result.total_received, 200.0);
        assert_eq!(result.balance, 300.0);
        assert_eq!(result.status, BalanceStatus::Due);
    }

    #[test]
    fn test_empty_history_is_settled() {
        let member = test_member("member::1", "Ravi", None);

        let result = compute_balance(&member, &[]);
        assert_eq!(result.balance, 0.0);
        assert_eq!(result.total_given, 0.0);
        assert_eq!(result.total_received, 0.0);
        assert_eq!(result.status, BalanceStatus::Settled);
        assert_eq!(result.last_transaction_date, None);
    }

    #[test]
    fn test_exact_zero_balance_is_settled() {
        let member = test_member("member::1", "Ravi", None);
        let transactions = vec![
            test_transaction("member::1", TransactionDirection::Given, 100.0, "2025-01-10"),
            test_transaction("member::1", TransactionDirection::Received, 100.0, "2025-01-15"),
        ];

        let result = compute_balance(&member, &transactions);
        assert_eq!(result.balance, 0.0);
        assert_eq!(result.status, BalanceStatus::Settled);
    }

    #[test]
    fn test_negative_balance_is_credit() {
        let member = test_member("member::1", "Ravi", None);
        let transactions = vec![test_transaction(
            "member::1",
            TransactionDirection::Received,
            300.0,
            "2025-01-10",
        )];

        let result = compute_balance(&member, &transactions);
        assert_eq!(result.balance, -300.0);
        assert_eq!(result.status, BalanceStatus::Credit);
        assert_eq!(result.balance.abs(), 300.0);
    }

    #[test]
    fn test_filters_out_other_members_transactions() {
        let member = test_member("member::1", "Ravi", None);
        let transactions = vec![
            test_transaction("member::1", TransactionDirection::Given, 100.0, "2025-01-10"),
            test_transaction("member::2", TransactionDirection::Given, 9999.0, "2025-01-11"),
            test_transaction("member::2", TransactionDirection::Received, 50.0, "2025-01-12"),
        ];

        let result = compute_balance(&member, &transactions);
        assert_eq!(result.total_given, 100.0);
        assert_eq!(result.total_received, 0.0);
        assert_eq!(result.last_transaction_date, Some("2025-01-10".to_string()));
    }

    #[test]
    fn test_last_transaction_date_uses_calendar_date_not_insert_order() {
        let member = test_member("member::1", "Ravi", None);
        // Backdated entry appended last
        let transactions = vec![
            test_transaction("member::1", TransactionDirection::Given, 100.0, "2025-02-20"),
            test_transaction("member::1", TransactionDirection::Given, 50.0, "2025-01-05"),
        ];

        let result = compute_balance(&member, &transactions);
        assert_eq!(result.last_transaction_date, Some("2025-02-20".to_string()));
    }

    #[test]
    fn test_last_transaction_date_same_day_tie_goes_to_later_created() {
        let member = test_member("member::1", "Ravi", None);
        let mut earlier = test_transaction("member::1", TransactionDirection::Given, 10.0, "2025-03-01");
        earlier.created_at = "2025-03-01T09:00:00+00:00".to_string();
        let mut later = test_transaction("member::1", TransactionDirection::Given, 20.0, "2025-03-01");
        later.created_at = "2025-03-01T18:00:00+00:00".to_string();

        // Same result regardless of input order
        for transactions in [vec![earlier.clone(), later.clone()], vec![later, earlier]] {
            let result = compute_balance(&member, &transactions);
            assert_eq!(result.last_transaction_date, Some("2025-03-01".to_string()));
        }
    }

    fn scenario_members_and_transactions() -> (Vec<Member>, Vec<Transaction>) {
        let members = vec![
            test_member("member::b", "Bina", Some("9876543210")),
            test_member("member::c", "Chirag", None),
            test_member("member::a", "Amit", Some("5551234")),
        ];
        let transactions = vec![
            // Amit: due 300
            test_transaction("member::a", TransactionDirection::Given, 500.0, "2025-01-10"),
            test_transaction("member::a", TransactionDirection::Received, 200.0, "2025-01-12"),
            // Bina: settled
            test_transaction("member::b", TransactionDirection::Given, 100.0, "2025-01-11"),
            test_transaction("member::b", TransactionDirection::Received, 100.0, "2025-01-13"),
            // Chirag: credit 300
            test_transaction("member::c", TransactionDirection::Received, 300.0, "2025-01-14"),
        ];
        (members, transactions)
    }

    #[test]
    fn test_dashboard_sorts_due_then_credit_then_settled() {
        let (members, transactions) = scenario_members_and_transactions();

        let dashboard = build_dashboard(&members, &transactions, "");
        let names: Vec<&str> = dashboard
            .members
            .iter()
            .map(|row| row.member.name.as_str())
            .collect();
        assert_eq!(names, vec!["Amit", "Chirag", "Bina"]);
        assert_eq!(dashboard.total_due, 300.0);
        assert_eq!(dashboard.total_credit, 300.0);
    }

    #[test]
    fn test_dashboard_sort_within_buckets() {
        let members = vec![
            test_member("member::1", "Small Due", None),
            test_member("member::2", "Big Due", None),
            test_member("member::3", "Big Credit", None),
            test_member("member::4", "Small Credit", None),
        ];
        let transactions = vec![
            test_transaction("member::1", TransactionDirection::Given, 50.0, "2025-01-01"),
            test_transaction("member::2", TransactionDirection::Given, 900.0, "2025-01-01"),
            test_transaction("member::3", TransactionDirection::Received, 900.0, "2025-01-01"),
            test_transaction("member::4", TransactionDirection::Received, 50.0, "2025-01-01"),
        ];

        let dashboard = build_dashboard(&members, &transactions, "");
        let names: Vec<&str> = dashboard
            .members
            .iter()
            .map(|row| row.member.name.as_str())
            .collect();
        // Largest due first; within the credit bucket, descending raw
        // balance means the smallest credit comes first.
        assert_eq!(names, vec!["Big Due", "Small Due", "Small Credit", "Big Credit"]);
    }

    #[test]
    fn test_dashboard_sort_is_independent_of_input_order() {
        let (mut members, transactions) = scenario_members_and_transactions();
        members.reverse();

        let dashboard = build_dashboard(&members, &transactions, "");
        let names: Vec<&str> = dashboard
            .members
            .iter()
            .map(|row| row.member.name.as_str())
            .collect();
        assert_eq!(names, vec!["Amit", "Chirag", "Bina"]);
    }

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let (members, transactions) = scenario_members_and_transactions();

        let dashboard = build_dashboard(&members, &transactions, "amit");
        assert_eq!(dashboard.members.len(), 1);
        assert_eq!(dashboard.members[0].member.name, "Amit");

        let dashboard = build_dashboard(&members, &transactions, "BINA");
        assert_eq!(dashboard.members.len(), 1);
        assert_eq!(dashboard.members[0].member.name, "Bina");
    }

    #[test]
    fn test_search_matches_phone_substring() {
        let (members, transactions) = scenario_members_and_transactions();

        let dashboard = build_dashboard(&members, &transactions, "98765");
        assert_eq!(dashboard.members.len(), 1);
        assert_eq!(dashboard.members[0].member.name, "Bina");
    }

    #[test]
    fn test_search_with_no_match_yields_empty_list_and_zero_totals() {
        let (members, transactions) = scenario_members_and_transactions();

        let dashboard = build_dashboard(&members, &transactions, "xyz");
        assert!(dashboard.members.is_empty());
        assert_eq!(dashboard.total_due, 0.0);
        assert_eq!(dashboard.total_credit, 0.0);
    }

    #[test]
    fn test_totals_track_the_filtered_list() {
        let (members, transactions) = scenario_members_and_transactions();

        // Filtering down to the credit member removes the due total
        let dashboard = build_dashboard(&members, &transactions, "Chirag");
        assert_eq!(dashboard.total_due, 0.0);
        assert_eq!(dashboard.total_credit, 300.0);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let (members, transactions) = scenario_members_and_transactions();

        let once = build_dashboard(&members, &transactions, "a");
        let filtered_members: Vec<Member> = once
            .members
            .iter()
            .map(|row| row.member.clone())
            .collect();
        let twice = build_dashboard(&filtered_members, &transactions, "a");

        assert_eq!(once.members, twice.members);
        assert_eq!(once.total_due, twice.total_due);
        assert_eq!(once.total_credit, twice.total_credit);
    }

    #[test]
    fn test_empty_member_list_yields_empty_dashboard() {
        let dashboard = build_dashboard(&[], &[], "");
        assert!(dashboard.members.is_empty());
        assert_eq!(dashboard.total_due, 0.0);
        assert_eq!(dashboard.total_credit, 0.0);
    }
}
