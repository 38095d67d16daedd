use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::balance::build_dashboard;
use crate::storage::{Connection, MemberStorage, TransactionStorage};
use shared::DashboardResponse;

/// Service that assembles the dashboard view: reads a snapshot of the
/// user's members and transactions and hands them to the pure aggregator.
/// Nothing is written and nothing is cached.
#[derive(Clone)]
pub struct DashboardService<C: Connection> {
    member_repository: C::MemberRepository,
    transaction_repository: C::TransactionRepository,
}

impl<C: Connection> DashboardService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let member_repository = connection.create_member_repository();
        let transaction_repository = connection.create_transaction_repository();
        Self {
            member_repository,
            transaction_repository,
        }
    }

    /// Build the dashboard for a user, filtered by an optional search query
    pub async fn dashboard(&self, user_id: &str, search_query: &str) -> Result<DashboardResponse> {
        let members = self.member_repository.list_members(user_id).await?;
        let transactions = self.transaction_repository.list_transactions(user_id).await?;

        info!(
            "Building dashboard for user {}: {} members, {} transactions, query={:?}",
            user_id,
            members.len(),
            transactions.len(),
            search_query
        );

        let dashboard = build_dashboard(&members, &transactions, search_query);

        Ok(DashboardResponse { dashboard })
    }
}
