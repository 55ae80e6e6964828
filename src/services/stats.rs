//! Statistics service for the librarian dashboard

use crate::{api::stats::StatsResponse, error::AppResult, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counters. Overdue is computed against the current time,
    /// never read from a persisted flag.
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        Ok(StatsResponse {
            total_books: self.repository.books.count_total().await?,
            available_books: self.repository.books.count_available().await?,
            total_users: self.repository.profiles.count_total().await?,
            active_loans: self.repository.transactions.count_active().await?,
            overdue_loans: self.repository.transactions.count_overdue().await?,
        })
    }
}
