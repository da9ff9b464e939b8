//! Browse minted portfolios by token id.

use crate::store::PortfolioStore;
use portfolio_types::PortfolioRecord;
use tracing::debug;

pub struct PortfolioViewer {
    selected: u64,
    total: u64,
    record: Option<PortfolioRecord>,
}

impl Default for PortfolioViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioViewer {
    pub fn new() -> Self {
        Self {
            selected: 1,
            total: 0,
            record: None,
        }
    }

    pub fn selected(&self) -> u64 {
        self.selected
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn record(&self) -> Option<&PortfolioRecord> {
        self.record.as_ref()
    }

    pub async fn refresh_total<S: PortfolioStore>(
        &mut self,
        store: &S,
    ) -> Result<u64, crate::Error> {
        self.total = store.total_portfolios().await?;
        Ok(self.total)
    }

    /// Select `token_id` if it lies in `[1, total]`. Returns whether the
    /// selection changed.
    pub fn select(&mut self, token_id: u64) -> bool {
        if token_id == 0 || token_id > self.total {
            debug!(token_id, total = self.total, "Ignoring out-of-range selection");
            return false;
        }
        if token_id != self.selected {
            self.selected = token_id;
            self.record = None;
        }
        true
    }

    /// Load the selected record. Nothing is loaded while no portfolio exists.
    pub async fn load<S: PortfolioStore>(
        &mut self,
        store: &S,
    ) -> Result<Option<&PortfolioRecord>, crate::Error> {
        if self.total == 0 {
            self.record = None;
            return Ok(None);
        }
        self.record = Some(store.get_portfolio(self.selected).await?);
        Ok(self.record.as_ref())
    }
}
