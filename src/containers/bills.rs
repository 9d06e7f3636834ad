//! Bills list container

use super::ContainerContext;
use crate::core::bill::BillRecord;
use crate::core::error::{StoreError, ViewError};
use crate::core::format::{FormattedBill, format_bill};
use crate::core::navigation::Route;
use crate::views::{BillsPage, receipt_modal};

pub struct Bills {
    ctx: ContainerContext,
}

impl Bills {
    pub fn new(ctx: ContainerContext) -> Self {
        Self { ctx }
    }

    /// Raw records, as the store returns them
    pub async fn fetch_bills(&self) -> Result<Vec<BillRecord>, StoreError> {
        self.ctx.store.bills().list().await
    }

    /// Records with their display date and status
    ///
    /// A record whose date does not parse keeps its raw date.
    pub async fn get_bills_list(&self) -> Result<Vec<FormattedBill>, StoreError> {
        let bills = self.fetch_bills().await?;
        tracing::debug!(count = bills.len(), "bills fetched");
        Ok(bills.into_iter().map(format_bill).collect())
    }

    /// Input of the bills page: the list, or the rejection message
    pub async fn page(&self) -> BillsPage {
        match self.fetch_bills().await {
            Ok(bills) => BillsPage::loaded(bills),
            Err(err) => {
                tracing::warn!(error = %err, "bills list rejected");
                BillsPage::failed(err.to_string())
            }
        }
    }

    pub fn handle_click_new_bill(&self) {
        self.ctx.navigator.navigate(Route::NewBill);
    }

    /// Receipt modal for the URL bound to the clicked eye icon
    pub fn handle_click_icon_eye(&self, bill_url: Option<&str>) -> Result<String, ViewError> {
        receipt_modal(bill_url)
    }
}
