use chrono::{NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::query::{QueryFilter, QueryString};

const DEFAULT_PAGE_NUMBER: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Constraints for listing batch definitions.
///
/// `Default` pages at 1 / 10; set the paging fields to `None` to omit them.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchDefinitionFilter {
    pub vendor_id: Option<Uuid>,
    pub tag: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub pickup_after: Option<NaiveTime>,
    pub pickup_before: Option<NaiveTime>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl Default for BatchDefinitionFilter {
    fn default() -> Self {
        Self {
            vendor_id: None,
            tag: None,
            min_price: None,
            max_price: None,
            pickup_after: None,
            pickup_before: None,
            page_number: Some(DEFAULT_PAGE_NUMBER),
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl BatchDefinitionFilter {
    /// A filter with every field absent, including paging.
    pub fn unconstrained() -> Self {
        Self {
            page_number: None,
            page_size: None,
            ..Self::default()
        }
    }
}

impl QueryFilter for BatchDefinitionFilter {
    fn write_query(&self, query: &mut QueryString) {
        query
            .literal("vendorId", self.vendor_id)
            .text("tag", self.tag.as_deref())
            .number("minPrice", self.min_price)
            .number("maxPrice", self.max_price)
            .time("pickupAfter", self.pickup_after)
            .time("pickupBefore", self.pickup_before)
            .literal("pageNumber", self.page_number)
            .literal("pageSize", self.page_size);
    }
}

/// Constraints for listing batch inventories. Every field defaults to absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchInventoryFilter {
    pub status: Option<String>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub expire_after: Option<NaiveDateTime>,
    pub expire_before: Option<NaiveDateTime>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl QueryFilter for BatchInventoryFilter {
    fn write_query(&self, query: &mut QueryString) {
        query
            .text("status", self.status.as_deref())
            .literal("minQuantity", self.min_quantity)
            .literal("maxQuantity", self.max_quantity)
            .date_time("expireAfter", self.expire_after)
            .date_time("expireBefore", self.expire_before)
            .literal("pageNumber", self.page_number)
            .literal("pageSize", self.page_size);
    }
}
