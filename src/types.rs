use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring surplus-food offer published by a vendor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDefinition {
    pub id: i64,
    pub vendor_id: Uuid,
    pub description: String,
    pub tag: String,
    pub image_url: String,
    pub original_price: f64,
    pub discount_price: f64,
    pub pickup_start_time: NaiveTime,
    pub pickup_end_time: NaiveTime,
}

/// Concrete stock of a batch definition with an expiry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInventory {
    pub id: i64,
    pub batch_definition_id: i64,
    pub available_quantity: i32,
    pub status: String,
    pub expiry_date: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchDefinitionRequest {
    pub vendor_id: Uuid,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub image_url: Option<String>,
    pub original_price: f64,
    pub discount_price: f64,
    pub pickup_start_time: NaiveTime,
    pub pickup_end_time: NaiveTime,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchDefinitionRequest {
    pub id: i64,
    pub vendor_id: Uuid,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub image_url: Option<String>,
    pub original_price: f64,
    pub discount_price: f64,
    pub pickup_start_time: NaiveTime,
    pub pickup_end_time: NaiveTime,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchInventoryRequest {
    pub batch_definition_id: i64,
    pub available_quantity: i32,
    pub status: Option<String>,
    pub expiry_date: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchInventoryRequest {
    pub id: i64,
    pub batch_definition_id: i64,
    pub available_quantity: i32,
    pub status: String,
    pub expiry_date: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    use crate::{BatchDefinition, CreateBatchInventoryRequest};

    #[test]
    fn definition_deserializes_time_spans() {
        let definition: BatchDefinition = serde_json::from_value(json!({
            "id": 1,
            "vendorId": "12345678-1234-1234-1234-123456789012",
            "description": "Bread",
            "tag": "bakery",
            "imageUrl": "bread.jpg",
            "originalPrice": 10.0,
            "discountPrice": 8.5,
            "pickupStartTime": "10:00:00",
            "pickupEndTime": "12:30:00"
        }))
        .expect("must deserialize");

        assert_eq!(
            definition.pickup_end_time,
            NaiveTime::from_hms_opt(12, 30, 0).expect("valid time")
        );
        assert_eq!(definition.discount_price, 8.5);
    }

    #[test]
    fn requests_serialize_camel_case() {
        let request = CreateBatchInventoryRequest {
            batch_definition_id: 4,
            available_quantity: 12,
            status: None,
            expiry_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|date| date.and_hms_opt(18, 0, 0))
                .expect("valid date"),
        };
        let value = serde_json::to_value(&request).expect("must serialize");
        assert_eq!(value["batchDefinitionId"], 4);
        assert_eq!(value["availableQuantity"], 12);
        assert_eq!(value["expiryDate"], "2024-05-01T18:00:00");
    }
}
