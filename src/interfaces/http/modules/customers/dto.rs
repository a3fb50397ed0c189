use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::sales::CustomerInput;
use crate::domain::Customer;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            created_time: c.created_time,
            modified_time: c.modified_time,
        }
    }
}

/// Create and full update share one body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "full_name": "Tran Thi B",
    "phone": "0901234567",
    "email": "b.tran@example.com",
    "address": "12 Hang Bai, Ha Noi"
}))]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters"))]
    pub full_name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

impl From<CustomerRequest> for CustomerInput {
    fn from(r: CustomerRequest) -> Self {
        Self {
            full_name: r.full_name,
            phone: r.phone,
            email: r.email,
            address: r.address,
        }
    }
}
