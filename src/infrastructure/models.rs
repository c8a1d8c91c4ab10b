use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Int4, Nullable, Numeric, Timestamptz, Varchar};

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::order_item::{OrderItem, OrderItemInput};
use crate::schema::{order_items, orders};

pub(crate) fn parse_status(raw: &str) -> Result<OrderStatus, DomainError> {
    OrderStatus::from_str(raw).map_err(|e| DomainError::InvalidData(e.to_string()))
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_order(self, total_value: BigDecimal) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            status: parse_status(&self.status)?,
            total_value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            make: row.make,
            model: row.model,
            year: row.year,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl NewOrderItemRow {
    pub fn new(order_id: i32, input: OrderItemInput) -> Self {
        Self {
            order_id,
            make: input.make,
            model: input.model,
            year: input.year,
            quantity: input.quantity,
            unit_price: input.unit_price,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = order_items)]
pub struct OrderItemChangeset<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub quantity: i32,
    pub unit_price: &'a BigDecimal,
}

impl<'a> From<&'a OrderItem> for OrderItemChangeset<'a> {
    fn from(item: &'a OrderItem) -> Self {
        Self {
            make: &item.make,
            model: &item.model,
            year: item.year,
            quantity: item.quantity,
            unit_price: &item.unit_price,
        }
    }
}

/// One row of `get_orders_with_filters`: order columns always present, item
/// columns NULL when the order has no (matching) item.
#[derive(Debug, Clone, QueryableByName)]
pub struct OrderWithItemsRow {
    #[diesel(sql_type = Int4)]
    pub order_id: i32,
    #[diesel(sql_type = Varchar)]
    pub status: String,
    #[diesel(sql_type = Numeric)]
    pub total_value: BigDecimal,
    #[diesel(sql_type = Timestamptz)]
    pub order_created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    pub order_updated_at: DateTime<Utc>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub item_id: Option<i32>,
    #[diesel(sql_type = Nullable<Varchar>)]
    pub make: Option<String>,
    #[diesel(sql_type = Nullable<Varchar>)]
    pub model: Option<String>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub year: Option<i32>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub quantity: Option<i32>,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub unit_price: Option<BigDecimal>,
}

impl OrderWithItemsRow {
    pub fn order(&self) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.order_id,
            status: parse_status(&self.status)?,
            total_value: self.total_value.clone(),
            created_at: self.order_created_at,
            updated_at: self.order_updated_at,
        })
    }

    /// The joined item, or `None` for the NULL side of the left join.
    pub fn item(self) -> Result<Option<OrderItem>, DomainError> {
        let Some(id) = self.item_id else {
            return Ok(None);
        };
        match (self.make, self.model, self.year, self.quantity, self.unit_price) {
            (Some(make), Some(model), Some(year), Some(quantity), Some(unit_price)) => {
                Ok(Some(OrderItem {
                    id,
                    order_id: self.order_id,
                    make,
                    model,
                    year,
                    quantity,
                    unit_price,
                }))
            }
            _ => Err(DomainError::InvalidData(format!(
                "item {} of order {} has NULL columns",
                id, self.order_id
            ))),
        }
    }
}
