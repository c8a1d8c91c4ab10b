use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::sql_types::{Int4, Nullable, Text};

use crate::db::DbPool;
use crate::domain::aggregation::group_by_key;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderFilter, OrderWithItems};
use crate::domain::order_item::{OrderItem, OrderItemInput};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{
    NewOrderItemRow, NewOrderRow, OrderChangeset, OrderItemRow, OrderRow, OrderWithItemsRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Pool(e.to_string())
    }
}

// ── Aggregation query ────────────────────────────────────────────────────────

const ORDERS_WITH_FILTERS: &str = "SELECT * FROM get_orders_with_filters($1, $2, $3)";

/// Run the aggregation function once and decode whatever it returns, so a
/// schema that no longer matches [`OrderWithItemsRow`] fails at startup rather
/// than on the first request.
pub fn verify_aggregation_query(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    let rows = diesel::sql_query(format!("{ORDERS_WITH_FILTERS} LIMIT 1"))
        .bind::<Nullable<Text>, _>(None::<String>)
        .bind::<Nullable<Text>, _>(None::<String>)
        .bind::<Nullable<Int4>, _>(None::<i32>)
        .load::<OrderWithItemsRow>(&mut conn)?;
    for row in rows {
        row.order()?;
        row.item()?;
    }
    Ok(())
}

/// Fold flat join rows into one `OrderWithItems` per order, in row order.
fn assemble(rows: Vec<OrderWithItemsRow>) -> Result<Vec<OrderWithItems>, DomainError> {
    let decoded = rows
        .into_iter()
        .map(|row| Ok((row.order()?, row.item()?)))
        .collect::<Result<Vec<(Order, Option<OrderItem>)>, DomainError>>()?;

    Ok(group_by_key(
        decoded,
        |(order, _)| order.id,
        |(order, _)| order.clone(),
        |(_, item)| item,
    )
    .into_iter()
    .map(|(order, items)| OrderWithItems { order, items })
    .collect())
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder, items: Vec<OrderItemInput>) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order to obtain its id
            let row: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    status: order.status.to_string(),
                    created_at: order.created_at,
                    updated_at: order.updated_at,
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 2. Insert the item batch, if there is one
            let mut total_value = BigDecimal::from(0);
            if !items.is_empty() {
                let new_items: Vec<NewOrderItemRow> = items
                    .into_iter()
                    .map(|item| NewOrderItemRow::new(row.id, item))
                    .collect();
                let stored: Vec<OrderItemRow> = diesel::insert_into(order_items::table)
                    .values(&new_items)
                    .returning(OrderItemRow::as_returning())
                    .get_results(conn)?;
                total_value = stored
                    .into_iter()
                    .map(|r| OrderItem::from(r).subtotal())
                    .fold(total_value, |acc, s| acc + s);
            }

            row.into_order(total_value)
        })
    }

    fn find_many(&self, filter: &OrderFilter) -> Result<Vec<OrderWithItems>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = diesel::sql_query(ORDERS_WITH_FILTERS)
            .bind::<Nullable<Text>, _>(filter.make.as_deref())
            .bind::<Nullable<Text>, _>(filter.model.as_deref())
            .bind::<Nullable<Int4>, _>(filter.year)
            .load::<OrderWithItemsRow>(&mut conn)?;
        log::debug!("Aggregation query returned {} row(s)", rows.len());

        assemble(rows)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderWithItems>, DomainError> {
        let mut conn = self.pool.get()?;

        let order: Option<OrderRow> = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items: Vec<OrderItem> = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load::<OrderItemRow>(&mut conn)?
            .into_iter()
            .map(OrderItem::from)
            .collect();

        let mut detail = OrderWithItems {
            order: order.into_order(BigDecimal::from(0))?,
            items,
        };
        detail.order.total_value = detail.items_total();
        Ok(Some(detail))
    }

    fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let found: bool = diesel::select(diesel::dsl::exists(orders::table.filter(orders::id.eq(id))))
            .get_result(&mut conn)?;
        Ok(found)
    }

    fn update(&self, order: &Order) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.find(order.id))
            .set(&OrderChangeset {
                status: order.status.to_string(),
                updated_at: order.updated_at,
            })
            .execute(&mut conn)?;
        Ok(updated > 0)
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // order_items rows go with it through ON DELETE CASCADE
        diesel::delete(orders::table.find(id)).execute(&mut conn)?;
        Ok(())
    }
}
