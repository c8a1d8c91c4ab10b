use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order_item::{OrderItem, OrderItemInput};
use crate::domain::ports::OrderItemRepository;
use crate::schema::order_items;

use super::models::{NewOrderItemRow, OrderItemChangeset, OrderItemRow};

#[derive(Clone)]
pub struct DieselOrderItemRepository {
    pool: DbPool,
}

impl DieselOrderItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderItemRepository for DieselOrderItemRepository {
    fn create(&self, order_id: i32, item: OrderItemInput) -> Result<OrderItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row: OrderItemRow = diesel::insert_into(order_items::table)
            .values(&NewOrderItemRow::new(order_id, item))
            .returning(OrderItemRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_many(&self) -> Result<Vec<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_items::table
            .select(OrderItemRow::as_select())
            .order((order_items::order_id.asc(), order_items::id.asc()))
            .load::<OrderItemRow>(&mut conn)?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = order_items::table
            .find(id)
            .select(OrderItemRow::as_select())
            .first::<OrderItemRow>(&mut conn)
            .optional()?;
        Ok(row.map(OrderItem::from))
    }

    fn update(&self, item: &OrderItem) -> Result<Option<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<OrderItemRow> = diesel::update(order_items::table.find(item.id))
            .set(&OrderItemChangeset::from(item))
            .returning(OrderItemRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(OrderItem::from))
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(order_items::table.find(id)).execute(&mut conn)?;
        Ok(())
    }

    fn distinct_makes(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(order_items::table
            .select(order_items::make)
            .distinct()
            .order(order_items::make.asc())
            .load::<String>(&mut conn)?)
    }

    fn distinct_models(&self, make: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(order_items::table
            .filter(order_items::make.eq(make))
            .select(order_items::model)
            .distinct()
            .order(order_items::model.asc())
            .load::<String>(&mut conn)?)
    }

    fn distinct_years(&self, make: &str, model: &str) -> Result<Vec<i32>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(order_items::table
            .filter(order_items::make.eq(make))
            .filter(order_items::model.eq(model))
            .select(order_items::year)
            .distinct()
            .order(order_items::year.desc())
            .load::<i32>(&mut conn)?)
    }
}
