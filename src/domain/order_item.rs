use bigdecimal::BigDecimal;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderItem {
    /// `quantity × unit_price`. Never stored.
    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }

    /// Overwrite every user-editable field with `input`.
    pub fn apply(&mut self, input: OrderItemInput) {
        self.make = input.make;
        self.model = input.model;
        self.year = input.year;
        self.quantity = input.quantity;
        self.unit_price = input.unit_price;
    }
}

/// User supplied item fields, already validated at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}
