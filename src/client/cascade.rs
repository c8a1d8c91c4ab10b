use super::{ClientError, OrdersClient};
use crate::domain::order::OrderFilter;

/// State of the dependent make → model → year filter.
///
/// Choosing a value at one level clears every level below it, and the options
/// for a level are only loaded once the level above has a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCascade {
    pub make_options: Vec<String>,
    pub model_options: Vec<String>,
    pub year_options: Vec<i32>,
    pub selected_make: Option<String>,
    pub selected_model: Option<String>,
    pub selected_year: Option<i32>,
}

impl FilterCascade {
    pub fn select_make(&mut self, make: Option<String>) {
        self.selected_make = make;
        self.selected_model = None;
        self.selected_year = None;
        self.model_options.clear();
        self.year_options.clear();
    }

    pub fn select_model(&mut self, model: Option<String>) {
        self.selected_model = model;
        self.selected_year = None;
        self.year_options.clear();
    }

    pub fn select_year(&mut self, year: Option<i32>) {
        self.selected_year = year;
    }

    /// All three levels chosen.
    pub fn is_complete(&self) -> bool {
        self.selected_make.is_some() && self.selected_model.is_some() && self.selected_year.is_some()
    }

    pub fn model_disabled(&self) -> bool {
        self.selected_make.is_none() || self.model_options.is_empty()
    }

    pub fn year_disabled(&self) -> bool {
        self.selected_model.is_none() || self.year_options.is_empty()
    }

    /// The listing filter, once every level is chosen.
    pub fn filter(&self) -> Option<OrderFilter> {
        if !self.is_complete() {
            return None;
        }
        Some(OrderFilter {
            make: self.selected_make.clone(),
            model: self.selected_model.clone(),
            year: self.selected_year,
        })
    }

    /// Drop every selection and the dependent option lists; makes stay loaded.
    pub fn clear(&mut self) {
        self.select_make(None);
    }

    pub async fn load_makes(&mut self, client: &OrdersClient) -> Result<(), ClientError> {
        self.make_options = client.makes().await?;
        Ok(())
    }

    /// Select `make` and load its models.
    pub async fn choose_make(
        &mut self,
        client: &OrdersClient,
        make: Option<String>,
    ) -> Result<(), ClientError> {
        self.select_make(make);
        if let Some(make) = &self.selected_make {
            self.model_options = client.models(make).await?;
        }
        Ok(())
    }

    /// Select `model` and load the years of the chosen make / model.
    pub async fn choose_model(
        &mut self,
        client: &OrdersClient,
        model: Option<String>,
    ) -> Result<(), ClientError> {
        self.select_model(model);
        if let (Some(make), Some(model)) = (&self.selected_make, &self.selected_model) {
            self.year_options = client.years(make, model).await?;
        }
        Ok(())
    }
}
