//! Client for the hosted store's REST query interface (PostgREST dialect).

use async_trait::async_trait;
use farmhub_core::repository::{CustomerRepository, OrderRepository, RepoResult, RouteRepository};
use farmhub_shared::{Customer, DeliveryRoute, Masked, Order, OrderFeeUpdate};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::app_config::StoreConfig;
use crate::error::StoreError;

const ORDER_COLUMNS: &str = "id,customer_id,charge_delivery,delivery_price,total_price,created_at,\
order_items(quantity,price_per_unit)";
const CUSTOMER_COLUMNS: &str = "id,name,customer_type,free_delivery,delivery_route_id";
const ROUTE_COLUMNS: &str = "id,name,delivery_fee_home,delivery_fee_gastro,delivery_fee_wholesale,\
home_min_free_delivery,gastro_min_free_delivery,wholesale_min_free_delivery";

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    key: Masked<String>,
    bearer: Masked<String>,
    page_size: usize,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            key: config.key.clone(),
            bearer: config.bearer().clone(),
            page_size: config.page_size.max(1),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.key.expose())
            .bearer_auth(self.bearer.expose())
    }

    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }

    /// Read every row of `table`, one page at a time.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        table: &'static str,
        columns: &str,
        order: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table);
        let mut rows: Vec<T> = Vec::new();

        loop {
            let offset = rows.len();
            let query = [
                ("select", columns.to_string()),
                ("order", order.to_string()),
                ("limit", self.page_size.to_string()),
                ("offset", offset.to_string()),
            ];

            debug!(table, offset, "fetching page");
            let response = self.authorized(self.client.get(&url)).query(&query).send().await?;
            let body = Self::read_body(response).await?;
            let page: Vec<T> = serde_json::from_str(&body)?;

            let fetched = page.len();
            rows.extend(page);
            if fetched < self.page_size {
                break;
            }
        }

        info!(table, count = rows.len(), "fetched rows");
        Ok(rows)
    }
}

#[async_trait]
impl OrderRepository for RestStore {
    async fn list_orders(&self) -> RepoResult<Vec<Order>> {
        Ok(self
            .fetch_all("orders", ORDER_COLUMNS, "created_at.desc.nullslast,id.desc")
            .await?)
    }

    async fn update_order_fees(&self, id: Uuid, update: &OrderFeeUpdate) -> RepoResult<()> {
        let query = [("id", format!("eq.{}", id)), ("select", "id".to_string())];
        let response = self
            .authorized(self.client.patch(self.table_url("orders")))
            .query(&query)
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await
            .map_err(StoreError::from)?;

        let body = Self::read_body(response).await?;
        let updated: Vec<IgnoredAny> = serde_json::from_str(&body).map_err(StoreError::from)?;
        if updated.is_empty() {
            return Err(StoreError::RowNotFound { table: "orders", id }.into());
        }

        debug!(
            order_id = %id,
            delivery_price = %update.delivery_price,
            total_price = %update.total_price,
            "order fees written"
        );
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for RestStore {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        Ok(self.fetch_all("customers", CUSTOMER_COLUMNS, "id.asc").await?)
    }
}

#[async_trait]
impl RouteRepository for RestStore {
    async fn list_routes(&self) -> RepoResult<Vec<DeliveryRoute>> {
        Ok(self.fetch_all("delivery_routes", ROUTE_COLUMNS, "id.asc").await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let store = RestStore::new(&StoreConfig::new("https://farm.example.co/ ", "k")).unwrap();
        assert_eq!(store.table_url("orders"), "https://farm.example.co/rest/v1/orders");
    }

    #[test]
    fn test_route_columns_cover_schedule() {
        for column in [
            "delivery_fee_home",
            "delivery_fee_gastro",
            "delivery_fee_wholesale",
            "home_min_free_delivery",
            "gastro_min_free_delivery",
            "wholesale_min_free_delivery",
        ] {
            assert!(ROUTE_COLUMNS.split(',').any(|c| c == column), "{column}");
        }
    }
}
