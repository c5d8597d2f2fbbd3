use crate::config::DashboardConfig;
use crate::error::Result;
use crate::ingestion::{parse_expenses_csv, parse_sales_csv};
use crate::schema::{ExpenseRecord, FeedSnapshot, SalesRecord};
use log::{debug, error, info, warn};
use reqwest::Client;

/// Fetches the two published spreadsheet exports.
#[derive(Clone)]
pub struct FeedLoader {
    client: Client,
    sales_url: String,
    expenses_url: String,
}

impl FeedLoader {
    pub fn new(sales_url: impl Into<String>, expenses_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            sales_url: sales_url.into(),
            expenses_url: expenses_url.into(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.sales_url.clone(), config.expenses_url.clone())
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        let body = res.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    pub async fn load_sales(&self) -> Result<Vec<SalesRecord>> {
        let text = self.fetch_text(&self.sales_url).await?;
        parse_sales_csv(&text)
    }

    pub async fn load_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let text = self.fetch_text(&self.expenses_url).await?;
        parse_expenses_csv(&text)
    }

    /// Loads both feeds. Never fails: a broken sales feed yields an empty
    /// table plus a visible error, a broken expense feed an empty table.
    pub async fn load(&self) -> FeedSnapshot {
        let (sales, sales_error) = match self.load_sales().await {
            Ok(sales) => (sales, None),
            Err(e) => {
                error!("Failed to load sales feed: {}", e);
                (Vec::new(), Some(format!("Error cargando Ventas: {}", e)))
            }
        };

        let expenses = self.load_expenses().await.unwrap_or_else(|e| {
            warn!("Failed to load expense feed, ad spend will read as zero: {}", e);
            Vec::new()
        });

        info!(
            "Loaded {} sales rows and {} expense rows",
            sales.len(),
            expenses.len()
        );

        let snapshot = FeedSnapshot::new(sales, expenses);
        match sales_error {
            Some(message) => snapshot.with_sales_error(message),
            None => snapshot,
        }
    }
}
