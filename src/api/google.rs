//! Implements the `Sheet` trait using the `sheets::Client` to interact with a
//! Google sheet.

use crate::api::{auth, Sheet, SheetRange};
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use sheets::types::{
    BatchClearValuesRequest, BatchUpdateValuesRequest, DateTimeRenderOption, Dimension,
    ValueInputOption, ValueRange, ValueRenderOption,
};
use tracing::trace;

/// Implements the `Sheet` trait against the configured Google spreadsheet. A
/// fresh access token is minted when the connection is opened; connections are
/// short-lived, one per store operation.
pub(super) struct GoogleSheet {
    config: Config,
    client: sheets::Client,
}

impl GoogleSheet {
    pub(super) async fn new(config: Config) -> Result<Self> {
        let access_token = auth::access_token(&config).await?;

        // The sheets crate wants OAuth client fields, but API calls only need
        // the access token.
        let client = sheets::Client::new(
            String::new(),
            String::new(),
            String::new(),
            access_token,
            String::new(),
        );
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn get(&mut self, range: &str) -> Result<Vec<Vec<String>>> {
        trace!("get {range}");
        let response = self
            .client
            .spreadsheets()
            .values_get(
                self.config.spreadsheet_id(),
                range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch range {range}"))?;
        Ok(response.body.values)
    }

    async fn write_ranges(&mut self, data: &[SheetRange]) -> Result<()> {
        trace!(
            "write_ranges {:?}",
            data.iter().map(|d| d.range.as_str()).collect::<Vec<_>>()
        );
        let value_ranges: Vec<ValueRange> = data
            .iter()
            .map(|sr| ValueRange {
                major_dimension: Some(Dimension::Rows),
                range: sr.range.clone(),
                values: sr.values.clone(),
            })
            .collect();

        let request = BatchUpdateValuesRequest {
            data: value_ranges,
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };

        self.client
            .spreadsheets()
            .values_batch_update(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| "Failed to write ranges")?;
        Ok(())
    }

    async fn clear_ranges(&mut self, ranges: &[&str]) -> Result<()> {
        trace!("clear_ranges {ranges:?}");
        let request = BatchClearValuesRequest {
            ranges: ranges.iter().map(|s| s.to_string()).collect(),
        };
        self.client
            .spreadsheets()
            .values_batch_clear(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to clear ranges: {:?}", ranges))?;
        Ok(())
    }
}

fn map_client_error(e: sheets::ClientError) -> anyhow::Error {
    anyhow!("Google Sheets client error: {e}")
}
