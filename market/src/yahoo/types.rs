use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,

    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteSeries>,
}

/// OHLC columns. Yahoo pads candles without trades with `null`.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteSeries {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// First open and last close of the returned candles.
    ///
    /// `None` when the series holds no usable candle on either side.
    pub fn open_and_last(&self) -> Option<(f64, f64)> {
        let series = self.indicators.quote.first()?;
        let open = series.open.iter().flatten().copied().next()?;
        let last = series.close.iter().rev().flatten().copied().next()?;
        Some((open, last))
    }

    pub fn company_name(&self) -> Option<String> {
        self.meta
            .long_name
            .as_deref()
            .or(self.meta.short_name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
