use crate::error::{AppError, AppResult};
use crate::models::{
    AggregateValues, GoldPrice, MonthlyAggregate, Period, PriceAggregate, PriceStatistics,
    YearlyAggregate,
};
use crate::repositories::GoldPriceRepository;
use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Service providing filtered and aggregated price views
pub struct PriceProviderService {
    price_repo: Arc<GoldPriceRepository>,
    today: Option<NaiveDate>,
}

impl PriceProviderService {
    pub fn new(price_repo: Arc<GoldPriceRepository>) -> Self {
        Self {
            price_repo,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    ///
    /// The source page publishes dates in its local calendar, so the default
    /// uses the host's local date rather than UTC.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Records within an inclusive date range, oldest first
    pub async fn get_daily_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<GoldPrice>> {
        Ok(self.price_repo.find_in_range(start_date, end_date).await?)
    }

    /// Most recent record
    pub async fn get_latest_price(&self) -> AppResult<Option<GoldPrice>> {
        Ok(self.price_repo.find_latest().await?)
    }

    /// Records from the period's start up to today
    pub async fn get_prices_by_period(&self, period: Period) -> AppResult<Vec<GoldPrice>> {
        let today = self.today();
        let start = period.start_date(today);
        debug!("Resolving period {} to {:?}..={}", period, start, today);
        self.get_daily_prices(start, Some(today)).await
    }

    /// Like `get_prices_by_period` but rejects unknown tokens
    pub async fn get_prices_by_period_token(&self, token: &str) -> AppResult<Vec<GoldPrice>> {
        let period = Period::parse(token).map_err(AppError::Validation)?;
        self.get_prices_by_period(period).await
    }

    /// Per-month averages, oldest month first
    pub async fn get_monthly_aggregated_data(&self) -> AppResult<Vec<MonthlyAggregate>> {
        let records = self.price_repo.find_all().await?;
        Ok(aggregate_by(&records, |d| format!("{}-{:02}", d.year(), d.month()))
            .into_iter()
            .map(MonthlyAggregate::from)
            .collect())
    }

    /// Per-year averages, oldest year first
    pub async fn get_yearly_aggregated_data(&self) -> AppResult<Vec<YearlyAggregate>> {
        let records = self.price_repo.find_all().await?;
        Ok(aggregate_by(&records, |d| d.year().to_string())
            .into_iter()
            .map(YearlyAggregate::from)
            .collect())
    }

    /// Statistics for a period; `None` when the period holds no records
    pub async fn get_price_statistics(&self, period: Period) -> AppResult<Option<PriceStatistics>> {
        let prices = self.get_prices_by_period(period).await?;
        Ok(compute_statistics(period, &prices))
    }
}

/// Group records by `key_of(date)` and average every price field.
///
/// Groups come out in ascending key order.
pub fn aggregate_by<F>(records: &[GoldPrice], key_of: F) -> Vec<PriceAggregate>
where
    F: Fn(NaiveDate) -> String,
{
    let mut groups: BTreeMap<String, Vec<&GoldPrice>> = BTreeMap::new();
    for record in records {
        groups.entry(key_of(record.date)).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(key, group)| PriceAggregate {
            values: AggregateValues {
                avg_gold_ounce: mean(&group, |r| r.gold_ounce),
                avg_carat_24_1gram: mean(&group, |r| r.carat_24_1gram),
                avg_carat_22_1gram: mean(&group, |r| r.carat_22_1gram),
                avg_carat_22_8grams: mean(&group, |r| r.carat_22_8grams),
                avg_carat_21_1gram: mean(&group, |r| r.carat_21_1gram),
                min_price: min_of(group.iter().map(|r| r.carat_22_1gram)),
                max_price: max_of(group.iter().map(|r| r.carat_22_1gram)),
                data_points: group.len(),
            },
            key,
        })
        .collect()
}

fn mean(group: &[&GoldPrice], field: impl Fn(&GoldPrice) -> f64) -> f64 {
    group.iter().map(|r| field(*r)).sum::<f64>() / group.len() as f64
}

fn min_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

/// Summarize the 22 carat price over `prices`, which must be sorted by date
pub fn compute_statistics(period: Period, prices: &[GoldPrice]) -> Option<PriceStatistics> {
    let first = prices.first()?;
    let last = prices.last()?;

    let values: Vec<f64> = prices.iter().map(|p| p.carat_22_1gram).collect();
    let start_price = first.carat_22_1gram;
    let current_price = last.carat_22_1gram;

    let price_change = if prices.len() > 1 {
        current_price - start_price
    } else {
        0.0
    };
    let price_change_percentage = if prices.len() > 1 && start_price > 0.0 {
        price_change / start_price * 100.0
    } else {
        0.0
    };

    Some(PriceStatistics {
        period,
        count: prices.len(),
        start_price,
        current_price,
        min_price: min_of(values.iter().copied()),
        max_price: max_of(values.iter().copied()),
        avg_price: values.iter().sum::<f64>() / values.len() as f64,
        start_date: first.date,
        end_date: last.date,
        price_change,
        price_change_percentage,
    })
}
