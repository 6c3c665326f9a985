//! Past assessments: records, client-side filter/sort, and trend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::risk::RiskTier;

/// One past assessment as returned by the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub id: String,
    pub date: NaiveDate,
    /// Averaged prediction at the time (0.0 to 1.0)
    pub risk_level: f64,
    /// Accuracy of the best model
    pub accuracy: f64,
    pub best_model: String,
    pub age: u8,
    pub gender: String,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub cholesterol: f64,
    pub bmi: f64,
    pub heart_rate: f64,
}

impl HistoricalRecord {
    #[must_use]
    pub fn tier(&self) -> RiskTier {
        RiskTier::from_probability(self.risk_level)
    }

    /// Short date as matched by the search box (`M/D/YYYY`).
    #[must_use]
    pub fn short_date(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }

    /// Long date for the detail view (`Thursday, August 15, 2024`).
    #[must_use]
    pub fn long_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }

    /// Case-insensitive model match, or raw substring of the short date.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.best_model
            .to_lowercase()
            .contains(&query.to_lowercase())
            || self.short_date().contains(query)
    }
}

/// Sort order for the history list. All orders are descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Date,
    Risk,
    Accuracy,
}

impl SortKey {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Sort by Date",
            Self::Risk => "Sort by Risk Level",
            Self::Accuracy => "Sort by Accuracy",
        }
    }

    /// Cycle to the next sort key.
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Self::Date => Self::Risk,
            Self::Risk => Self::Accuracy,
            Self::Accuracy => Self::Date,
        }
    }
}

/// Filter + sort applied to a record set. Stable for equal keys.
#[must_use]
pub fn query<'a>(
    records: &'a [HistoricalRecord],
    search: &str,
    sort: SortKey,
) -> Vec<&'a HistoricalRecord> {
    let mut out: Vec<&HistoricalRecord> = records.iter().filter(|r| r.matches(search)).collect();
    match sort {
        SortKey::Date => out.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Risk => out.sort_by(|a, b| b.risk_level.total_cmp(&a.risk_level)),
        SortKey::Accuracy => out.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy)),
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increase,
    Decrease,
}

/// Change in risk between the two most recent assessments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// `latest - previous`, in probability units
    pub change: f64,
    /// Signed percentage change relative to the previous assessment
    pub percent_change: f64,
    pub direction: TrendDirection,
}

impl Trend {
    /// Magnitude of the percentage change.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percent_change.abs()
    }
}

/// Trend over the two most recent records by date.
///
/// Returns `None` with fewer than two records, or when the previous risk is
/// zero (no defined relative change).
#[must_use]
pub fn trend(records: &[HistoricalRecord]) -> Option<Trend> {
    let mut by_date: Vec<&HistoricalRecord> = records.iter().collect();
    by_date.sort_by(|a, b| b.date.cmp(&a.date));

    let (latest, previous) = match by_date.as_slice() {
        [latest, previous, ..] => (*latest, *previous),
        _ => return None,
    };

    if previous.risk_level == 0.0 {
        return None;
    }

    let change = latest.risk_level - previous.risk_level;
    Some(Trend {
        change,
        percent_change: change / previous.risk_level * 100.0,
        direction: if change > 0.0 {
            TrendDirection::Increase
        } else {
            TrendDirection::Decrease
        },
    })
}

/// Most recent record by date.
#[must_use]
pub fn latest(records: &[HistoricalRecord]) -> Option<&HistoricalRecord> {
    records.iter().max_by_key(|r| r.date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        date: (i32, u32, u32),
        risk: f64,
        accuracy: f64,
        model: &str,
    ) -> HistoricalRecord {
        HistoricalRecord {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
            risk_level: risk,
            accuracy,
            best_model: model.to_string(),
            age: 45,
            gender: "Male".to_string(),
            systolic_bp: 130.0,
            diastolic_bp: 85.0,
            cholesterol: 195.0,
            bmi: 26.5,
            heart_rate: 72.0,
        }
    }

    fn records() -> Vec<HistoricalRecord> {
        vec![
            record("1", (2024, 8, 15), 0.25, 0.92, "Neural Network"),
            record("2", (2024, 7, 20), 0.18, 0.89, "Random Forest"),
            record("3", (2024, 6, 10), 0.32, 0.87, "SVM"),
        ]
    }

    #[test]
    fn test_search_by_model() {
        let recs = records();
        let hits = query(&recs, "Neural", SortKey::Date);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].best_model, "Neural Network");

        assert_eq!(query(&recs, "forest", SortKey::Date).len(), 1);
        assert_eq!(query(&recs, "", SortKey::Date).len(), 3);
    }

    #[test]
    fn test_search_by_date() {
        let recs = records();
        let hits = query(&recs, "7/20", SortKey::Date);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
        assert_eq!(query(&recs, "2024", SortKey::Date).len(), 3);
    }

    #[test]
    fn test_sort_orders() {
        let recs = records();
        let ids = |sort| -> Vec<String> {
            query(&recs, "", sort).iter().map(|r| r.id.clone()).collect()
        };
        assert_eq!(ids(SortKey::Date), vec!["1", "2", "3"]);
        assert_eq!(ids(SortKey::Risk), vec!["3", "1", "2"]);
        assert_eq!(ids(SortKey::Accuracy), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_trend_uses_date_order() {
        let mut recs = records();
        recs.reverse();
        let t = trend(&recs).expect("two or more records");
        assert_eq!(t.direction, TrendDirection::Increase);
        assert!((t.change - 0.07).abs() < 1e-9);
        assert!((t.percent_change - 38.888_888_9).abs() < 1e-6);
    }

    #[test]
    fn test_trend_decrease_and_undefined() {
        let recs = vec![
            record("a", (2024, 1, 1), 0.40, 0.9, "SVM"),
            record("b", (2024, 2, 1), 0.30, 0.9, "SVM"),
        ];
        let t = trend(&recs).expect("two records");
        assert_eq!(t.direction, TrendDirection::Decrease);
        assert!((t.percentage() - 25.0).abs() < 1e-9);
        assert!(t.percent_change < 0.0);

        assert!(trend(&recs[..1]).is_none());
        assert!(trend(&[]).is_none());
    }

    #[test]
    fn test_latest_and_formats() {
        let recs = records();
        let l = latest(&recs).expect("non-empty");
        assert_eq!(l.id, "1");
        assert_eq!(l.short_date(), "8/15/2024");
        assert_eq!(l.long_date(), "Thursday, August 15, 2024");
        assert_eq!(l.tier(), RiskTier::Low);
    }
}
