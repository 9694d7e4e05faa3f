//! Aggregates over analyzed reviews: per-location summaries, headline KPIs,
//! sentiment distribution, daily rating trend, and the metadata join.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use placepulse_common::{LocationSummary, PlaceMetadata, ReviewRecord, Sentiment};

#[derive(Default)]
struct RatingAcc {
    sum: f64,
    count: usize,
}

impl RatingAcc {
    fn push(&mut self, rating: Option<u8>) {
        if let Some(r) = rating {
            self.sum += f64::from(r);
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Group reviews by `location_name`.
///
/// Absent ratings are skipped for the mean (numerator and denominator);
/// `pct_positive` is over every review in the group.
pub fn summarize(reviews: &[ReviewRecord]) -> BTreeMap<String, LocationSummary> {
    #[derive(Default)]
    struct Group {
        reviews: usize,
        positive: usize,
        ratings: RatingAcc,
        last: Option<NaiveDateTime>,
    }

    let mut groups: BTreeMap<&str, Group> = BTreeMap::new();
    for review in reviews {
        let group = groups.entry(review.location_name.as_str()).or_default();
        group.reviews += 1;
        if review.sentiment == Sentiment::Positive {
            group.positive += 1;
        }
        group.ratings.push(review.rating);
        group.last = group.last.max(review.datetime_utc);
    }

    groups
        .into_iter()
        .map(|(name, g)| {
            let summary = LocationSummary {
                location_name: name.to_string(),
                review_count: g.reviews,
                avg_rating: g.ratings.mean(),
                pct_positive: percent(g.positive, g.reviews),
                last_review_date: g.last,
            };
            (name.to_string(), summary)
        })
        .collect()
}

/// Headline numbers for a review set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewKpis {
    pub total_reviews: usize,
    pub distinct_places: usize,
    pub avg_rating: Option<f64>,
    pub pct_positive: Option<f64>,
    pub max_rating: Option<u8>,
    pub min_rating: Option<u8>,
}

pub fn kpis(reviews: &[ReviewRecord]) -> ReviewKpis {
    let mut ratings = RatingAcc::default();
    let mut positive = 0;
    let mut places = HashSet::new();

    for review in reviews {
        ratings.push(review.rating);
        places.insert(review.place_id.as_str());
        if review.sentiment == Sentiment::Positive {
            positive += 1;
        }
    }

    ReviewKpis {
        total_reviews: reviews.len(),
        distinct_places: places.len(),
        avg_rating: ratings.mean(),
        pct_positive: (!reviews.is_empty()).then(|| percent(positive, reviews.len())),
        max_rating: reviews.iter().filter_map(|r| r.rating).max(),
        min_rating: reviews.iter().filter_map(|r| r.rating).min(),
    }
}

impl fmt::Display for ReviewKpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
        }

        writeln!(f, "Total reviews:      {}", self.total_reviews)?;
        writeln!(f, "Distinct places:    {}", self.distinct_places)?;
        writeln!(f, "Average rating:     {}", opt(self.avg_rating.map(|r| format!("{r:.2}"))))?;
        writeln!(f, "Positive reviews:   {}", opt(self.pct_positive.map(|p| format!("{p:.1}%"))))?;
        writeln!(f, "Highest rating:     {}", opt(self.max_rating))?;
        write!(f, "Lowest rating:      {}", opt(self.min_rating))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

impl fmt::Display for SentimentCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        for (i, sentiment) in Sentiment::ALL.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let n = self.get(*sentiment);
            write!(f, "  {:<9} {:>4} ({:.0}%)", sentiment, n, percent(n, total))?;
        }
        Ok(())
    }
}

pub fn sentiment_distribution(reviews: &[ReviewRecord]) -> SentimentCounts {
    reviews
        .iter()
        .fold(SentimentCounts::default(), |mut counts, r| {
            match r.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Negative => counts.negative += 1,
                Sentiment::Neutral => counts.neutral += 1,
            }
            counts
        })
}

/// Mean rating per calendar day (UTC). Reviews without a timestamp or a rating are skipped.
pub fn rating_by_date(reviews: &[ReviewRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut days: BTreeMap<NaiveDate, RatingAcc> = BTreeMap::new();
    for review in reviews {
        if let (Some(at), Some(_)) = (review.datetime_utc, review.rating) {
            days.entry(at.date()).or_default().push(review.rating);
        }
    }
    days.into_iter()
        .filter_map(|(day, acc)| acc.mean().map(|m| (day, m)))
        .collect()
}

/// Place metadata with its review summary, if the names matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceReport {
    pub metadata: PlaceMetadata,
    pub summary: Option<LocationSummary>,
}

/// Left merge of metadata onto summaries by exact name equality. No fuzzy
/// matching: a name that differs between the two calls leaves `summary` empty.
pub fn join_metadata(
    metadata: &[PlaceMetadata],
    summaries: &BTreeMap<String, LocationSummary>,
) -> Vec<PlaceReport> {
    metadata
        .iter()
        .map(|m| PlaceReport {
            metadata: m.clone(),
            summary: summaries.get(&m.name).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use placepulse_common::datetime_from_epoch;

    fn record(location: &str, rating: Option<u8>, sentiment: Sentiment, secs: Option<i64>) -> ReviewRecord {
        ReviewRecord {
            place_id: format!("pid-{location}"),
            location_name: location.to_string(),
            author_name: "someone".to_string(),
            rating,
            datetime_utc: secs.and_then(datetime_from_epoch),
            text: String::new(),
            text_clean: String::new(),
            sentiment,
        }
    }

    #[test]
    fn absent_ratings_are_excluded_from_mean() {
        let reviews = vec![
            record("Luna", Some(4), Sentiment::Positive, None),
            record("Luna", Some(5), Sentiment::Positive, None),
            record("Luna", None, Sentiment::Neutral, None),
            record("Luna", Some(3), Sentiment::Negative, None),
        ];
        let summaries = summarize(&reviews);
        let luna = &summaries["Luna"];
        assert_eq!(luna.avg_rating, Some(4.0));
        assert_eq!(luna.review_count, 4);
        assert_eq!(luna.pct_positive, 50.0);
    }

    #[test]
    fn groups_by_location_and_tracks_latest() {
        let reviews = vec![
            record("A", Some(5), Sentiment::Positive, Some(1_000)),
            record("B", None, Sentiment::Negative, None),
            record("A", Some(1), Sentiment::Negative, Some(5_000)),
            record("A", Some(3), Sentiment::Neutral, None),
        ];
        let summaries = summarize(&reviews);
        assert_eq!(summaries.len(), 2);

        let a = &summaries["A"];
        assert_eq!(a.last_review_date, datetime_from_epoch(5_000));
        assert_eq!(a.avg_rating, Some(3.0));
        assert!((a.pct_positive - 100.0 / 3.0).abs() < 1e-9);

        let b = &summaries["B"];
        assert_eq!(b.avg_rating, None);
        assert_eq!(b.last_review_date, None);
        assert_eq!(b.pct_positive, 0.0);
    }

    #[test]
    fn kpis_over_mixed_reviews() {
        let reviews = vec![
            record("A", Some(5), Sentiment::Positive, None),
            record("A", Some(2), Sentiment::Negative, None),
            record("B", None, Sentiment::Positive, None),
            record("C", Some(4), Sentiment::Neutral, None),
        ];
        let k = kpis(&reviews);
        assert_eq!(k.total_reviews, 4);
        assert_eq!(k.distinct_places, 3);
        assert_eq!(k.avg_rating, Some(11.0 / 3.0));
        assert_eq!(k.pct_positive, Some(50.0));
        assert_eq!(k.max_rating, Some(5));
        assert_eq!(k.min_rating, Some(2));
    }

    #[test]
    fn kpis_of_nothing_are_absent() {
        let k = kpis(&[]);
        assert_eq!(k.total_reviews, 0);
        assert_eq!(k.avg_rating, None);
        assert_eq!(k.pct_positive, None);
        assert!(k.to_string().contains("Average rating:     -"));
    }

    #[test]
    fn distribution_counts_each_label() {
        let reviews = vec![
            record("A", None, Sentiment::Positive, None),
            record("A", None, Sentiment::Positive, None),
            record("A", None, Sentiment::Neutral, None),
        ];
        let counts = sentiment_distribution(&reviews);
        assert_eq!(counts.positive, 2);
        assert_eq!(counts.negative, 0);
        assert_eq!(counts.neutral, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn rating_trend_is_daily_mean() {
        let day = 86_400;
        let reviews = vec![
            record("A", Some(5), Sentiment::Positive, Some(day * 10 + 60)),
            record("A", Some(3), Sentiment::Neutral, Some(day * 10 + 3_600)),
            record("A", Some(1), Sentiment::Negative, Some(day * 11)),
            record("A", None, Sentiment::Neutral, Some(day * 12)),
            record("A", Some(4), Sentiment::Neutral, None),
        ];
        let trend = rating_by_date(&reviews);
        let values: Vec<f64> = trend.values().copied().collect();
        assert_eq!(values, vec![4.0, 1.0]);
        assert_eq!(
            trend.keys().next().copied(),
            NaiveDate::from_ymd_opt(1970, 1, 11)
        );
    }

    #[test]
    fn join_is_exact_name_left_merge() {
        let summaries = summarize(&[record("Café Luna", Some(4), Sentiment::Positive, None)]);
        let meta = |name: &str| PlaceMetadata {
            place_id: "P".to_string(),
            name: name.to_string(),
            rating: Some(4.5),
            user_ratings_total: Some(10),
            formatted_address: None,
            types: Vec::new(),
            location: None,
            phone: None,
            website: None,
            price_level: None,
            business_status: None,
            open_now: None,
        };

        let joined = join_metadata(&[meta("Café Luna"), meta("Cafe Luna")], &summaries);
        assert_eq!(joined.len(), 2);
        assert!(joined[0].summary.is_some());
        assert!(joined[1].summary.is_none());
    }
}
