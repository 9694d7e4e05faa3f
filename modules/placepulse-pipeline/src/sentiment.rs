//! Three-way sentiment labelling over a polarity score.

use placepulse_common::{CollectedReview, ReviewRecord, Sentiment};
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::text::normalize;

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Anything that maps text to a polarity in [-1, 1].
pub trait PolarityAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Lexicon-based analyzer backed by VADER's compound score.
pub struct VaderAnalyzer {
    inner: SentimentIntensityAnalyzer<'static>,
}

impl VaderAnalyzer {
    pub fn new() -> Self {
        Self {
            inner: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityAnalyzer for VaderAnalyzer {
    fn polarity(&self, text: &str) -> f64 {
        let scores = self.inner.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

/// Map a polarity score to a label. The cutoffs are strict: exactly 0.1 and
/// exactly -0.1 are neutral.
pub fn label_for(score: f64) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classify already-normalized text. Empty text is neutral and never reaches
/// the analyzer.
pub fn classify(clean_text: &str, analyzer: &dyn PolarityAnalyzer) -> Sentiment {
    if clean_text.trim().is_empty() {
        return Sentiment::Neutral;
    }
    label_for(analyzer.polarity(clean_text))
}

/// Fill in the derived fields (`text_clean`, `sentiment`) for collected reviews.
pub fn analyze_reviews(
    reviews: Vec<CollectedReview>,
    analyzer: &dyn PolarityAnalyzer,
) -> Vec<ReviewRecord> {
    reviews
        .into_iter()
        .map(|review| {
            let text_clean = normalize(&review.text);
            let sentiment = classify(&text_clean, analyzer);
            ReviewRecord::from_collected(review, text_clean, sentiment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedPolarity;

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(label_for(0.1), Sentiment::Neutral);
        assert_eq!(label_for(-0.1), Sentiment::Neutral);
        assert_eq!(label_for(0.0), Sentiment::Neutral);
        assert_eq!(label_for(0.100_001), Sentiment::Positive);
        assert_eq!(label_for(-0.100_001), Sentiment::Negative);
        assert_eq!(label_for(1.0), Sentiment::Positive);
        assert_eq!(label_for(-1.0), Sentiment::Negative);
    }

    #[test]
    fn boundary_scores_classify_neutral() {
        assert_eq!(classify("algo", &FixedPolarity::new(0.1)), Sentiment::Neutral);
        assert_eq!(classify("algo", &FixedPolarity::new(-0.1)), Sentiment::Neutral);
    }

    #[test]
    fn empty_text_skips_the_analyzer() {
        let analyzer = FixedPolarity::new(0.9);
        assert_eq!(classify("", &analyzer), Sentiment::Neutral);
        assert_eq!(classify("   ", &analyzer), Sentiment::Neutral);
        assert_eq!(analyzer.calls(), 0);

        assert_eq!(classify("great", &analyzer), Sentiment::Positive);
        assert_eq!(analyzer.calls(), 1);
    }

    #[test]
    fn vader_scores_obvious_english_text() {
        let analyzer = VaderAnalyzer::new();
        assert_eq!(
            classify("the food was great and the staff were wonderful", &analyzer),
            Sentiment::Positive
        );
        assert_eq!(
            classify("terrible service, horrible and rude", &analyzer),
            Sentiment::Negative
        );
        assert_eq!(classify("", &analyzer), Sentiment::Neutral);
    }

    #[test]
    fn analyze_fills_derived_fields() {
        let collected = vec![CollectedReview {
            place_id: "P1".to_string(),
            location_name: "Café Luna".to_string(),
            author_name: "Ana".to_string(),
            rating: Some(5),
            datetime_utc: None,
            text: "¡MUY\nBUENO! 🌟".to_string(),
        }];

        let analyzed = analyze_reviews(collected, &FixedPolarity::new(0.5));
        assert_eq!(analyzed.len(), 1);
        assert_eq!(analyzed[0].text_clean, "¡muy bueno!");
        assert_eq!(analyzed[0].sentiment, Sentiment::Positive);
        assert_eq!(analyzed[0].text, "¡MUY\nBUENO! 🌟");
    }
}
