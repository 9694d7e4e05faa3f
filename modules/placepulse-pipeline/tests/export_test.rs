//! File-level export: a batch written to disk, read back, and re-cleaned.

use std::time::Duration;

use placepulse_common::{PlacePulseError, Sentiment};
use placepulse_pipeline::export::{
    export_place_reports, export_reviews, export_summaries, load_collected, load_reviews, reclean,
};
use placepulse_pipeline::testing::{
    find_ok, metadata_page, review, review_page, KeywordPolarity, MockPlaces,
};
use placepulse_pipeline::{run_batch, BatchOptions, PlaceToken, ReviewOptions};

async fn sample_report() -> placepulse_pipeline::BatchReport {
    let api = MockPlaces::new()
        .on_review_page(
            "ABC123",
            None,
            review_page(
                Some("Taquería Don Pepe"),
                vec![
                    review("Ana, \"la jefa\"", Some(5.0), "Excelente,\nvolveré", Some(1_700_000_000)),
                    review("Luis", None, "", None),
                ],
                None,
            ),
        )
        .on_metadata("ABC123", metadata_page("Taquería Don Pepe", 4.4, 321));
    let options = BatchOptions {
        reviews: ReviewOptions {
            page_delay: Duration::ZERO,
            ..Default::default()
        },
        include_metadata: true,
    };
    run_batch(
        &api,
        &KeywordPolarity,
        &[PlaceToken::Id("ABC123".to_string())],
        &options,
    )
    .await
}

#[tokio::test]
async fn exported_reviews_load_back_unchanged() {
    let report = sample_report().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews_with_sentiment.csv");

    export_reviews(&path, &report.reviews).unwrap();
    let loaded = load_reviews(&path).unwrap();

    assert_eq!(loaded, report.reviews);
    assert_eq!(loaded[0].sentiment, Sentiment::Positive);
    assert_eq!(loaded[1].sentiment, Sentiment::Neutral);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with(
        "place_id,location_name,author_name,rating,datetime_utc,text,text_clean,sentiment\n"
    ));
    assert!(raw.contains("2023-11-14 22:13:20"));
}

#[tokio::test]
async fn metadata_and_summary_files_are_written() {
    let report = sample_report().await;
    let dir = tempfile::tempdir().unwrap();
    let meta_path = dir.path().join("places.csv");
    let summary_path = dir.path().join("summary.csv");

    export_place_reports(&meta_path, &report.place_reports()).unwrap();
    export_summaries(&summary_path, &report.summaries()).unwrap();

    let meta = std::fs::read_to_string(&meta_path).unwrap();
    let mut lines = meta.lines();
    assert!(lines.next().unwrap().starts_with("place_id,name,rating,user_ratings_total"));
    assert!(lines.next().unwrap().starts_with("ABC123,Taquería Don Pepe,4.4,321,"));

    let summary = std::fs::read_to_string(&summary_path).unwrap();
    assert_eq!(
        summary,
        "location_name,review_count,avg_rating,pct_positive,last_review_date\n\
         Taquería Don Pepe,2,5.0,50.0,2023-11-14 22:13:20\n"
    );
}

#[test]
fn reclean_rewrites_a_double_encoded_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.csv");
    std::fs::write(
        &input,
        "place_id,location_name,author_name,rating,datetime_utc,text,text_clean,sentiment\n\
         P1,Luna,JosÃ©,4,2024-01-02 03:04:05,Muy BUENO el cafÃ©,,neutral\n",
    )
    .unwrap();

    let cleaned = reclean(load_collected(&input).unwrap(), &KeywordPolarity);
    assert_eq!(cleaned[0].author_name, "José");
    assert_eq!(cleaned[0].text_clean, "muy bueno el café");
    assert_eq!(cleaned[0].sentiment, Sentiment::Positive);
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_reviews(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, PlacePulseError::Io(_)));
}

#[test]
fn reclean_accepts_a_collector_only_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reviews_combined.csv");
    std::fs::write(
        &input,
        "place_id,location_name,author_name,rating,datetime_utc,text\n\
         P1,Luna,Ana,5,,Excelente cafÃ©\n\
         P1,Luna,Beto,,,\n",
    )
    .unwrap();

    let cleaned = reclean(load_collected(&input).unwrap(), &KeywordPolarity);
    let output = dir.path().join("reviews_clean.csv");
    export_reviews(&output, &cleaned).unwrap();

    let reloaded = load_reviews(&output).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[0].text, "Excelente café");
    assert_eq!(reloaded[0].text_clean, "excelente café");
    assert_eq!(reloaded[0].sentiment, Sentiment::Positive);
    assert_eq!(reloaded[1].rating, None);
    assert_eq!(reloaded[1].sentiment, Sentiment::Neutral);
}

#[tokio::test]
async fn place_report_rows_with_a_renamed_place_have_empty_summary_fields() {
    // The metadata call returns a different display name than the review pages,
    // so the exact-name join finds no summary for that place.
    let api = MockPlaces::new()
        .on_find("Café Luna", find_ok("XYZ999", "Café Luna", "Calle 5"))
        .on_review_page(
            "ABC123",
            None,
            review_page(
                Some("Taquería Don Pepe"),
                vec![review("Ana", Some(4.0), "bueno", Some(1_700_000_000))],
                None,
            ),
        )
        .on_review_page(
            "XYZ999",
            None,
            review_page(Some("Café Luna"), vec![review("Eva", Some(5.0), "great", None)], None),
        )
        .on_metadata("ABC123", metadata_page("Taquería Don Pepe", 4.4, 321))
        .on_metadata("XYZ999", metadata_page("Café Luna Centro", 4.8, 57));
    let options = BatchOptions {
        reviews: ReviewOptions {
            page_delay: Duration::ZERO,
            ..Default::default()
        },
        include_metadata: true,
    };
    let report = run_batch(
        &api,
        &KeywordPolarity,
        &[
            PlaceToken::Id("ABC123".to_string()),
            PlaceToken::Name("Café Luna".to_string()),
        ],
        &options,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.csv");
    export_place_reports(&path, &report.place_reports()).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(",open_now,review_count,avg_rating,pct_positive,last_review_date"));
    assert!(lines[1].starts_with("ABC123,Taquería Don Pepe,4.4,321,"));
    assert!(lines[1].ends_with(",true,1,4.0,100.0,2023-11-14 22:13:20"));
    assert!(lines[2].starts_with("XYZ999,Café Luna Centro,4.8,57,"));
    assert!(lines[2].ends_with(",true,,,,"));
}
