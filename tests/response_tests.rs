//! Streaming download responses.

mod test_data_gen;

use std::sync::Arc;

use amcatable::{CsvExporter, DumpOptions, Encoding, Exporter, JsonlExporter};
use test_data_gen::{generate_table, LineExporter};

#[test]
fn test_response_with_filename_sets_attachment() {
    let response = Arc::new(CsvExporter::csv()).dump_response(
        Arc::new(generate_table(3)),
        Some("articles"),
        Encoding::Utf8,
    );
    assert_eq!(
        response.headers(),
        vec![
            ("Content-Type", "text/csv".to_string()),
            (
                "Content-Disposition",
                "attachment; filename=\"articles.csv\"".to_string()
            ),
        ]
    );
}

#[test]
fn test_response_without_filename_has_no_disposition() {
    let response =
        Arc::new(JsonlExporter::new()).dump_response(Arc::new(generate_table(3)), None, Encoding::Utf8);
    assert!(response.content_disposition.is_none());
    assert_eq!(response.headers().len(), 1);
    assert_eq!(response.content_type, "application/x-ndjson");
}

#[test]
fn test_response_body_streams_the_export() {
    let table = generate_table(2_000);
    let exporter = Arc::new(CsvExporter::tsv());
    let expected = exporter
        .dumps(&table, &DumpOptions::with_encoding(Encoding::Utf8Bom))
        .unwrap();

    let response = exporter.dump_response(Arc::new(table), Some("big"), Encoding::Utf8Bom);
    let body = response.into_body().into_bytes().unwrap();
    assert_eq!(body, expected);
}

#[test]
fn test_response_filename_becomes_worker_hint() {
    let exporter = Arc::new(LineExporter::default());
    let calls = Arc::clone(&exporter.calls);
    let response = exporter.dump_response(
        Arc::new(generate_table(4)),
        Some("articles"),
        Encoding::Utf8,
    );
    assert_eq!(
        response.content_disposition.as_deref(),
        Some("attachment; filename=\"articles.txt\"")
    );
    assert_eq!(response.into_body().count(), 4);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some("articles"));
    assert_eq!(calls[0].1.as_deref(), Some("amcatable-export"));
}
