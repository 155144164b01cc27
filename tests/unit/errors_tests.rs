/*!
 * Tests for error types
 */

use ytsubdl::errors::{
    AppError, CatalogError, DeliveryError, FetchFailure, ParseError, TrackDiagnostic, TransportError,
};

#[test]
fn test_fetch_failure_kind_shouldTagEveryVariant() {
    assert_eq!(FetchFailure::Network("x".into()).kind(), "network");
    assert_eq!(FetchFailure::Timeout.kind(), "timeout");
    assert_eq!(FetchFailure::HttpStatus { code: 500 }.kind(), "http_status");
    assert_eq!(FetchFailure::EmptyBody.kind(), "empty_body");
    assert_eq!(FetchFailure::Unparseable(ParseError::NoRecognizedCues).kind(), "unparseable");
    assert_eq!(FetchFailure::EmptyContent.kind(), "empty_content");
}

#[test]
fn test_fetch_failure_hint_shouldExplainOnly404And403() {
    assert!(FetchFailure::HttpStatus { code: 404 }.hint().unwrap().contains("not found"));
    assert!(FetchFailure::HttpStatus { code: 403 }.hint().unwrap().contains("denied"));
    assert_eq!(FetchFailure::HttpStatus { code: 500 }.hint(), None);
    assert_eq!(FetchFailure::Timeout.hint(), None);
}

#[test]
fn test_fetch_failure_fromTransportError_shouldMapVariants() {
    assert_eq!(FetchFailure::from(TransportError::Timeout), FetchFailure::Timeout);
    assert_eq!(
        FetchFailure::from(TransportError::Network("refused".into())),
        FetchFailure::Network("refused".into())
    );
}

#[test]
fn test_fetch_failure_display_shouldIncludeStatusCode() {
    assert_eq!(FetchFailure::HttpStatus { code: 404 }.to_string(), "server error: HTTP 404");
}

#[test]
fn test_catalog_error_display_shouldIncludeDiagnostic() {
    let error = CatalogError::NoCaptionsAvailable(TrackDiagnostic::AllTracksInvalid { dropped: 3 });

    assert!(error.to_string().contains("3 subtitle track(s)"));
}

#[test]
fn test_app_error_fromComponentErrors_shouldWrap() {
    let app: AppError = CatalogError::MetadataNotFound.into();
    assert!(matches!(app, AppError::Catalog(CatalogError::MetadataNotFound)));

    let app: AppError = FetchFailure::EmptyBody.into();
    assert!(app.to_string().starts_with("Download failed"));

    let app: AppError = DeliveryError::AlreadyExists("x.srt".into()).into();
    assert!(matches!(app, AppError::Delivery(_)));

    let app: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app, AppError::Unknown(ref message) if message == "boom"));
}

#[test]
fn test_delivery_error_fromIoError_shouldBecomeWrite() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");

    assert!(matches!(DeliveryError::from(io), DeliveryError::Write(_)));
}
