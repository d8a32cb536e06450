//! End-to-end verification scenarios.

use image::{GrayImage, ImageFormat, Luma};
use oar_verify::prelude::*;
use oar_verify::processors::{ImageNormalizer, SkewCorrector, sharpness};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const INVOICE_TEXT: &str = "INVOICE\nInvoice number 1042\nDate 2024-03-01\nCustomer Acme\n\
    Item Description Quantity Cost\nProduct service discount\n\
    Subtotal 90.00 Tax 10.00 Total amount 100.00\nPayment paid receipt statement";

const PRESCRIPTION_TEXT: &str = "Rx prescription\nPharmacy medication dosage strength refills\n\
    Directions instructions diagnosis allergies\nSignature date";

/// A 256x256 page of random 6px checker cells; sharp and feature-rich.
fn document_page(seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = 43;
    let grid: Vec<u8> = (0..cells * cells)
        .map(|_| if rng.gen_bool(0.5) { 20 } else { 235 })
        .collect();
    GrayImage::from_fn(256, 256, |x, y| {
        Luma([grid[((y / 6) * cells + x / 6) as usize]])
    })
}

fn png_bytes(img: &GrayImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Corpus root with `INVOICES/reference.png`.
fn invoice_corpus(page: &GrayImage) -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let invoices = root.path().join("INVOICES");
    std::fs::create_dir(&invoices).unwrap();
    page.save(invoices.join("reference.png")).unwrap();
    root
}

fn verifier(corpus_root: &Path, text: &str) -> DocumentVerifier {
    let config = VerifierConfig::default().with_corpus_root(corpus_root);
    DocumentVerifier::new(config, StaticText::new(text)).unwrap()
}

fn stage_names(report: &VerificationReport) -> Vec<&str> {
    report.stages.iter().map(|t| t.stage.as_str()).collect()
}

#[test]
fn scenario_a_corrupted_image_is_format_error() {
    let mut bytes = png_bytes(&document_page(1));
    bytes.truncate(64);
    let corpus = tempfile::tempdir().unwrap();

    let report = verifier(corpus.path(), INVOICE_TEXT)
        .verify("invoice", &ImageSource::bytes(bytes));
    assert!(!report.accepted());
    assert_eq!(report.reason(), ReasonCode::FormatError);
    assert_eq!(report.message(), "REJECTED: invalid image format");
    assert_eq!(stage_names(&report), vec!["existence_check", "normalization"]);
}

#[test]
fn scenario_a_unlisted_extension_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.tiff");
    std::fs::write(&path, png_bytes(&document_page(1))).unwrap();

    let report = verifier(dir.path(), INVOICE_TEXT).verify_path("invoice", &path);
    assert_eq!(report.reason(), ReasonCode::FormatError);
}

#[test]
fn scenario_b_genuine_invoice_is_accepted() {
    let page = document_page(7);
    let corpus = invoice_corpus(&page);
    let scan = corpus.path().join("scan.png");
    page.save(&scan).unwrap();

    let report = verifier(corpus.path(), INVOICE_TEXT).verify_path("Invoice", &scan);
    assert!(report.accepted(), "rejected: {:?}", report.stages);
    assert_eq!(report.reason(), ReasonCode::Ok);
    assert_eq!(report.message(), "ACCEPTED");
    assert_eq!(report.document_type, Some(DocumentType::Invoice));
    assert_eq!(
        stage_names(&report),
        vec![
            "existence_check",
            "normalization",
            "skew_correction",
            "quality_gate",
            "ocr_classification",
            "template_matching",
        ]
    );

    let template = report.stage("template_matching").unwrap();
    assert!(template.metrics["matched_template"].ends_with("reference.png"));
}

#[test]
fn scenario_b_jpeg_submission_is_normalized() {
    let page = document_page(7);
    let corpus = invoice_corpus(&page);

    let mut jpeg = Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(page)
        .to_rgb8()
        .write_to(&mut jpeg, ImageFormat::Jpeg)
        .unwrap();
    let source = ImageSource::bytes(jpeg.into_inner());

    let report = verifier(corpus.path(), INVOICE_TEXT).verify("invoice", &source);
    let normalization = report.stage("normalization").unwrap();
    assert!(normalization.result.accepted);
    assert_eq!(normalization.metrics["format"], "Jpeg");
}

#[test]
fn scenario_c_foreign_text_stops_before_template_matching() {
    let page = document_page(7);
    let corpus = invoice_corpus(&page);

    let report = verifier(corpus.path(), "weather forecast sunny tomorrow")
        .verify("invoice", &ImageSource::bytes(png_bytes(&page)));
    assert_eq!(report.reason(), ReasonCode::KeywordMismatch);
    assert_eq!(
        report.message(),
        "REJECTED: image not matched during OCR keyword matching"
    );
    assert!(report.stage("template_matching").is_none());
}

#[test]
fn scenario_d_threshold_equal_to_sharpness_passes() {
    let page = document_page(9);
    let corpus = invoice_corpus(&page);
    let source = ImageSource::bytes(png_bytes(&page));

    let artifact = ImageNormalizer::new().normalize(&source).unwrap();
    let corrected = SkewCorrector::default().correct(&artifact.grayscale());
    let measured = sharpness(&corrected.corrected_image, false, 1.1);
    assert!(measured > 0.0);

    let mut config = VerifierConfig::default().with_corpus_root(corpus.path());
    config.quality.blur_threshold = measured;
    let report = DocumentVerifier::new(config.clone(), StaticText::new(INVOICE_TEXT))
        .unwrap()
        .verify("invoice", &source);
    assert!(report.stage("quality_gate").unwrap().result.accepted);
    assert!(report.accepted());

    config.quality.blur_threshold = measured * 1.0001;
    let report = DocumentVerifier::new(config, StaticText::new(INVOICE_TEXT))
        .unwrap()
        .verify("invoice", &source);
    assert_eq!(report.reason(), ReasonCode::TooBlurry);
}

#[test]
fn blurry_image_short_circuits_before_ocr() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let extractor = move |_: &ImageArtifact| -> VerifyResult<String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(INVOICE_TEXT.to_string())
    };

    let blurred = imageproc::filter::gaussian_blur_f32(&document_page(3), 8.0);
    let corpus = tempfile::tempdir().unwrap();
    let config = VerifierConfig::default().with_corpus_root(corpus.path());
    let report = DocumentVerifier::new(config, extractor)
        .unwrap()
        .verify("invoice", &ImageSource::bytes(png_bytes(&blurred)));

    assert_eq!(report.reason(), ReasonCode::TooBlurry);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_image_is_not_found() {
    let corpus = tempfile::tempdir().unwrap();
    let report = verifier(corpus.path(), INVOICE_TEXT)
        .verify_path("invoice", corpus.path().join("missing.png"));
    assert_eq!(report.reason(), ReasonCode::NotFound);
    assert_eq!(report.message(), "REJECTED: image does not exist");
}

#[test]
fn prescription_without_corpus_is_template_mismatch() {
    let page = document_page(7);
    let corpus = invoice_corpus(&page);
    let report = verifier(corpus.path(), PRESCRIPTION_TEXT)
        .verify("prescription", &ImageSource::bytes(png_bytes(&page)));
    assert!(report.stage("ocr_classification").unwrap().result.accepted);
    assert_eq!(report.reason(), ReasonCode::TemplateMismatch);
    assert_eq!(
        report.message(),
        "REJECTED: image not matched during template matching"
    );
}

#[test]
fn unknown_type_falls_back_and_never_matches_templates() {
    let page = document_page(7);
    let corpus = invoice_corpus(&page);

    let report = verifier(corpus.path(), INVOICE_TEXT)
        .verify("passport", &ImageSource::bytes(png_bytes(&page)));
    assert_eq!(report.document_type, None);
    assert_eq!(report.reason(), ReasonCode::TemplateMismatch);
}

#[test]
fn featureless_probe_against_corpus_is_rejected() {
    let corpus = invoice_corpus(&document_page(7));
    // Sharp horizontal stripes: passes the blur gate but has no corners.
    let stripes = GrayImage::from_fn(256, 256, |_, y| {
        Luma([if (y / 4) % 2 == 0 { 0 } else { 255 }])
    });

    let report = verifier(corpus.path(), INVOICE_TEXT)
        .verify("invoice", &ImageSource::bytes(png_bytes(&stripes)));
    assert!(report.stage("quality_gate").unwrap().result.accepted);
    assert_eq!(report.skew_angle, Some(0.0));
    assert_eq!(report.reason(), ReasonCode::TemplateMismatch);
    assert_eq!(report.stage("template_matching").unwrap().metrics["best_score"], "0");
}

#[test]
fn verifier_is_shareable_across_threads() {
    let page = document_page(7);
    let corpus = invoice_corpus(&page);
    let verifier = Arc::new(verifier(corpus.path(), INVOICE_TEXT));
    let bytes = png_bytes(&page);

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let verifier = Arc::clone(&verifier);
            let source = ImageSource::bytes(bytes.clone());
            std::thread::spawn(move || verifier.verify("invoice", &source).accepted())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
