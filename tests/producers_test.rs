//! Integration tests for the qpdf-backed producers

use pdf_preview::{Error, QpdfWrapper};
use rstest::rstest;

/// Build a minimal PDF with `page_count` blank pages.
/// Page N is 600 + N points wide so reordering shows up in the output.
fn minimal_pdf(page_count: usize) -> Vec<u8> {
    let mut objects = vec!["<< /Type /Catalog /Pages 2 0 R >>".to_string()];
    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", i + 3))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids, page_count
    ));
    for i in 0..page_count {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} 792] /Resources << >> >>",
            601 + i
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

/// MediaBox widths in document order, which identify the source pages
fn page_widths(pdf: &[u8]) -> Vec<u32> {
    let text = String::from_utf8_lossy(pdf);
    let mut widths = Vec::new();
    let mut rest = text.as_ref();
    // qpdf may add spaces inside the brackets when it rewrites arrays
    while let Some(start) = rest.find("/MediaBox") {
        rest = &rest[start + "/MediaBox".len()..];
        let open = rest.find('[').unwrap();
        let close = rest.find(']').unwrap();
        let values: Vec<&str> = rest[open + 1..close].split_whitespace().collect();
        widths.push(values[2].parse().unwrap());
    }
    widths
}

#[test]
fn test_fixture_page_count() {
    assert_eq!(QpdfWrapper::get_page_count(&minimal_pdf(4)).unwrap(), 4);
}

#[test]
fn test_merge_adds_page_counts() {
    let a = minimal_pdf(2);
    let b = minimal_pdf(3);

    let merged = QpdfWrapper::merge(&[&a, &b]).unwrap();

    assert!(merged.starts_with(b"%PDF"));
    assert_eq!(QpdfWrapper::get_page_count(&merged).unwrap(), 5);
}

#[test]
fn test_merge_rejects_invalid_input() {
    let a = minimal_pdf(1);
    let result = QpdfWrapper::merge(&[&a, b"garbage"]);
    match result {
        Err(Error::DocumentOpen { reason }) => assert!(reason.starts_with("merge input 2")),
        other => panic!("expected DocumentOpen, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_merge_rejects_single_document() {
    let a = minimal_pdf(2);
    assert!(matches!(
        QpdfWrapper::merge(&[&a]),
        Err(Error::NotEnoughInputs { count: 1 })
    ));
}

#[test]
fn test_split_at_produces_two_parts() {
    let source = minimal_pdf(5);

    let (first, second) = QpdfWrapper::split_at(&source, 2).unwrap();

    assert_eq!(QpdfWrapper::get_page_count(&first).unwrap(), 2);
    assert_eq!(QpdfWrapper::get_page_count(&second).unwrap(), 3);
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(7)]
fn test_split_at_rejects_bad_split_point(#[case] page: u32) {
    let result = QpdfWrapper::split_at(&minimal_pdf(3), page);
    assert!(matches!(
        result,
        Err(Error::InvalidSplitPoint { max: 2, .. })
    ));
}

#[test]
fn test_select_pages_reorders() {
    let source = minimal_pdf(3);

    let reordered = QpdfWrapper::select_pages(&source, "3,1-2").unwrap();

    assert_eq!(QpdfWrapper::get_page_count(&reordered).unwrap(), 3);
    assert_eq!(page_widths(&reordered), vec![603, 601, 602]);
}

#[test]
fn test_select_pages_rejects_out_of_range() {
    let result = QpdfWrapper::select_pages(&minimal_pdf(3), "1,4");
    assert!(matches!(result, Err(Error::InvalidPageRange { .. })));
}

#[test]
fn test_delete_pages() {
    let source = minimal_pdf(5);

    let trimmed = QpdfWrapper::delete_pages(&source, "2,4-5").unwrap();

    assert_eq!(QpdfWrapper::get_page_count(&trimmed).unwrap(), 2);
    assert_eq!(page_widths(&trimmed), vec![601, 603]);
}

#[test]
fn test_delete_every_page_is_rejected() {
    let result = QpdfWrapper::delete_pages(&minimal_pdf(2), "1-2");
    assert!(matches!(result, Err(Error::InvalidPageRange { .. })));
}

#[rstest]
#[case(90, "/Rotate 90")]
#[case(-90, "/Rotate 270")]
#[case(540, "/Rotate 180")]
fn test_rotate_sets_normalized_rotation(#[case] angle: i32, #[case] expected: &str) {
    let rotated = QpdfWrapper::rotate(&minimal_pdf(2), angle).unwrap();

    assert_eq!(QpdfWrapper::get_page_count(&rotated).unwrap(), 2);
    let text = String::from_utf8_lossy(&rotated);
    assert_eq!(text.matches(expected).count(), 2);
}

#[test]
fn test_rotate_rejects_odd_angle() {
    let result = QpdfWrapper::rotate(&minimal_pdf(1), 45);
    assert!(matches!(result, Err(Error::InvalidRotation { angle: 45 })));
}

#[test]
fn test_compress_keeps_pages() {
    let compressed = QpdfWrapper::compress(&minimal_pdf(3)).unwrap();
    assert_eq!(QpdfWrapper::get_page_count(&compressed).unwrap(), 3);
}
