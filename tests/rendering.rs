use std::path::PathBuf;

use propwell_brief::brand::PageGeometry;
use propwell_brief::elements::Anchor;
use propwell_brief::{build_weekly_brief, fonts, BriefConfig, DocumentBuilder, RenderedPdf, StyleRegistry};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str = "no usable fonts. Set PROPWELL_BRIEF_FONTS_DIR or install Liberation Sans / DejaVu Sans.";

struct Render {
    pdf: RenderedPdf,
    decorated: Vec<usize>,
}

fn render_brief() -> Option<Render> {
    if !fonts::fonts_available(None) {
        return None;
    }

    let builder = DocumentBuilder::new();
    let tracker = builder.tracker();
    let anchor = Anchor::new(builder.outline(), builder.tracker());
    let story = build_weekly_brief(&StyleRegistry::brand(), &PageGeometry::letter(), &anchor)
        .expect("assemble brief");
    let pdf = builder.render(story).expect("render brief");

    Some(Render {
        pdf,
        decorated: tracker.history(),
    })
}

/// Delimiters around the values printpdf fills from the clock or a random generator.
const VOLATILE_FIELDS: &[(&[u8], &[u8])] = &[
    (b"/CreationDate(", b")"),
    (b"/ModDate(", b")"),
    (b"/ID[", b"]"),
    (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
    (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
    (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
    (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
    (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
];

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Overwrites every volatile value with zeros, keeping the byte length.
fn blank_volatile_fields(bytes: &[u8]) -> Vec<u8> {
    let mut blanked = bytes.to_vec();
    for (open, close) in VOLATILE_FIELDS {
        let mut from = 0;
        while let Some(found) = find(&blanked[from..], open) {
            let start = from + found + open.len();
            let Some(len) = find(&blanked[start..], close) else {
                break;
            };
            blanked[start..start + len].fill(b'0');
            from = start + len + close.len();
        }
    }
    blanked
}

fn content_digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(blank_volatile_fields(bytes)).into()
}

#[test]
fn volatile_fields_are_blanked_in_place() {
    let raw = b"<</CreationDate(D:20260223101500+00'00')/ID[(abc)(def)]>> <xmpMM:InstanceID>uuid:42</xmpMM:InstanceID>";
    let blanked = blank_volatile_fields(raw);
    assert_eq!(blanked.len(), raw.len());
    assert!(find(&blanked, b"/CreationDate(00000000000000000000000)").is_some());
    assert!(find(&blanked, b"/ID[0000000000]").is_some());
    assert!(find(&blanked, b"<xmpMM:InstanceID>0000000</xmpMM:InstanceID>").is_some());
}

#[test]
fn renders_non_empty_output() {
    let Some(render) = render_brief() else {
        eprintln!("Skipping renders_non_empty_output: {}", SKIP_HINT);
        return;
    };
    assert!(render.pdf.bytes.starts_with(b"%PDF-"), "output should be a PDF");
    assert!(render.pdf.page_count >= 2, "the brief spans several pages");
}

#[test]
fn rendering_is_deterministic() {
    let (Some(a), Some(b)) = (render_brief(), render_brief()) else {
        eprintln!("Skipping rendering_is_deterministic: {}", SKIP_HINT);
        return;
    };

    assert_eq!(a.pdf.bytes.len(), b.pdf.bytes.len(), "PDF sizes should match");
    assert_eq!(
        content_digest(&a.pdf.bytes),
        content_digest(&b.pdf.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
    assert_eq!(a.pdf.page_count, b.pdf.page_count);
}

#[test]
fn decorator_numbers_every_page_once() {
    let Some(render) = render_brief() else {
        eprintln!("Skipping decorator_numbers_every_page_once: {}", SKIP_HINT);
        return;
    };
    let expected: Vec<usize> = (1..=render.pdf.page_count).collect();
    assert_eq!(render.decorated, expected);
}

#[test]
fn section_headings_are_recorded_in_order() {
    let Some(render) = render_brief() else {
        eprintln!("Skipping section_headings_are_recorded_in_order: {}", SKIP_HINT);
        return;
    };
    let outline = &render.pdf.outline;
    assert_eq!(outline.len(), 7);
    assert_eq!(outline[0].title, "1. Platform Status");
    assert_eq!(outline[0].page, 1);
    assert_eq!(outline[6].title, "7. Budget File Review Notes");
    assert!(outline.windows(2).all(|pair| pair[0].page <= pair[1].page));
    assert!(outline
        .iter()
        .all(|entry| entry.page >= 1 && entry.page <= render.pdf.page_count));
}

#[test]
fn generate_writes_the_configured_file() {
    if !fonts::fonts_available(None) {
        eprintln!("Skipping generate_writes_the_configured_file: {}", SKIP_HINT);
        return;
    }
    let dir: PathBuf = std::env::temp_dir().join(format!("propwell-brief-it-{}", std::process::id()));
    let output = dir.join("out/brief.pdf");

    let rendered = propwell_brief::generate(&BriefConfig::with_output(&output)).expect("generate");
    let written = std::fs::read(&output).expect("output file exists");
    assert_eq!(written, rendered.bytes);

    std::fs::remove_dir_all(&dir).ok();
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_add_an_outline_tree() {
    let Some(render) = render_brief() else {
        eprintln!("Skipping bookmarks_add_an_outline_tree: {}", SKIP_HINT);
        return;
    };
    let with_bookmarks = render.pdf.with_bookmarks().expect("bookmarks");
    let haystack = with_bookmarks.bytes;
    assert!(haystack.windows(b"/Outlines".len()).any(|w| w == b"/Outlines"));
}
