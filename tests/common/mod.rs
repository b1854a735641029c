use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Builds a PDF with one text line per BT/ET block, one page per entry.
pub fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new(
                "Td",
                vec![72.into(), (760 - 16 * i as i64).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

/// A guide with the probe table split over two pages, surrounded by
/// unrelated content.
pub fn sample_guide() -> Vec<u8> {
    build_pdf(&[
        &["REST API User Guide", "Chapter 1 Introduction"],
        &["Monitoring", "SiteBacker pools use probes."],
        &[
            "IP Probes by Region Available",
            "Region IPv4 IPv6",
            "North America - East",
            "156.154.35.153",
            "156.154.35.154",
            "2610:a1:3008:128::153",
            "Europe",
            "156.154.36.10",
            "2610:a1:3009:128::10",
        ],
        &[
            "Asia",
            "156.154.37.20",
            "2610:a1:3010:128::20",
            "UltraDNS Confidential",
        ],
        &["Appendix A", "Glossary of terms"],
    ])
}
