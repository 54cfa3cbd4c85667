use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

/// Builds a PDF with `num_pages` empty Letter pages and a legacy `/Dests`
/// dictionary mapping each `(name, page)` pair to that 1-based page.
pub fn pdf_with_destinations(num_pages: u32, dests: &[(&str, u32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<ObjectId> = (0..num_pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => num_pages as i64,
        }
        .into(),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !dests.is_empty() {
        let mut table = Dictionary::new();
        for (name, page) in dests {
            let page_id = page_ids[(*page - 1) as usize];
            table.set(
                name.as_bytes().to_vec(),
                Object::Array(vec![
                    Object::Reference(page_id),
                    "XYZ".into(),
                    0.into(),
                    700.into(),
                    Object::Null,
                ]),
            );
        }
        catalog.set("Dests", table);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn pdf_with_pages(num_pages: u32) -> Vec<u8> {
    pdf_with_destinations(num_pages, &[])
}

/// Content with a title page, a table of contents and two content sections.
pub const CONTENT_JSON: &str = r#"{
    "title": "Essays",
    "sections": [
        {
            "id": "theory",
            "title": "Theory",
            "blocks": [
                { "type": "paragraph", "text": "Opening." },
                { "type": "heading", "level": 2, "text": "Premise", "id": "premise" }
            ]
        },
        {
            "id": "practice",
            "title": "Practice",
            "blocks": [
                { "type": "paragraph", "text": "Closing." },
                { "type": "heading", "level": 2, "text": "Late", "id": "late" }
            ]
        }
    ]
}"#;
