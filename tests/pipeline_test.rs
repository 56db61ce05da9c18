//! End-to-end tests: synthetic PDF documents through the full pipeline.

use std::fs;

use lopdf::{dictionary, Document, Object, Stream};
use pdfquest::{Extractor, LopdfBackend, QuestionRecord};
use tempfile::TempDir;

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

struct TestPage {
    content: String,
    images: Vec<(&'static str, Vec<u8>)>,
}

fn text_op(text: &str, y: i32) -> String {
    format!("BT /F1 12 Tf 72 {} Td ({}) Tj ET\n", y, text)
}

fn image_op(name: &str, y: i32) -> String {
    format!("q 100 0 0 50 72 {} cm /{} Do Q\n", y, name)
}

fn image_xobject(data: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 100,
            "Height" => 50,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        data,
    )
}

/// Assemble a PDF with one content stream per page and per-page resources.
fn build_pdf(pages: Vec<TestPage>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if !page.images.is_empty() {
            let mut xobjects = lopdf::Dictionary::new();
            for (name, data) in page.images {
                let image_id = doc.add_object(image_xobject(data));
                xobjects.set(name, image_id);
            }
            resources.set("XObject", xobjects);
        }

        let content_id = doc.add_object(Stream::new(dictionary! {}, page.content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
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

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn read_records(json_path: &std::path::Path) -> Vec<QuestionRecord> {
    let json = fs::read_to_string(json_path).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_single_page_with_question_image() {
    let mut content = String::new();
    content.push_str(&text_op("1. What does the figure show?", 720));
    content.push_str(&image_op("Im0", 640)); // top edge at 690
    content.push_str(&text_op("[A] a circuit", 660));
    content.push_str(&text_op("[B] a graph", 630));
    content.push_str(&text_op("Ans [B]", 600));
    content.push_str(&text_op("2. What is the capital of France?", 570));
    content.push_str(&text_op("[A] Paris", 540));
    content.push_str(&text_op("[B] Lyon", 510));
    content.push_str(&text_op("Ans [A]", 480));

    let pdf = build_pdf(vec![TestPage {
        content,
        images: vec![("Im0", JPEG.to_vec())],
    }]);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let json_path = Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap();

    assert_eq!(json_path, output.join("questions_structured.json"));
    let records = read_records(&json_path);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question_number, 1);
    assert_eq!(records[0].question, "What does the figure show?");
    assert_eq!(records[0].question_images.len(), 1);
    assert!(records[0].question_images[0].ends_with("img_q1_0.jpg"));
    assert!(records[0].option_images.is_empty());

    assert_eq!(records[1].question_number, 2);
    assert_eq!(records[1].question, "What is the capital of France?");
    assert!(records[1].question_images.is_empty());

    let image_file = output.join("images").join("img_q1_0.jpg");
    assert_eq!(fs::read(&image_file).unwrap(), JPEG);
}

#[test]
fn test_state_carries_to_image_on_next_page() {
    let page1 = TestPage {
        content: text_op("1. Which figure matches the circuit?", 720),
        images: vec![],
    };
    let mut content2 = String::new();
    content2.push_str(&image_op("Im0", 700));
    content2.push_str(&text_op("[A] the left one", 640));
    let page2 = TestPage {
        content: content2,
        images: vec![("Im0", JPEG.to_vec())],
    };

    let pdf = build_pdf(vec![page1, page2]);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let json_path = Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap();

    let records = read_records(&json_path);
    assert_eq!(records.len(), 1);
    assert!(records[0].question_images[0].ends_with("img_q1_0.jpg"));
}

#[test]
fn test_option_image_recorded_separately() {
    let mut content = String::new();
    content.push_str(&text_op("1. Which diagram is correct?", 720));
    content.push_str(&text_op("[A] shown below:", 690));
    content.push_str(&image_op("Im0", 600));

    let pdf = build_pdf(vec![TestPage {
        content,
        images: vec![("Im0", JPEG.to_vec())],
    }]);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let records = read_records(
        &Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap(),
    );

    assert!(records[0].question_images.is_empty());
    assert_eq!(records[0].option_images.len(), 1);
    assert!(records[0].option_images[0].ends_with("q1_optionA_0.jpg"));
    assert!(output.join("images").join("q1_optionA_0.jpg").exists());
}

#[test]
fn test_imageless_document_creates_empty_images_dir() {
    let mut content = String::new();
    content.push_str(&text_op("1. What is 2+2?", 720));
    content.push_str(&text_op("[A] 3", 690));
    content.push_str(&text_op("[B] 4", 660));
    content.push_str(&text_op("Ans [B]", 630));

    let pdf = build_pdf(vec![TestPage {
        content,
        images: vec![],
    }]);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let records = read_records(
        &Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap(),
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "What is 2+2?");

    let images_dir = output.join("images");
    assert!(images_dir.is_dir());
    assert_eq!(fs::read_dir(&images_dir).unwrap().count(), 0);
}

#[test]
fn test_rerun_writes_identical_outputs() {
    let mut content = String::new();
    content.push_str(&text_op("1. What does the figure show?", 720));
    content.push_str(&image_op("Im0", 640));
    content.push_str(&text_op("[A] a circuit", 600));

    let pdf = build_pdf(vec![TestPage {
        content,
        images: vec![("Im0", JPEG.to_vec())],
    }]);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let extractor = Extractor::from_bytes(&pdf, &output).unwrap();

    let json_path = extractor.extract().unwrap();
    let first_json = fs::read(&json_path).unwrap();
    let image_path = output.join("images").join("img_q1_0.jpg");
    let first_image = fs::read(&image_path).unwrap();

    let json_path = extractor.extract().unwrap();
    assert_eq!(fs::read(&json_path).unwrap(), first_json);
    assert_eq!(fs::read(&image_path).unwrap(), first_image);
}

#[test]
fn test_form_xobject_is_skipped() {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let form_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        },
        b"".to_vec(),
    ));

    let content = format!(
        "{}{}",
        text_op("1. No figure here?", 720),
        image_op("Fm0", 640)
    );
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => dictionary! { "Fm0" => form_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut pdf = Vec::new();
    doc.save_to(&mut pdf).unwrap();

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let records = read_records(
        &Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap(),
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "No figure here?");
    assert!(records[0].question_images.is_empty());
    assert_eq!(fs::read_dir(output.join("images")).unwrap().count(), 0);
}

#[test]
fn test_resources_inherited_from_pages_node() {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let image_id = doc.add_object(image_xobject(JPEG.to_vec()));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im0" => image_id },
    });

    let content = format!(
        "{}{}",
        text_op("1. Inherited figure?", 720),
        image_op("Im0", 640)
    );
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    // no Resources entry on the page itself
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut pdf = Vec::new();
    doc.save_to(&mut pdf).unwrap();

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let records = read_records(
        &Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap(),
    );

    assert_eq!(records[0].question_images.len(), 1);
    assert_eq!(
        fs::read(output.join("images").join("img_q1_0.jpg")).unwrap(),
        JPEG
    );
}

#[test]
fn test_kerned_show_array_keeps_word_spacing() {
    let content = "BT /F1 12 Tf 72 720 Td [(1. What is) -300 (2+2?)] TJ ET\n".to_string();
    let pdf = build_pdf(vec![TestPage {
        content,
        images: vec![],
    }]);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let records = read_records(
        &Extractor::from_bytes(&pdf, &output).unwrap().extract().unwrap(),
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "What is 2+2?");
}

#[test]
fn test_extract_file_convenience() {
    let pdf = build_pdf(vec![TestPage {
        content: text_op("1. From a file on disk?", 720),
        images: vec![],
    }]);

    let dir = TempDir::new().unwrap();
    let pdf_path = dir.path().join("exam.pdf");
    fs::write(&pdf_path, &pdf).unwrap();
    let output = dir.path().join("out");

    let json_path = pdfquest::extract_file(&pdf_path, &output).unwrap();
    assert!(json_path.exists());

    let records = read_records(&json_path);
    assert_eq!(records[0].question, "From a file on disk?");
}

#[test]
fn test_backend_document_accessors() {
    let pdf = build_pdf(vec![
        TestPage {
            content: text_op("1. One?", 720),
            images: vec![],
        },
        TestPage {
            content: text_op("2. Two?", 720),
            images: vec![],
        },
    ]);

    let backend = LopdfBackend::load_bytes(&pdf).unwrap();
    assert_eq!(backend.page_count(), 2);
    assert_eq!(backend.version(), "1.5");
    assert!(!backend.is_encrypted());
}
