//! Minimal PDF writer for image-only documents.
//!
//! Each page is a single DCT-encoded (JPEG) image XObject stretched over the
//! page's media box.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::RasterError;

/// One encoded page, ready to be written.
#[derive(Debug)]
pub(crate) struct PageImage {
    pub jpeg: Vec<u8>,
    /// Pixel dimensions of the encoded image.
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Media box in points.
    pub page_width: u32,
    pub page_height: u32,
}

/// Write `pages` into a new PDF document and return its bytes.
pub(crate) fn write_pdf(pages: Vec<PageImage>) -> Result<Vec<u8>, RasterError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        kids.push(Object::Reference(add_page(&mut doc, pages_id, page)));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RasterError::Pdf(e.to_string()))?;

    Ok(buffer)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, page: PageImage) -> ObjectId {
    let mut image_dict = Dictionary::new();
    image_dict.set("Type", Object::Name(b"XObject".to_vec()));
    image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
    image_dict.set("Width", Object::Integer(page.pixel_width as i64));
    image_dict.set("Height", Object::Integer(page.pixel_height as i64));
    image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    image_dict.set("BitsPerComponent", Object::Integer(8));
    image_dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    let image_id = doc.add_object(Stream::new(image_dict, page.jpeg));

    let content = format!(
        "q {} 0 0 {} 0 0 cm /Im0 Do Q",
        page.page_width, page.page_height
    );
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(page.page_width as i64),
            Object::Integer(page.page_height as i64),
        ]),
    );
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Reference(content_id));

    doc.add_object(page_dict)
}
