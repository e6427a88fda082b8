use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use super::error::ExportError;
use super::paginate::{PageSize, PageSlice, mm_to_pt};

/// Resource name of the shared page image.
const IMAGE_NAME: &str = "Im0";

/// Build a PDF with one page per slice, each drawing the same image.
///
/// The raster is stored once as an RGB image XObject (alpha flattened onto
/// white) and placed on every page at full page width and
/// `scaled_height_mm` tall, shifted by the slice offset. The MediaBox clips
/// whatever falls outside the page.
pub fn assemble_pdf(
    raster: &RgbaImage,
    slices: &[PageSlice],
    page: PageSize,
    scaled_height_mm: f64,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    if slices.is_empty() {
        return Err(ExportError::Assemble("no pages to assemble".into()));
    }
    let (px_width, px_height) = raster.dimensions();
    if px_width == 0 || px_height == 0 {
        return Err(ExportError::EmptyRaster);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(px_width)),
            "Height" => Object::Integer(i64::from(px_height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
        },
        flatten_to_rgb(raster),
    );
    let image_id = doc.add_object(image);

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            IMAGE_NAME => Object::Reference(image_id),
        },
    });

    let page_width = page.width_pt();
    let page_height = page.height_pt();
    let image_height = mm_to_pt(scaled_height_mm);

    let mut kids = Vec::with_capacity(slices.len());
    for slice in slices {
        // PDF space is bottom-up: place the image's lower edge so its top
        // edge sits `offset_mm` below the page's top edge.
        let bottom = page_height - mm_to_pt(slice.offset_mm) - image_height;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(page_width),
                        Object::Integer(0),
                        Object::Integer(0),
                        real(image_height),
                        Object::Integer(0),
                        real(bottom),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Assemble(format!("failed to encode page {}: {e}", slice.index)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(page_width),
                real(page_height),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(concat!("quickbill ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));
    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| ExportError::Assemble(format!("failed to write PDF: {e}")))?;
    Ok(output)
}

/// PDF reals are single precision; geometry stays `f64` until here.
fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Document text string: PDFDocEncoding-compatible ASCII as is, anything
/// else as UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Drop the alpha channel by compositing over white.
fn flatten_to_rgb(raster: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(raster.as_raw().len() / 4 * 3);
    for pixel in raster.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u32::from(a);
        for channel in [r, g, b] {
            let blended = (u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::paginate;
    use image::Rgba;

    #[test]
    fn one_page_per_slice() {
        let raster = RgbaImage::from_pixel(20, 60, Rgba([0, 0, 0, 255]));
        let height = paginate::scaled_height(20, 60, 210.0);
        let slices = paginate::paginate(height, 297.0).unwrap();
        let bytes = assemble_pdf(&raster, &slices, PageSize::A4, height, "Invoice T-1").unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), slices.len());
        assert_eq!(slices.len(), 3);
    }

    fn info_title(bytes: &[u8]) -> Vec<u8> {
        let doc = Document::load_mem(bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
        match info.get(b"Title").unwrap() {
            Object::String(title, _) => title.clone(),
            other => panic!("unexpected title object {other:?}"),
        }
    }

    #[test]
    fn non_ascii_title_is_utf16() {
        let raster = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let height = paginate::scaled_height(10, 10, 210.0);
        let slices = paginate::paginate(height, 297.0).unwrap();

        let bytes = assemble_pdf(&raster, &slices, PageSize::A4, height, "Invoice Ä-1").unwrap();
        let expected: Vec<u8> = [0xFE, 0xFF]
            .into_iter()
            .chain("Invoice Ä-1".encode_utf16().flat_map(u16::to_be_bytes))
            .collect();
        assert_eq!(info_title(&bytes), expected);

        let bytes = assemble_pdf(&raster, &slices, PageSize::A4, height, "Invoice A-1").unwrap();
        assert_eq!(info_title(&bytes), b"Invoice A-1");
    }

    #[test]
    fn last_page_shifts_image_by_whole_pages() {
        let raster = RgbaImage::from_pixel(20, 60, Rgba([0, 0, 0, 255]));
        let height = paginate::scaled_height(20, 60, 210.0);
        let slices = paginate::paginate(height, 297.0).unwrap();
        let bytes = assemble_pdf(&raster, &slices, PageSize::A4, height, "Invoice T-2").unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        let last_id = *pages.get(&(slices.len() as u32)).unwrap();
        let content = Content::decode(&doc.get_page_content(last_id).unwrap()).unwrap();
        let cm = content.operations.iter().find(|op| op.operator == "cm").unwrap();
        let bottom = cm.operands[5].as_float().unwrap();

        // Top edge sits two page heights above the third page's top.
        let expected = PageSize::A4.height_pt() + mm_to_pt(2.0 * 297.0) - mm_to_pt(height);
        assert!((f64::from(bottom) - expected).abs() < 1e-3);
    }

    #[test]
    fn empty_slices_rejected() {
        let raster = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        assert!(matches!(
            assemble_pdf(&raster, &[], PageSize::A4, 1.0, "x"),
            Err(ExportError::Assemble(_))
        ));
    }

    #[test]
    fn transparency_composites_over_white() {
        let raster = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([10, 20, 30, 255])
            }
        });
        assert_eq!(flatten_to_rgb(&raster), vec![255, 255, 255, 10, 20, 30]);
    }
}
