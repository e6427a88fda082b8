//! Edit an invoice, then export a stand-in preview as a multi-page PDF.
//!
//! Run with: `cargo run --example export_invoice --features all [-- <out-dir>]`

use image::{Rgba, RgbaImage};
use quickbill::export::*;
use quickbill::store::{EntityStore, MemoryStore};
use quickbill::*;
use tracing_subscriber::EnvFilter;

/// Logical preview width: A4 at 96 dpi.
const PREVIEW_WIDTH: u32 = 794;

/// Paint one band per view row so the page breaks are visible in the output.
fn draw_preview(view: &InvoiceView) -> RgbaImage {
    let header = 260;
    let row_height = 48;
    let footer = 320;
    let height = header + row_height * view.rows.len() as u32 + footer;

    RgbaImage::from_fn(PREVIEW_WIDTH, height, |_, y| {
        if y < header {
            Rgba([67, 56, 202, 255])
        } else if y < height - footer {
            let row = (y - header) / row_height;
            if row % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([238, 242, 255, 255])
            }
        } else {
            Rgba([229, 231, 235, 255])
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let out_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let mut store = EntityStore::open(MemoryStore::new());
    store.update_client(|client| client.name = "Globex Ltd".into());
    for i in 0..40 {
        let id = store.add_item();
        store.update_item(id, ItemField::Description, &format!("Consulting block {i}"));
        store.update_item(id, ItemField::Quantity, "2.5");
        store.update_item(id, ItemField::UnitPrice, "85");
    }

    let view = store.view(&Presentation::default());
    println!("{} rows, total {}", view.rows.len(), view.total.value);

    let mut regions = RegionMap::new();
    regions.insert(DEFAULT_REGION_ID, StaticRegion::new(draw_preview(&view)));

    let (events, mut notices) = tokio::sync::mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = notices.recv().await {
            println!("  {event:?}");
        }
    });

    let exporter = Exporter::default();
    let result = exporter
        .export(
            &regions,
            &store.state().meta.invoice_number,
            &SaveToDirectory::new(&out_dir),
            &events,
        )
        .await;
    drop(events);
    printer.await?;

    let artifact = result?;
    println!(
        "wrote {}/{} ({} pages, {} bytes)",
        out_dir,
        artifact.filename,
        artifact.page_count,
        artifact.bytes.len()
    );
    Ok(())
}
