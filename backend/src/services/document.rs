//! Purchase-order document rendering via `printpdf`
//!
//! Layout mirrors the faxed paper form: title and order metadata on top,
//! supplier block on the left, clinic block on the right, then the line
//! table. Built-in fonts only, so all text is rendered in English.

use printpdf::*;
use std::io::BufWriter;

use crate::error::{AppError, AppResult};
use crate::models::ClinicInfo;
use crate::services::order::OrderDetail;

/// Render the purchase-order PDF for one order. Returns PDF bytes.
pub fn render_purchase_order(order: &OrderDetail, clinic: &ClinicInfo) -> AppResult<Vec<u8>> {
    let title = format!("Purchase Order {}", order.id);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::DocumentError(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::DocumentError(format!("PDF font error: {e}")))?;

    // Title and order metadata
    layer.use_text("PURCHASE ORDER", 18.0, Mm(20.0), Mm(275.0), &bold);
    layer.use_text(
        format!("Order date: {}", order.order_date.format("%Y-%m-%d")),
        10.0,
        Mm(140.0),
        Mm(278.0),
        &font,
    );
    layer.use_text(
        format!("Order no.: {}", order.id),
        8.0,
        Mm(140.0),
        Mm(273.0),
        &font,
    );

    // Supplier block (left)
    let mut y = Mm(258.0);
    layer.use_text("TO:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(&order.supplier.name, 11.0, Mm(20.0), y, &font);
    y -= Mm(5.0);
    if let Some(address) = &order.supplier.address {
        layer.use_text(format!("Address: {}", address), 9.0, Mm(20.0), y, &font);
        y -= Mm(5.0);
    }
    layer.use_text(
        format!("FAX: {}", order.supplier.fax_number),
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(5.0);
    if let Some(email) = &order.supplier.email {
        layer.use_text(format!("Email: {}", email), 9.0, Mm(20.0), y, &font);
    }

    // Clinic block (right)
    let mut y = Mm(258.0);
    layer.use_text("FROM:", 11.0, Mm(120.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(&clinic.name, 11.0, Mm(120.0), y, &font);
    y -= Mm(5.0);
    if let Some(director) = &clinic.director {
        layer.use_text(format!("Director: {}", director), 9.0, Mm(120.0), y, &font);
        y -= Mm(5.0);
    }
    if let Some(address) = &clinic.address {
        layer.use_text(format!("Address: {}", address), 9.0, Mm(120.0), y, &font);
        y -= Mm(5.0);
    }
    if let Some(phone) = &clinic.phone {
        layer.use_text(format!("TEL: {}", phone), 9.0, Mm(120.0), y, &font);
        y -= Mm(5.0);
    }
    if let Some(fax) = &clinic.fax {
        layer.use_text(format!("FAX: {}", fax), 9.0, Mm(120.0), y, &font);
    }

    // Line table
    let mut y = Mm(220.0);
    layer.use_text("Item", 10.0, Mm(20.0), y, &bold);
    layer.use_text("Quantity", 10.0, Mm(120.0), y, &bold);
    layer.use_text("Unit", 10.0, Mm(160.0), y, &bold);
    y -= Mm(6.0);

    for line in &order.lines {
        layer.use_text(&line.item_name, 10.0, Mm(20.0), y, &font);
        layer.use_text(line.quantity.to_string(), 10.0, Mm(120.0), y, &font);
        layer.use_text(&line.unit_label, 10.0, Mm(160.0), y, &font);
        y -= Mm(6.0);
    }

    // Footer note
    layer.use_text("Notes:", 10.0, Mm(20.0), Mm(35.0), &bold);
    layer.use_text(
        "This fax was generated automatically.",
        9.0,
        Mm(20.0),
        Mm(29.0),
        &font,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AppError::DocumentError(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| AppError::DocumentError(format!("PDF buffer error: {e}")))
}
