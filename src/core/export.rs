use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage, imageops};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::core::grid::GridLayout;
use crate::core::palette::Rgb;
use crate::core::raster::rasterize;
use crate::error::Result;

/// Exported images are padded out to this width:height ratio.
pub const EXPORT_ASPECT: (u32, u32) = (16, 9);

/// Fill for the padding around the table.
pub const EXPORT_BACKGROUND: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

/// PDF points per exported pixel.
pub const PDF_SCALE: f32 = 0.75;

const JPEG_QUALITY: u8 = 92;

pub const EXPORTING_LABEL: &str = "Exporting...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// Encoded export plus the size of the padded canvas it was made from.
#[derive(Clone, Debug)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportedFile {
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.content_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// The button that started an export: disabled with a busy label while the export runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerControl {
    pub label: String,
    pub enabled: bool,
}

impl TriggerControl {
    pub fn new(label: impl Into<String>) -> Self {
        TriggerControl {
            label: label.into(),
            enabled: true,
        }
    }
}

/// Surface for user-facing alerts.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Size of the smallest 16:9 canvas that holds a `width` x `height` image without cropping.
pub fn padded_size(width: u32, height: u32) -> (u32, u32) {
    let (aspect_w, aspect_h) = (u64::from(EXPORT_ASPECT.0), u64::from(EXPORT_ASPECT.1));
    let (w, h) = (u64::from(width), u64::from(height));
    let (padded_w, padded_h) = if w * aspect_h > h * aspect_w {
        (w, (w * aspect_h + aspect_w / 2) / aspect_w)
    } else {
        ((h * aspect_w + aspect_h / 2) / aspect_h, h)
    };
    (
        u32::try_from(padded_w).unwrap_or(u32::MAX),
        u32::try_from(padded_h).unwrap_or(u32::MAX),
    )
}

/// Centers `source` on a 16:9 canvas filled with [`EXPORT_BACKGROUND`].
pub fn pad_to_aspect(source: &RgbaImage) -> RgbaImage {
    let (width, height) = padded_size(source.width(), source.height());
    let background = image::Rgba(EXPORT_BACKGROUND.to_rgba());
    let mut canvas = RgbaImage::from_pixel(width, height, background);
    let x = (width - source.width()) / 2;
    let y = (height - source.height()) / 2;
    imageops::overlay(&mut canvas, source, i64::from(x), i64::from(y));
    canvas
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Page size in points for an image of `width` x `height` pixels.
pub fn pdf_page_size(width: u32, height: u32) -> (f32, f32) {
    (width as f32 * PDF_SCALE, height as f32 * PDF_SCALE)
}

/// Single landscape page with `image` stretched over the whole page.
pub fn encode_pdf(image: &RgbaImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&rgb)?;

    let (page_width, page_height) = pdf_page_size(image.width(), image.height());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width()),
            "Height" => i64::from(image.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::from(page_width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::from(page_height),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::from(page_width),
            Object::from(page_height),
        ],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Rasterize, pad to 16:9, encode.
pub fn render_export(layout: &GridLayout, format: ExportFormat) -> Result<ExportedFile> {
    let table = rasterize(layout)?;
    let padded = pad_to_aspect(&table);
    log::debug!(
        "padded {}x{} table to {}x{}",
        table.width(),
        table.height(),
        padded.width(),
        padded.height()
    );
    let bytes = match format {
        ExportFormat::Png => encode_png(&padded)?,
        ExportFormat::Pdf => encode_pdf(&padded)?,
    };
    Ok(ExportedFile {
        format,
        bytes,
        width: padded.width(),
        height: padded.height(),
    })
}

/// Runs an export on behalf of `trigger`.
///
/// The control is disabled and relabelled while the export runs and restored afterwards,
/// whether or not the export succeeds. Failures raise a single alert and are not retried.
pub fn export_layout(
    layout: &GridLayout,
    format: ExportFormat,
    trigger: &mut TriggerControl,
    notifier: &dyn Notifier,
) -> Option<ExportedFile> {
    let saved = trigger.clone();
    trigger.enabled = false;
    trigger.label = EXPORTING_LABEL.to_string();

    let result = render_export(layout, format);
    *trigger = saved;

    match result {
        Ok(file) => {
            log::info!(
                "exported section {} as {} ({} bytes)",
                layout.section,
                format.extension(),
                file.bytes.len()
            );
            Some(file)
        }
        Err(err) => {
            log::error!("export of section {} failed: {}", layout.section, err);
            notifier.alert(&format!(
                "Failed to export {}: {}",
                format.extension().to_uppercase(),
                err.user_message()
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timetable::{CellData, Timetable, Weekday};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use test_case::test_case;

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    fn layout() -> GridLayout {
        let mut timetable = Timetable {
            time_slots: vec![1, 2, 3],
            ..Timetable::default()
        };
        timetable.timetable.entry(Weekday::Monday.key().to_string()).or_default().insert(
            1,
            Some(CellData {
                code: "CS101".to_string(),
                name: "PROGRAMMING".to_string(),
                ..CellData::default()
            }),
        );
        GridLayout::build(&timetable)
    }

    /// Width and height of the only page's `MediaBox`.
    fn media_box(bytes: &[u8]) -> (f32, f32) {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_float().unwrap())
            .collect::<Vec<f32>>();
        assert_eq!(&media_box[..2], &[0.0, 0.0]);
        (media_box[2], media_box[3])
    }

    fn assert_16_9(width: u32, height: u32) {
        let ratio = f64::from(width) / f64::from(height);
        assert!(
            (ratio - 16.0 / 9.0).abs() < 0.01,
            "{}x{} is not 16:9",
            width,
            height
        );
    }

    #[test_case(1600, 900 ; "already 16 by 9")]
    #[test_case(2000, 300 ; "wide")]
    #[test_case(300, 2000 ; "tall")]
    #[test_case(1, 1 ; "tiny square")]
    #[test_case(1033, 457 ; "odd sizes")]
    fn padding_is_16_9_and_never_crops(width: u32, height: u32) {
        let (padded_w, padded_h) = padded_size(width, height);
        assert!(padded_w >= width && padded_h >= height);
        assert!(padded_w == width || padded_h == height);
        if padded_w > 8 && padded_h > 8 {
            assert_16_9(padded_w, padded_h);
        }
    }

    #[test]
    fn content_is_centered_on_background() {
        let source = RgbaImage::from_pixel(100, 100, image::Rgba([0, 0, 0, 255]));
        let padded = pad_to_aspect(&source);
        assert_eq!((padded.width(), padded.height()), (178, 100));
        assert_eq!(padded.get_pixel(0, 50).0, EXPORT_BACKGROUND.to_rgba());
        assert_eq!(padded.get_pixel(39, 50).0, [0, 0, 0, 255]);
        assert_eq!(padded.get_pixel(138, 50).0, [0, 0, 0, 255]);
        assert_eq!(padded.get_pixel(139, 50).0, EXPORT_BACKGROUND.to_rgba());
    }

    #[test]
    fn png_export_is_16_9() {
        let file = render_export(&layout(), ExportFormat::Png).unwrap();
        assert!(file.bytes.starts_with(b"\x89PNG"));
        assert_16_9(file.width, file.height);
        assert!(file.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn pdf_export_is_one_landscape_page() {
        let file = render_export(&layout(), ExportFormat::Pdf).unwrap();
        assert!(file.bytes.starts_with(b"%PDF-1.5"));

        let (page_w, page_h) = media_box(&file.bytes);
        assert!(page_w > page_h);
        assert!((f64::from(page_w / page_h) - 16.0 / 9.0).abs() < 0.01);
    }

    #[test]
    fn pdf_page_is_scaled_from_pixels() {
        let source = RgbaImage::from_pixel(1600, 900, image::Rgba([0, 0, 0, 255]));
        let bytes = encode_pdf(&source).unwrap();
        assert_eq!(media_box(&bytes), (1200.0, 675.0));
    }

    #[test]
    fn successful_export_restores_trigger() {
        let mut trigger = TriggerControl::new("Download PNG");
        let notifier = RecordingNotifier::default();
        let file = export_layout(&layout(), ExportFormat::Png, &mut trigger, &notifier);
        assert!(file.is_some());
        assert_eq!(trigger, TriggerControl::new("Download PNG"));
        assert!(notifier.alerts.borrow().is_empty());
    }

    #[test]
    fn failed_export_alerts_once_and_restores_trigger() {
        let mut empty = layout();
        empty.headers.clear();
        let mut trigger = TriggerControl::new("Download PDF");
        let notifier = RecordingNotifier::default();

        let file = export_layout(&empty, ExportFormat::Pdf, &mut trigger, &notifier);

        assert!(file.is_none());
        assert_eq!(trigger, TriggerControl::new("Download PDF"));
        let alerts = notifier.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Failed to export PDF"));
    }
}
