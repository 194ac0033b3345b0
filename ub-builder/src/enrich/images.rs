//! Images pass: hero photos and identification text from eBird species pages

use crate::fetch::Fetcher;
use crate::models::{EnrichmentTable, SpeciesRecord};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use ub_common::Result;

/// Name of the images pass and its processed table
pub const IMAGES_PASS: &str = "images";

/// Size suffix requested instead of the page's thumbnail size
pub const IMAGE_WIDTH_SUFFIX: &str = "640";

static HERO: Lazy<Selector> = Lazy::new(|| Selector::parse("div.Hero-image").unwrap());
static FIGURE: Lazy<Selector> = Lazy::new(|| Selector::parse("figure").unwrap());
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static FIGCAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("figcaption").unwrap());
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());
static IDENTIFICATION: Lazy<Selector> = Lazy::new(|| Selector::parse("p.u-stack-sm").unwrap());

/// Output of the images pass for one species
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagesRow {
    pub images: Option<String>,
    pub identification: Option<String>,
}

impl ImagesRow {
    pub fn is_empty(&self) -> bool {
        self.images.is_none() && self.identification.is_none()
    }
}

/// Swap the trailing size marker of an image URL for the wide variant
pub fn wide_image_url(src: &str) -> String {
    let cut = src
        .char_indices()
        .rev()
        .nth(2)
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!("{}{}", &src[..cut], IMAGE_WIDTH_SUFFIX)
}

pub fn render_image(kind: &str, url: &str, credit: &str) -> String {
    format!(
        r#"<div class="img-w-txt"><div class="type">{}</div><img src="{}"><div class="credit">{}</div></div>"#,
        kind,
        url,
        credit.replace('\u{a0}', "&nbsp;")
    )
}

/// One figure; `None` when it has no image or an empty caption
fn render_figure(figure: ElementRef<'_>) -> Option<String> {
    let src = figure.select(&IMG).next()?.value().attr("src")?;
    if src.is_empty() {
        return None;
    }

    let (kind, credit) = match figure.select(&FIGCAPTION).next() {
        Some(caption) => {
            let spans: Vec<String> = caption.select(&SPAN).map(|s| s.text().collect()).collect();
            match spans.as_slice() {
                [] => return None,
                [credit] => (String::new(), credit.clone()),
                [kind, credit, ..] => (kind.clone(), credit.clone()),
            }
        }
        None => (String::new(), String::new()),
    };

    Some(render_image(&kind, &wide_image_url(src), &credit))
}

/// Images HTML and identification text of an eBird species page
///
/// A page without the hero container yields an empty row.
pub fn parse_species_page(html: &str) -> ImagesRow {
    let document = Html::parse_document(html);
    let Some(hero) = document.select(&HERO).next() else {
        return ImagesRow::default();
    };

    let images: String = hero.select(&FIGURE).filter_map(render_figure).collect();
    let identification: String = document
        .select(&IDENTIFICATION)
        .next()
        .map(|p| p.text().collect())
        .unwrap_or_default();

    ImagesRow {
        images: (!images.is_empty()).then_some(images),
        identification: (!identification.is_empty()).then_some(identification),
    }
}

/// Fetch every species page, one at a time
pub async fn images_pass(
    records: &[SpeciesRecord],
    fetcher: &dyn Fetcher,
) -> Result<EnrichmentTable<ImagesRow>> {
    let mut table = EnrichmentTable::new(IMAGES_PASS);

    for record in records {
        let Some(page) = fetcher.fetch(&record.ebird_url).await else {
            continue;
        };
        let row = parse_species_page(&page);
        if row.is_empty() {
            debug!(url = %record.ebird_url, "No images on page");
            continue;
        }
        table.insert(record.key(), row)?;
    }

    info!("Found images for {} species", table.len());
    Ok(table)
}
