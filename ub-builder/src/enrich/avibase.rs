//! Range pass: country and region checklists from Avibase
//!
//! - Country list: `tr.reg3` rows of the checklist index
//! - Country page: `tr.highlight1` rows give rarity, reference URL and
//!   conservation status per species
//! - Countries in [`DIVERSE_COUNTRIES`] are additionally walked region by
//!   region, using the region links listed on the country page
//!
//! Parsing is synchronous and works on page bodies; only
//! [`avibase_pass`] touches the network.

use crate::fetch::Fetcher;
use crate::models::{EnrichmentTable, SpeciesRecord};
use crate::tags::{AvibaseRow, TagAccumulator, TagEvent, DEFAULT_RARITY};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use ub_common::Result;

pub const AVIBASE_BASE_URL: &str = "https://avibase.bsc-eoc.org/";

/// Checklist index listing every country
pub const CHECKLIST_PATH: &str = "checklist.jsp?lang=EN";

/// Conservation status when the page shows none
pub const DEFAULT_STATUS: &str = "Least concern";

/// Countries scanned region by region
pub const DIVERSE_COUNTRIES: [&str; 11] = [
    "Australia",
    "Brazil",
    "Canada",
    "China",
    "Colombia",
    "Ecuador",
    "India",
    "Indonesia",
    "Peru",
    "Russian Federation",
    "United States",
];

// Selectors are compile-time constants, so parsing cannot fail
static COUNTRY_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.reg3").unwrap());
static SPECIES_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.highlight1").unwrap());
static REGION_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr.reg4, tr.reg5, tr.reg6").unwrap());
static REGION_ROW_SHALLOW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.reg4").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static BREEDING: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"font[color="blue"]"#).unwrap());
static STATUS: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"font[color="red"]"#).unwrap());

/// A named link to a country or region checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistLink {
    pub name: String,
    pub url: String,
}

/// One species row of a country checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    pub common_name: String,
    pub avibase_url: Option<String>,
    /// Raw rarity text; empty when the page gives none
    pub rarity: String,
    pub conservation_status: String,
}

/// One species row of a region checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEntry {
    pub common_name: String,
    pub rarity: String,
}

fn absolute(href: &str) -> String {
    format!("{}{}", AVIBASE_BASE_URL, href)
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Direct text children of an element, in order
fn own_text_nodes(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| String::from(&**t)))
        .collect()
}

/// First link of the first cell of a row
fn first_cell_link(row: ElementRef<'_>) -> Option<ChecklistLink> {
    let cell = row.select(&CELL).next()?;
    let link = cell.select(&LINK).next()?;
    let href = link.value().attr("href")?;
    Some(ChecklistLink {
        name: text_of(link).trim().to_string(),
        url: absolute(href),
    })
}

/// Countries listed on the checklist index
pub fn parse_country_list(html: &str) -> Vec<ChecklistLink> {
    let document = Html::parse_document(html);
    document
        .select(&COUNTRY_ROW)
        .filter_map(first_cell_link)
        .collect()
}

/// Species rows of a country checklist
///
/// Rarity is the last direct text node of the status cell other than a lone
/// space; a blue `font` (breeding, endemic) overrides it. The conservation
/// status is the red `font` text.
pub fn parse_country_page(html: &str) -> Vec<CountryEntry> {
    let document = Html::parse_document(html);
    document
        .select(&SPECIES_ROW)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
            let common_name = text_of(*cells.first()?);

            let avibase_url = cells
                .get(1)
                .and_then(|c| c.select(&LINK).next())
                .and_then(|a| a.value().attr("href"))
                .map(absolute);

            let mut rarity = cells
                .get(2)
                .map(|c| own_text_nodes(*c))
                .unwrap_or_default()
                .into_iter()
                .filter(|t| t.as_str() != " ")
                .last()
                .map(|t| t.trim_end().to_string())
                .unwrap_or_default();
            if let Some(breeding) = row.select(&BREEDING).next() {
                rarity = text_of(breeding);
            }

            let conservation_status = row
                .select(&STATUS)
                .next()
                .map(text_of)
                .unwrap_or_else(|| DEFAULT_STATUS.to_string());

            Some(CountryEntry {
                common_name,
                avibase_url,
                rarity,
                conservation_status,
            })
        })
        .collect()
}

/// Region checklist links on a country page
///
/// The Russian Federation lists only first-level regions; other countries
/// list three levels.
pub fn parse_region_links(html: &str, country: &str) -> Vec<ChecklistLink> {
    let selector: &Selector = if country == "Russian Federation" {
        &REGION_ROW_SHALLOW
    } else {
        &REGION_ROW
    };
    let document = Html::parse_document(html);
    document.select(selector).filter_map(first_cell_link).collect()
}

/// Species rows of a region checklist
///
/// Rarity is the first non-blank direct text node of the status cell,
/// overridden by a blue `font`.
pub fn parse_region_page(html: &str) -> Vec<RegionEntry> {
    let document = Html::parse_document(html);
    document
        .select(&SPECIES_ROW)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
            let common_name = text_of(*cells.first()?);

            let rarity = match row.select(&BREEDING).next() {
                Some(breeding) => text_of(breeding),
                None => cells
                    .get(2)
                    .map(|c| own_text_nodes(*c))
                    .unwrap_or_default()
                    .into_iter()
                    .find(|t| !t.trim().is_empty())
                    .map(|t| t.trim_end().to_string())
                    .unwrap_or_else(|| DEFAULT_RARITY.to_string()),
            };

            Some(RegionEntry {
                common_name,
                rarity,
            })
        })
        .collect()
}

/// Scrape every country (and regions of the diverse ones) into tag sets
///
/// Pages that cannot be fetched are skipped; if the index itself is
/// unavailable every species ends up with an empty tag set.
pub async fn avibase_pass(
    records: &[SpeciesRecord],
    fetcher: &dyn Fetcher,
) -> Result<EnrichmentTable<AvibaseRow>> {
    let mut accumulator = TagAccumulator::new(records);

    let index_url = absolute(CHECKLIST_PATH);
    let Some(index) = fetcher.fetch(&index_url).await else {
        warn!(url = %index_url, "Avibase checklist index unavailable, no range tags");
        return accumulator.finish();
    };
    let countries = parse_country_list(&index);
    info!("Processing {} countries", countries.len());

    for country in &countries {
        let Some(page) = fetcher.fetch(&country.url).await else {
            continue;
        };

        let entries = parse_country_page(&page);
        debug!(country = %country.name, species = entries.len(), "Parsed country checklist");
        for entry in &entries {
            accumulator.apply(&TagEvent::country(
                &entry.common_name,
                &country.name,
                &entry.rarity,
            ));
            accumulator.record_reference(
                &entry.common_name,
                entry.avibase_url.as_deref(),
                Some(&entry.conservation_status),
            );
        }

        if !DIVERSE_COUNTRIES.contains(&country.name.as_str()) {
            continue;
        }
        let regions = parse_region_links(&page, &country.name);
        debug!(country = %country.name, regions = regions.len(), "Scanning regions");
        for region in &regions {
            let Some(region_page) = fetcher.fetch(&region.url).await else {
                continue;
            };
            for entry in parse_region_page(&region_page) {
                accumulator.apply(&TagEvent::region(
                    entry.common_name,
                    &country.name,
                    &region.name,
                    entry.rarity,
                ));
            }
        }
    }

    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::StaticFetcher;
    use crate::models::species::test_record;

    const INDEX: &str = r#"<html><body><table>
        <tr class="reg3"><td><a href="checklist.jsp?region=CA">Canada</a></td></tr>
        <tr class="reg3"><td><a href="checklist.jsp?region=MX">Mexico</a></td></tr>
        <tr class="reg2"><td><a href="checklist.jsp?region=NA">North America</a></td></tr>
    </table></body></html>"#;

    const CANADA: &str = r#"<html><body><table>
        <tr class="highlight1"><td>American Robin</td><td><a href="species.jsp?avibaseid=AAA">Turdus migratorius</a></td><td> </td></tr>
        <tr class="highlight1"><td>Whooping Crane</td><td><a href="species.jsp?avibaseid=BBB">Grus americana</a></td><td>Rare/Accidental <font color="red">Endangered</font></td></tr>
        <tr class="highlight1"><td>Blue Jay</td><td><a href="species.jsp?avibaseid=CCC">Cyanocitta cristata</a></td><td><font color="blue">Breeding endemic</font></td></tr>
        <tr class="highlight1"><td>Passenger Pigeon</td><td><a href="species.jsp?avibaseid=DDD">Ectopistes migratorius</a></td><td>Extirpated</td></tr>
    </table>
    <table>
        <tr class="reg4"><td><a href="checklist.jsp?region=CAbc">British Columbia</a></td></tr>
        <tr class="reg5"><td><a href="checklist.jsp?region=CAbcvi"> Vancouver Island </a></td></tr>
    </table></body></html>"#;

    const BRITISH_COLUMBIA: &str = r#"<html><body><table>
        <tr class="highlight1"><td>American Robin</td><td><a href="x">x</a></td><td>Rare  <br>Introduced</td></tr>
        <tr class="highlight1"><td>Blue Jay</td><td><a href="x">x</a></td><td></td></tr>
        <tr class="highlight1"><td>Whooping Crane</td><td><a href="x">x</a></td><td>Extirpated</td></tr>
    </table></body></html>"#;

    const MEXICO: &str = r#"<html><body><table>
        <tr class="highlight1"><td>American Robin</td><td><a href="species.jsp?avibaseid=ZZZ">x</a></td><td>Rare</td></tr>
    </table>
    <table><tr class="reg4"><td><a href="checklist.jsp?region=MXyuc">Yucatan</a></td></tr></table>
    </body></html>"#;

    #[test]
    fn test_parse_country_list() {
        let countries = parse_country_list(INDEX);
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "Canada");
        assert_eq!(
            countries[0].url,
            "https://avibase.bsc-eoc.org/checklist.jsp?region=CA"
        );
    }

    #[test]
    fn test_parse_country_page() {
        let entries = parse_country_page(CANADA);
        assert_eq!(entries.len(), 4);

        assert_eq!(entries[0].common_name, "American Robin");
        assert_eq!(entries[0].rarity, "");
        assert_eq!(entries[0].conservation_status, "Least concern");
        assert_eq!(
            entries[0].avibase_url.as_deref(),
            Some("https://avibase.bsc-eoc.org/species.jsp?avibaseid=AAA")
        );

        assert_eq!(entries[1].rarity, "Rare/Accidental");
        assert_eq!(entries[1].conservation_status, "Endangered");
        assert_eq!(entries[2].rarity, "Breeding endemic");
        assert_eq!(entries[3].rarity, "Extirpated");
    }

    #[test]
    fn test_parse_region_links() {
        let all = parse_region_links(CANADA, "Canada");
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "Vancouver Island");

        let shallow = parse_region_links(CANADA, "Russian Federation");
        assert_eq!(shallow.len(), 1);
        assert_eq!(shallow[0].name, "British Columbia");
    }

    #[test]
    fn test_parse_region_page() {
        let entries = parse_region_page(BRITISH_COLUMBIA);
        assert_eq!(entries[0].rarity, "Rare");
        assert_eq!(entries[1].rarity, "Common");
        assert_eq!(entries[2].rarity, "Extirpated");
    }

    #[tokio::test]
    async fn test_avibase_pass() {
        let fetcher = StaticFetcher::default()
            .with_page("https://avibase.bsc-eoc.org/checklist.jsp?lang=EN", INDEX)
            .with_page("https://avibase.bsc-eoc.org/checklist.jsp?region=CA", CANADA)
            .with_page("https://avibase.bsc-eoc.org/checklist.jsp?region=CAbc", BRITISH_COLUMBIA)
            .with_page("https://avibase.bsc-eoc.org/checklist.jsp?region=MX", MEXICO);
        let records = vec![
            test_record("American Robin", "Turdus migratorius"),
            test_record("Whooping Crane", "Grus americana"),
            test_record("Blue Jay", "Cyanocitta cristata"),
            test_record("Passenger Pigeon", "Ectopistes migratorius"),
            test_record("Kiwi", "Apteryx australis"),
        ];

        let table = avibase_pass(&records, &fetcher).await.unwrap();
        assert_eq!(table.len(), 5);

        let robin = table.get("Turdus migratorius").unwrap();
        assert_eq!(
            robin.tags.to_tag_string(),
            "UB::Canada::Common UB::Canada::British-Columbia::Rare UB::Mexico::Rare"
        );
        assert_eq!(
            robin.avibase_url.as_deref(),
            Some("https://avibase.bsc-eoc.org/species.jsp?avibaseid=AAA")
        );

        let crane = table.get("Grus americana").unwrap();
        assert_eq!(crane.tags.to_tag_string(), "UB::Canada::Rare/Accidental");
        assert_eq!(crane.conservation_status.as_deref(), Some("Endangered"));

        let jay = table.get("Cyanocitta cristata").unwrap();
        assert_eq!(
            jay.tags.to_tag_string(),
            "UB::Canada::Breeding-endemic UB::Canada::British-Columbia::Common"
        );

        let pigeon = table.get("Ectopistes migratorius").unwrap();
        assert!(pigeon.tags.is_empty());
        assert!(pigeon.avibase_url.is_some());

        let kiwi = table.get("Apteryx australis").unwrap();
        assert_eq!(kiwi, &AvibaseRow::default());

        // Mexico is not scanned by region
        let requested = fetcher.requested.lock().unwrap();
        assert!(!requested.iter().any(|u| u.ends_with("MXyuc")));
        // Vancouver Island page is missing and skipped
        assert!(requested.iter().any(|u| u.ends_with("CAbcvi")));
    }

    #[tokio::test]
    async fn test_index_unavailable() {
        let fetcher = StaticFetcher::default();
        let records = vec![test_record("American Robin", "Turdus migratorius")];
        let table = avibase_pass(&records, &fetcher).await.unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("Turdus migratorius").unwrap().tags.is_empty());
    }
}
