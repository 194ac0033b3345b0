//! Enrichment passes
//!
//! Each pass reads the canonical records and returns its own
//! [`EnrichmentTable`](crate::models::EnrichmentTable); nothing is shared
//! between passes. The scraping passes fail soft: a page that cannot be
//! fetched only leaves its species without data.
//!
//! | Pass | Source | Output |
//! |------|--------|--------|
//! | [`avibase`] | Avibase checklists | tags, reference URL, conservation status |
//! | [`images`] | eBird species pages | images HTML, identification text |
//! | [`translations`] | IOC list, first-generation deck | names per language |
//! | [`mnemonics`] | mnemonics text file | mnemonic text |
//! | audio | sound archive | see [`crate::media::audio_pass`] |

pub mod avibase;
pub mod images;
pub mod mnemonics;
pub mod translations;

pub use avibase::avibase_pass;
pub use images::{images_pass, ImagesRow};
pub use mnemonics::mnemonics_pass;
pub use translations::{translations_pass, LANGUAGES};
