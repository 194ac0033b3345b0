//! Canonical species record

/// Base URL for the anchor's species pages
pub const EBIRD_SPECIES_URL: &str = "https://ebird.org/species/";

/// Name of a species in the alternate (IOC) naming system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltName {
    pub common: Option<String>,
    pub scientific: Option<String>,
}

impl AltName {
    pub fn new(common: Option<String>, scientific: Option<String>) -> Self {
        Self { common, scientific }
    }

    /// True when neither name is known
    pub fn is_empty(&self) -> bool {
        self.common.is_none() && self.scientific.is_none()
    }
}

/// One species from the anchor (eBird/Clements) taxonomy
///
/// `scientific_name` is the canonical key: unique across the anchor set and
/// never modified after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRecord {
    /// Canonical common name (English, Clements)
    pub common_name: String,
    /// Canonical scientific name (Clements), the join key
    pub scientific_name: String,
    /// Reference URL on eBird
    pub ebird_url: String,
    pub taxon_order: String,
    pub order: String,
    pub family: String,
    /// Resolved IOC name pair, `None` until reconciliation finds a match
    pub ioc: Option<AltName>,
}

impl SpeciesRecord {
    /// Canonical key used by every enrichment pass
    pub fn key(&self) -> &str {
        &self.scientific_name
    }

    pub fn ioc_common(&self) -> Option<&str> {
        self.ioc.as_ref().and_then(|n| n.common.as_deref())
    }

    pub fn ioc_scientific(&self) -> Option<&str> {
        self.ioc.as_ref().and_then(|n| n.scientific.as_deref())
    }
}

/// Build the eBird species page URL from a species code
pub fn ebird_url(species_code: &str) -> String {
    format!("{}{}", EBIRD_SPECIES_URL, species_code)
}

#[cfg(test)]
pub(crate) fn test_record(common: &str, scientific: &str) -> SpeciesRecord {
    SpeciesRecord {
        common_name: common.to_string(),
        scientific_name: scientific.to_string(),
        ebird_url: ebird_url(&scientific.to_lowercase().replace(' ', "")),
        taxon_order: "1".to_string(),
        order: "Passeriformes".to_string(),
        family: "Turdidae (Thrushes and Allies)".to_string(),
        ioc: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ebird_url() {
        assert_eq!(ebird_url("amerob"), "https://ebird.org/species/amerob");
    }

    #[test]
    fn test_ioc_accessors() {
        let mut record = test_record("American Robin", "Turdus migratorius");
        assert!(record.ioc_common().is_none());

        record.ioc = Some(AltName::new(Some("American Robin".into()), None));
        assert_eq!(record.ioc_common(), Some("American Robin"));
        assert_eq!(record.ioc_scientific(), None);
        assert_eq!(record.key(), "Turdus migratorius");
    }
}
