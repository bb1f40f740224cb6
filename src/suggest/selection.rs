use crate::suggest::index::LocationRecord;

/// A removable token representing one accepted destination suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub record: LocationRecord,
    /// Deduplication key: "postcode-city-address"
    pub full_address: String,
    pub display_text: String,
}

/// Deduplication key shared by chips and duplicate checks
pub fn full_address_key(record: &LocationRecord) -> String {
    format!("{}-{}-{}", record.postcode, record.city, record.address)
}

/// Extracts the postcode from a formatted value
/// ("400656 - Strada Câmpului" -> "400656"); values that do not start with
/// digits are returned trimmed as-is.
pub fn extract_postcode(value: &str) -> &str {
    let trimmed = value.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    if digits_end > 0 {
        &trimmed[..digits_end]
    } else {
        trimmed
    }
}

/// The route origin: a single slot, overwritten by each accepted suggestion.
/// One route has exactly one starting location.
#[derive(Debug, Clone, Default)]
pub struct StartSelection {
    record: Option<LocationRecord>,
}

impl StartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a suggestion, replacing any previous selection
    pub fn accept(&mut self, record: LocationRecord) {
        log::debug!("start selection set to {}", record.postcode);
        self.record = Some(record);
    }

    pub fn clear(&mut self) {
        self.record = None;
    }

    pub fn record(&self) -> Option<&LocationRecord> {
        self.record.as_ref()
    }

    /// The selected postcode, if any
    pub fn postcode(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.postcode.as_str())
    }

    /// Formatted input-field text for the selection
    pub fn display_text(&self) -> Option<String> {
        self.record.as_ref().map(|r| r.start_text())
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }
}

/// Route destinations: an ordered stack of chips, deduplicated by full
/// address. Removal is by explicit key; order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct DestinationSelection {
    chips: Vec<Chip>,
}

impl DestinationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a suggestion as a new chip. Returns `false` (and changes
    /// nothing) when the exact address is already selected.
    pub fn accept(&mut self, record: LocationRecord) -> bool {
        let full_address = full_address_key(&record);
        if self.chips.iter().any(|c| c.full_address == full_address) {
            log::debug!("destination already selected: {}", full_address);
            return false;
        }

        let display_text = record.finish_text();
        self.chips.push(Chip {
            record,
            full_address,
            display_text,
        });
        true
    }

    /// Removes the chip with the given full-address key
    pub fn remove(&mut self, full_address: &str) -> Option<Chip> {
        let idx = self
            .chips
            .iter()
            .position(|c| c.full_address == full_address)?;
        Some(self.chips.remove(idx))
    }

    pub fn clear(&mut self) {
        self.chips.clear();
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Selected location records, in chip order
    pub fn records(&self) -> Vec<&LocationRecord> {
        self.chips.iter().map(|c| &c.record).collect()
    }

    /// Comma-joined postcodes, the wire form expected by the routing backend
    pub fn zip_text(&self) -> String {
        self.chips
            .iter()
            .map(|c| c.record.postcode.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Input placeholder summarizing the current selection
    pub fn placeholder_text(&self) -> String {
        if self.chips.is_empty() {
            "Enter zip code".to_string()
        } else {
            format!("{} zipcode(s) selected", self.chips.len())
        }
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}
