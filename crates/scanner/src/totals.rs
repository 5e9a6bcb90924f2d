//! Aggregated migration counters

/// Counters aggregated at file, service, and version granularity.
///
/// `add` is associative and commutative with the all-zero value as identity,
/// so per-file totals can be folded in any order. There is no subtraction;
/// derived quantities ("remaining to migrate") are computed by consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub services: u32,
    pub resources: u32,
    pub data_sources: u32,
    pub sdk_legacy: u32,
    pub sdk_modern: u32,
    pub sdk_both: u32,
    pub typed: u32,
    pub create_update: u32,
    pub built_in_parse: u32,
}

impl Totals {
    /// Field-wise sum of two totals
    pub fn add(self, other: Totals) -> Totals {
        Totals {
            services: self.services + other.services,
            resources: self.resources + other.resources,
            data_sources: self.data_sources + other.data_sources,
            sdk_legacy: self.sdk_legacy + other.sdk_legacy,
            sdk_modern: self.sdk_modern + other.sdk_modern,
            sdk_both: self.sdk_both + other.sdk_both,
            typed: self.typed + other.typed,
            create_update: self.create_update + other.create_update,
            built_in_parse: self.built_in_parse + other.built_in_parse,
        }
    }

    /// Combined resource and data-source count
    pub fn element_count(&self) -> u32 {
        self.resources + self.data_sources
    }
}
