use crate::sampler::SectionGeometry;
use crate::style::TargetKey;

/// Element lookups the engine needs from the page.
///
/// The web frontend answers from the DOM; tests use an in-memory table.
pub trait ElementHost {
    /// Document-space box of `key`, or `None` if the element is not mounted.
    fn geometry(&self, key: TargetKey) -> Option<SectionGeometry>;

    fn is_resolved(&self, key: TargetKey) -> bool {
        self.geometry(key).is_some()
    }
}
