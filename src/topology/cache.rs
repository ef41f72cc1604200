//! Staleness control for adjacency derived from a face list.

/// A structure whose adjacency maps are derived from primary data and
/// stamped with the generation they mirror.
pub trait InvalidateCache {
    /// Mark the derived maps stale. Queries fail until the next rebuild.
    fn invalidate_cache(&mut self);

    /// `true` while the derived maps mirror the primary data.
    fn cache_is_current(&self) -> bool;

    /// Re-derive the maps from the primary data.
    fn rebuild_cache(&mut self);

    /// Rebuild only when stale. Returns whether a rebuild ran.
    fn refresh_cache(&mut self) -> bool {
        if self.cache_is_current() {
            return false;
        }
        self.rebuild_cache();
        true
    }
}
