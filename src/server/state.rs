use crate::location::Catalog;

/// Shared, read-only server state. The catalog never changes after startup,
/// so handlers read it without locking.
pub struct AppState {
    pub catalog: Catalog,
}
