// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Catalogue reads, registration and session creation.
pub mod products;
pub mod sessions;
pub mod users;
