/// Database access layer
///
/// - `pool`: PostgreSQL connection pool construction and health checks
/// - `migrations`: migration runner and first-run admin seeding

pub mod migrations;
pub mod pool;
