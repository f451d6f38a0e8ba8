use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // 1: recommendations
    r#"
    CREATE TABLE IF NOT EXISTS recommendations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        crop_name TEXT NOT NULL,
        season TEXT NOT NULL,
        field_area_hectares REAL NOT NULL,
        district TEXT,
        state TEXT,
        nitrogen_kg_ha REAL NOT NULL,
        phosphorus_kg_ha REAL NOT NULL,
        potassium_kg_ha REAL NOT NULL,
        total_verified_cost REAL NOT NULL,
        predictor TEXT NOT NULL,
        request_json TEXT NOT NULL,
        payload_json TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    "#,
    // 2: indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_recommendations_created_at
        ON recommendations(created_at);
    CREATE INDEX IF NOT EXISTS idx_recommendations_crop
        ON recommendations(crop_name);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_recorded_once() {
        let db = Database::open_in_memory().unwrap();
        run(&db).unwrap();

        let versions: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(versions, MIGRATIONS.len() as i64);
    }
}
