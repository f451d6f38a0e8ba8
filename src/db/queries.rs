use crate::db::Database;
use crate::error::Result;
use crate::logic::RecommendationRequest;
use crate::models::Recommendation;
use rusqlite::types::Type;
use rusqlite::{params, Row};

/// A saved recommendation together with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRecord {
    pub id: i64,
    pub request: RecommendationRequest,
    pub recommendation: Recommendation,
}

impl Database {
    pub fn save_recommendation(
        &self,
        request: &RecommendationRequest,
        recommendation: &Recommendation,
    ) -> Result<i64> {
        let request_json = serde_json::to_string(request)?;
        let payload_json = serde_json::to_string(recommendation)?;
        let target = &recommendation.nutrient_target;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO recommendations
                    (crop_name, season, field_area_hectares, district, state,
                     nitrogen_kg_ha, phosphorus_kg_ha, potassium_kg_ha,
                     total_verified_cost, predictor, request_json, payload_json, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    recommendation.crop_name,
                    recommendation.season,
                    recommendation.field_area_hectares,
                    request.field.district,
                    request.field.state,
                    target.nitrogen_kg_ha,
                    target.phosphorus_kg_ha,
                    target.potassium_kg_ha,
                    recommendation.total_verified_cost,
                    recommendation.predictor,
                    request_json,
                    payload_json,
                    recommendation.created_at.to_rfc3339(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            tracing::debug!(id, crop = %recommendation.crop_name, "Saved recommendation");
            Ok(id)
        })
    }

    pub fn get_recommendation(&self, id: i64) -> Result<Option<RecommendationRecord>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, request_json, payload_json FROM recommendations WHERE id = ?1",
                [id],
                row_to_record,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Most recent first.
    pub fn list_recommendations(&self, limit: usize) -> Result<Vec<RecommendationRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, request_json, payload_json FROM recommendations
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
                "#,
            )?;
            let rows = stmt.query_map([limit as i64], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(Into::into)
        })
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<RecommendationRecord> {
    let request_json: String = row.get(1)?;
    let payload_json: String = row.get(2)?;

    Ok(RecommendationRecord {
        id: row.get(0)?,
        request: serde_json::from_str(&request_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
        recommendation: serde_json::from_str(&payload_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{assemble, FertilizerCatalog, PriceTable};
    use crate::models::{FieldProfile, NutrientTarget, SoilSample};

    fn request(crop: &str) -> RecommendationRequest {
        RecommendationRequest::new(
            SoilSample {
                nitrogen: Some(22.0),
                phosphorus: Some(14.0),
                potassium: Some(28.0),
                ph: Some(6.4),
                organic_carbon: Some(0.6),
                ..Default::default()
            },
            FieldProfile::new(crop, "Rabi", 2.0).with_district("Pune"),
        )
    }

    fn recommendation(req: &RecommendationRequest) -> Recommendation {
        assemble(
            &FertilizerCatalog::standard(),
            &PriceTable::government(),
            req,
            NutrientTarget::new(100.0, 50.0, 40.0),
            "fixed",
            None,
        )
        .unwrap()
    }

    #[test]
    fn save_and_get() {
        let db = Database::open_in_memory().unwrap();
        let req = request("Wheat");
        let rec = recommendation(&req);

        let id = db.save_recommendation(&req, &rec).unwrap();
        let record = db.get_recommendation(id).unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.request, req);
        assert_eq!(record.recommendation.crop_name, "Wheat");
        assert_eq!(record.recommendation.total_verified_cost, rec.total_verified_cost);
        assert_eq!(record.recommendation.line_items.len(), rec.line_items.len());
        assert_eq!(
            record.recommendation.line_items[0].price_per_50kg_bag,
            rec.line_items[0].price_per_50kg_bag
        );
    }

    #[test]
    fn missing_id_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_recommendation(42).unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for crop in ["Rice", "Wheat", "Maize"] {
            let req = request(crop);
            db.save_recommendation(&req, &recommendation(&req)).unwrap();
        }

        let records = db.list_recommendations(2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].recommendation.crop_name, "Maize");
        assert_eq!(records[1].recommendation.crop_name, "Wheat");
    }
}
