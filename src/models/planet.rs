use serde::{Deserialize, Serialize};

use crate::database::Resource;

/// Planet record (collection "planets")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Planet {
    pub planet_id: i64,
    pub planet_name: String,
    pub planet_type: String,
    pub home_star: String,
    pub mass: f64,
    pub radius: f64,
    pub distance: f64,
}

impl Resource for Planet {
    const COLLECTION: &'static str = "planets";
    const ID_FIELD: &'static str = "planet_id";
    const UNIQUE_FIELD: &'static str = "planet_name";

    fn set_id(&mut self, id: i64) {
        self.planet_id = id;
    }

    fn unique_value(&self) -> &str {
        &self.planet_name
    }
}

/// Form body for POST /add_planet. Every field is optional at the extractor
/// level so that a missing field becomes a validation error, not a parse error.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct PlanetForm {
    pub planet_name: Option<String>,
    pub planet_type: Option<String>,
    pub home_star: Option<String>,
    pub mass: Option<String>,
    pub radius: Option<String>,
    pub distance: Option<String>,
}

/// Form body for PUT /update_planet
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdatePlanetForm {
    pub planet_id: Option<String>,
    pub planet_name: Option<String>,
    pub planet_type: Option<String>,
    pub home_star: Option<String>,
    pub mass: Option<String>,
    pub radius: Option<String>,
    pub distance: Option<String>,
}

impl UpdatePlanetForm {
    /// Splits the key from the replacement fields.
    pub fn into_parts(self) -> (Option<String>, PlanetForm) {
        let fields = PlanetForm {
            planet_name: self.planet_name,
            planet_type: self.planet_type,
            home_star: self.home_star,
            mass: self.mass,
            radius: self.radius,
            distance: self.distance,
        };
        (self.planet_id, fields)
    }
}
