use crate::{
    database::StoreError,
    models::{Planet, PlanetForm, UpdatePlanetForm},
    services::validation::{parse_f64, parse_i64, required},
    state::AppState,
    utils::AppError,
};

const PLANET_NOT_FOUND: &str = "That planet does not exist";
const PLANET_EXISTS: &str = "There is already a planet by that name";

/// Validates a submitted form into a planet with an unassigned id.
/// Missing fields are reported before unparseable numbers.
pub fn planet_from_form(form: PlanetForm) -> Result<Planet, AppError> {
    let planet_name = required("planet_name", form.planet_name)?;
    let planet_type = required("planet_type", form.planet_type)?;
    let home_star = required("home_star", form.home_star)?;
    let mass = required("mass", form.mass)?;
    let radius = required("radius", form.radius)?;
    let distance = required("distance", form.distance)?;

    Ok(Planet {
        planet_id: 0,
        planet_name,
        planet_type,
        home_star,
        mass: parse_f64("mass", &mass)?,
        radius: parse_f64("radius", &radius)?,
        distance: parse_f64("distance", &distance)?,
    })
}

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound { .. } => AppError::NotFound(PLANET_NOT_FOUND.to_string()),
        StoreError::DuplicateKey { .. } => AppError::DuplicateKey(PLANET_EXISTS.to_string()),
        other => other.into(),
    }
}

pub async fn list_planets(state: &AppState) -> Result<Vec<Planet>, AppError> {
    state.planets.list_all().await.map_err(store_error)
}

pub async fn get_planet(state: &AppState, planet_id: i64) -> Result<Planet, AppError> {
    state.planets.get(planet_id).await.map_err(store_error)
}

pub async fn add_planet(state: &AppState, form: PlanetForm) -> Result<Planet, AppError> {
    let mut planet = planet_from_form(form)?;

    if state
        .planets
        .find_by_unique_field("planet_name", &planet.planet_name)
        .await
        .map_err(store_error)?
        .is_some()
    {
        return Err(AppError::DuplicateKey(PLANET_EXISTS.to_string()));
    }

    planet.planet_id = state.planets.create(planet.clone()).await.map_err(store_error)?;

    Ok(planet)
}

/// Full replace of every non-key field.
pub async fn update_planet(state: &AppState, form: UpdatePlanetForm) -> Result<Planet, AppError> {
    let (planet_id, fields) = form.into_parts();
    let planet_id = parse_i64("planet_id", &required("planet_id", planet_id)?)?;

    let mut planet = planet_from_form(fields)?;
    planet.planet_id = planet_id;

    state
        .planets
        .update(planet_id, planet.clone())
        .await
        .map_err(store_error)?;

    Ok(planet)
}

pub async fn remove_planet(state: &AppState, planet_id: i64) -> Result<(), AppError> {
    state.planets.delete(planet_id).await.map_err(store_error)
}
