// Demo data: the three inner planets plus a login for trying the API.

use crate::{
    models::{Planet, User},
    state::AppState,
    utils::AppError,
};

const DEMO_EMAIL: &str = "test@test.com";
const DEMO_PASSWORD: &str = "P@ssw0rd";

fn demo_planets() -> Vec<Planet> {
    vec![
        Planet {
            planet_id: 0,
            planet_name: "Mercury".into(),
            planet_type: "Class D".into(),
            home_star: "Sol".into(),
            mass: 2.258e23,
            radius: 1516.0,
            distance: 35.98e6,
        },
        Planet {
            planet_id: 0,
            planet_name: "Venus".into(),
            planet_type: "Class K".into(),
            home_star: "Sol".into(),
            mass: 4.867e24,
            radius: 3760.0,
            distance: 67.24e6,
        },
        Planet {
            planet_id: 0,
            planet_name: "Earth".into(),
            planet_type: "Class M".into(),
            home_star: "Sol".into(),
            mass: 5.972e24,
            radius: 3959.0,
            distance: 92.96e6,
        },
    ]
}

/// Inserts whatever demo records are missing. Safe to run on every startup.
pub async fn seed_demo_data(state: &AppState) -> Result<(), AppError> {
    log::info!("🌱 Seeding demo data...");

    let mut inserted = 0;
    for planet in demo_planets() {
        if state
            .planets
            .find_by_unique_field("planet_name", &planet.planet_name)
            .await?
            .is_none()
        {
            state.planets.create(planet).await?;
            inserted += 1;
        }
    }

    if state.users.find_by_unique_field("email", DEMO_EMAIL).await?.is_none() {
        let cost = state.bcrypt_cost;
        let password = tokio::task::spawn_blocking(move || bcrypt::hash(DEMO_PASSWORD, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

        state
            .users
            .create(User {
                id: 0,
                first_name: "William".into(),
                last_name: "Herschel".into(),
                email: DEMO_EMAIL.into(),
                password,
                temporary_password: None,
            })
            .await?;
        inserted += 1;
    }

    log::info!("✅ Demo data ready ({} records inserted)", inserted);
    Ok(())
}
