pub mod planets_seed;
