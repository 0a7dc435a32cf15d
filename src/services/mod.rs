pub mod auth_service;
pub mod notification_service;
pub mod planet_service;
pub mod token_service;
pub mod validation;
