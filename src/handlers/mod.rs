pub mod bookings;
pub mod health;

use crate::errors::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
