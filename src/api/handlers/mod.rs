pub mod assistant;
pub mod crew;
pub mod health;
pub mod inventory;
pub mod logs;
pub mod supplies;
