pub mod crew_repo;
pub mod inventory_repo;
pub mod log_repo;
pub mod supply_repo;

pub use crew_repo::CrewRepository;
pub use inventory_repo::InventoryRepository;
pub use log_repo::LogRepository;
pub use supply_repo::SupplyRepository;
