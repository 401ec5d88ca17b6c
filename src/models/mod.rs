pub mod crew;
pub mod inventory;
pub mod log;
pub mod supply;

pub use crew::{CrewMember, CrewSnapshot};
pub use inventory::{CategorizedLots, InventoryLot, LotBucket, StockLevel, SupplyRef};
pub use log::{CrewRef, LogEntry, LotRef, LotSnapshot};
pub use supply::{Supply, SupplyCandidate, SupplySnapshot};
