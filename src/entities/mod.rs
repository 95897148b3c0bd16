// Entity Models - the people and add-ons around a rental
//
// Each entity has:
// - Stable identity (UUID) that is preserved through snapshots
// - Validated values (constructors and deserialization share the checks)

pub mod accessory;
pub mod customer;

pub use accessory::Accessory;
pub use customer::{Customer, CAN_MODIFY_RENTAL, CAN_RENT};
