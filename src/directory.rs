// 📇 Rental Directory - every rental booked in this session
//
// Replaces a global list of rentals with an explicit owned object. Rentals are
// kept in booking order and handed out as shared handles so a process, a
// report and the directory can all look at the same rental.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use crate::entities::Customer;
use crate::error::{RentalError, RentalResult};
use crate::instruments::SharedInstrument;
use crate::rental::Rental;
use crate::services::RentalServices;

pub type SharedRental = Rc<RefCell<Rental>>;

#[derive(Debug, Default)]
pub struct RentalDirectory {
    rentals: Vec<SharedRental>,
    services: RentalServices,
}

impl RentalDirectory {
    pub fn new(services: RentalServices) -> Self {
        RentalDirectory {
            rentals: Vec::new(),
            services,
        }
    }

    /// Create a rental with the directory's services and register it
    pub fn book(
        &mut self,
        customer: Rc<Customer>,
        instrument: SharedInstrument,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RentalResult<SharedRental> {
        let rental = Rental::new(
            customer,
            instrument,
            start_date,
            end_date,
            self.services.clone(),
        )?;
        Ok(self.register(rental))
    }

    /// Add an already-built rental (e.g. restored from a snapshot)
    pub fn register(&mut self, rental: Rental) -> SharedRental {
        tracing::debug!(rental = %rental.id(), "Rental registered");
        let shared = Rc::new(RefCell::new(rental));
        self.rentals.push(Rc::clone(&shared));
        shared
    }

    /// Look a rental up by id
    pub fn find(&self, rental_id: Uuid) -> RentalResult<SharedRental> {
        self.rentals
            .iter()
            .find(|r| r.borrow().id() == rental_id)
            .cloned()
            .ok_or(RentalError::RentalNotFound(rental_id))
    }

    /// Rentals in booking order
    pub fn iter(&self) -> impl Iterator<Item = &SharedRental> {
        self.rentals.iter()
    }

    pub fn len(&self) -> usize {
        self.rentals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rentals.is_empty()
    }

    pub fn services(&self) -> &RentalServices {
        &self.services
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryActionLog;
    use crate::entities::CAN_RENT;
    use crate::instruments::{share, Condition, InstrumentSpec, Violin};
    use crate::notify::RecordingNotifier;

    fn directory() -> RentalDirectory {
        RentalDirectory::new(RentalServices::new(
            Rc::new(RecordingNotifier::new()),
            Rc::new(MemoryActionLog::new()),
        ))
    }

    fn violin() -> SharedInstrument {
        let spec = InstrumentSpec::new("Stradivarius copy", Condition::Used, 60.0);
        share(Violin::new(&spec, true).unwrap())
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_book_and_find() {
        let mut dir = directory();
        let customer = Rc::new(Customer::new("Anna", "anna@example.com").unwrap());

        let first = dir.book(customer.clone(), violin(), date(1), date(11)).unwrap();
        let second = dir.book(customer, violin(), date(2), date(3)).unwrap();

        assert_eq!(dir.len(), 2);
        let id = second.borrow().id();
        let found = dir.find(id).unwrap();
        assert!(Rc::ptr_eq(&found, &second));

        // 60 * 10 + 10 * 10, then the long rental discount
        assert!((first.borrow().total_cost() - 560.0).abs() < 1e-9);

        let ids: Vec<Uuid> = dir.iter().map(|r| r.borrow().id()).collect();
        assert_eq!(ids, vec![first.borrow().id(), id]);
    }

    #[test]
    fn test_find_missing_rental() {
        let dir = directory();
        let missing = Uuid::new_v4();
        assert_eq!(
            dir.find(missing).unwrap_err(),
            RentalError::RentalNotFound(missing)
        );
        assert!(dir.is_empty());
    }

    #[test]
    fn test_failed_booking_is_not_registered() {
        let mut dir = directory();
        let customer = Rc::new(
            Customer::new("Anna", "anna@example.com")
                .unwrap()
                .with_permission(CAN_RENT),
        );

        let result = dir.book(customer, violin(), date(11), date(1));

        assert!(matches!(result, Err(RentalError::DateRange { .. })));
        assert_eq!(dir.len(), 0);
    }
}
