// 📝 Rental - booking lifecycle and pricing
//
// A rental binds one customer, one instrument, a date range and any number of
// shared accessories. The total is always derived from the current state, so
// it can never go stale after a mutation.

use chrono::NaiveDate;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use crate::audit::ActionEvent;
use crate::entities::{Accessory, Customer, CAN_MODIFY_RENTAL, CAN_RENT};
use crate::error::{RentalError, RentalResult};
use crate::instruments::SharedInstrument;
use crate::services::RentalServices;

pub struct Rental {
    rental_id: Uuid,
    customer: Rc<Customer>,
    instrument: SharedInstrument,
    start_date: NaiveDate,
    end_date: NaiveDate,
    accessories: Vec<Rc<Accessory>>,
    services: RentalServices,
}

impl Rental {
    /// Book a rental
    ///
    /// Fails with DateRange when `start_date` is after `end_date`. On success
    /// the customer is told the instrument is ready for pickup.
    pub fn new(
        customer: Rc<Customer>,
        instrument: SharedInstrument,
        start_date: NaiveDate,
        end_date: NaiveDate,
        services: RentalServices,
    ) -> RentalResult<Self> {
        let rental = Rental::restore(
            Uuid::new_v4(),
            customer,
            instrument,
            start_date,
            end_date,
            Vec::new(),
            services,
        )?;

        rental.record(
            "rental_created",
            serde_json::json!({
                "customer": rental.customer.name(),
                "instrument": rental.instrument_name(),
                "start_date": rental.start_date.to_string(),
                "end_date": rental.end_date.to_string(),
                "total_cost": rental.calculate_total(),
            }),
        );
        rental.services.notify(
            &format!("Your instrument {} is ready for pickup", rental.instrument_name()),
            Some(rental.customer.email()),
        );

        Ok(rental)
    }

    /// Rebuild a rental from stored parts; no notification is sent
    pub fn restore(
        rental_id: Uuid,
        customer: Rc<Customer>,
        instrument: SharedInstrument,
        start_date: NaiveDate,
        end_date: NaiveDate,
        accessories: Vec<Rc<Accessory>>,
        services: RentalServices,
    ) -> RentalResult<Self> {
        if start_date > end_date {
            return Err(RentalError::DateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        Ok(Rental {
            rental_id,
            customer,
            instrument,
            start_date,
            end_date,
            accessories,
            services,
        })
    }

    pub fn id(&self) -> Uuid {
        self.rental_id
    }

    pub fn customer(&self) -> &Rc<Customer> {
        &self.customer
    }

    pub fn instrument(&self) -> &SharedInstrument {
        &self.instrument
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn accessories(&self) -> &[Rc<Accessory>] {
        &self.accessories
    }

    /// Whole days between start and end
    pub fn rental_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    // ========================================================================
    // ACCESSORIES
    // ========================================================================

    /// Attach an accessory; requires `can_modify_rental`
    pub fn add_accessory(&mut self, accessory: Rc<Accessory>) -> RentalResult<()> {
        self.customer.require(CAN_MODIFY_RENTAL, "add_accessory")?;

        self.record(
            "accessory_added",
            serde_json::json!({
                "accessory_id": accessory.id().to_string(),
                "accessory": accessory.name(),
            }),
        );
        self.accessories.push(accessory);
        self.record_total();
        Ok(())
    }

    /// Detach an accessory by id; requires `can_modify_rental`
    pub fn remove_accessory(&mut self, accessory_id: Uuid) -> RentalResult<Rc<Accessory>> {
        self.customer.require(CAN_MODIFY_RENTAL, "remove_accessory")?;

        let position = self
            .accessories
            .iter()
            .position(|a| a.id() == accessory_id)
            .ok_or(RentalError::AccessoryNotFound(accessory_id))?;
        let removed = self.accessories.remove(position);

        self.record(
            "accessory_removed",
            serde_json::json!({
                "accessory_id": accessory_id.to_string(),
                "accessory": removed.name(),
            }),
        );
        self.record_total();
        Ok(removed)
    }

    // ========================================================================
    // PRICING
    // ========================================================================

    /// Instrument cost plus accessory cost per day; 0 for non-positive ranges
    pub fn calculate_total(&self) -> f64 {
        let days = self.rental_days();
        if days <= 0 {
            return 0.0;
        }

        let days = u32::try_from(days).unwrap_or(u32::MAX);
        let instrument_cost = self.instrument.borrow().calculate_rental_cost(days);
        let accessories_cost: f64 = self
            .accessories
            .iter()
            .map(|a| a.cost() * f64::from(days))
            .sum();

        instrument_cost + accessories_cost
    }

    /// Current total cost (always recomputed)
    pub fn total_cost(&self) -> f64 {
        self.calculate_total()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Rent the instrument out; requires `can_rent`
    pub fn rent(&mut self) -> RentalResult<()> {
        self.customer.require(CAN_RENT, "rent")?;
        self.instrument.borrow_mut().rent()?;

        let name = self.instrument_name();
        self.record(
            "instrument_rented",
            serde_json::json!({ "instrument": name }),
        );
        self.services.notify(
            &format!("Rental of instrument {} is confirmed", name),
            Some(self.customer.email()),
        );
        Ok(())
    }

    /// Send a message to the customer through the injected notifier
    pub fn notify(&self, message: &str) {
        self.services.notify(message, Some(self.customer.email()));
    }

    /// Human-readable summary
    pub fn generate_report(&self) -> String {
        let accessories = if self.accessories.is_empty() {
            "none".to_string()
        } else {
            self.accessories
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Rental report #{}:\n\
             Customer: {}\n\
             Instrument: {}\n\
             Period: {} - {}\n\
             Accessories: {}\n\
             Total cost: {:.2}",
            self.rental_id,
            self.customer.name(),
            self.instrument_name(),
            self.start_date,
            self.end_date,
            accessories,
            self.calculate_total()
        )
    }

    pub fn services(&self) -> &RentalServices {
        &self.services
    }

    fn instrument_name(&self) -> String {
        self.instrument.borrow().name().to_string()
    }

    fn record(&self, event_type: &str, data: serde_json::Value) {
        self.services.record(ActionEvent::new(
            event_type,
            "rental",
            &self.rental_id.to_string(),
            data,
            self.customer.email(),
        ));
    }

    fn record_total(&self) {
        let total = self.calculate_total();
        tracing::debug!(rental = %self.rental_id, total, "Rental total recalculated");
    }
}

impl fmt::Display for Rental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rental #{}: {} rents {}",
            self.rental_id,
            self.customer.name(),
            self.instrument_name()
        )
    }
}

impl fmt::Debug for Rental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rental")
            .field("rental_id", &self.rental_id)
            .field("customer", &self.customer.name())
            .field("instrument", &self.instrument_name())
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("accessories", &self.accessories.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryActionLog;
    use crate::instruments::{Condition, InstrumentRegistry, InstrumentSpec};
    use crate::notify::RecordingNotifier;

    struct Fixture {
        notifier: Rc<RecordingNotifier>,
        actions: Rc<MemoryActionLog>,
        services: RentalServices,
    }

    fn fixture() -> Fixture {
        let notifier = Rc::new(RecordingNotifier::new());
        let actions = Rc::new(MemoryActionLog::new());
        let services = RentalServices::new(notifier.clone(), actions.clone());
        Fixture {
            notifier,
            actions,
            services,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trusted_customer() -> Rc<Customer> {
        Rc::new(
            Customer::new("Ivan Ivanov", "ivan@example.com")
                .unwrap()
                .with_permission(CAN_RENT)
                .with_permission(CAN_MODIFY_RENTAL),
        )
    }

    fn guest_customer() -> Rc<Customer> {
        Rc::new(Customer::new("Petr Petrov", "petr@example.com").unwrap())
    }

    fn guitar() -> SharedInstrument {
        let spec = InstrumentSpec::new("Fender Stratocaster", Condition::New, 50.0)
            .with_attribute("number_of_strings", 6);
        InstrumentRegistry::global().create("guitar", &spec).unwrap()
    }

    fn ten_day_rental(customer: Rc<Customer>, fx: &Fixture) -> Rental {
        Rental::new(
            customer,
            guitar(),
            date(2024, 3, 1),
            date(2024, 3, 11),
            fx.services.clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_rental_creation_notifies_and_records() {
        let fx = fixture();
        let rental = ten_day_rental(trusted_customer(), &fx);

        assert_eq!(rental.rental_days(), 10);
        assert!((rental.total_cost() - 400.0).abs() < 1e-9);

        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].message.contains("ready for pickup"));
        assert_eq!(sent[0].recipient.as_deref(), Some("ivan@example.com"));
        assert_eq!(fx.actions.event_types(), vec!["rental_created"]);
    }

    #[test]
    fn test_rental_rejects_reversed_dates() {
        let fx = fixture();
        let result = Rental::new(
            trusted_customer(),
            guitar(),
            date(2024, 3, 11),
            date(2024, 3, 1),
            fx.services.clone(),
        );

        assert!(matches!(result, Err(RentalError::DateRange { .. })));
        assert_eq!(fx.notifier.count(), 0);
    }

    #[test]
    fn test_same_day_rental_costs_nothing() {
        let fx = fixture();
        let mut rental = Rental::new(
            trusted_customer(),
            guitar(),
            date(2024, 3, 1),
            date(2024, 3, 1),
            fx.services.clone(),
        )
        .unwrap();

        assert_eq!(rental.total_cost(), 0.0);

        rental
            .add_accessory(Rc::new(Accessory::new("Case", 5.0).unwrap()))
            .unwrap();
        assert_eq!(rental.total_cost(), 0.0);
    }

    #[test]
    fn test_calculate_total_is_idempotent() {
        let fx = fixture();
        let rental = ten_day_rental(trusted_customer(), &fx);
        assert_eq!(rental.calculate_total(), rental.calculate_total());
    }

    #[test]
    fn test_add_and_remove_accessory() {
        let fx = fixture();
        let mut rental = ten_day_rental(trusted_customer(), &fx);
        let case = Rc::new(Accessory::new("Guitar case", 5.0).unwrap());

        rental.add_accessory(case.clone()).unwrap();
        assert_eq!(rental.accessories().len(), 1);
        // 400 for the guitar + 5 * 10 for the case
        assert!((rental.total_cost() - 450.0).abs() < 1e-9);

        let removed = rental.remove_accessory(case.id()).unwrap();
        assert_eq!(removed.id(), case.id());
        assert!(rental.accessories().is_empty());
        assert!((rental.total_cost() - 400.0).abs() < 1e-9);

        let again = rental.remove_accessory(case.id());
        assert_eq!(again.unwrap_err(), RentalError::AccessoryNotFound(case.id()));

        assert_eq!(
            fx.actions.event_types(),
            vec!["rental_created", "accessory_added", "accessory_removed"]
        );
    }

    #[test]
    fn test_add_accessory_without_permission() {
        let fx = fixture();
        let mut rental = ten_day_rental(guest_customer(), &fx);
        let before = rental.total_cost();

        let result = rental.add_accessory(Rc::new(Accessory::new("Case", 5.0).unwrap()));

        assert!(matches!(result, Err(RentalError::PermissionDenied { .. })));
        assert!(rental.accessories().is_empty());
        assert_eq!(rental.total_cost(), before);
    }

    #[test]
    fn test_remove_accessory_without_permission() {
        let fx = fixture();
        let mut rental = ten_day_rental(guest_customer(), &fx);
        let result = rental.remove_accessory(Uuid::new_v4());
        assert!(matches!(result, Err(RentalError::PermissionDenied { .. })));
    }

    #[test]
    fn test_accessory_shared_between_rentals() {
        let fx = fixture();
        let stand = Rc::new(Accessory::new("Stand", 2.0).unwrap());
        let mut first = ten_day_rental(trusted_customer(), &fx);
        let mut second = ten_day_rental(trusted_customer(), &fx);

        first.add_accessory(stand.clone()).unwrap();
        second.add_accessory(stand.clone()).unwrap();
        first.remove_accessory(stand.id()).unwrap();

        assert!(first.accessories().is_empty());
        assert_eq!(second.accessories().len(), 1);
        assert_eq!(Rc::strong_count(&stand), 2);
    }

    #[test]
    fn test_rent_twice_fails() {
        let fx = fixture();
        let mut rental = ten_day_rental(trusted_customer(), &fx);

        rental.rent().unwrap();
        assert!(!rental.instrument().borrow().is_available());

        let second = rental.rent();
        assert!(matches!(second, Err(RentalError::AlreadyUnavailable(_))));
        assert!(!rental.instrument().borrow().is_available());

        // ready for pickup + one confirmation
        assert_eq!(fx.notifier.count(), 2);
    }

    #[test]
    fn test_rent_requires_permission() {
        let fx = fixture();
        let mut rental = ten_day_rental(guest_customer(), &fx);

        let result = rental.rent();

        assert!(matches!(result, Err(RentalError::PermissionDenied { .. })));
        assert!(rental.instrument().borrow().is_available());
    }

    #[test]
    fn test_total_follows_instrument_price_change() {
        let fx = fixture();
        let rental = ten_day_rental(trusted_customer(), &fx);

        rental
            .instrument()
            .borrow_mut()
            .core_mut()
            .set_daily_rate(100.0)
            .unwrap();

        assert!((rental.total_cost() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_generate_report() {
        let fx = fixture();
        let mut rental = ten_day_rental(trusted_customer(), &fx);
        let report = rental.generate_report();

        assert!(report.contains("Customer: Ivan Ivanov"));
        assert!(report.contains("Instrument: Fender Stratocaster"));
        assert!(report.contains("Period: 2024-03-01 - 2024-03-11"));
        assert!(report.contains("Accessories: none"));
        assert!(report.contains("Total cost: 400.00"));

        rental
            .add_accessory(Rc::new(Accessory::new("Guitar case", 5.0).unwrap()))
            .unwrap();
        let report = rental.generate_report();
        assert!(report.contains("Accessories: Accessory: Guitar case, cost: 5.00"));
        assert!(report.contains("Total cost: 450.00"));
    }
}
