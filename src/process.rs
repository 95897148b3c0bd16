// 🔁 Rental Process - check, process, confirm
//
// Online and offline desks run the same three steps and differ only in how
// the rental is confirmed.

use crate::audit::ActionEvent;
use crate::error::{RentalError, RentalResult};
use crate::rental::Rental;

/// RentalProcess - the fixed rental procedure
///
/// Implementors provide the steps; `rent_instrument` runs them in order and
/// stops at the first failure.
pub trait RentalProcess {
    /// Short label used in log lines ("online", "offline")
    fn channel(&self) -> &'static str;

    fn check_availability(&self, rental: &Rental) -> RentalResult<()> {
        let instrument = rental.instrument().borrow();
        if !instrument.is_available() {
            return Err(RentalError::AlreadyUnavailable(instrument.name().to_string()));
        }
        tracing::info!(
            channel = self.channel(),
            instrument = instrument.name(),
            "Availability checked"
        );
        Ok(())
    }

    fn process_rental(&self, rental: &mut Rental) -> RentalResult<()> {
        rental.rent()?;
        tracing::info!(
            channel = self.channel(),
            rental = %rental.id(),
            customer = rental.customer().name(),
            "Rental processed"
        );
        Ok(())
    }

    fn confirm_rental(&self, rental: &Rental);

    fn rent_instrument(&self, rental: &mut Rental) -> RentalResult<()> {
        self.check_availability(rental)?;
        self.process_rental(rental)?;
        self.confirm_rental(rental);
        Ok(())
    }
}

fn record_confirmation(rental: &Rental, channel: &str) {
    rental.services().record(ActionEvent::new(
        "rental_confirmed",
        "rental",
        &rental.id().to_string(),
        serde_json::json!({ "channel": channel }),
        rental.customer().email(),
    ));
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OnlineRentalProcess;

impl RentalProcess for OnlineRentalProcess {
    fn channel(&self) -> &'static str {
        "online"
    }

    fn confirm_rental(&self, rental: &Rental) {
        rental.notify(&format!(
            "Online: your rental #{} is confirmed for {}",
            rental.id(),
            rental.customer().email()
        ));
        record_confirmation(rental, self.channel());
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRentalProcess;

impl RentalProcess for OfflineRentalProcess {
    fn channel(&self) -> &'static str {
        "offline"
    }

    fn confirm_rental(&self, rental: &Rental) {
        rental.notify(&format!(
            "Offline: rental #{} is confirmed for {} in the office",
            rental.id(),
            rental.customer().name()
        ));
        record_confirmation(rental, self.channel());
    }
}
