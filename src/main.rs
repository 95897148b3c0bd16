// 🎸 Instrument Rental - demo CLI
//
// Usage:
//   instrument-rental [demo]                   full walkthrough, writes a snapshot
//   instrument-rental report [path]            print reports from a snapshot
//   instrument-rental types                    list registered instrument types
//   instrument-rental route <type> <amount> <description...>

use anyhow::{bail, Context, Result};
use chrono::{Days, Local};
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use uuid::Uuid;

use instrument_rental::{
    init_logging, load_from_json, router, save_to_json, standard_chain, Accessory, ActionLog,
    AppConfig, Condition, ConsoleNotifier, Customer, InstrumentRegistry, InstrumentSpec,
    OfflineRentalProcess, OnlineRentalProcess, RentalDirectory, RentalProcess, RentalRequest,
    RentalServices, RequestHandler, RequestType, SharedInstrument, TracingActionLog,
    CAN_MODIFY_RENTAL, CAN_RENT,
};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _guard = init_logging(config.log_format, &config.log_dir, "rental.log")?;

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("demo");

    let result = match command {
        "demo" => run_demo(&config),
        "report" => {
            let path = args.get(2).map(PathBuf::from).unwrap_or_else(|| config.data_path.clone());
            run_report(&config, &path)
        }
        "types" => {
            run_types();
            Ok(())
        }
        "route" => run_route(&args[2..]),
        other => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Commands: demo | report [path] | types | route <type> <amount> <description>");
            std::process::exit(2);
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
    }
    result
}

#[cfg(feature = "sqlite")]
fn action_log(config: &AppConfig) -> Result<Rc<dyn ActionLog>> {
    match &config.audit_db {
        Some(path) => {
            let log = instrument_rental::SqliteActionLog::open(path)?;
            tracing::info!(path = %path.display(), "Recording actions to SQLite");
            Ok(Rc::new(log))
        }
        None => Ok(Rc::new(TracingActionLog)),
    }
}

#[cfg(not(feature = "sqlite"))]
fn action_log(config: &AppConfig) -> Result<Rc<dyn ActionLog>> {
    if config.audit_db.is_some() {
        tracing::warn!("RENTAL_AUDIT_DB is set but the sqlite feature is disabled");
    }
    Ok(Rc::new(TracingActionLog))
}

fn services(config: &AppConfig) -> Result<RentalServices> {
    Ok(RentalServices::new(Rc::new(ConsoleNotifier), action_log(config)?))
}

fn create(tag: &str, spec: InstrumentSpec) -> Result<SharedInstrument> {
    InstrumentRegistry::global()
        .create(tag, &spec)
        .with_context(|| format!("Failed to create {}", tag))
}

fn section(title: &str) {
    println!("\n{}", title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

// ============================================================================
// DEMO
// ============================================================================

fn run_demo(config: &AppConfig) -> Result<()> {
    println!("🎸 Instrument Rental v{}", instrument_rental::VERSION);
    let registry = InstrumentRegistry::global();
    let mut directory = RentalDirectory::new(services(config)?);

    // 1. Customers
    section("👤 Customers");
    let trusted = Rc::new(
        Customer::new("Ivan Ivanov", "ivan@example.com")?
            .with_phone("+79991234567")
            .with_permission(CAN_RENT)
            .with_permission(CAN_MODIFY_RENTAL),
    );
    let guest = Rc::new(Customer::new("Petr Petrov", "petr@example.com")?.with_phone("+79997654321"));
    println!("{}", trusted);
    println!("{}", guest);

    // 2. Validation failures
    section("🚫 Instrument validation");
    let empty_name = InstrumentSpec::new("", Condition::New, 50.0).with_attribute("number_of_strings", 6);
    if let Err(e) = registry.create("guitar", &empty_name) {
        println!("❌ {}", e);
    }
    let negative_rate = InstrumentSpec::new("Yamaha", Condition::New, -10.0).with_attribute("key_count", 88);
    if let Err(e) = registry.create("piano", &negative_rate) {
        println!("❌ {}", e);
    }
    if let Err(e) = "invalid".parse::<Condition>() {
        println!("❌ {}", e);
    }

    // 3. Instruments through the registry
    section("🎹 Instruments");
    let guitar = create(
        "guitar",
        InstrumentSpec::new("Fender Stratocaster", Condition::New, 50.0).with_attribute("number_of_strings", 6),
    )?;
    let piano = create(
        "piano",
        InstrumentSpec::new("Yamaha U1", Condition::Used, 100.0).with_attribute("key_count", 88),
    )?;
    let violin = create(
        "violin",
        InstrumentSpec::new("Stradivarius Copy", Condition::Refurbished, 80.0).with_attribute("bow_included", true),
    )?;
    for instrument in [&guitar, &piano, &violin] {
        println!("{}", instrument.borrow());
    }

    // 4. Comparisons
    section("⚖️  Comparisons (daily rate, then condition)");
    let guitar_same = create(
        "guitar",
        InstrumentSpec::new("Fender Copy", Condition::New, 50.0).with_attribute("number_of_strings", 6),
    )?;
    let guitar_used = create(
        "guitar",
        InstrumentSpec::new("Gibson", Condition::Used, 50.0).with_attribute("number_of_strings", 6),
    )?;
    println!("guitar == guitar_same: {}", *guitar.borrow() == *guitar_same.borrow());
    println!("guitar == guitar_used: {}", *guitar.borrow() == *guitar_used.borrow());
    println!("guitar < piano: {}", *guitar.borrow() < *piano.borrow());
    println!("violin > guitar: {}", *violin.borrow() > *guitar.borrow());
    println!("guitar_used < guitar: {}", *guitar_used.borrow() < *guitar.borrow());

    let more = [
        create(
            "guitar",
            InstrumentSpec::new("Gibson Les Paul", Condition::New, 60.0).with_attribute("number_of_strings", 6),
        )?,
        create(
            "piano",
            InstrumentSpec::new("Steinway D", Condition::Refurbished, 150.0).with_attribute("key_count", 88),
        )?,
        create(
            "violin",
            InstrumentSpec::new("Amati Copy", Condition::Used, 70.0).with_attribute("bow_included", false),
        )?,
        create(
            "guitar",
            InstrumentSpec::new("Ibanez RG", Condition::Used, 45.0).with_attribute("number_of_strings", 7),
        )?,
    ];
    for instrument in &more {
        println!("{}", instrument.borrow());
    }

    let case = Rc::new(Accessory::new("Guitar case", 5.0)?);
    println!("{}", case);

    let start_date = Local::now().date_naive();
    let end_date = start_date
        .checked_add_days(Days::new(10))
        .context("End date out of range")?;

    // 5. Date validation
    section("📅 Date validation");
    if let Err(e) = directory.book(trusted.clone(), guitar.clone(), end_date, start_date) {
        println!("❌ {}", e);
    }

    // 6. Online rental
    section("🌐 Online rental (with permissions)");
    let online = directory.book(trusted.clone(), guitar.clone(), start_date, end_date)?;
    online.borrow_mut().add_accessory(case.clone())?;
    println!("{}", online.borrow());
    OnlineRentalProcess.rent_instrument(&mut online.borrow_mut())?;
    println!("Instrument after rental: {}", guitar.borrow());
    println!("{}", online.borrow().generate_report());

    // 7. Missing permission
    section("🔒 Online rental (without permissions)");
    let unauthorized = directory.book(guest, violin.clone(), start_date, end_date)?;
    if let Err(e) = OnlineRentalProcess.rent_instrument(&mut unauthorized.borrow_mut()) {
        println!("❌ {}", e);
    }

    // 8. Offline rental
    section("🏢 Offline rental");
    let offline = directory.book(trusted, piano.clone(), start_date, end_date)?;
    offline.borrow_mut().add_accessory(case.clone())?;
    println!("{}", offline.borrow());
    OfflineRentalProcess.rent_instrument(&mut offline.borrow_mut())?;
    println!("Instrument after rental: {}", piano.borrow());
    println!("{}", offline.borrow().generate_report());

    // 9. Lookups and removals
    section("🔍 Rental lookup");
    if let Err(e) = directory.find(Uuid::nil()) {
        println!("❌ {}", e);
    }
    online.borrow_mut().remove_accessory(case.id())?;
    println!("✓ Removed {} from rental #{}", case.name(), online.borrow().id());
    if let Err(e) = online.borrow_mut().remove_accessory(case.id()) {
        println!("❌ {}", e);
    }

    // 10. Request chain
    section("🧭 Request chain");
    let chain = standard_chain();
    let requests = [
        RentalRequest::new(RequestType::Simple, 100.0, "Guitar rental"),
        RentalRequest::new(RequestType::Discount, 50.0, "Piano rental discount"),
        RentalRequest::new(RequestType::Complex, 1000.0, "Custom violin order"),
    ];
    for request in &requests {
        println!("{}", chain.handle_request(request));
    }

    section("📚 Registered instrument types");
    println!("{}", registry.registered_types().join(", "));

    // 11. Snapshot round trip
    section("💾 Snapshot");
    let mut instruments = vec![guitar, piano, violin];
    instruments.extend(more);
    save_to_json(&config.data_path, &instruments, &directory)?;
    println!("✓ Saved to {}", config.data_path.display());

    run_report(config, &config.data_path)?;

    println!("\n✅ Demo complete");
    Ok(())
}

// ============================================================================
// OTHER COMMANDS
// ============================================================================

fn run_report(config: &AppConfig, path: &Path) -> Result<()> {
    let loaded = load_from_json(path, InstrumentRegistry::global(), services(config)?)?;

    println!("📂 Loaded {} instruments", loaded.instruments.len());
    println!("📂 Loaded {} rentals", loaded.directory.len());
    for instrument in &loaded.instruments {
        println!("{}", instrument.borrow().generate_report());
    }
    for rental in loaded.directory.iter() {
        println!("\n{}", rental.borrow().generate_report());
    }
    Ok(())
}

fn run_types() {
    for tag in InstrumentRegistry::global().registered_types() {
        println!("{}", tag);
    }
}

fn run_route(args: &[String]) -> Result<()> {
    let [request_type, amount, description @ ..] = args else {
        bail!("Usage: route <simple|discount|complex> <amount> <description>");
    };
    let amount: f64 = amount
        .parse()
        .with_context(|| format!("Invalid amount: {}", amount))?;

    println!("{}", router::route(request_type, amount, &description.join(" "))?);
    Ok(())
}
