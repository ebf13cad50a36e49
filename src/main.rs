use std::path::PathBuf;

use tracing::info;

use carbnb::Engine;
use carbnb::model::{BookingId, Client, Vehicle};

const USAGE: &str = "usage: carbnb <command> [args]

  add-client <id> <first> <last> <age> <email> <phone>
  add-vehicle <serial> <brand> <model> <year> <engine> <day-cost> <km> <owner>
  book <pickup> <return> <client> <vehicle>   (times as \"YYYY-MM-DD HH:MM:SS\")
  cancel <booking-id>
  cost <booking-id>
  show <booking-id>
  list [vehicle <serial> | client <id>]
  set-day-cost <serial> <day-cost>
  rm-vehicle <serial>
  rm-client <id>

data directory: $CARBNB_DATA_DIR (default ./data)";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let data_dir = std::env::var("CARBNB_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let mut engine = Engine::open(&PathBuf::from(&data_dir))?;
    info!("data_dir: {data_dir}");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["add-client", id, first, last, age, email, phone] => {
            engine.register_client(Client {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                age: age.parse()?,
                email: email.to_string(),
                phone: phone.to_string(),
            })?;
            println!("client {id} registered");
        }
        ["add-vehicle", serial, brand, model, year, engine_cc, day_cost, km, owner] => {
            engine.register_vehicle(Vehicle {
                serial: serial.to_string(),
                brand: brand.to_string(),
                model: model.to_string(),
                year: year.parse()?,
                engine: engine_cc.parse()?,
                day_cost: day_cost.parse()?,
                km: km.parse()?,
                owner: owner.to_string(),
            })?;
            println!("vehicle {serial} registered");
        }
        ["book", pickup, ret, client, vehicle] => {
            let booking = engine.create_booking(pickup, ret, client, vehicle)?;
            println!("{booking}");
            println!("Cost: {}", booking.cost());
        }
        ["cancel", id] => {
            let id: BookingId = id.parse()?;
            engine.delete_booking(id)?;
            println!("booking {id} cancelled");
        }
        ["cost", id] => {
            let id: BookingId = id.parse()?;
            let booking = engine
                .booking(id)
                .ok_or(carbnb::EngineError::NotFound(id))?;
            println!("{}", booking.cost());
        }
        ["show", id] => {
            let id: BookingId = id.parse()?;
            let booking = engine
                .booking(id)
                .ok_or(carbnb::EngineError::NotFound(id))?;
            println!("{booking}");
        }
        ["list"] => {
            for booking in engine.bookings() {
                println!("{booking}\n");
            }
        }
        ["list", "vehicle", serial] => {
            for booking in engine.bookings_by_vehicle(serial) {
                println!("{booking}\n");
            }
        }
        ["list", "client", id] => {
            for booking in engine.bookings_by_client(id) {
                println!("{booking}\n");
            }
        }
        ["set-day-cost", serial, day_cost] => {
            engine.update_vehicle_day_cost(serial, day_cost.parse()?)?;
            println!("vehicle {serial} day cost updated");
        }
        ["rm-vehicle", serial] => {
            engine.delete_vehicle(serial)?;
            println!("vehicle {serial} deleted");
        }
        ["rm-client", id] => {
            engine.delete_client(id)?;
            println!("client {id} deleted");
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
