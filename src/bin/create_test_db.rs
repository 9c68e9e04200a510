use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use weekly_shop::{
    ItemId, ItemUpdate, NewCatalogItem, NewItem, NewList, create_catalog_item, create_item,
    create_list, initialize_db, record_catalog_usage, update_item,
};

/// A utility for creating a test database for the REST API server of weekly_shop.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (name, quantity, unit, category, price, times used)
const CATALOG: [(&str, i64, &str, &str, f64, u32); 8] = [
    ("Milk", 2, "liters", "Dairy & Eggs", 1.89, 6),
    ("Eggs", 12, "pcs", "Dairy & Eggs", 0.35, 4),
    ("Bread", 1, "loaf", "Bakery", 3.2, 5),
    ("Bananas", 6, "pcs", "Produce", 0.3, 3),
    ("Chicken thighs", 1, "kg", "Meat & Seafood", 11.5, 2),
    ("Rice", 1, "bag", "Pantry", 4.75, 1),
    ("Coffee", 1, "bag", "Beverages", 12.0, 1),
    ("Dish soap", 1, "bottle", "Household", 3.5, 0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating catalog...");

    for (name, quantity, unit, category, price, times_used) in CATALOG {
        let new_item =
            NewCatalogItem::build(name, Some(quantity), Some(unit), Some(category), Some(price))?;
        let catalog_item = create_catalog_item(&new_item, &conn)?;

        for _ in 0..times_used {
            record_catalog_usage(catalog_item.id, &conn)?;
        }
    }

    println!("Creating shopping lists...");

    let today = OffsetDateTime::now_utc().date();
    let this_week = today - Duration::days(today.weekday().number_days_from_monday().into());
    let last_week = this_week - Duration::weeks(1);

    let last_week_list = create_list(&NewList::new("Weekly groceries", last_week)?, &conn)?;
    let this_week_list = create_list(&NewList::new("Weekly groceries", this_week)?, &conn)?;
    let party_list = create_list(&NewList::new("Birthday party", this_week)?, &conn)?;

    for (name, quantity, unit, category, price, _) in CATALOG.into_iter().take(5) {
        let item = create_item(
            &NewItem::build(
                last_week_list.id,
                name,
                Some(quantity),
                Some(unit),
                Some(category),
                Some(price),
            )?,
            &conn,
        )?;
        mark_completed(item.id, &conn)?;
    }

    for (index, (name, quantity, unit, category, price, _)) in CATALOG.into_iter().enumerate() {
        let item = create_item(
            &NewItem::build(
                this_week_list.id,
                name,
                Some(quantity),
                Some(unit),
                Some(category),
                Some(price),
            )?,
            &conn,
        )?;

        if index % 3 == 0 {
            mark_completed(item.id, &conn)?;
        }
    }

    for (name, quantity, category, price) in [
        ("Balloons", 20, "Party", 0.25),
        ("Chips", 3, "Snacks", 2.99),
        ("Lemonade", 2, "Beverages", 3.49),
    ] {
        create_item(
            &NewItem::build(
                party_list.id,
                name,
                Some(quantity),
                None,
                Some(category),
                Some(price),
            )?,
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}

fn mark_completed(id: ItemId, conn: &Connection) -> Result<(), weekly_shop::Error> {
    let update = ItemUpdate {
        completed: Some(true),
        ..Default::default()
    };

    update_item(id, &update, conn).map(|_| ())
}
