//! # Sale Portal
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scan> COKE-330          add 1 (or merge into the existing line)        │
//! │  scan> COKE-330 3        add 3                                          │
//! │  scan> qty COKE-330 5    set quantity (0 removes)                       │
//! │  scan> remove COKE-330                                                  │
//! │  scan> list | clear | help                                              │
//! │  scan> checkout          decrement stock, print receipt, new cart       │
//! │  scan> quit              (or end of input)                              │
//! │                                                                         │
//! │  After every change: cart table + "Customer Total: Rs. x.yy"            │
//! │  A failed scan prints "error: ..." and the session continues.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};
use crate::render::{CartDto, Output, ReceiptDto};
use posai_core::validation::{parse_cart_entry, validate_quantity, validate_sku};
use posai_core::{Cart, CoreError};
use posai_db::Database;

const HELP: &str = "\
Scan a barcode to add it to the cart.
  SKU [QTY]        add QTY (default 1)
  qty SKU N        set the quantity (0 removes the line)
  remove SKU       remove a line
  list             show the cart
  clear            empty the cart
  checkout         complete the sale
  quit             leave the sale portal";

/// Looks up `sku` and adds `quantity` of it to `cart`.
async fn scan(db: &Database, cart: &mut Cart, sku: &str, quantity: i64) -> CliResult<()> {
    let product = db
        .products()
        .get_by_sku(sku)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(sku.to_string()))?;

    cart.add_item(&product, quantity)?;
    Ok(())
}

/// Builds a cart from `SKU` / `SKU:QTY` entries.
async fn build_cart(db: &Database, entries: &[String]) -> CliResult<Cart> {
    let mut cart = Cart::new();
    for entry in entries {
        let (sku, quantity) = parse_cart_entry(entry)?;
        scan(db, &mut cart, &sku, quantity).await?;
    }
    Ok(cart)
}

/// Prices items without touching stock.
pub async fn quote<W: Write>(db: &Database, out: &mut Output<W>, entries: &[String]) -> CliResult<()> {
    let cart = build_cart(db, entries).await?;
    let dto = CartDto::from(&cart);
    out.emit(&dto, |o, c| o.cart(c))
}

/// Sells items in one transaction.
pub async fn checkout<W: Write>(db: &Database, out: &mut Output<W>, entries: &[String]) -> CliResult<()> {
    let cart = build_cart(db, entries).await?;
    complete(db, out, &cart).await
}

async fn complete<W: Write>(db: &Database, out: &mut Output<W>, cart: &Cart) -> CliResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let receipt = ReceiptDto::from(db.sales().checkout(cart).await?);
    out.emit(&receipt, |o, r| {
        o.line("Sale complete.")?;
        o.receipt(r)
    })
}

// =============================================================================
// Interactive Session
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Scan { sku: String, quantity: i64 },
    SetQuantity { sku: String, quantity: i64 },
    Remove(String),
    List,
    Clear,
    Checkout,
    Help,
    Quit,
}

fn parse_quantity(text: &str) -> CliResult<i64> {
    text.parse()
        .map_err(|_| CliError::validation(format!("Invalid quantity: {}", text)))
}

fn parse_command(line: &str) -> CliResult<Option<SessionCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        [] => return Ok(None),
        ["help"] | ["?"] => SessionCommand::Help,
        ["quit"] | ["exit"] => SessionCommand::Quit,
        ["list"] => SessionCommand::List,
        ["clear"] => SessionCommand::Clear,
        ["checkout"] => SessionCommand::Checkout,
        ["remove", sku] => SessionCommand::Remove(sku.to_string()),
        ["qty", sku, qty] => SessionCommand::SetQuantity {
            sku: sku.to_string(),
            quantity: parse_quantity(qty)?,
        },
        [sku] => SessionCommand::Scan {
            sku: sku.to_string(),
            quantity: 1,
        },
        [sku, qty] => SessionCommand::Scan {
            sku: sku.to_string(),
            quantity: parse_quantity(qty)?,
        },
        _ => return Err(CliError::validation(format!("Unrecognized input: {}", line.trim()))),
    };

    Ok(Some(command))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cart: Option<CartDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a CliError>,
}

/// Runs a sale session over `input` until `quit` or end of input.
///
/// Errors from a single scan are reported and the session keeps going;
/// only I/O errors end it.
pub async fn session<R: BufRead, W: Write>(
    db: &Database,
    out: &mut Output<W>,
    input: R,
) -> CliResult<()> {
    let mut cart = Cart::new();
    let mut sales = 0usize;

    if !out.is_json() {
        let store = out.config().store_name.clone();
        out.line(format!("{} - Sale Portal", store))?;
        out.line(HELP)?;
    }

    for line in input.lines() {
        let line = line?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                report(out, &err)?;
                continue;
            }
        };

        let result: CliResult<()> = match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => {
                if !out.is_json() {
                    out.line(HELP)?;
                }
                continue;
            }
            SessionCommand::List => Ok(()),
            SessionCommand::Clear => {
                cart.clear();
                Ok(())
            }
            SessionCommand::Scan { sku, quantity } => {
                match validate_sku(&sku).and_then(|_| validate_quantity(quantity)) {
                    Ok(()) => scan(db, &mut cart, &sku, quantity).await,
                    Err(e) => Err(CliError::from(e)),
                }
            }
            SessionCommand::SetQuantity { sku, quantity } => {
                cart.update_quantity(&sku, quantity).map_err(CliError::from)
            }
            SessionCommand::Remove(sku) => cart.remove_item(&sku).map_err(CliError::from),
            SessionCommand::Checkout => match complete(db, out, &cart).await {
                Ok(()) => {
                    sales += 1;
                    cart = Cart::new();
                    if !out.is_json() {
                        out.line("")?;
                        out.line("Next customer.")?;
                    }
                    out.flush()?;
                    continue;
                }
                Err(err) => Err(err),
            },
        };

        match result {
            Ok(()) => show_cart(out, &cart)?,
            Err(err) => report(out, &err)?,
        }
        out.flush()?;
    }

    if !cart.is_empty() {
        warn!(lines = cart.item_count(), "Sale session ended with unsold items");
        if !out.is_json() {
            out.line(format!(
                "Sale abandoned: {} item(s) not sold.",
                cart.total_quantity()
            ))?;
        }
    }

    info!(sales = sales, "Sale session closed");
    out.flush()
}

fn show_cart<W: Write>(out: &mut Output<W>, cart: &Cart) -> CliResult<()> {
    let event = SessionEvent {
        event: "cart",
        cart: Some(CartDto::from(cart)),
        error: None,
    };
    out.emit(&event, |o, e| match &e.cart {
        Some(cart) => o.cart(cart),
        None => Ok(()),
    })
}

fn report<W: Write>(out: &mut Output<W>, err: &CliError) -> CliResult<()> {
    let event = SessionEvent {
        event: "error",
        cart: None,
        error: Some(err),
    };
    out.emit(&event, |o, _| o.line(format!("error: {}", err)))
}
