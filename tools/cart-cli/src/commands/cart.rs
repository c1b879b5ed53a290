//! Cart commands.

use anyhow::{bail, Context as _, Result};
use cart_commerce::cart::Cart;
use cart_commerce::store::{UpdateOutcome, UpdateProductAmount};
use cart_commerce::{CartError, Locale};
use dialoguer::Confirm;
use serde_json::json;

use super::{AddArgs, ClearArgs, RemoveArgs, Status, UpdateArgs};
use crate::context::Context;

/// Print the cart with subtotals and total.
pub async fn show(ctx: &Context) -> Result<Status> {
    let cart = load(ctx)?;
    render(ctx, &cart)?;
    Ok(Status::Done)
}

pub async fn add(args: AddArgs, ctx: &Context) -> Result<Status> {
    let store = ctx.cart_store()?;

    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.id));
    let result = store.add_product(args.id).await;
    spinner.finish_and_clear();

    let cart = store.cart();
    match result {
        Ok(()) => {
            if let Some(item) = cart.get(args.id) {
                ctx.output.success(&format!(
                    "{} (x{})",
                    item.product.title,
                    item.amount()
                ));
            }
            finish(ctx, &cart, Status::Done)
        }
        Err(e) => rejected(ctx, &e),
    }
}

pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<Status> {
    let store = ctx.cart_store()?;
    match store.remove_product(args.id).await {
        Ok(()) => {
            ctx.output
                .success(&format!("Removed product {} from the cart", args.id));
            finish(ctx, &store.cart(), Status::Done)
        }
        Err(e) => rejected(ctx, &e),
    }
}

pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<Status> {
    let store = ctx.cart_store()?;

    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.id));
    let result = store
        .update_product_amount(UpdateProductAmount::new(args.id, args.amount))
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(UpdateOutcome::Updated) => {
            ctx.output.success(&format!(
                "Product {} quantity set to {}",
                args.id, args.amount
            ));
            finish(ctx, &store.cart(), Status::Done)
        }
        Ok(UpdateOutcome::Ignored) => {
            ctx.output
                .warn(&format!("Quantity {} ignored; the cart is unchanged", args.amount));
            finish(ctx, &store.cart(), Status::Done)
        }
        Err(e) => rejected(ctx, &e),
    }
}

/// Delete the stored cart after confirmation.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<Status> {
    let cache = ctx.cache()?;
    let key = ctx.config.storage.key.as_str();

    if !cache.exists(key).context("Failed to read storage")? {
        ctx.output.info("The cart is already empty");
        return Ok(Status::Done);
    }

    if needs_confirmation(args.yes, ctx.output.is_json())? {
        let confirmed = Confirm::new()
            .with_prompt("Remove every product from the cart?")
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(Status::Done);
        }
    }

    cache.delete(key).context("Failed to clear stored cart")?;
    ctx.output.success("Cart cleared");
    if ctx.output.is_json() {
        ctx.output.json(&Cart::new());
    }
    Ok(Status::Done)
}

/// Whether `clear` has to prompt. JSON output cannot prompt, so it needs `--yes`.
fn needs_confirmation(yes: bool, json: bool) -> Result<bool> {
    match (yes, json) {
        (true, _) => Ok(false),
        (false, true) => bail!("Refusing to clear the cart without confirmation; pass --yes"),
        (false, false) => Ok(true),
    }
}

fn load(ctx: &Context) -> Result<Cart> {
    let cache = ctx.cache()?;
    Ok(cart_commerce::persist::load_cart(&cache, &ctx.config.storage.key))
}

fn finish(ctx: &Context, cart: &Cart, status: Status) -> Result<Status> {
    if ctx.output.is_json() {
        render(ctx, cart)?;
    }
    Ok(status)
}

/// The store has already shown the toast; add the detail in verbose mode.
fn rejected(ctx: &Context, error: &CartError) -> Result<Status> {
    ctx.output.debug(&format!("{error:#}"));
    tracing::debug!(error = %error, "Cart operation rejected");
    if ctx.output.is_json() {
        ctx.output.json(&json!({ "rejected": error.to_string() }));
    }
    Ok(Status::Rejected)
}

fn render(ctx: &Context, cart: &Cart) -> Result<()> {
    let Context { config, output, .. } = ctx;
    let locale = config.display.locale;
    let currency = config.display.currency;
    let pricing = cart.calculate_pricing(currency)?;

    if output.is_json() {
        output.json(&json!({
            "items": cart,
            "item_count": pricing.item_count,
            "total": pricing.total.format(locale),
        }));
        return Ok(());
    }

    if cart.is_empty() {
        output.info(empty_message(locale));
        return Ok(());
    }

    let rows: Vec<[String; 5]> = cart
        .iter()
        .zip(&pricing.line_items)
        .map(|(item, line)| {
            [
                item.id().to_string(),
                item.product.title.clone(),
                line.quantity.to_string(),
                line.unit_price.format(locale),
                line.subtotal.format(locale),
            ]
        })
        .collect();

    let titles = headers(locale);
    let mut widths = titles.map(|h| h.chars().count());
    for row in &rows {
        for (width, col) in widths.iter_mut().zip(row) {
            *width = (*width).max(col.chars().count());
        }
    }

    output.header(&format!("{} ({})", headers_title(locale), currency.code()));
    output.table_row(&titles, &widths);
    for row in &rows {
        let cols: Vec<&str> = row.iter().map(String::as_str).collect();
        output.table_row(&cols, &widths);
    }
    println!();
    output.kv("Total", &pricing.total.format(locale));
    Ok(())
}

fn headers(locale: Locale) -> [&'static str; 5] {
    match locale {
        Locale::PtBr => ["ID", "PRODUTO", "QTD", "PREÇO", "SUBTOTAL"],
        Locale::En => ["ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"],
    }
}

fn headers_title(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Carrinho",
        Locale::En => "Cart",
    }
}

fn empty_message(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Carrinho vazio",
        Locale::En => "The cart is empty",
    }
}
