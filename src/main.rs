use chrono::{Duration, Utc};
use tracing::{error, info, Instrument};

use slot_sales::domain::{OrderLine, PaymentMethod};
use slot_sales::{setup_tracing, SalesResult, SalesSystem, SystemConfig};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = SystemConfig::from_env();
    setup_tracing(&config);

    info!("Starting slot sales demo");

    let system = SalesSystem::new(&config);

    let span = tracing::info_span!("festival_stall");
    let result = run_demo(&system).instrument(span).await;

    match &result {
        Ok(()) => info!("Demo flow finished"),
        Err(e) => error!(error = %e, "Demo flow failed"),
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    result.map_err(|e| e.to_string())?;
    info!("Application completed successfully");
    Ok(())
}

async fn run_demo(system: &SalesSystem) -> SalesResult<()> {
    let start = Utc::now();
    let slot = system
        .slot_client
        .create_slot(start, start + Duration::hours(1))
        .await?;
    system.slot_client.activate(slot.id).await?;

    let product = system.product_client.create_product("Yakisoba", 1000).await?;
    let row = system.slot_client.add_product(slot.id, product.id, 10).await?;
    info!(available = row.available(), "Stock allocated");

    let order = system
        .order_client
        .create_order(slot.id, vec![OrderLine::new(product.id, 2)])
        .await?;
    info!(order_id = %order.id, total = order.total_amount, "Order reserved");

    let order = system.order_client.confirm_order(order.id).await?;
    let ticket = system
        .ticket_client
        .create_ticket(order.id, "A-001", PaymentMethod::Cash)
        .await?;
    info!(ticket_number = %ticket.ticket_number, "Ticket issued");

    system
        .ticket_client
        .update_payment_status(ticket.id, true, None)
        .await?;
    let ticket = system.ticket_client.update_delivery_status(ticket.id, true).await?;
    info!(is_paid = ticket.is_paid, is_delivered = ticket.is_delivered, "Ticket fulfilled");

    let row = system.slot_client.inventory(slot.id, product.id).await?;
    info!(
        reserved = row.reserved_quantity,
        sold = row.sold_quantity,
        available = row.available(),
        "Final stock"
    );
    Ok(())
}
