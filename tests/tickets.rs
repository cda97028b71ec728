mod common;

use slot_sales::domain::{Order, OrderLine, PaymentMethod, TicketFilter, TicketId};
use slot_sales::{EntityKind, SalesError};

use common::{stall, Stall};

async fn confirmed_order(stall: &Stall) -> Order {
    let orders = &stall.system.order_client;
    let order = orders
        .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 1)])
        .await
        .unwrap();
    orders.confirm_order(order.id).await.unwrap()
}

#[tokio::test]
async fn test_one_ticket_per_order_and_unique_numbers() {
    let stall = stall(1000, 10).await;
    let tickets = &stall.system.ticket_client;
    let order = confirmed_order(&stall).await;
    let other = confirmed_order(&stall).await;

    let ticket = tickets.create_ticket(order.id, "T1", PaymentMethod::Cash).await.unwrap();
    assert!(!ticket.is_paid);
    assert!(!ticket.is_delivered);

    assert_eq!(
        tickets.create_ticket(order.id, "T2", PaymentMethod::Cash).await.unwrap_err(),
        SalesError::DuplicateTicket(order.id)
    );
    assert_eq!(
        tickets.create_ticket(other.id, "T1", PaymentMethod::Cash).await.unwrap_err(),
        SalesError::DuplicateTicketNumber("T1".to_string())
    );

    assert_eq!(tickets.get_ticket_by_number("T1").await.unwrap().id, ticket.id);
    assert_eq!(tickets.get_ticket_by_order(order.id).await.unwrap().id, ticket.id);
    assert_eq!(tickets.order_for_ticket_number("T1").await.unwrap().id, order.id);
    assert!(matches!(
        tickets.get_ticket_by_order(other.id).await,
        Err(SalesError::NotFound { entity: EntityKind::Ticket, .. })
    ));
}

#[tokio::test]
async fn test_ticket_needs_confirmed_order() {
    let stall = stall(1000, 10).await;
    let tickets = &stall.system.ticket_client;

    let reserved = stall
        .system
        .order_client
        .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 1)])
        .await
        .unwrap();
    assert!(matches!(
        tickets.create_ticket(reserved.id, "T1", PaymentMethod::PayPay).await,
        Err(SalesError::InvalidOrderStatus { .. })
    ));

    assert!(matches!(
        tickets
            .create_ticket(slot_sales::domain::OrderId::new(), "T1", PaymentMethod::PayPay)
            .await,
        Err(SalesError::NotFound { entity: EntityKind::Order, .. })
    ));

    let order = confirmed_order(&stall).await;
    assert!(matches!(
        tickets.create_ticket(order.id, "  ", PaymentMethod::Cash).await,
        Err(SalesError::Validation(_))
    ));
}

#[tokio::test]
async fn test_payment_and_delivery_guards() {
    let stall = stall(1000, 10).await;
    let tickets = &stall.system.ticket_client;
    let order = confirmed_order(&stall).await;
    let ticket = tickets.create_ticket(order.id, "A-7", PaymentMethod::Square).await.unwrap();

    assert_eq!(
        tickets.update_delivery_status(ticket.id, true).await.unwrap_err(),
        SalesError::PaymentRequired(ticket.id)
    );

    let paid = tickets
        .update_payment_status(ticket.id, true, Some("sq-123".to_string()))
        .await
        .unwrap();
    assert!(paid.is_paid);
    assert_eq!(paid.transaction_id.as_deref(), Some("sq-123"));

    assert_eq!(
        tickets.update_payment_status(ticket.id, true, None).await.unwrap_err(),
        SalesError::AlreadyPaid(ticket.id)
    );
    // Un-paying is accepted but changes nothing
    let still_paid = tickets.update_payment_status(ticket.id, false, None).await.unwrap();
    assert!(still_paid.is_paid);

    let delivered = tickets.update_delivery_status(ticket.id, true).await.unwrap();
    assert!(delivered.is_delivered);
    assert_eq!(
        tickets.update_delivery_status(ticket.id, true).await.unwrap_err(),
        SalesError::AlreadyDelivered(ticket.id)
    );
    assert!(tickets.get_ticket(ticket.id).await.unwrap().is_delivered);

    assert!(matches!(
        tickets.update_payment_status(TicketId::new(), true, None).await,
        Err(SalesError::NotFound { entity: EntityKind::Ticket, .. })
    ));
    assert!(matches!(
        tickets.update_delivery_status(TicketId::new(), true).await,
        Err(SalesError::NotFound { entity: EntityKind::Ticket, .. })
    ));
}

#[tokio::test]
async fn test_ticket_listing_and_summary() {
    let stall = stall(1000, 10).await;
    let tickets = &stall.system.ticket_client;

    let cash = tickets
        .create_ticket(confirmed_order(&stall).await.id, "C-1", PaymentMethod::Cash)
        .await
        .unwrap();
    tickets
        .create_ticket(confirmed_order(&stall).await.id, "C-2", PaymentMethod::Cash)
        .await
        .unwrap();
    tickets
        .create_ticket(confirmed_order(&stall).await.id, "P-1", PaymentMethod::PayPay)
        .await
        .unwrap();
    tickets.update_payment_status(cash.id, true, None).await.unwrap();

    assert_eq!(tickets.list_tickets(TicketFilter::default()).await.unwrap().len(), 3);

    let unpaid_cash = tickets
        .list_tickets(TicketFilter {
            payment_method: Some(PaymentMethod::Cash),
            is_paid: Some(false),
            is_delivered: None,
        })
        .await
        .unwrap();
    assert_eq!(unpaid_cash.len(), 1);
    assert_eq!(unpaid_cash[0].ticket_number, "C-2");

    let summary = tickets.ticket_summary().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.paid, 1);
    assert_eq!(summary.delivered, 0);
    assert_eq!(summary.by_payment_method.get(&PaymentMethod::Cash), Some(&2));
    assert_eq!(summary.by_payment_method.get(&PaymentMethod::PayPay), Some(&1));
    assert_eq!(summary.by_payment_method.get(&PaymentMethod::Square), None);
}
