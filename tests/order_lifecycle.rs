mod common;

use slot_sales::domain::{OrderLine, OrderStatus, ProductId};
use slot_sales::{EntityKind, SalesError};

use common::stall;

#[tokio::test]
async fn test_reserve_then_cancel_restores_stock() {
    let stall = stall(1000, 10).await;
    let orders = &stall.system.order_client;

    let order = orders
        .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 2)])
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Reserved);
    assert_eq!(order.total_amount, 2000);
    assert_eq!(stall.reserved().await, 2);

    let cancelled = orders.cancel_order(order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stall.reserved().await, 0);

    let err = orders.cancel_order(order.id).await.unwrap_err();
    assert!(matches!(
        err,
        SalesError::InvalidOrderStatus { status: OrderStatus::Cancelled, .. }
    ));
    assert_eq!(stall.reserved().await, 0);

    stall.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_line_rolls_back_earlier_reservations() {
    let stall = stall(300, 10).await;
    let scarce = stall.stock("Kakigori", 400, 3).await;

    let err = stall
        .system
        .order_client
        .create_order(
            stall.slot.id,
            vec![OrderLine::new(stall.product.id, 5), OrderLine::new(scarce.id, 1_000)],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SalesError::InsufficientStock { product_id, .. } if product_id == scarce.id));
    assert_eq!(stall.reserved().await, 0);
    assert!(stall.system.order_client.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_product_lines_reserve_independently() {
    let stall = stall(500, 5).await;
    let orders = &stall.system.order_client;

    // 3 + 3 exceeds the 5 units even though each line fits on its own
    let err = orders
        .create_order(
            stall.slot.id,
            vec![OrderLine::new(stall.product.id, 3), OrderLine::new(stall.product.id, 3)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SalesError::InsufficientStock { requested: 3, available: 2, .. }));
    assert_eq!(stall.reserved().await, 0);

    let order = orders
        .create_order(
            stall.slot.id,
            vec![OrderLine::new(stall.product.id, 2), OrderLine::new(stall.product.id, 2)],
        )
        .await
        .unwrap();
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_amount, 2000);
    assert_eq!(stall.reserved().await, 4);
}

#[tokio::test]
async fn test_create_order_preconditions() {
    let stall = stall(100, 5).await;
    let orders = &stall.system.order_client;

    assert_eq!(
        orders.create_order(stall.slot.id, Vec::new()).await.unwrap_err(),
        SalesError::EmptyOrder
    );
    assert!(matches!(
        orders
            .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 0)])
            .await,
        Err(SalesError::InvalidQuantity { quantity: 0, .. })
    ));
    assert!(matches!(
        orders
            .create_order(stall.slot.id, vec![OrderLine::new(ProductId::new(), 1)])
            .await,
        Err(SalesError::NotFound { entity: EntityKind::Product, .. })
    ));

    let unstocked = stall.system.product_client.create_product("Ramune", 200).await.unwrap();
    assert!(matches!(
        orders
            .create_order(stall.slot.id, vec![OrderLine::new(unstocked.id, 1)])
            .await,
        Err(SalesError::NotFound { entity: EntityKind::Inventory, .. })
    ));

    stall.system.slot_client.deactivate(stall.slot.id).await.unwrap();
    assert_eq!(
        orders
            .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 1)])
            .await
            .unwrap_err(),
        SalesError::SlotInactive(stall.slot.id)
    );
    assert_eq!(stall.reserved().await, 0);
}

#[tokio::test]
async fn test_order_items_capture_unit_price() {
    let stall = stall(1000, 10).await;
    let dango = stall.system.product_client.create_product("Dango", 150).await.unwrap();
    stall.system.slot_client.add_product(stall.slot.id, dango.id, 4).await.unwrap();

    let order = stall
        .system
        .order_client
        .create_order(stall.slot.id, vec![OrderLine::new(dango.id, 2)])
        .await
        .unwrap();

    let item = &order.items[0];
    assert_eq!(item.unit_price, 150);
    assert_eq!(item.product_id, dango.id);
    assert_eq!(
        stall.system.order_client.get_order(order.id).await.unwrap().total_amount,
        300
    );
}

#[tokio::test]
async fn test_add_items_is_all_or_nothing() {
    let stall = stall(100, 4).await;
    let extra = stall.stock("Taiyaki", 250, 2).await;
    let orders = &stall.system.order_client;

    let order = orders
        .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 1)])
        .await
        .unwrap();

    let err = orders
        .add_items(order.id, vec![OrderLine::new(stall.product.id, 1), OrderLine::new(extra.id, 3)])
        .await
        .unwrap_err();
    assert!(matches!(err, SalesError::InsufficientStock { .. }));
    assert_eq!(stall.reserved().await, 1);

    let order = orders
        .add_items(order.id, vec![OrderLine::new(extra.id, 2)])
        .await
        .unwrap();
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_amount, 600);

    orders.confirm_order(order.id).await.unwrap();
    let err = orders
        .add_items(order.id, vec![OrderLine::new(stall.product.id, 1)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SalesError::InvalidOrderStatus { status: OrderStatus::Confirmed, .. }
    ));
    assert_eq!(stall.reserved().await, 0);
}

#[tokio::test]
async fn test_confirm_settles_and_complete_finishes() {
    let stall = stall(800, 6).await;
    let orders = &stall.system.order_client;

    let order = orders
        .create_order(stall.slot.id, vec![OrderLine::new(stall.product.id, 4)])
        .await
        .unwrap();
    let confirmed = orders.confirm_order(order.id).await.unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    let row = stall.row().await;
    assert_eq!((row.reserved_quantity, row.sold_quantity, row.available()), (0, 4, 2));

    // Settled stock is never handed back
    assert!(matches!(
        orders.cancel_order(order.id).await,
        Err(SalesError::InvalidOrderStatus { status: OrderStatus::Confirmed, .. })
    ));
    assert!(matches!(
        orders.confirm_order(order.id).await,
        Err(SalesError::InvalidOrderStatus { .. })
    ));

    let completed = orders.complete_order(order.id).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(orders.cancel_order(order.id).await.is_err());
    assert_eq!(stall.row().await.sold_quantity, 4);
}

#[tokio::test]
async fn test_order_listings() {
    let stall = stall(100, 10).await;
    let orders = &stall.system.order_client;
    let line = || vec![OrderLine::new(stall.product.id, 1)];

    let first = orders.create_order(stall.slot.id, line()).await.unwrap();
    let second = orders.create_order(stall.slot.id, line()).await.unwrap();
    orders.cancel_order(first.id).await.unwrap();

    assert_eq!(orders.list_orders().await.unwrap().len(), 2);

    let reserved = orders.list_by_status(OrderStatus::Reserved).await.unwrap();
    assert_eq!(reserved.iter().map(|o| o.id).collect::<Vec<_>>(), vec![second.id]);

    let by_slot = orders.list_by_slot(stall.slot.id).await.unwrap();
    assert_eq!(by_slot.len(), 2);
    assert!(orders
        .list_by_slot(slot_sales::domain::SalesSlotId::new())
        .await
        .unwrap()
        .is_empty());

    assert!(matches!(
        orders.get_order(slot_sales::domain::OrderId::new()).await,
        Err(SalesError::NotFound { entity: EntityKind::Order, .. })
    ));
}
