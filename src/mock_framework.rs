//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a store client and the receiving end of
//! its channel. The test then plays the store: helpers like [`expect_get`] or
//! [`expect_create`] pull the next request and hand back its responder.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};

/// Creates a store client whose requests arrive on the returned receiver
/// instead of a running `ResourceActor`.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a List request. The filter is `None` for a plain listing.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Option<Filter<T>>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductId};
    use crate::product_actor::ProductCreate;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let create_task = tokio::spawn(async move {
            let payload = ProductCreate {
                name: "Takoyaki".to_string(),
                price: 600,
            };
            client.create(payload).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Takoyaki");
        let product = Product::new(ProductId::new(), payload.name, payload.price).unwrap();
        responder.send(Ok(product.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(product));
    }

    #[tokio::test]
    async fn test_mock_list_carries_filter() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let cheap = Product::new(ProductId::new(), "Ramune", 200).unwrap();
        let dear = Product::new(ProductId::new(), "Wagyu skewer", 2500).unwrap();

        let list_task = tokio::spawn(async move { client.find(|p: &Product| p.price < 1000).await });

        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let filter = filter.expect("Expected a filter");
        let matching: Vec<Product> = [cheap.clone(), dear].into_iter().filter(|p| filter(p)).collect();
        responder.send(Ok(matching)).unwrap();

        assert_eq!(list_task.await.unwrap(), Ok(vec![cheap]));
    }
}
