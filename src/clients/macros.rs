/// Generate a client method for a dedicated service: oneshot channel
/// boilerplate, plumbing errors tagged with the service's entity kind, and
/// automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, kind = $kind:expr) => {
        impl $client {
            #[::tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> $crate::error::SalesResult<$return_type> {
                ::tracing::debug!("Sending request");
                let (respond_to, response) = ::tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $crate::actor_framework::FrameworkError::ActorClosed($kind))?;

                response
                    .await
                    .map_err(|_| $crate::actor_framework::FrameworkError::ActorDropped($kind))?
            }
        }
    };
}

/// Generate `get_<entity>` and `list_<entity>s` for a client wrapping a
/// `ResourceClient` in a field called `inner`.
macro_rules! impl_entity_reads {
    ($client:ident, $entity:ty, $id:ty, $snake:ident) => {
        ::paste::paste! {
            impl $client {
                #[::tracing::instrument(skip(self))]
                pub async fn [<get_ $snake>](&self, id: $id) -> $crate::error::SalesResult<$entity> {
                    ::tracing::debug!("Sending request");
                    self.inner.fetch(id).await
                }

                #[::tracing::instrument(skip(self))]
                pub async fn [<list_ $snake s>](&self) -> $crate::error::SalesResult<Vec<$entity>> {
                    ::tracing::debug!("Sending request");
                    self.inner.list().await
                }
            }
        }
    };
}
