//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Gateway-facing handlers (checkout, polling, webhooks) live in [`crate::wompi_routes`]; this module holds the
//! storefront-facing order routes and the health check.

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use tienda_payment_engine::{
    db_types::{NewOrder, OrderId},
    helpers::new_order_id,
    traits::CheckoutDatabase,
    PaymentFlowApi,
};
use tps_common::Cents;

use crate::{
    data_objects::{NewOrderRequest, OrderResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(new_order => Post "/orders" impl CheckoutDatabase);
/// Route handler for registering a new order ahead of payment.
///
/// The order id is optional; when the storefront does not supply one, the server assigns one and returns it in the
/// order record. Posting an order id that already exists is a 400.
pub async fn new_order<B: CheckoutDatabase>(
    body: web::Json<NewOrderRequest>,
    api: web::Data<PaymentFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    if !(request.amount.is_finite() && request.amount > 0.0) {
        return Err(ServerError::InvalidRequest("amount must be a positive number".to_string()));
    }
    if request.customer_email.trim().is_empty() {
        return Err(ServerError::InvalidRequest("customerEmail is required".to_string()));
    }
    let order_id = request.order_id.filter(|id| !id.trim().is_empty()).map(OrderId).unwrap_or_else(new_order_id);
    debug!("💻️ POST new order {order_id} for {}", request.customer_email);
    let mut order = NewOrder::new(order_id, Cents::from_major(request.amount), request.customer_email);
    if let Some(currency) = request.currency {
        order.currency = currency;
    }
    order.customer_name = request.customer_name;
    order.shipping_address = request.shipping_address;
    order.shipping_city = request.shipping_city;
    order.shipping_phone = request.shipping_phone;
    let order = api.process_new_order(order).await?;
    Ok(HttpResponse::Ok().json(OrderResponse { success: true, order }))
}

route!(order_by_id => Get "/orders/{order_id}" impl CheckoutDatabase);
pub async fn order_by_id<B: CheckoutDatabase>(
    path: web::Path<String>,
    api: web::Data<PaymentFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId(path.into_inner());
    debug!("💻️ GET order {order_id}");
    let order = api.fetch_order(&order_id).await?.ok_or_else(|| ServerError::OrderNotFound(order_id.to_string()))?;
    Ok(HttpResponse::Ok().json(OrderResponse { success: true, order }))
}
