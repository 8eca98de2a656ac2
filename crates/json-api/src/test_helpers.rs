//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use testresult::TestResult;
use uuid::Uuid;

use apothecary_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartLineView, CartView},
            records::{CartLineUuid, CartUuid},
        },
        catalog::{MockCatalogService, records::CatalogItemUuid},
        orders::{
            MockOrdersService,
            data::ShippingAddress,
            models::OrderView,
            numbers::OrderNumber,
            records::{
                OrderLineRecord, OrderLineUuid, OrderRecord, OrderStatus, OrderUuid,
                PaymentStatus,
            },
        },
        patients::{
            MockPatientsService,
            records::{OwnerUuid, PatientUuid},
        },
    },
    money::{DiscountPercent, LineAmounts},
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_OWNER_UUID: OwnerUuid = OwnerUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_owner(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_owner_uuid(TEST_OWNER_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn state_with(carts: MockCartsService, orders: MockOrdersService) -> Arc<State> {
    State::from_app_context(AppContext {
        patients: Arc::new(MockPatientsService::new()),
        catalog: Arc::new(MockCatalogService::new()),
        carts: Arc::new(carts),
        orders: Arc::new(orders),
    })
}

fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_owner)
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    service_with(state_with(carts, MockOrdersService::new()), route)
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service_with(state_with(MockCartsService::new(), orders), route)
}

/// A cart holding two of a 12.50 item at 10% off.
pub(crate) fn make_cart() -> TestResult<CartView> {
    let discount_percent: DiscountPercent = "10".parse()?;

    Ok(CartView {
        uuid: CartUuid::new(),
        patient_uuid: PatientUuid::new(),
        lines: vec![CartLineView {
            uuid: CartLineUuid::new(),
            catalog_item_uuid: CatalogItemUuid::new(),
            name: "Cetirizine 10mg".to_string(),
            image_url: None,
            in_stock: true,
            quantity: 2,
            unit_price: 1250,
            discount_percent,
            amounts: LineAmounts::compute(1250, 2, discount_percent)?,
        }],
        subtotal: 2500,
        total_discount: 250,
        total: 2250,
        item_count: 1,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    })
}

pub(crate) fn make_address() -> ShippingAddress {
    ShippingAddress {
        address_line1: "12 High Street".to_string(),
        address_line2: None,
        city: "Leeds".to_string(),
        state: "West Yorkshire".to_string(),
        postal_code: "LS1 1AA".to_string(),
        country: "GB".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid) -> TestResult<OrderView> {
    let order_number: OrderNumber = "ORD-20260310-001".parse()?;

    Ok(OrderView {
        order: OrderRecord {
            uuid,
            order_number,
            patient_uuid: PatientUuid::new(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: Some("card".to_string()),
            payment_transaction_id: None,
            subtotal: 2500,
            discount_amount: 200,
            tax_amount: 0,
            shipping_charges: 0,
            total_amount: 2300,
            shipping_address: make_address(),
            verified_by: None,
            verified_at: None,
            shipped_at: None,
            delivered_at: None,
            tracking_number: None,
            courier_name: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        lines: vec![
            OrderLineRecord {
                uuid: OrderLineUuid::new(),
                order_uuid: uuid,
                catalog_item_uuid: CatalogItemUuid::new(),
                name: "Paracetamol 500mg".to_string(),
                image_url: None,
                position: 0,
                quantity: 2,
                unit_price: 1000,
                discount_percent: "10".parse()?,
                line_total: 1800,
            },
            OrderLineRecord {
                uuid: OrderLineUuid::new(),
                order_uuid: uuid,
                catalog_item_uuid: CatalogItemUuid::new(),
                name: "Saline Spray".to_string(),
                image_url: Some("https://img.example/saline.png".to_string()),
                position: 1,
                quantity: 1,
                unit_price: 500,
                discount_percent: DiscountPercent::ZERO,
                line_total: 500,
            },
        ],
    })
}
