//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::{
        carts::records::{CartLineRecord, CartLineUuid, CartRecord, CartUuid},
        catalog::records::CatalogItemUuid,
        patients::records::PatientUuid,
    },
    money::{DiscountPercent, LineAmounts, MoneyError, OrderTotals},
};

/// Cart with its lines and derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub uuid: CartUuid,
    pub patient_uuid: PatientUuid,
    pub lines: Vec<CartLineView>,
    pub subtotal: u64,
    pub total_discount: u64,
    pub total: u64,
    pub item_count: usize,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartView {
    /// Price every line and total the cart.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] when an amount does not fit in a `u64`.
    pub fn build(cart: CartRecord, lines: Vec<CartLineRecord>) -> Result<Self, MoneyError> {
        let lines = lines
            .into_iter()
            .map(CartLineView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let totals = OrderTotals::from_lines(lines.iter().map(|line| &line.amounts))?;

        Ok(Self {
            uuid: cart.uuid,
            patient_uuid: cart.patient_uuid,
            item_count: lines.len(),
            lines,
            subtotal: totals.subtotal,
            total_discount: totals.discount_amount,
            total: totals.subtotal - totals.discount_amount,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        })
    }
}

/// Priced cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub uuid: CartLineUuid,
    pub catalog_item_uuid: CatalogItemUuid,
    pub name: String,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub quantity: u32,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
    pub amounts: LineAmounts,
}

impl TryFrom<CartLineRecord> for CartLineView {
    type Error = MoneyError;

    fn try_from(line: CartLineRecord) -> Result<Self, Self::Error> {
        let amounts = LineAmounts::compute(line.unit_price, line.quantity, line.discount_percent)?;

        Ok(Self {
            uuid: line.uuid,
            catalog_item_uuid: line.catalog_item_uuid,
            name: line.name,
            image_url: line.image_url,
            in_stock: line.in_stock,
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percent: line.discount_percent,
            amounts,
        })
    }
}
