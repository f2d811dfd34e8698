//! Translation of gateway transaction statuses into the local order vocabulary.
//!
//! Wompi reports transaction statuses as upper-case strings (`APPROVED`, `DECLINED`, `VOIDED`, `ERROR`, `PENDING`,
//! and whatever future statuses the gateway grows). Every path that needs to reflect a gateway verdict onto an order,
//! whether it arrived by webhook or by polling, goes through [`map_gateway_status`]. There is deliberately no second
//! mapping anywhere else in the workspace.

use serde::Serialize;

use crate::db_types::{OrderStatusType, PaymentStatus};

/// The order-side statuses implied by one gateway transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMapping {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatusType,
}

/// Map a gateway transaction status onto the local `(payment_status, order_status)` pair.
///
/// Matching is exact and case-sensitive; `approved` is not a verdict Wompi produces, so it lands on the pending row
/// like any other unrecognised string. The function is total: unknown statuses never error, they stay pending until
/// the gateway says something recognisable.
pub fn map_gateway_status(status: &str) -> StatusMapping {
    let (payment_status, order_status) = match status {
        "APPROVED" => (PaymentStatus::Paid, OrderStatusType::Processing),
        "DECLINED" => (PaymentStatus::Failed, OrderStatusType::Cancelled),
        "VOIDED" => (PaymentStatus::Cancelled, OrderStatusType::Cancelled),
        "ERROR" => (PaymentStatus::Failed, OrderStatusType::Pending),
        _ => (PaymentStatus::Pending, OrderStatusType::Pending),
    };
    StatusMapping { payment_status, order_status }
}

/// How definitive a gateway status is. Terminal verdicts rank 1; `PENDING` and anything
/// unrecognised rank 0. A stored status may only be replaced by one of equal or higher rank,
/// which keeps a late or replayed `PENDING` webhook from clobbering an `APPROVED` row.
pub fn status_rank(status: &str) -> i64 {
    if is_terminal_status(status) {
        1
    } else {
        0
    }
}

pub fn is_terminal_status(status: &str) -> bool {
    matches!(status, "APPROVED" | "DECLINED" | "VOIDED" | "ERROR")
}
