use crate::domain::order::CheckoutOrder;
use crate::domain::workflow::CheckoutOutcome;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    order_id: String,
    status: &'a str,
    subtotal: String,
    total: String,
    reason: &'a str,
}

/// Writes checkout results as CSV: `order_id,status,subtotal,total,reason`.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, order: &CheckoutOrder, outcome: &CheckoutOutcome) -> Result<()> {
        self.writer.serialize(OutcomeRecord {
            order_id: outcome.order_id.to_string(),
            status: outcome.status.as_str(),
            subtotal: order.subtotal.to_string(),
            total: order.total.to_string(),
            reason: outcome.reason_text(),
        })?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{Cart, LineItem};
    use crate::domain::money::Price;
    use crate::domain::order::{OrderId, OrderStatus};
    use crate::domain::workflow::FailureReason;
    use jiff::Timestamp;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writes_header_and_row() {
        let mut cart = Cart::new();
        cart.add(LineItem::new("a", "A", Price::new(dec!(2.50)).unwrap(), 2, "").unwrap());
        let order = CheckoutOrder::new(OrderId::new(), &cart, Timestamp::now()).unwrap();
        let outcome = CheckoutOutcome {
            order_id: order.order_id,
            status: OrderStatus::Failed,
            reason: Some(FailureReason::Timeout),
        };

        let mut buffer = Vec::new();
        OutcomeWriter::new(&mut buffer)
            .write_outcome(&order, &outcome)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("order_id,status,subtotal,total,reason"));
        assert_eq!(
            lines.next().unwrap(),
            format!("{},failed,5,5,Payment processing timed out.", order.order_id)
        );
    }
}
