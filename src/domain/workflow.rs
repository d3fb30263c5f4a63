//! Client-visible checkout state: the UI step, the processing countdown, and
//! the outcome shown on the result screen.

use crate::domain::order::{CheckoutOrder, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The screen the checkout is on. Orthogonal to [`OrderStatus`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Cart,
    Processing,
    Result,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Processing => "processing",
            CheckoutStep::Result => "result",
        })
    }
}

/// Why an order ended up `failed`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    UserCancelled,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "Payment processing timed out.",
            FailureReason::UserCancelled => "Order was cancelled by user.",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Seconds left in the processing window.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Countdown {
    pub remaining: u32,
    pub total: u32,
}

impl Countdown {
    pub fn new(total: u32) -> Self {
        Self {
            remaining: total,
            total,
        }
    }

    pub fn elapsed(&self) -> u32 {
        self.total.saturating_sub(self.remaining)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Advances one tick. Returns `true` once the countdown has hit zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_expired()
    }

    /// Fraction of the window already used, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        f64::from(self.elapsed()) / f64::from(self.total)
    }

    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        self.elapsed() * 100 / self.total
    }

    /// Text progress bar, `width` cells wide, filled in proportion to elapsed time.
    pub fn render_bar(&self, width: usize) -> String {
        let filled = if self.total == 0 {
            width
        } else {
            width * self.elapsed() as usize / self.total as usize
        };
        format!(
            "[{}{}] {:>2}s",
            "#".repeat(filled),
            "-".repeat(width - filled),
            self.remaining
        )
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Snapshot of everything the checkout screen renders.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub order: Option<CheckoutOrder>,
    pub countdown: Countdown,
    pub cancel_enabled: bool,
    pub reason: Option<FailureReason>,
}

impl CheckoutView {
    pub fn status(&self) -> Option<OrderStatus> {
        self.order.as_ref().map(|order| order.status)
    }

    /// The outcome, once the view has reached the result step.
    pub fn outcome(&self) -> Option<CheckoutOutcome> {
        if self.step != CheckoutStep::Result {
            return None;
        }
        let order = self.order.as_ref()?;
        Some(CheckoutOutcome {
            order_id: order.order_id,
            status: order.status,
            reason: self.reason,
        })
    }
}

/// The terminal result emitted to collaborators: final status plus reason.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub reason: Option<FailureReason>,
}

impl CheckoutOutcome {
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    pub fn reason_text(&self) -> &'static str {
        self.reason.map(|r| r.message()).unwrap_or("")
    }
}
