//! The cart as the UI sees it, and the optimistic edits applied before the
//! backend confirms them.

use crate::model::{CartLine, CartSnapshot, CartSummary, MenuItemId, MenuItemRef};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub lines: Vec<CartLine>,
    /// Totals from the last applied fetch. `None` until one succeeds.
    pub summary: Option<CartSummary>,
    pub is_open: bool,
    pub is_loading: bool,
}

impl CartState {
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }

    /// Client-side sum of unit price times quantity.
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Backend totals when known, else the locally computed placeholder.
    pub fn display_summary(&self) -> CartSummary {
        self.summary
            .clone()
            .unwrap_or_else(|| CartSummary::placeholder(&self.lines))
    }

    pub fn quantity_of(&self, id: &MenuItemId) -> Option<u32> {
        self.line(id).map(|line| line.quantity)
    }

    pub fn contains(&self, id: &MenuItemId) -> bool {
        self.line(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line(&self, id: &MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Bumps an existing line or appends a new one with quantity 1.
    /// Returns the quantity the backend should now hold.
    pub(crate) fn apply_add(&mut self, item: MenuItemRef) -> u32 {
        match self.lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine::new(item, 1));
                1
            }
        }
    }

    /// Zero removes the line. Returns `false` when the item is not in the cart.
    pub(crate) fn apply_quantity(&mut self, id: &MenuItemId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.apply_remove(id);
        }
        match self.lines.iter_mut().find(|line| line.id() == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub(crate) fn apply_remove(&mut self, id: &MenuItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() != before
    }

    /// Replaces lines and totals with the backend's view.
    pub(crate) fn apply_snapshot(&mut self, snapshot: CartSnapshot) {
        self.lines = snapshot.lines;
        self.summary = Some(snapshot.summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll() -> MenuItemRef {
        MenuItemRef::new("a", "Roll", Decimal::from(100))
    }

    #[test]
    fn repeated_adds_collapse_into_one_line() {
        let mut state = CartState::default();
        assert_eq!(state.apply_add(roll()), 1);
        assert_eq!(state.apply_add(roll()), 2);
        assert_eq!(state.apply_add(roll()), 3);
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.total_items(), 3);
        assert_eq!(state.total_price(), Decimal::from(300));
    }

    #[test]
    fn quantities_saturate_instead_of_overflowing() {
        let mut state = CartState {
            lines: vec![
                CartLine::new(roll(), u32::MAX),
                CartLine::new(MenuItemRef::new("b", "Tea", Decimal::from(30)), 2),
            ],
            ..CartState::default()
        };
        assert_eq!(state.apply_add(roll()), u32::MAX);
        assert_eq!(state.total_items(), u32::MAX);
    }

    #[test]
    fn quantity_zero_removes_and_unknown_ids_are_ignored() {
        let mut state = CartState::default();
        state.apply_add(roll());

        assert!(!state.apply_quantity(&MenuItemId::from("missing"), 4));
        assert!(state.apply_quantity(&MenuItemId::from("a"), 5));
        assert_eq!(state.quantity_of(&MenuItemId::from("a")), Some(5));

        assert!(state.apply_quantity(&MenuItemId::from("a"), 0));
        assert!(state.is_empty());
        assert!(!state.apply_remove(&MenuItemId::from("a")));
    }

    #[test]
    fn display_summary_falls_back_to_placeholder() {
        let mut state = CartState::default();
        state.apply_add(roll());
        assert_eq!(state.display_summary().subtotal, Decimal::from(100));
        assert_eq!(state.display_summary().grand_total, Decimal::ZERO);

        let summary = CartSummary {
            subtotal: Decimal::from(100),
            gst: Decimal::from(5),
            grand_total: Decimal::from(105),
            ..CartSummary::default()
        };
        state.apply_snapshot(CartSnapshot {
            lines: state.lines.clone(),
            summary: summary.clone(),
        });
        assert_eq!(state.display_summary(), summary);
    }
}
