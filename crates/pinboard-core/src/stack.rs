//! Back-to-front render order and z-index resolution.

/// Ordered widget ids (back to front) plus the widget currently being dragged.
#[derive(Debug, Clone)]
pub struct StackOrder {
    order: Vec<String>,
    dragging: Option<String>,
    base_z: i32,
    active_z: i32,
}

impl StackOrder {
    /// Stack in the given order. Duplicate ids keep their first occurrence.
    pub fn new<I, S>(ids: I, base_z: i32, active_z: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !order.contains(&id) {
                order.push(id);
            }
        }
        Self {
            order,
            dragging: None,
            base_z,
            active_z,
        }
    }

    /// Back-to-front order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Move `id` to the front (end of the list). Unknown ids are ignored.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let Some(idx) = self.order.iter().position(|o| o == id) else {
            return false;
        };
        let entry = self.order.remove(idx);
        self.order.push(entry);
        tracing::trace!("stack order: {:?}", self.order);
        true
    }

    /// Mark `id` as the single actively dragged widget, or clear it.
    pub fn set_dragging(&mut self, id: Option<&str>) {
        self.dragging = id.map(str::to_string);
    }

    /// Z-index value reserved for the dragged widget. Always above every
    /// stacked value, even for stacks longer than `active_z - base_z`.
    pub fn active_z_index(&self) -> i32 {
        let top = self.base_z.saturating_add(self.order.len() as i32);
        self.active_z.max(top)
    }

    /// `base_z + index` for stacked widgets, the active value for the
    /// dragged one. Unknown ids sit at `base_z`.
    pub fn z_index(&self, id: &str) -> i32 {
        if self.dragging.as_deref() == Some(id) {
            return self.active_z_index();
        }
        let idx = self.order.iter().position(|o| o == id).unwrap_or(0);
        self.base_z.saturating_add(idx as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> StackOrder {
        StackOrder::new(["a", "b", "c"], 10, 1000)
    }

    #[test]
    fn test_initial_order_follows_declaration() {
        let stack = abc();
        assert_eq!(stack.order(), ["a", "b", "c"]);
        assert_eq!(stack.z_index("a"), 10);
        assert_eq!(stack.z_index("c"), 12);
    }

    #[test]
    fn test_bring_to_front_moves_to_end() {
        let mut stack = abc();
        assert!(stack.bring_to_front("a"));
        assert_eq!(stack.order(), ["b", "c", "a"]);
        assert!(stack.z_index("a") > stack.z_index("b"));
        assert!(stack.z_index("a") > stack.z_index("c"));

        assert!(!stack.bring_to_front("zzz"));
        assert_eq!(stack.order().len(), 3);
    }

    #[test]
    fn test_dragging_wins_regardless_of_order() {
        let mut stack = abc();
        stack.bring_to_front("a");
        stack.set_dragging(Some("c"));
        assert!(stack.z_index("c") > stack.z_index("a"));
        assert!(stack.z_index("c") > stack.z_index("b"));

        stack.set_dragging(None);
        assert_eq!(stack.z_index("c"), 11);
    }

    #[test]
    fn test_active_value_outranks_long_stacks() {
        let ids: Vec<String> = (0..50).map(|i| format!("w{i}")).collect();
        let mut stack = StackOrder::new(ids, 10, 20);
        stack.set_dragging(Some("w0"));
        assert!(stack.z_index("w0") > stack.z_index("w49"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let stack = StackOrder::new(["a", "a", "b"], 0, 100);
        assert_eq!(stack.order(), ["a", "b"]);
    }
}
