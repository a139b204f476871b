//! The fixed menu of offered services.

/// A service the shop offers, with its standard estimated duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceItem {
    pub id: &'static str,
    pub name: &'static str,
    pub duration_hours: f64,
}

/// Services offered, in menu order.
pub const SERVICE_MENU: [ServiceItem; 6] = [
    ServiceItem { id: "s1", name: "Quick Oil Change", duration_hours: 1.0 },
    ServiceItem { id: "s2", name: "Tire Rotation & Balance", duration_hours: 1.0 },
    ServiceItem { id: "s3", name: "Brake Service (Axle)", duration_hours: 2.0 },
    ServiceItem { id: "s4", name: "General Diagnostics", duration_hours: 1.5 },
    ServiceItem { id: "s5", name: "Major Service / Tune-up", duration_hours: 4.0 },
    ServiceItem { id: "s6", name: "Transmission Flush", duration_hours: 2.5 },
];

/// Look up a menu item by its id.
pub fn service_by_id(id: &str) -> Option<&'static ServiceItem> {
    SERVICE_MENU.iter().find(|item| item.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(service_by_id("s3").map(|s| s.duration_hours), Some(2.0));
        assert!(service_by_id("s99").is_none());
    }
}
