//! Route definitions for the administrative backend.

use crate::routing::{GroupAttributes, RouteTableBuilder};

/// Namespace the admin controllers live in.
pub const BACK_NAMESPACE: &str = "\\App\\Http\\Controllers\\Back";

/// Name of the middleware guarding the admin area.
pub const ADMIN_MIDDLEWARE: &str = "admin";

/// Declare the admin routes.
pub fn admin(routes: &mut RouteTableBuilder) {
    let group = GroupAttributes::new()
        .prefix("admin")
        .middleware([ADMIN_MIDDLEWARE])
        .namespace(BACK_NAMESPACE);

    routes.group(group, |routes| {
        routes
            .get("/", ("\\App\\Http\\Controllers\\Back\\AdminController", "index"))
            .name("admin");

        routes
            .resource("days", "DaysController")
            .except(["show"])
            .parameters([("day", "day")]);

        routes
            .get("days/{day}", ("DaysController", "alert"))
            .name("days.destroy.alert");
    });
}

/// A builder holding the admin routes.
pub fn builder() -> RouteTableBuilder {
    let mut routes = RouteTableBuilder::new();
    admin(&mut routes);
    routes
}
