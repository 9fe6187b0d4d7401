mod admin_guard;

pub use admin_guard::{AdminGuardFactory, AdminGuardService, AdminUser};
