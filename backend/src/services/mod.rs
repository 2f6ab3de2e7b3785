//! Service layer for dashboard logic.
//!
//! Services sit between the repository traits and the HTTP layer. They are
//! generic over the repository so they can run against any storage backend.
//!
//! - [`alignment`]: pairs the selected week with its neighbours
//! - [`contracts`]: forward futures contracts and their catalog products
//! - [`navigation`]: query-parameter routing between views
//! - [`dashboard`]: assembles the view payloads

pub mod alignment;
pub mod contracts;
pub mod dashboard;
pub mod navigation;

pub use alignment::{align, WeekBlock, WindowSpec};
pub use contracts::{resolve_forward_products, select_forward_contracts};
pub use dashboard::{
    build_dashboard, build_product_detail, build_view, DashboardView, ProductDetailView,
    ViewPayload,
};
pub use navigation::{route, Mode, NavigationParams};

#[cfg(test)]
#[path = "alignment_tests.rs"]
mod alignment_tests;


#[cfg(test)]
#[path = "navigation_tests.rs"]
mod navigation_tests;
