pub mod analytics;
pub mod links;
pub mod redirect;
pub mod short_code;

pub use analytics::AnalyticsService;
pub use links::LinkService;
pub use redirect::{ClickValidator, ClickVerdict, RedirectService, SimulatedFraudCheck};
