//! Kernel module - server infrastructure and dependencies.

pub mod payment_gateway;
pub mod retry;
pub mod scheduled_tasks;
pub mod server_kernel;
pub mod test_dependencies;
pub mod traits;

pub use payment_gateway::{HttpPaymentGateway, PaymentError};
pub use retry::RetryPolicy;
pub use scheduled_tasks::start_scheduler;
pub use server_kernel::ServerKernel;
pub use test_dependencies::{ChargeCall, MockPaymentGateway, TestDependencies};
pub use traits::*;
