pub mod provisioner;
pub mod report;
pub mod schema;
pub mod session;

pub use provisioner::*;
pub use report::*;
pub use schema::*;
pub use session::*;
