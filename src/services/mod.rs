pub mod accounts;
pub mod clock;
pub mod favorites;
pub mod mailer;
pub mod metrics;
pub mod quotable;
pub mod quotes;

pub use accounts::*;
pub use clock::*;
pub use favorites::*;
pub use mailer::*;
pub use metrics::*;
pub use quotable::*;
pub use quotes::*;
