mod caller;
pub mod guard;

pub use caller::{Caller, CALLER_EMAIL_HEADER, CALLER_ID_HEADER};
pub use guard::Role;
