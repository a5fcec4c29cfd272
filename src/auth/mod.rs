mod session;
mod user;

pub use session::{Credential, SessionProvider, StaticSession};
pub use user::User;
