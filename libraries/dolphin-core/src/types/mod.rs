mod contact;
mod ids;
mod note;
mod session;
mod user;

pub use contact::{Contact, ContactFilter, ContactStats, ContactType, CreateContact};
pub use ids::{ContactId, NoteId, UserId};
pub use note::{CreateNote, Note};
pub use session::Session;
pub use user::{CreateUser, Role, User};
