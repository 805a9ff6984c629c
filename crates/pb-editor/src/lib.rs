pub mod animation;
pub mod capability;
pub mod dialog;
pub mod drag;
pub mod input;
pub mod panel;
pub mod persist;
pub mod roles;
pub mod session;
pub mod snap;
pub mod store;
pub mod tooltip;

pub use capability::{ContentEditor, ImagePicker, PageHost};
pub use drag::{ClickGuard, DragController, DragEvent, DragFrame, DragOptions};
pub use input::{InputEvent, PointerSource};
pub use persist::{PersistError, PersistenceApi, PositionUpdate, SaveResponse};
pub use roles::{Hit, Role, RoleLookup, RoleRegistry};
pub use session::{BreakoutSession, ClickContext, ClickResponse, Collaborators, Mode, Status};
pub use store::MemoryStore;
