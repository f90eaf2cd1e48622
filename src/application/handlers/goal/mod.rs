//! Goal progress engine command handlers.

mod create_objective;
mod delete_objective;
mod edit_objective;
mod get_objective;
mod list_objectives;
mod update_progress;

pub use create_objective::{CreateObjectiveCommand, CreateObjectiveError, CreateObjectiveHandler};
pub use delete_objective::{DeleteObjectiveCommand, DeleteObjectiveError, DeleteObjectiveHandler};
pub use edit_objective::{
    EditObjectiveCommand, EditObjectiveError, EditObjectiveHandler, ObjectiveEdit,
};
pub use get_objective::{GetObjectiveError, GetObjectiveHandler, GetObjectiveQuery};
pub use list_objectives::{ListObjectivesError, ListObjectivesHandler, ListObjectivesQuery};
pub use update_progress::{UpdateProgressCommand, UpdateProgressError, UpdateProgressHandler};
